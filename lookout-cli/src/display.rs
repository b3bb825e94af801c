//! Turns decoded responses into display tables.

use chrono::{DateTime, Utc};
use lookout_core::{
    CryptoAsset, IssLocation, Table, UnitSystem, WeatherInfo, model::Precipitation,
};

/// Which subset of weather fields is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Brief,
    Verbose,
}

impl Verbosity {
    pub fn from_flag(verbose: bool) -> Self {
        if verbose { Verbosity::Verbose } else { Verbosity::Brief }
    }

    pub fn toggled(self) -> Self {
        match self {
            Verbosity::Brief => Verbosity::Verbose,
            Verbosity::Verbose => Verbosity::Brief,
        }
    }
}

pub fn weather_table(info: &WeatherInfo, units: UnitSystem, verbosity: Verbosity) -> Table {
    let temp = |value: f64| format!("{value} {}", units.temp_suffix());
    let speed = |value: f64| format!("{value} {}", units.speed_suffix());

    let mut table = Table::new();
    table.add("Weather:", condition_summary(info));
    table.add("Temperature:", temp(info.atmosphere.temp));

    match verbosity {
        Verbosity::Brief => {
            table.add("Wind speed:", speed(info.wind.speed));
            table.add("Humidity:", format!("{}%", info.atmosphere.humidity));
        }
        Verbosity::Verbose => {
            table.add("Temperature min:", temp(info.atmosphere.temp_min));
            table.add("Temperature max:", temp(info.atmosphere.temp_max));
            table.add("Feels like:", temp(info.atmosphere.feels_like));
            if let Some(rain) = &info.rain {
                add_precipitation(&mut table, "Rainfall", rain);
            }
            if let Some(snow) = &info.snow {
                add_precipitation(&mut table, "Snowfall", snow);
            }
            table.add("Humidity:", format!("{}%", info.atmosphere.humidity));
            table.add("Cloudiness:", format!("{}%", info.clouds.all));
            table.add("Wind speed:", speed(info.wind.speed));
            if let Some(gust) = info.wind.gust {
                table.add("Gust:", speed(gust));
            }
            table.add("Direction:", format!("{}°", info.wind.deg));
            table.add("Pressure:", format!("{} hPa", info.atmosphere.pressure));
            table.add("Visibility:", format!("{} meters", info.visibility));
            table.add("Sunrise:", utc_time(info.sys.sunrise_utc()));
            table.add("Sunset:", utc_time(info.sys.sunset_utc()));
        }
    }

    table
}

fn add_precipitation(table: &mut Table, kind: &str, reading: &Precipitation) {
    if let Some(mm) = reading.last_1h {
        table.add(format!("{kind} last hour:"), format!("{mm} mm"));
    }
    if let Some(mm) = reading.last_3h {
        table.add(format!("{kind} last 3 hours:"), format!("{mm} mm"));
    }
}

fn condition_summary(info: &WeatherInfo) -> String {
    match info.primary_condition() {
        Some(c) => format!("{} ~ {}", c.main, c.description),
        None => "Unknown".to_string(),
    }
}

/// Name of the place a weather lookup resolved to, e.g. `"Paris, FR"`.
pub fn place_name(info: &WeatherInfo) -> Option<String> {
    let country = info.sys.country.as_deref().filter(|c| !c.is_empty())?;
    if info.name.is_empty() {
        Some(country.to_string())
    } else {
        Some(format!("{}, {country}", info.name))
    }
}

/// ISS coordinates plus the place below it, taken from a weather lookup at the
/// same position.
pub fn iss_table(location: &IssLocation, below: &WeatherInfo) -> Table {
    let mut table = Table::new();
    table.add("Latitude:", location.iss_position.latitude.as_str());
    table.add("Longitude:", location.iss_position.longitude.as_str());
    table.add(
        "Currently above:",
        place_name(below).unwrap_or_else(|| "(not above any country)".to_string()),
    );
    table
}

pub fn crypto_table(asset: &CryptoAsset) -> Table {
    let mut table = Table::new();
    table.add("Name:", asset.name.as_str());
    table.add("ID:", asset.asset_id.as_str());
    table.add(
        "Price:",
        asset.price_usd.map(format_usd).unwrap_or_else(|| "(no price data found)".to_string()),
    );
    table
}

/// `1234.567` → `"$1,234.57"`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// `HH:MM:SS UTC`.
pub fn utc_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|dt| dt.format("%H:%M:%S UTC").to_string()).unwrap_or_else(|| "unknown".to_string())
}
