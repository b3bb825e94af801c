//! Interactive menu loop.
//!
//! Every action runs to completion (at most two sequential requests) before
//! the next prompt. Failures from an action are printed as one line and the
//! loop continues; only console I/O errors end it.

use std::io::{BufRead, Write};

use anyhow::Result;
use lookout_core::{Coordinates, LookoutApi, LookoutError, UnitSystem};
use tracing::{debug, info};

use crate::{
    console::{Console, parse_choice, parse_coordinate},
    display::{self, Verbosity},
};

const RULE: &str = "-----------------------------------------------------------";
const MAIN_MENU_LAST: u32 = 6;
const SETTINGS_MENU_LAST: u32 = 2;

/// Session settings. Live for the process only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub units: UnitSystem,
    pub verbosity: Verbosity,
}

/// What the loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Wait for Enter, then show the menu again.
    Pause,
    /// Show the menu again right away.
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<'a, R, W> {
    api: &'a dyn LookoutApi,
    console: Console<R, W>,
    settings: Settings,
}

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub fn new(api: &'a dyn LookoutApi, console: Console<R, W>, settings: Settings) -> Self {
        Self { api, console, settings }
    }

    #[cfg(test)]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run the main menu until the user quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_main_menu()?;

            let Some(line) = self.console.prompt("\nEnter a number to select an option:")? else {
                break;
            };

            let outcome = match parse_choice(&line, 0, MAIN_MENU_LAST) {
                Ok(choice) => self.dispatch(choice).await,
                Err(e) => Err(e.into()),
            };

            let flow = match outcome {
                Ok(flow) => flow,
                Err(err) => match err.downcast::<LookoutError>() {
                    Ok(e) => {
                        debug!(error = %e, "action failed");
                        self.console.log(&format!("\n{}", e.user_message()))?;
                        Flow::Pause
                    }
                    Err(fatal) => return Err(fatal),
                },
            };

            match flow {
                Flow::Quit => break,
                Flow::Continue => {}
                Flow::Pause => {
                    if self.pause()? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, choice: u32) -> Result<Flow> {
        info!(choice, units = %self.settings.units, "menu action");

        match choice {
            0 => {
                self.console.log("Exiting program...")?;
                Ok(Flow::Quit)
            }
            1 => self.weather_in_city().await,
            2 => self.weather_at_coordinates().await,
            3 => self.iss_location(false).await,
            4 => self.iss_location(true).await,
            5 => self.crypto_price().await,
            _ => self.settings_menu(),
        }
    }

    async fn weather_in_city(&mut self) -> Result<Flow> {
        let Some(city) = self.console.prompt("Please enter a city name:")? else {
            return Ok(Flow::Quit);
        };

        let units = self.settings.units;
        let weather = self.api.weather_in_city(&city, units).await?;

        let place = display::place_name(&weather).unwrap_or_else(|| weather.name.clone());
        self.console.log(&format!("\n\n--- Current weather in {place} ---"))?;
        self.console.table(&display::weather_table(&weather, units, self.settings.verbosity))?;
        Ok(Flow::Pause)
    }

    async fn weather_at_coordinates(&mut self) -> Result<Flow> {
        let Some(lat) = self.console.prompt("Please enter a latitude:")? else {
            return Ok(Flow::Quit);
        };
        let lat = parse_coordinate(&lat, "latitude")?;

        let Some(lon) = self.console.prompt("Please enter a longitude:")? else {
            return Ok(Flow::Quit);
        };
        let lon = parse_coordinate(&lon, "longitude")?;

        let coords = Coordinates::new(lat, lon)?;
        let units = self.settings.units;
        let weather = self.api.weather_at(coords, units).await?;

        let place = display::place_name(&weather)
            .unwrap_or_else(|| format!("{}, {}", coords.lat(), coords.lon()));
        self.console.log(&format!("\n\n--- Current weather at {place} ---"))?;
        self.console.table(&display::weather_table(&weather, units, self.settings.verbosity))?;
        Ok(Flow::Pause)
    }

    /// ISS position, then the weather lookup at that position to find the
    /// place below. The second request depends on the first.
    async fn iss_location(&mut self, with_weather: bool) -> Result<Flow> {
        let location = self.api.iss_location().await?;
        let coords = location.coordinates()?;

        let units = self.settings.units;
        let weather = self.api.weather_at(coords, units).await?;

        if with_weather {
            self.console.log("\n\n--- Current ISS location and weather ---")?;
            self.console.table(&display::iss_table(&location, &weather))?;
            self.console.table(&display::weather_table(&weather, units, self.settings.verbosity))?;
        } else {
            self.console.log("\n\n--- Current ISS location ---")?;
            self.console.table(&display::iss_table(&location, &weather))?;
        }
        Ok(Flow::Pause)
    }

    async fn crypto_price(&mut self) -> Result<Flow> {
        let Some(asset_id) = self.console.prompt("Please enter a crypto asset ID:")? else {
            return Ok(Flow::Quit);
        };

        let asset = self.api.crypto_asset(&asset_id).await?;

        self.console.log(&format!("\n\n--- Current data on {} ---", asset.asset_id))?;
        self.console.table(&display::crypto_table(&asset))?;
        Ok(Flow::Pause)
    }

    /// Settings sub-menu; returns to the main menu without pausing.
    fn settings_menu(&mut self) -> Result<Flow> {
        loop {
            self.print_settings_menu()?;

            let Some(line) = self.console.prompt("\nEnter a number to toggle a setting:")? else {
                return Ok(Flow::Quit);
            };

            match parse_choice(&line, 0, SETTINGS_MENU_LAST) {
                Ok(1) => self.settings.units = self.settings.units.toggled(),
                Ok(2) => self.settings.verbosity = self.settings.verbosity.toggled(),
                Ok(_) => return Ok(Flow::Continue),
                Err(e) => {
                    self.console.log(&format!("\n{}", e.user_message()))?;
                    if self.pause()? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
            }
        }
    }

    fn pause(&mut self) -> Result<Flow> {
        match self.console.prompt("\n[press 'Enter' to continue]")? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Quit),
        }
    }

    fn print_main_menu(&mut self) -> Result<()> {
        self.console.log(&format!("\n\n{RULE}"))?;
        for line in [
            "[0] << Quit",
            "[1] Get weather in a city",
            "[2] Get weather at coordinates",
            "[3] Get location of the ISS",
            "[4] Get location of the ISS & weather at that location",
            "[5] Get current cryptocurrency prices",
            "[6] Settings",
        ] {
            self.console.log(line)?;
        }
        Ok(())
    }

    fn print_settings_menu(&mut self) -> Result<()> {
        let Settings { units, verbosity } = self.settings;
        let mark = |selected: bool, name: &str| {
            if selected { format!("({name})") } else { format!(" {name} ") }
        };

        self.console.log(&format!("\n\n{RULE}"))?;
        self.console.log("[0] << Back")?;
        self.console.log(&format!(
            "[1] {} : {}",
            mark(units == UnitSystem::Imperial, "imperial"),
            mark(units == UnitSystem::Metric, "metric"),
        ))?;
        self.console.log(&format!(
            "[2] {} : {}",
            mark(verbosity == Verbosity::Brief, "brief"),
            mark(verbosity == Verbosity::Verbose, "verbose"),
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lookout_core::{
        ApiClient, Config, CryptoAsset, IssLocation, ServiceId, WeatherInfo, classify_status,
        error::StatusCode,
        model::{Condition, IssPosition},
    };
    use std::sync::Mutex;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    /// Canned responses; records every call.
    #[derive(Debug, Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        fail_with_status: Option<u16>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), LookoutError> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with_status {
                Some(code) => classify_status(StatusCode::from_u16(code).unwrap()),
                None => Ok(()),
            }
        }
    }

    fn weather() -> WeatherInfo {
        let mut info = WeatherInfo {
            name: "Oakland".into(),
            conditions: vec![Condition {
                main: "Clear".into(),
                description: "clear sky".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        info.atmosphere.temp = 18.5;
        info.wind.speed = 3.0;
        info.atmosphere.humidity = 60.0;
        info.sys.country = Some("US".into());
        info
    }

    #[async_trait]
    impl LookoutApi for FakeApi {
        async fn weather_in_city(
            &self,
            city: &str,
            units: UnitSystem,
        ) -> Result<WeatherInfo, LookoutError> {
            self.record(format!("city:{city}:{units}"))?;
            Ok(weather())
        }

        async fn weather_at(
            &self,
            coords: Coordinates,
            units: UnitSystem,
        ) -> Result<WeatherInfo, LookoutError> {
            self.record(format!("at:{},{}:{units}", coords.lat(), coords.lon()))?;
            Ok(weather())
        }

        async fn iss_location(&self) -> Result<IssLocation, LookoutError> {
            self.record("iss".to_string())?;
            Ok(IssLocation {
                message: "success".into(),
                timestamp: 1700000000,
                iss_position: IssPosition { latitude: "37.8".into(), longitude: "-122.2".into() },
            })
        }

        async fn crypto_asset(&self, asset_id: &str) -> Result<CryptoAsset, LookoutError> {
            self.record(format!("crypto:{asset_id}"))?;
            if asset_id.is_empty() {
                return Err(LookoutError::EmptyAssetQuery("Empty asset ID was queried.".into()));
            }
            Ok(CryptoAsset {
                asset_id: asset_id.into(),
                name: "Bitcoin".into(),
                price_usd: Some(50000.0),
            })
        }
    }

    async fn run_script(api: &dyn LookoutApi, script: &str, settings: Settings) -> (String, Settings) {
        let console = Console::new(script.as_bytes(), Vec::new());
        let mut app = App::new(api, console, settings);
        app.run().await.unwrap();
        let settings = app.settings();
        let out = String::from_utf8(app.into_console().into_output()).unwrap();
        (out, settings)
    }

    #[tokio::test]
    async fn quit_immediately() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "0\n", Settings::default()).await;

        assert!(out.contains("[0] << Quit"));
        assert!(out.contains("Exiting program"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn eof_ends_loop() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "", Settings::default()).await;
        assert!(out.contains("Enter a number to select an option:"));
    }

    #[tokio::test]
    async fn invalid_choices_reprompt() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "abc\n\n9\n\n0\n", Settings::default()).await;

        assert!(out.contains("Error: Please enter a number."));
        assert!(out.contains("Error: Please enter a number between 0 and 6 inclusive."));
        assert!(out.contains("Exiting program"));
        assert_eq!(out.matches("[0] << Quit").count(), 3);
    }

    #[tokio::test]
    async fn weather_in_city_uses_session_units() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "1\nOakland\n\n0\n", Settings::default()).await;

        assert_eq!(api.calls(), ["city:Oakland:imperial"]);
        assert!(out.contains("--- Current weather in Oakland, US ---"));
        assert!(out.contains("18.5 °F"));
        assert!(out.contains("3 mph"));
    }

    #[tokio::test]
    async fn iss_location_fetches_position_then_weather() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "3\n\n0\n", Settings::default()).await;

        assert_eq!(api.calls(), ["iss", "at:37.8,-122.2:imperial"]);
        assert!(out.contains("--- Current ISS location ---"));
        assert!(out.contains("Oakland, US"));
        assert!(!out.contains("Temperature:"));
    }

    #[tokio::test]
    async fn iss_with_weather_prints_both_tables() {
        let api = FakeApi::default();
        let settings = Settings { units: UnitSystem::Metric, verbosity: Verbosity::Brief };
        let (out, _) = run_script(&api, "4\n\n0\n", settings).await;

        assert_eq!(api.calls(), ["iss", "at:37.8,-122.2:metric"]);
        assert!(out.contains("--- Current ISS location and weather ---"));
        assert!(out.contains("Currently above:"));
        assert!(out.contains("18.5 °C"));
    }

    #[tokio::test]
    async fn bad_coordinates_never_reach_the_api() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "2\nnorth\n\n2\n95\n10\n\n0\n", Settings::default()).await;

        assert!(api.calls().is_empty());
        assert!(out.contains("Error: Please enter a number for the latitude."));
        assert!(out.contains("Error: Latitude must be between -90 and 90."));
    }

    #[tokio::test]
    async fn crypto_price_and_empty_id() {
        let api = FakeApi::default();
        let (out, _) = run_script(&api, "5\nBTC\n\n5\n\n\n0\n", Settings::default()).await;

        assert_eq!(api.calls(), ["crypto:BTC", "crypto:"]);
        assert!(out.contains("--- Current data on BTC ---"));
        assert!(out.contains("$50,000.00"));
        assert!(out.contains("Error: Empty asset ID was queried."));
    }

    #[tokio::test]
    async fn request_failures_are_reported_and_loop_continues() {
        let api = FakeApi { fail_with_status: Some(503), ..Default::default() };
        let (out, _) = run_script(&api, "3\n\n1\nParis\n\n0\n", Settings::default()).await;

        assert_eq!(api.calls(), ["iss", "city:Paris:imperial"]);
        assert_eq!(out.matches("Server error occurred. Please try again later.").count(), 2);
        assert!(out.contains("Exiting program"));
    }

    #[tokio::test]
    async fn settings_toggle_units_and_verbosity() {
        let api = FakeApi::default();
        let (out, settings) =
            run_script(&api, "6\n1\n2\n0\n1\nOakland\n\n0\n", Settings::default()).await;

        assert_eq!(settings, Settings { units: UnitSystem::Metric, verbosity: Verbosity::Verbose });
        assert!(out.contains("[1] (imperial) :  metric "));
        assert!(out.contains("[1]  imperial  : (metric)"));
        assert!(out.contains("[2] (brief) :  verbose "));
        assert!(out.contains("[2]  brief  : (verbose)"));
        assert_eq!(api.calls(), ["city:Oakland:metric"]);
        assert!(out.contains("Temperature min:"));
    }

    #[tokio::test]
    async fn settings_rejects_bad_input() {
        let api = FakeApi::default();
        let (out, settings) = run_script(&api, "6\n5\n\n0\n0\n", Settings::default()).await;

        assert!(out.contains("Error: Please enter a number between 0 and 2 inclusive."));
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn metric_weather_at_coordinates_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "37.7"))
            .and(query_param("lon", "-122.4"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "OW_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "main": {"temp": 17.3, "feels_like": 16.9, "humidity": 68, "pressure": 1016},
                "wind": {"speed": 4.1, "deg": 280},
                "sys": {"country": "US", "sunrise": 1700000000, "sunset": 1700040000},
                "name": "San Francisco"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = Config::default();
        cfg.endpoints.weather_url = format!("{}/data/2.5/weather", server.uri());
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "OW_KEY".into());
        let client = ApiClient::from_config(&cfg).unwrap();

        let settings = Settings { units: UnitSystem::Metric, verbosity: Verbosity::Brief };
        let (out, _) = run_script(&client, "2\n37.7\n-122.4\n\n0\n", settings).await;

        let temp_row = out.lines().find(|l| l.contains("Temperature:")).unwrap();
        let value = temp_row.trim_end_matches('|').trim_end();
        assert!(value.ends_with("°C"), "{temp_row}");
        assert!(!out.contains("°F"));
        assert!(out.contains("--- Current weather at San Francisco, US ---"));
    }
}
