use std::io::{self, BufRead, StdinLock, Stdout, Write};

use lookout_core::{LookoutError, Table};

/// Line-oriented console: prompts on `out`, answers from `input`.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `prompt` and read one trimmed line. `None` once input is exhausted.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn log(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn table(&mut self, table: &Table) -> io::Result<()> {
        table.write_to(&mut self.out)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

/// Parse a menu choice in `start..=end`.
pub fn parse_choice(input: &str, start: u32, end: u32) -> Result<u32, LookoutError> {
    let choice: i64 = input
        .trim()
        .parse()
        .map_err(|_| LookoutError::InputFormat("Please enter a number.".to_string()))?;

    if choice < i64::from(start) || choice > i64::from(end) {
        return Err(LookoutError::InputFormat(format!(
            "Please enter a number between {start} and {end} inclusive."
        )));
    }

    Ok(choice as u32)
}

/// Parse a decimal coordinate; range checks happen in `Coordinates::new`.
pub fn parse_coordinate(input: &str, label: &str) -> Result<f64, LookoutError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LookoutError::InputFormat(format!("Please enter a number for the {label}.")))
}
