//! Two-column bordered text table.
//!
//! ```text
//!  --------------------------------
//! |     Weather:  |  Clear ~ clear |
//! | Temperature:  |  71.2 °F       |
//!  --------------------------------
//! ```
//!
//! Labels are right-aligned, values left-aligned, and both columns are as wide
//! as their widest entry in the current batch of rows.

use std::io::{self, Write};

/// Horizontal padding and delimiters around the two columns: `"| "`, `"  |  "`, `" |"`.
const ROW_PADDING: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<TableRow>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Rows render in insertion order.
    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push(TableRow { label: label.into(), value: value.into() });
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest label and widest value, in characters.
    pub fn column_widths(&self) -> (usize, usize) {
        self.rows.iter().fold((0, 0), |(label_w, value_w), row| {
            (label_w.max(row.label.chars().count()), value_w.max(row.value.chars().count()))
        })
    }

    /// Border line: a space, a run of dashes, a space; as wide as a data row.
    fn border(&self) -> String {
        let (label_w, value_w) = self.column_widths();
        let inner = label_w + value_w + ROW_PADDING - 2;
        format!(" {} ", "-".repeat(inner))
    }

    pub fn render(&self) -> String {
        let (label_w, value_w) = self.column_widths();
        let border = self.border();

        let mut out = String::with_capacity((self.rows.len() + 2) * (border.len() + 1));
        out.push_str(&border);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "| {:>label_w$}  |  {:<value_w$} |\n",
                row.label, row.value
            ));
        }
        out.push_str(&border);
        out.push('\n');
        out
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())
    }

    /// Render to stdout.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)?;
        lock.flush()
    }
}
