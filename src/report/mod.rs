// src/report/mod.rs
use crate::extractors::shortcode::Shortcode;
use crate::utils::error::ExtractError;

/// Columns shown in the terminal table.
pub const TABLE_COLUMNS: [&str; 4] = ["post_id", "post_name", "shortcode", "parameters_raw"];

/// Fields of the full record, in export order.
pub const RECORD_FIELDS: [&str; 5] = ["post_id", "post_name", "shortcode", "parameters", "parameters_raw"];

/// One flattened report line per shortcode occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub post_id: i64,
    pub post_name: String,
    pub shortcode: String,
    pub parameters: String,
    pub parameters_raw: String,
}

impl ReportRow {
    pub fn from_shortcode(code: &Shortcode) -> Result<Self, ExtractError> {
        Ok(Self {
            post_id: code.post_id,
            post_name: code.post_name.clone(),
            shortcode: code.name.clone(),
            parameters: code.attributes.render(),
            parameters_raw: code.attributes.to_json()?,
        })
    }

    /// Values in `RECORD_FIELDS` order.
    pub fn record(&self) -> [String; 5] {
        [
            self.post_id.to_string(),
            self.post_name.clone(),
            self.shortcode.clone(),
            self.parameters.clone(),
            self.parameters_raw.clone(),
        ]
    }

    fn table_cells(&self) -> [String; 4] {
        [
            self.post_id.to_string(),
            self.post_name.clone(),
            self.shortcode.clone(),
            self.parameters_raw.clone(),
        ]
    }
}

/// Renders rows as a bordered ASCII table with the `TABLE_COLUMNS` headers.
pub fn render_table(rows: &[ReportRow]) -> String {
    let cells: Vec<[String; 4]> = rows.iter().map(ReportRow::table_cells).collect();

    let mut widths = TABLE_COLUMNS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let rule = format!("+{}+\n", rule);

    let line = |values: &[&str]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(widths.iter())
            .map(|(v, w)| format!(" {}{} ", v, " ".repeat(w - v.chars().count())))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&line(&TABLE_COLUMNS[..]));
    out.push_str(&rule);
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(values.as_slice()));
    }
    out.push_str(&rule);
    out
}
