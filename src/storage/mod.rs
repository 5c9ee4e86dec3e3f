// src/storage/mod.rs
use chrono::NaiveDate;
use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::report::{ReportRow, RECORD_FIELDS};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Path of the export for `site` on `date`. Same site and day gives the same path.
    pub fn export_path(&self, site: Option<&str>, date: NaiveDate) -> PathBuf {
        self.base_dir.join(export_file_name(site, date))
    }

    /// Writes `rows` as CSV, replacing any export from the same day.
    pub fn save_csv(
        &self,
        rows: &[ReportRow],
        site: Option<&str>,
        date: NaiveDate,
    ) -> Result<PathBuf, StorageError> {
        if rows.is_empty() {
            return Err(StorageError::NoResults);
        }

        let file_path = self.export_path(site, date);
        {
            let file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
            let mut writer = BufWriter::new(file);
            write_csv(&mut writer, rows)?;
            writer.flush()?;
        }

        tracing::info!("Saved {} rows to {}", rows.len(), file_path.display());

        Ok(file_path)
    }
}

/// `shortcode-scrape-[<site>-]<YYYY-MM-DD>.csv`
pub fn export_file_name(site: Option<&str>, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    match site.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
        Some(site) => format!("shortcode-scrape-{}-{}.csv", site.replace('/', "-"), stamp),
        None => format!("shortcode-scrape-{}.csv", stamp),
    }
}

/// Header line of `RECORD_FIELDS`, then one line per row.
pub fn write_csv<W: Write>(out: &mut W, rows: &[ReportRow]) -> io::Result<()> {
    write_record(out, RECORD_FIELDS.iter().copied())?;
    for row in rows {
        let record = row.record();
        write_record(out, record.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_record<'a, W: Write>(out: &mut W, fields: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let line = fields.map(csv_field).collect::<Vec<_>>().join(",");
    writeln!(out, "{}", line)
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn row(id: i64, shortcode: &str, parameters: &str, raw: &str) -> ReportRow {
        ReportRow {
            post_id: id,
            post_name: "home".to_string(),
            shortcode: shortcode.to_string(),
            parameters: parameters.to_string(),
            parameters_raw: raw.to_string(),
        }
    }

    #[test]
    fn file_name_encodes_site_and_date() {
        assert_eq!(export_file_name(None, date()), "shortcode-scrape-2024-03-09.csv");
        assert_eq!(export_file_name(Some("news"), date()), "shortcode-scrape-news-2024-03-09.csv");
        assert_eq!(export_file_name(Some("/news/"), date()), "shortcode-scrape-news-2024-03-09.csv");
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let mut out = Vec::new();
        write_csv(
            &mut out,
            &[
                row(5, "button", "url: /x\r\ntext: Click", r#"{"url":"/x","text":"Click"}"#),
                row(6, "toc", "", "{}"),
            ],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = "post_id,post_name,shortcode,parameters,parameters_raw\n\
5,home,button,\"url: /x\r\ntext: Click\",\"{\"\"url\"\":\"\"/x\"\",\"\"text\"\":\"\"Click\"\"}\"\n\
6,home,toc,,{}\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_rows_create_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let err = storage.save_csv(&[], None, date()).unwrap_err();
        assert!(matches!(err, StorageError::NoResults));
        assert!(!storage.export_path(None, date()).exists());
    }

    #[test]
    fn same_day_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();

        let first = storage
            .save_csv(&[row(1, "a", "", "{}"), row(2, "b", "", "{}")], Some("news"), date())
            .unwrap();
        let second = storage.save_csv(&[row(3, "c", "", "{}")], Some("news"), date()).unwrap();
        assert_eq!(first, second);

        let text = fs::read_to_string(&second).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("3,home,c,,{}\n"));
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        fs::create_dir(storage.export_path(None, date())).unwrap();

        let err = storage.save_csv(&[row(1, "a", "", "{}")], None, date()).unwrap_err();
        assert!(matches!(err, StorageError::IoError(_)));
    }
}
