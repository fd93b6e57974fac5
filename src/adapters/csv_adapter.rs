//! CSV file data adapter.
//!
//! One file per symbol named `{CODE}_{EXCHANGE}.csv` with the columns
//! date, open, high, low, close, volume. Rows may arrive unsorted; output
//! is always sorted by date.

use crate::domain::error::TascreenError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, exchange))
    }

    fn read_all(&self, code: &str, exchange: &str) -> Result<Vec<OhlcvBar>, TascreenError> {
        let path = self.csv_path(code, exchange);
        let content = fs::read_to_string(&path).map_err(|e| TascreenError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TascreenError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TascreenError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TascreenError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(OhlcvBar {
                code: code.to_string(),
                exchange: exchange.to_string(),
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_volume(&record, 5)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, TascreenError> {
    record
        .get(idx)
        .ok_or_else(|| TascreenError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TascreenError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_volume(record: &csv::StringRecord, idx: usize) -> Result<i64, TascreenError> {
    record
        .get(idx)
        .ok_or_else(|| TascreenError::Data {
            reason: "missing volume column".into(),
        })?
        .parse()
        .map_err(|e| TascreenError::Data {
            reason: format!("invalid volume value: {}", e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        exchange: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TascreenError> {
        let mut bars = self.read_all(code, exchange)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self, exchange: &str) -> Result<Vec<String>, TascreenError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TascreenError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", exchange);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TascreenError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(&suffix) {
                let code = &name_str[..name_str.len() - suffix.len()];
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TascreenError> {
        let bars = self.read_all(code, exchange)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
