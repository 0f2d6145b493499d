use crate::error::{ProviderError, Result};
use std::io::Read;

/// One merchant setting: `event, key, value`.
#[derive(Debug, PartialEq, Clone)]
pub struct SettingRow {
    pub event: String,
    pub key: String,
    pub value: String,
}

impl TryFrom<csv::StringRecord> for SettingRow {
    type Error = ProviderError;

    fn try_from(record: csv::StringRecord) -> Result<Self> {
        match (record.get(0), record.get(1)) {
            (Some(event), Some(key)) => Ok(Self {
                event: event.to_string(),
                key: key.to_string(),
                value: record.get(2).unwrap_or_default().to_string(),
            }),
            _ => Err(ProviderError::ValidationError(format!(
                "expected `event, key, value`, got {} field(s)",
                record.len()
            ))),
        }
    }
}

/// Reads merchant settings from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so a trailing empty value may be omitted.
pub struct SettingsReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SettingsReader<R> {
    /// Creates a new `SettingsReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads rows; a malformed row yields an `Err` and does not stop
    /// the iteration.
    pub fn settings(self) -> impl Iterator<Item = Result<SettingRow>> {
        self.reader
            .into_records()
            .map(|result| result.map_err(ProviderError::from).and_then(SettingRow::try_from))
    }
}
