use crate::domain::form::Choice;
use crate::error::{ProviderError, Result};
use serde::Serialize;
use std::io::Write;

/// Availability and checkout choices of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub event: String,
    pub allowed: bool,
    pub currencies: Option<Vec<Choice>>,
    pub error: Option<String>,
}

/// Writes one JSON object per line.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_reports(&mut self, reports: impl IntoIterator<Item = EventReport>) -> Result<()> {
        for report in reports {
            serde_json::to_writer(&mut self.writer, &report)
                .map_err(|e| ProviderError::InternalError(Box::new(e)))?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
