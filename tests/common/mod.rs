#![allow(dead_code)]

use ethpay::application::provider::EthereumProvider;
use ethpay::domain::checkout::{CheckoutRequest, Event, Session};
use ethpay::infrastructure::in_memory::InMemorySettingsStore;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const TEST_ETH_RATE: &str = "0.004";
pub const TEST_DAI_RATE: &str = "1.0";
pub const TEST_WALLET_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const ETH_ADDRESS: &str = "0x1111111111111111111111111111111111111111";
pub const DAI_ADDRESS: &str = "0x2222222222222222222222222222222222222222";

pub const EVENT: &str = "democon";

pub fn provider() -> EthereumProvider {
    EthereumProvider::new(Event::new(EVENT), Box::new(InMemorySettingsStore::new()))
}

pub fn checkout_request() -> CheckoutRequest {
    CheckoutRequest::new(Event::new(EVENT), Session::new())
}

/// Writes `event, key, value` rows to a temporary CSV file.
pub fn settings_csv(rows: &[[&str; 3]]) -> Result<NamedTempFile, Error> {
    let file = NamedTempFile::new()?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file.reopen()?);

    wtr.write_record(["event", "key", "value"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(file)
}

/// Writes raw text, for rows the CSV writer would refuse to produce.
pub fn raw_csv(text: &str) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file)
}
