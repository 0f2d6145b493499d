use clap::Parser;
use ethpay::application::provider::{CURRENCY_TYPE_FIELD, EthereumProvider};
use ethpay::domain::checkout::{CheckoutRequest, Event, Session};
use ethpay::domain::ports::{SettingsStoreBox, SettingsStoreFactory};
use ethpay::domain::settings::SettingKey;
use ethpay::error::ProviderError;
use ethpay::infrastructure::in_memory::InMemorySettingsStore;
#[cfg(feature = "storage-rocksdb")]
use ethpay::infrastructure::rocksdb::RocksDBSettingsStore;
use ethpay::interfaces::csv::settings_reader::{SettingRow, SettingsReader};
use ethpay::interfaces::json::report_writer::{EventReport, ReportWriter};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Merchant settings CSV file with columns `event, key, value`
    input: PathBuf,

    /// Only report on this event
    #[arg(long)]
    event: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log availability decisions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let factory = store_factory(cli.db_path.as_deref()).into_diagnostic()?;

    // Import settings
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = SettingsReader::new(file);
    let mut imported = 0usize;
    for row_result in reader.settings() {
        match row_result {
            Ok(row) => match import_setting(&factory, row).await {
                Ok(()) => imported += 1,
                Err(e) => error!("Error reading setting: {}", e),
            },
            Err(e) => error!("Error reading setting: {}", e),
        }
    }
    info!(imported, "settings imported");

    let events = match cli.event {
        Some(event) => vec![event],
        None => factory().events().await.into_diagnostic()?,
    };

    let mut reports = Vec::with_capacity(events.len());
    for slug in events {
        reports.push(report(&factory, slug).await.into_diagnostic()?);
    }

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_reports(reports).into_diagnostic()?;

    Ok(())
}

fn store_factory(db_path: Option<&Path>) -> ethpay::error::Result<SettingsStoreFactory> {
    if let Some(path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDBSettingsStore::open(path)?;
            return Ok(Box::new(move || Box::new(store.clone()) as SettingsStoreBox));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        tracing::warn!(
            path = %path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let store = InMemorySettingsStore::new();
    Ok(Box::new(move || Box::new(store.clone()) as SettingsStoreBox))
}

async fn import_setting(factory: &SettingsStoreFactory, row: SettingRow) -> ethpay::error::Result<()> {
    let key: SettingKey = row.key.parse()?;
    let provider = EthereumProvider::new(Event::new(row.event), factory());
    provider.settings().save(key, &row.value).await
}

async fn report(factory: &SettingsStoreFactory, slug: String) -> ethpay::error::Result<EventReport> {
    let event = Event::new(slug);
    let provider = EthereumProvider::new(event.clone(), factory());
    let request = CheckoutRequest::new(event, Session::new());

    let allowed = provider.is_allowed(&request).await?;
    let (currencies, error) = match provider.payment_form_fields().await {
        Ok(fields) => (
            fields
                .get(CURRENCY_TYPE_FIELD)
                .map(|field| field.choices().to_vec()),
            None,
        ),
        Err(e @ ProviderError::ImproperlyConfigured(_)) => (None, Some(e.to_string())),
        Err(e) => return Err(e),
    };

    Ok(EventReport {
        event: provider.event().slug.clone(),
        allowed,
        currencies,
        error,
    })
}
