//! Domain model of the Ethereum payment provider.
//!
//! Everything here is free of I/O: settings snapshots, currencies, checkout
//! requests and form descriptors, plus the `SettingsStore` port that the
//! infrastructure layer implements.

pub mod checkout;
pub mod currency;
pub mod form;
pub mod ports;
pub mod settings;
