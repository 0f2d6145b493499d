//! Application layer: the payment provider itself.
//!
//! `EthereumProvider` answers the host platform's questions (is the method
//! available, which form to render, what to charge) by reading the current
//! settings snapshot through the `SettingsStore` port on every call.

pub mod provider;
pub mod settings;
