use crate::domain::currency::Currency;
use crate::domain::ports::SettingsStore;
use crate::error::{ProviderError, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Prefix under which this provider's settings live in the per-event store.
pub const SETTINGS_NAMESPACE: &str = "payment_ethereum_";

/// Identifiers accepted for `TRANSACTION_PROVIDER`, with display labels.
pub const TRANSACTION_PROVIDERS: &[(&str, &str)] = &[("blockscout", "Blockscout")];

/// Identifiers accepted for `TOKEN_PROVIDER`, with display labels.
pub const TOKEN_PROVIDERS: &[(&str, &str)] = &[("blockscout", "Blockscout")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    WalletAddress,
    EthRate,
    XdaiRate,
    Eth,
    Dai,
    TransactionProvider,
    TokenProvider,
}

impl SettingKey {
    pub const ALL: [SettingKey; 7] = [
        SettingKey::WalletAddress,
        SettingKey::EthRate,
        SettingKey::XdaiRate,
        SettingKey::Eth,
        SettingKey::Dai,
        SettingKey::TransactionProvider,
        SettingKey::TokenProvider,
    ];

    /// Keys that must all be set before the payment method is offered.
    pub const REQUIRED: [SettingKey; 3] = [
        SettingKey::WalletAddress,
        SettingKey::EthRate,
        SettingKey::XdaiRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::WalletAddress => "WALLET_ADDRESS",
            SettingKey::EthRate => "ETH_RATE",
            SettingKey::XdaiRate => "xDAI_RATE",
            SettingKey::Eth => "ETH",
            SettingKey::Dai => "DAI",
            SettingKey::TransactionProvider => "TRANSACTION_PROVIDER",
            SettingKey::TokenProvider => "TOKEN_PROVIDER",
        }
    }

    /// The namespaced key used against the settings store.
    pub fn storage_key(&self) -> String {
        format!("{SETTINGS_NAMESPACE}{}", self.as_str())
    }

    /// Validates a value a merchant wants to store under this key.
    pub fn validate(&self, value: &str) -> Result<()> {
        let value = value.trim();
        match self {
            SettingKey::WalletAddress | SettingKey::Eth | SettingKey::Dai => {
                if is_hex_address(value) {
                    Ok(())
                } else {
                    Err(ProviderError::ValidationError(format!(
                        "{} must be a 0x-prefixed address of 40 hex digits, got '{}'",
                        self, value
                    )))
                }
            }
            SettingKey::EthRate | SettingKey::XdaiRate => match Decimal::from_str(value) {
                Ok(rate) if rate > Decimal::ZERO => Ok(()),
                Ok(_) => Err(ProviderError::ValidationError(format!(
                    "{} must be greater than zero",
                    self
                ))),
                Err(_) => Err(ProviderError::ValidationError(format!(
                    "{} must be a decimal number, got '{}'",
                    self, value
                ))),
            },
            SettingKey::TransactionProvider => check_choice(*self, value, TRANSACTION_PROVIDERS),
            SettingKey::TokenProvider => check_choice(*self, value, TOKEN_PROVIDERS),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ProviderError::ValidationError(format!("Unknown setting key '{}'", s)))
    }
}

fn check_choice(key: SettingKey, value: &str, choices: &[(&str, &str)]) -> Result<()> {
    if choices.iter().any(|(id, _)| *id == value) {
        Ok(())
    } else {
        Err(ProviderError::ValidationError(format!(
            "{} must be one of [{}], got '{}'",
            key,
            choices
                .iter()
                .map(|(id, _)| *id)
                .collect::<Vec<_>>()
                .join(", "),
            value
        )))
    }
}

fn is_hex_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// A snapshot of the provider's settings for one event.
///
/// Absent, empty and (for rates) unparsable values are all `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSettings {
    pub wallet_address: Option<String>,
    pub eth_rate: Option<Decimal>,
    pub xdai_rate: Option<Decimal>,
    pub eth_address: Option<String>,
    pub dai_address: Option<String>,
    pub transaction_provider: Option<String>,
    pub token_provider: Option<String>,
}

impl ProviderSettings {
    /// Reads every known key for `event` from the store.
    pub async fn load(store: &dyn SettingsStore, event: &str) -> Result<Self> {
        let mut settings = ProviderSettings::default();
        for key in SettingKey::ALL {
            let value = store
                .get(event, &key.storage_key())
                .await?
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            settings.apply(key, value);
        }
        Ok(settings)
    }

    fn apply(&mut self, key: SettingKey, value: Option<String>) {
        match key {
            SettingKey::WalletAddress => self.wallet_address = value,
            SettingKey::EthRate => self.eth_rate = value.and_then(|v| parse_rate(key, &v)),
            SettingKey::XdaiRate => self.xdai_rate = value.and_then(|v| parse_rate(key, &v)),
            SettingKey::Eth => self.eth_address = value,
            SettingKey::Dai => self.dai_address = value,
            SettingKey::TransactionProvider => self.transaction_provider = value,
            SettingKey::TokenProvider => self.token_provider = value,
        }
    }

    fn is_set(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::WalletAddress => self.wallet_address.is_some(),
            SettingKey::EthRate => self.eth_rate.is_some(),
            SettingKey::XdaiRate => self.xdai_rate.is_some(),
            SettingKey::Eth => self.eth_address.is_some(),
            SettingKey::Dai => self.dai_address.is_some(),
            SettingKey::TransactionProvider => self.transaction_provider.is_some(),
            SettingKey::TokenProvider => self.token_provider.is_some(),
        }
    }

    /// Required keys that are not set, in declaration order.
    pub fn missing_required(&self) -> Vec<SettingKey> {
        SettingKey::REQUIRED
            .into_iter()
            .filter(|key| !self.is_set(*key))
            .collect()
    }

    /// Receiving address configured for `currency`.
    pub fn address_for(&self, currency: Currency) -> Option<&str> {
        match currency {
            Currency::Dai => self.dai_address.as_deref(),
            Currency::Eth => self.eth_address.as_deref(),
        }
    }

    /// Identifier of the external service that verifies transfers in `currency`.
    pub fn verification_provider_for(&self, currency: Currency) -> Option<&str> {
        match currency {
            Currency::Dai => self.token_provider.as_deref(),
            Currency::Eth => self.transaction_provider.as_deref(),
        }
    }

    /// Units of `currency` per unit of the settlement currency.
    pub fn rate_for(&self, currency: Currency) -> Option<Decimal> {
        match currency {
            Currency::Dai => self.xdai_rate,
            Currency::Eth => self.eth_rate,
        }
    }
}

fn parse_rate(key: SettingKey, value: &str) -> Option<Decimal> {
    match Decimal::from_str(value) {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!(setting = %key, value, error = %e, "ignoring unparsable rate");
            None
        }
    }
}
