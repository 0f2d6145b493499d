use crate::domain::settings::ProviderSettings;
use crate::error::{ProviderError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Fractional digits of both ETH and xDai/DAI.
pub const DECIMALS: u32 = 18;

/// A cryptocurrency the shopper can pay with.
///
/// Variant order is the order in which choices are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Currency {
    #[serde(rename = "DAI")]
    Dai,
    #[serde(rename = "ETH")]
    Eth,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Dai => "DAI",
            Currency::Eth => "ETH",
        }
    }

    pub fn label(&self) -> &'static str {
        self.code()
    }

    /// Converts a whole-unit amount to its smallest unit, truncating below one wei.
    pub fn to_smallest_unit(&self, amount: Decimal) -> Result<u128> {
        let scale = Decimal::from(10u64.pow(DECIMALS));
        amount
            .checked_mul(scale)
            .and_then(|units| units.trunc().to_u128())
            .ok_or_else(|| {
                ProviderError::ValidationError(format!(
                    "{} {} cannot be expressed in smallest units",
                    amount,
                    self.code()
                ))
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DAI" => Ok(Currency::Dai),
            "ETH" => Ok(Currency::Eth),
            other => Err(ProviderError::ValidationError(format!(
                "Unknown currency '{}'",
                other
            ))),
        }
    }
}

/// Currencies with a configured receiving address, DAI before ETH.
pub fn available_currencies(settings: &ProviderSettings) -> Vec<Currency> {
    [Currency::Dai, Currency::Eth]
        .into_iter()
        .filter(|currency| settings.address_for(*currency).is_some())
        .collect()
}
