use crate::domain::currency::Currency;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// The merchant's event (tenant). Settings are scoped by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub slug: String,
}

impl Event {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

/// Key-value data scoped to the shopper's browser session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    data: HashMap<String, Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

/// An incoming checkout request.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub event: Event,
    pub session: Session,
}

impl CheckoutRequest {
    pub fn new(event: Event, session: Session) -> Self {
        Self { event, session }
    }
}

/// What the shopper has to send, and where, to settle an order total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentQuote {
    pub currency: Currency,
    /// Order total in the settlement currency.
    pub total: Decimal,
    pub amount: Decimal,
    pub amount_in_smallest_unit: u128,
    pub receiving_address: String,
    /// `TRANSACTION_PROVIDER` for ETH, `TOKEN_PROVIDER` for DAI; the service
    /// that later confirms the transfer.
    pub verification_provider: Option<String>,
}
