use crate::application::settings::ProviderSettingsHandle;
use crate::domain::checkout::{CheckoutRequest, Event, PaymentQuote};
use crate::domain::currency::{Currency, DECIMALS, available_currencies};
use crate::domain::form::{Choice, FormField, FormFields};
use crate::domain::ports::SettingsStoreBox;
use crate::domain::settings::{ProviderSettings, SettingKey, TOKEN_PROVIDERS, TRANSACTION_PROVIDERS};
use crate::error::{ProviderError, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// Name of the checkout form field holding the selected currency.
pub const CURRENCY_TYPE_FIELD: &str = "currency_type";

/// Session key under which the selected currency code is kept.
pub const SESSION_CURRENCY_TYPE: &str = "payment_ethereum_currency_type";

/// Session key under which the quoted amount (in whole units) is kept.
pub const SESSION_AMOUNT: &str = "payment_ethereum_amount";

/// The Ethereum / xDai payment method of one event.
///
/// Holds no state besides the settings store handle; every decision re-reads
/// the current settings.
pub struct EthereumProvider {
    event: Event,
    store: SettingsStoreBox,
}

impl EthereumProvider {
    pub const IDENTIFIER: &'static str = "ethereum";
    pub const VERBOSE_NAME: &'static str = "Ethereum";
    pub const PUBLIC_NAME: &'static str = "Ethereum";

    pub fn new(event: Event, store: SettingsStoreBox) -> Self {
        Self { event, store }
    }

    pub fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    pub fn verbose_name(&self) -> &'static str {
        Self::VERBOSE_NAME
    }

    pub fn public_name(&self) -> &'static str {
        Self::PUBLIC_NAME
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Settings of the provider's own event.
    pub fn settings(&self) -> ProviderSettingsHandle<'_> {
        ProviderSettingsHandle::new(self.store.as_ref(), &self.event.slug)
    }

    /// Fields the merchant fills in to configure this provider.
    pub fn settings_form_fields(&self) -> FormFields {
        let address = |label: &str| FormField::text(label, Some(42), Some(42));
        let provider_choices = |choices: &[(&str, &str)]| {
            choices
                .iter()
                .map(|(id, label)| Choice::new(*id, *label))
                .collect::<Vec<_>>()
        };

        let mut fields = FormFields::new();
        fields.insert(
            SettingKey::WalletAddress.as_str(),
            address("Wallet address")
                .help_text("Merchant wallet; required before the payment method is offered"),
        );
        fields.insert(
            SettingKey::EthRate.as_str(),
            FormField::decimal("Ethereum rate")
                .help_text("Amount of ETH charged per unit of the event currency"),
        );
        fields.insert(
            SettingKey::XdaiRate.as_str(),
            FormField::decimal("xDai rate")
                .help_text("Amount of xDai charged per unit of the event currency"),
        );
        fields.insert(
            SettingKey::Eth.as_str(),
            address("ETH receiving address")
                .help_text("Leave empty to disable payments in ETH")
                .optional(),
        );
        fields.insert(
            SettingKey::Dai.as_str(),
            address("DAI receiving address")
                .help_text("Leave empty to disable payments in DAI")
                .optional(),
        );
        fields.insert(
            SettingKey::TransactionProvider.as_str(),
            FormField::choice("Transaction provider", provider_choices(TRANSACTION_PROVIDERS))
                .help_text("Service used to look up incoming transactions")
                .optional(),
        );
        fields.insert(
            SettingKey::TokenProvider.as_str(),
            FormField::choice("Token provider", provider_choices(TOKEN_PROVIDERS))
                .help_text("Service used to look up token transfers")
                .optional(),
        );
        fields
    }

    /// Whether the payment method can be offered for `request`.
    ///
    /// Requires `WALLET_ADDRESS`, `ETH_RATE` and `xDAI_RATE` to be set for the
    /// request's event. Missing settings yield `Ok(false)`; only store failures
    /// are errors.
    pub async fn is_allowed(&self, request: &CheckoutRequest) -> Result<bool> {
        let settings = ProviderSettings::load(self.store.as_ref(), &request.event.slug).await?;
        let missing = settings.missing_required();
        if !missing.is_empty() {
            debug!(
                event = %request.event.slug,
                missing = ?missing.iter().map(SettingKey::as_str).collect::<Vec<_>>(),
                "ethereum payment not allowed"
            );
        }
        Ok(missing.is_empty())
    }

    /// The checkout form, with one `currency_type` choice per configured
    /// receiving address.
    ///
    /// Fails with `ImproperlyConfigured` when neither `ETH` nor `DAI` is set.
    pub async fn payment_form_fields(&self) -> Result<FormFields> {
        let settings = self.settings().load().await?;
        let currencies = Self::configured_currencies(&settings)?;

        let choices = currencies
            .into_iter()
            .map(|currency| Choice::new(currency.code(), currency.label()))
            .collect();

        let mut fields = FormFields::new();
        fields.insert(
            CURRENCY_TYPE_FIELD,
            FormField::choice("Payment currency", choices),
        );
        Ok(fields)
    }

    fn configured_currencies(settings: &ProviderSettings) -> Result<Vec<Currency>> {
        let currencies = available_currencies(settings);
        if currencies.is_empty() {
            return Err(ProviderError::ImproperlyConfigured(format!(
                "at least one of {} or {} must be configured",
                SettingKey::Eth,
                SettingKey::Dai
            )));
        }
        Ok(currencies)
    }

    /// Quotes `total` in the chosen currency and records the choice in the
    /// session.
    pub async fn checkout_prepare(
        &self,
        request: &mut CheckoutRequest,
        currency_type: &str,
        total: Decimal,
    ) -> Result<PaymentQuote> {
        let settings = ProviderSettings::load(self.store.as_ref(), &request.event.slug).await?;
        Self::configured_currencies(&settings)?;

        let (currency, receiving_address) = currency_type
            .parse::<Currency>()
            .ok()
            .and_then(|currency| {
                settings
                    .address_for(currency)
                    .map(|address| (currency, address.to_string()))
            })
            .ok_or_else(|| {
                ProviderError::ValidationError(format!(
                    "'{}' is not an available {}",
                    currency_type, CURRENCY_TYPE_FIELD
                ))
            })?;

        let rate = settings.rate_for(currency).ok_or_else(|| {
            ProviderError::ImproperlyConfigured(format!("no exchange rate configured for {}", currency))
        })?;
        if rate <= Decimal::ZERO {
            return Err(ProviderError::ImproperlyConfigured(format!(
                "{} rate must be greater than zero, got {}",
                currency, rate
            )));
        }

        let amount = total
            .checked_mul(rate)
            .ok_or_else(|| {
                ProviderError::ValidationError(format!("{} multiplied by {} overflows", total, rate))
            })?
            .round_dp(DECIMALS);
        let amount_in_smallest_unit = currency.to_smallest_unit(amount)?;

        request.session.set(SESSION_CURRENCY_TYPE, currency.code());
        request.session.set(SESSION_AMOUNT, amount.to_string());

        debug!(event = %request.event.slug, %currency, %amount, "prepared ethereum checkout");

        Ok(PaymentQuote {
            currency,
            total,
            amount,
            amount_in_smallest_unit,
            receiving_address,
            verification_provider: settings.verification_provider_for(currency).map(str::to_string),
        })
    }

    /// Whether `checkout_prepare` has run for this session.
    pub fn payment_is_valid_session(&self, request: &CheckoutRequest) -> bool {
        request.session.contains(SESSION_CURRENCY_TYPE) && request.session.contains(SESSION_AMOUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::Session;
    use crate::infrastructure::in_memory::InMemorySettingsStore;
    use rust_decimal_macros::dec;

    const ETH_ADDRESS: &str = "0x00000000000000000000000000000000000000e7";
    const DAI_ADDRESS: &str = "0x00000000000000000000000000000000000000da";

    fn provider() -> EthereumProvider {
        EthereumProvider::new(Event::new("conf"), Box::new(InMemorySettingsStore::new()))
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest::new(Event::new("conf"), Session::new())
    }

    async fn configure_both(provider: &EthereumProvider) {
        let settings = provider.settings();
        settings.set(SettingKey::Eth, ETH_ADDRESS).await.unwrap();
        settings.set(SettingKey::Dai, DAI_ADDRESS).await.unwrap();
        settings.set(SettingKey::EthRate, "0.004").await.unwrap();
        settings.set(SettingKey::XdaiRate, "1.0").await.unwrap();
        settings.set(SettingKey::TransactionProvider, "blockscout").await.unwrap();
    }

    #[tokio::test]
    async fn test_checkout_prepare_quotes_eth() {
        let provider = provider();
        configure_both(&provider).await;
        let mut request = request();

        let quote = provider
            .checkout_prepare(&mut request, "ETH", dec!(100))
            .await
            .unwrap();

        assert_eq!(quote.currency, Currency::Eth);
        assert_eq!(quote.amount, dec!(0.4));
        assert_eq!(quote.amount_in_smallest_unit, 400_000_000_000_000_000);
        assert_eq!(quote.receiving_address, ETH_ADDRESS);
        assert_eq!(quote.verification_provider.as_deref(), Some("blockscout"));
        assert!(provider.payment_is_valid_session(&request));
        assert_eq!(
            request.session.get(SESSION_CURRENCY_TYPE),
            Some(&serde_json::json!("ETH"))
        );
    }

    #[tokio::test]
    async fn test_checkout_prepare_quotes_dai() {
        let provider = provider();
        configure_both(&provider).await;
        let mut request = request();

        let quote = provider
            .checkout_prepare(&mut request, "DAI", dec!(12.50))
            .await
            .unwrap();

        assert_eq!(quote.amount, dec!(12.5));
        assert_eq!(quote.amount_in_smallest_unit, 12_500_000_000_000_000_000);
        assert_eq!(quote.receiving_address, DAI_ADDRESS);
        assert_eq!(quote.verification_provider, None);
    }

    #[tokio::test]
    async fn test_checkout_prepare_rejects_unoffered_currency() {
        let provider = provider();
        provider.settings().set(SettingKey::Dai, DAI_ADDRESS).await.unwrap();
        provider.settings().set(SettingKey::EthRate, "0.004").await.unwrap();
        let mut request = request();

        for choice in ["ETH", "BTC", ""] {
            let err = provider
                .checkout_prepare(&mut request, choice, dec!(10))
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::ValidationError(_)), "{choice}");
        }
        assert!(!provider.payment_is_valid_session(&request));
    }

    #[tokio::test]
    async fn test_checkout_prepare_requires_rate() {
        let provider = provider();
        provider.settings().set(SettingKey::Eth, ETH_ADDRESS).await.unwrap();
        let mut request = request();

        let err = provider
            .checkout_prepare(&mut request, "ETH", dec!(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ImproperlyConfigured(_)));
        assert!(!provider.payment_is_valid_session(&request));
    }

    #[tokio::test]
    async fn test_is_allowed_reads_request_event() {
        let provider = provider();
        let settings = provider.settings();
        settings.set(SettingKey::WalletAddress, ETH_ADDRESS).await.unwrap();
        settings.set(SettingKey::EthRate, "0.004").await.unwrap();
        settings.set(SettingKey::XdaiRate, "1.0").await.unwrap();

        assert!(provider.is_allowed(&request()).await.unwrap());

        let elsewhere = CheckoutRequest::new(Event::new("other"), Session::new());
        assert!(!provider.is_allowed(&elsewhere).await.unwrap());
    }

    #[tokio::test]
    async fn test_checkout_prepare_rejects_non_positive_rate() {
        let provider = provider();
        provider.settings().set(SettingKey::Eth, ETH_ADDRESS).await.unwrap();
        let mut request = request();

        for rate in ["0", "-1"] {
            provider.settings().set(SettingKey::EthRate, rate).await.unwrap();
            let err = provider
                .checkout_prepare(&mut request, "ETH", dec!(100))
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::ImproperlyConfigured(_)), "{rate}");
            assert!(err.to_string().contains("greater than zero"));
        }
        assert!(!provider.payment_is_valid_session(&request));
    }

    #[tokio::test]
    async fn test_checkout_prepare_without_addresses() {
        let provider = provider();
        provider.settings().set(SettingKey::EthRate, "0.004").await.unwrap();
        provider.settings().set(SettingKey::XdaiRate, "1.0").await.unwrap();
        let mut request = request();

        for choice in ["ETH", "DAI"] {
            let err = provider
                .checkout_prepare(&mut request, choice, dec!(10))
                .await
                .unwrap_err();
            assert!(matches!(err, ProviderError::ImproperlyConfigured(_)), "{choice}");
        }
        assert!(!provider.payment_is_valid_session(&request));
    }
}
