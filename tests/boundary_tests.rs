mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use ethpay::domain::settings::SettingKey;
use predicates::prelude::*;
use rust_decimal_macros::dec;
use std::process::Command;

#[test]
fn test_unknown_event_is_reported_unavailable() {
    let csv = common::settings_csv(&[["democon", "ETH", common::ETH_ADDRESS]]).unwrap();

    let mut cmd = Command::new(cargo_bin!("ethpay"));
    cmd.arg(csv.path()).arg("--event").arg("nowhere");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"event":"nowhere","allowed":false,"currencies":null"#))
        .stdout(predicate::str::contains("democon").not());
}

#[test]
fn test_blank_value_clears_earlier_row() {
    let csv = common::settings_csv(&[
        ["democon", "ETH", common::ETH_ADDRESS],
        ["democon", "DAI", common::DAI_ADDRESS],
        ["democon", "ETH", ""],
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("ethpay"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""currencies":[{"value":"DAI","label":"DAI"}]"#));
}

#[tokio::test]
async fn test_extreme_rate_precision() {
    let provider = common::provider();
    let settings = provider.settings();
    settings.set(SettingKey::Eth, common::ETH_ADDRESS).await.unwrap();
    settings
        .set(SettingKey::EthRate, "0.000000000000000001")
        .await
        .unwrap();

    let mut request = common::checkout_request();
    let quote = provider
        .checkout_prepare(&mut request, "ETH", dec!(1))
        .await
        .unwrap();
    assert_eq!(quote.amount_in_smallest_unit, 1);

    // Less than one wei
    let quote = provider
        .checkout_prepare(&mut request, "ETH", dec!(0.4))
        .await
        .unwrap();
    assert_eq!(quote.amount_in_smallest_unit, 0);
}

#[tokio::test]
async fn test_overflowing_total_is_rejected() {
    let provider = common::provider();
    let settings = provider.settings();
    settings.set(SettingKey::Dai, common::DAI_ADDRESS).await.unwrap();
    settings.set(SettingKey::XdaiRate, "1.0").await.unwrap();

    let mut request = common::checkout_request();
    let err = provider
        .checkout_prepare(&mut request, "DAI", rust_decimal::Decimal::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, ethpay::error::ProviderError::ValidationError(_)));
}

#[test]
fn test_row_without_value_column_clears_setting() {
    let csv = common::raw_csv(&format!(
        "event,key,value\ndemocon,ETH,{}\ndemocon,DAI,{}\ndemocon,DAI\n",
        common::ETH_ADDRESS,
        common::DAI_ADDRESS
    ))
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("ethpay"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""currencies":[{"value":"ETH","label":"ETH"}]"#))
        .stderr(predicate::str::contains("Error reading setting").not());
}

#[test]
fn test_fully_cleared_event_is_not_listed() {
    let csv = common::settings_csv(&[
        ["democon", "ETH", common::ETH_ADDRESS],
        ["meetup", "DAI", common::DAI_ADDRESS],
        ["meetup", "DAI", ""],
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("ethpay"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"democon""#))
        .stdout(predicate::str::contains("meetup").not());
}
