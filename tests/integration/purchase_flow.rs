//! Purchase flow against an in-memory gas station.
//!
//! Drives `PurchaseSession` the way the buy screen does: load the package
//! list, pick a package, fill the form and submit through `GasStationApi`.

use std::sync::Arc;

use bitcoin::Network;

use tc_gas_station::domain::{
    package::PayType,
    session::{PurchaseSession, SessionState, SubmitOutcome},
    validation::FormField,
};
use tc_gas_station::infra::gas_station::GasStationApi;

use super::{FakeGasStation, TAPROOT, TC_ADDR};

async fn loaded_session(api: &dyn GasStationApi) -> PurchaseSession {
    let mut session = PurchaseSession::new(Network::Bitcoin);
    session.load_packages(api.fetch_package_list().await.unwrap());
    session
}

/// Run one submit round trip, returning what the session decided.
async fn submit(session: &mut PurchaseSession, api: &dyn GasStationApi) -> SubmitOutcome {
    let outcome = session.begin_submit();
    if let SubmitOutcome::Ready(payload) = &outcome {
        let result = api.submit_purchase(payload).await.map_err(|e| e.to_string());
        session.finish_submit(result);
    }
    outcome
}

#[tokio::test]
async fn test_default_package_purchase() {
    let api = FakeGasStation::new();
    let mut session = loaded_session(&api).await;

    assert_eq!(session.catalog().len(), 3);
    assert_eq!(session.selected_package().map(|p| p.id), Some(2));
    assert_eq!(session.submit_label(), "Get them now");
    assert_eq!(session.fee_label(), "0.0002 BTC");

    session.set_field(FormField::ToAddress, TC_ADDR);
    session.set_field(FormField::ToBtcAddress, TAPROOT);
    session.select_pay_type(PayType::Eth);
    assert_eq!(session.fee_label(), "0.002 ETH");

    let outcome = submit(&mut session, &api).await;
    assert!(matches!(outcome, SubmitOutcome::Ready(_)));
    assert_eq!(session.state(), &SessionState::Succeeded);
    assert!(!session.is_processing());

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let payload = &submitted[0];
    assert_eq!(payload.values.to_address, TC_ADDR);
    assert_eq!(payload.values.amount_tc, "5");
    assert_eq!(payload.values.pay_type, Some(PayType::Eth));
    assert_eq!(payload.values.selected_package.as_ref().map(|p| p.id), Some(2));
    assert_eq!(
        payload.custom_package.as_ref().map(|p| p.title.as_str()),
        Some("Custom")
    );
}

#[tokio::test]
async fn test_custom_tier_three_requires_every_amount() {
    let api = FakeGasStation::new();
    let mut session = loaded_session(&api).await;

    assert!(session.select_package(2));
    session.toggle_custom_package();
    let derived = session.derived();
    assert!(derived.show_amount_tc && derived.show_amount_btc && derived.show_amount_wbtc);
    assert!(derived.show_btc_address);

    session.set_field(FormField::ToAddress, TC_ADDR);
    session.set_field(FormField::ToBtcAddress, TAPROOT);
    session.set_field(FormField::AmountTc, "");
    session.set_field(FormField::AmountBtc, "5");
    session.set_field(FormField::AmountWbtc, "abc");

    let outcome = submit(&mut session, &api).await;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected invalid form, got {:?}", outcome);
    };
    assert_eq!(errors.get(&FormField::AmountTc).unwrap(), "Amount is required.");
    assert_eq!(
        errors.get(&FormField::AmountBtc).unwrap(),
        "The minimum amount is 0.001 BTC. The maximum amount is 1 BTC."
    );
    assert_eq!(
        errors.get(&FormField::AmountWbtc).unwrap(),
        "The minimum amount is 0.001 WBTC. The maximum amount is 1 WBTC."
    );
    assert_eq!(session.state(), &SessionState::Editing);
    assert!(api.submitted.lock().unwrap().is_empty());

    session.set_field(FormField::AmountTc, "42");
    session.set_field(FormField::AmountBtc, "0.5");
    session.set_field(FormField::AmountWbtc, "0.25");
    assert!(matches!(
        submit(&mut session, &api).await,
        SubmitOutcome::Ready(_)
    ));

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted[0].values.amount_tc, "42");
    assert!(submitted[0].values.is_custom_package);
}

#[tokio::test]
async fn test_wrong_network_taproot_is_rejected() {
    let api = FakeGasStation::new();
    let mut session = loaded_session(&api).await;

    session.set_field(FormField::ToAddress, TC_ADDR);
    session.set_field(
        FormField::ToBtcAddress,
        "tb1pqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesf3hn0c",
    );

    let outcome = submit(&mut session, &api).await;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected invalid form, got {:?}", outcome);
    };
    assert_eq!(
        errors.get(&FormField::ToBtcAddress).unwrap(),
        "Invalid receiving BTC wallet address."
    );
}

#[tokio::test]
async fn test_failed_purchase_keeps_form() {
    let api = FakeGasStation::failing("Deposit address unavailable");
    let mut session = loaded_session(&api).await;
    assert!(session.select_package(0));
    session.set_field(FormField::ToAddress, TC_ADDR);

    submit(&mut session, &api).await;
    assert_eq!(
        session.state(),
        &SessionState::Failed("Deposit address unavailable".to_string())
    );
    assert_eq!(session.last_error(), Some("Deposit address unavailable"));
    assert_eq!(session.values().to_address, TC_ADDR);
    assert_eq!(session.submit_label(), "Get it now");
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_dropped() {
    let api = Arc::new(FakeGasStation::new());
    let mut session = loaded_session(api.as_ref()).await;
    session.set_field(FormField::ToAddress, TC_ADDR);
    session.set_field(FormField::ToBtcAddress, TAPROOT);

    let SubmitOutcome::Ready(payload) = session.begin_submit() else {
        panic!("form should be valid");
    };
    assert_eq!(session.submit_label(), "Processing...");

    let task_api = Arc::clone(&api);
    let pending = tokio::spawn(async move { task_api.submit_purchase(&payload).await });

    assert_eq!(session.begin_submit(), SubmitOutcome::InFlight);

    let result = pending.await.unwrap().map_err(|e| e.to_string());
    session.finish_submit(result);
    assert_eq!(session.state(), &SessionState::Succeeded);
    assert_eq!(api.submitted.lock().unwrap().len(), 1);
}
