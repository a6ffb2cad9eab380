//! Validation of the purchase and status forms.
//!
//! Every rule is evaluated independently; the result only contains the fields
//! that failed, so an empty map means the form can be submitted.

use std::collections::BTreeMap;

use bitcoin::Network;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{
    address::{validate_btc_address_taproot, validate_wallet_address},
    package::{Package, PayType},
};

/// Editable fields of the purchase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum FormField {
    #[strum(serialize = "amountTC")]
    AmountTc,
    #[strum(serialize = "amountBTC")]
    AmountBtc,
    #[strum(serialize = "amountWBTC")]
    AmountWbtc,
    #[strum(serialize = "toAddress")]
    ToAddress,
    #[strum(serialize = "toBTCAddress")]
    ToBtcAddress,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::AmountTc,
        FormField::AmountBtc,
        FormField::AmountWbtc,
        FormField::ToAddress,
        FormField::ToBtcAddress,
    ];

    pub fn is_amount(&self) -> bool {
        matches!(
            self,
            FormField::AmountTc | FormField::AmountBtc | FormField::AmountWbtc
        )
    }
}

/// Field name to message. A missing key means the field is valid.
pub type ErrorMap = BTreeMap<FormField, String>;

/// Current values of the purchase form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(rename = "amountTC")]
    pub amount_tc: String,
    #[serde(rename = "amountBTC")]
    pub amount_btc: String,
    #[serde(rename = "amountWBTC")]
    pub amount_wbtc: String,
    pub to_address: String,
    #[serde(rename = "toBTCAddress")]
    pub to_btc_address: String,
    pub is_custom_package: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_package: Option<Package>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_type: Option<PayType>,
}

impl FormValues {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AmountTc => &self.amount_tc,
            FormField::AmountBtc => &self.amount_btc,
            FormField::AmountWbtc => &self.amount_wbtc,
            FormField::ToAddress => &self.to_address,
            FormField::ToBtcAddress => &self.to_btc_address,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::AmountTc => &mut self.amount_tc,
            FormField::AmountBtc => &mut self.amount_btc,
            FormField::AmountWbtc => &mut self.amount_wbtc,
            FormField::ToAddress => &mut self.to_address,
            FormField::ToBtcAddress => &mut self.to_btc_address,
        }
    }

    fn unlocks_btc(&self) -> bool {
        self.selected_package
            .as_ref()
            .is_some_and(Package::unlocks_btc)
    }

    fn unlocks_wbtc(&self) -> bool {
        self.selected_package
            .as_ref()
            .is_some_and(Package::unlocks_wbtc)
    }
}

struct AmountRule {
    min: f64,
    max: f64,
    range_message: &'static str,
}

const TC_RULE: AmountRule = AmountRule {
    min: 0.01,
    max: 100.0,
    range_message: "The minimum amount is 0.01 TC. The maximum amount is 100 TC.",
};

const BTC_RULE: AmountRule = AmountRule {
    min: 0.001,
    max: 1.0,
    range_message: "The minimum amount is 0.001 BTC. The maximum amount is 1 BTC.",
};

const WBTC_RULE: AmountRule = AmountRule {
    min: 0.001,
    max: 1.0,
    range_message: "The minimum amount is 0.001 WBTC. The maximum amount is 1 WBTC.",
};

const AMOUNT_REQUIRED: &str = "Amount is required.";

impl AmountRule {
    fn check(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return Some(AMOUNT_REQUIRED.to_string());
        }
        match parse_amount(value) {
            Some(n) if n >= self.min && n <= self.max => None,
            _ => Some(self.range_message.to_string()),
        }
    }
}

/// Parse a decimal amount; unparseable and non-finite input yields `None`.
pub fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Validate the purchase form.
///
/// `btc_network` is the network Taproot receiving addresses must belong to.
pub fn validate(values: &FormValues, btc_network: Network) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if values.to_address.is_empty() {
        errors.insert(
            FormField::ToAddress,
            "Receiving TC wallet address is required.".to_string(),
        );
    } else if !validate_wallet_address(&values.to_address) {
        errors.insert(
            FormField::ToAddress,
            "Invalid receiving TC wallet address.".to_string(),
        );
    }

    if values.unlocks_btc() {
        if values.to_btc_address.is_empty() {
            errors.insert(
                FormField::ToBtcAddress,
                "Receiving BTC wallet address is required.".to_string(),
            );
        } else if !validate_btc_address_taproot(&values.to_btc_address, btc_network) {
            errors.insert(
                FormField::ToBtcAddress,
                "Invalid receiving BTC wallet address.".to_string(),
            );
        }
    }

    if values.is_custom_package {
        if let Some(msg) = TC_RULE.check(&values.amount_tc) {
            errors.insert(FormField::AmountTc, msg);
        }
        if values.unlocks_btc()
            && let Some(msg) = BTC_RULE.check(&values.amount_btc)
        {
            errors.insert(FormField::AmountBtc, msg);
        }
        if values.unlocks_wbtc()
            && let Some(msg) = WBTC_RULE.check(&values.amount_wbtc)
        {
            errors.insert(FormField::AmountWbtc, msg);
        }
    }

    errors
}

/// Validate the address typed into the status-check form.
pub fn validate_status_address(address: &str) -> Option<String> {
    if address.is_empty() {
        Some("TC wallet address is required.".to_string())
    } else if !validate_wallet_address(address) {
        Some("Invalid TC wallet address.".to_string())
    } else {
        None
    }
}
