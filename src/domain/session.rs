//! Purchase form session.
//!
//! Owns the form values and reruns validation and derived-field computation
//! explicitly on every change, selection and submit event.

use std::collections::BTreeSet;

use bitcoin::Network;
use serde::{Deserialize, Serialize};

use super::{
    derived::{DerivedFields, PackageDefaults, derive_visible_fields},
    package::{Package, PackageCatalog, PayType},
    validation::{ErrorMap, FormField, FormValues, validate},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Editing,
    Validating,
    Submitting,
    Succeeded,
    /// Submission rejected by the gas station, with its message.
    Failed(String),
}

/// What is sent to the gas station on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    #[serde(flatten)]
    pub values: FormValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_package: Option<Package>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Valid form; the caller must submit the payload and report back with
    /// [`PurchaseSession::finish_submit`].
    Ready(PurchasePayload),
    /// Validation failed, nothing was sent.
    Invalid(ErrorMap),
    /// A submission is already in flight.
    InFlight,
}

pub struct PurchaseSession {
    btc_network: Network,
    state: SessionState,
    values: FormValues,
    touched: BTreeSet<FormField>,
    errors: ErrorMap,
    catalog: PackageCatalog,
    selected_index: Option<usize>,
    is_processing: bool,
    last_error: Option<String>,
}

impl PurchaseSession {
    pub fn new(btc_network: Network) -> Self {
        Self {
            btc_network,
            state: SessionState::Idle,
            values: FormValues::default(),
            touched: BTreeSet::new(),
            errors: ErrorMap::new(),
            catalog: PackageCatalog::default(),
            selected_index: None,
            is_processing: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_package(&self) -> Option<&Package> {
        self.values.selected_package.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn derived(&self) -> DerivedFields {
        derive_visible_fields(self.selected_package(), self.values.is_custom_package)
    }

    /// Error to display for `field`: only once the field has been touched.
    pub fn visible_error(&self, field: FormField) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    /// Install a freshly fetched package list and apply the initial selection.
    pub fn load_packages(&mut self, list: Vec<Package>) {
        self.catalog = PackageCatalog::from_list(list);
        self.selected_index = None;
        self.values.selected_package = None;
        if let Some(index) = self.catalog.initial_index {
            self.select_package(index);
        } else {
            self.revalidate();
        }
    }

    /// Select a package by index, overwriting amounts with its defaults.
    pub fn select_package(&mut self, index: usize) -> bool {
        let Some(package) = self.catalog.get(index).cloned() else {
            return false;
        };
        self.apply_defaults(&PackageDefaults::from_package(&package));
        self.values.selected_package = Some(package);
        self.selected_index = Some(index);
        self.enter_editing();
        true
    }

    /// Switch between package mode and custom amounts. Leaving custom mode
    /// restores the selected package's amounts.
    pub fn toggle_custom_package(&mut self) {
        self.values.is_custom_package = !self.values.is_custom_package;
        if !self.values.is_custom_package
            && let Some(defaults) = self.derived().defaults
        {
            self.apply_defaults(&defaults);
        }
        self.enter_editing();
    }

    pub fn select_pay_type(&mut self, pay_type: PayType) {
        self.values.pay_type = Some(pay_type);
        self.enter_editing();
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.values.get_mut(field) = value.into();
        self.touched.insert(field);
        self.enter_editing();
    }

    pub fn blur(&mut self, field: FormField) {
        self.touched.insert(field);
        self.revalidate();
    }

    /// Validate and, when valid, move to `Submitting`.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.is_processing {
            return SubmitOutcome::InFlight;
        }

        self.state = SessionState::Validating;
        self.touched.extend(FormField::ALL);
        self.revalidate();

        if !self.errors.is_empty() {
            self.state = SessionState::Editing;
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        self.state = SessionState::Submitting;
        self.is_processing = true;
        self.last_error = None;
        SubmitOutcome::Ready(PurchasePayload {
            values: self.values.clone(),
            custom_package: self.catalog.custom_template.clone(),
        })
    }

    /// Record the gas station's answer. The form keeps its values either way.
    pub fn finish_submit(&mut self, result: Result<(), String>) {
        self.is_processing = false;
        match result {
            Ok(()) => {
                self.state = SessionState::Succeeded;
                self.last_error = None;
            }
            Err(message) => {
                self.state = SessionState::Failed(message.clone());
                self.last_error = Some(message);
            }
        }
    }

    pub fn fee_label(&self) -> String {
        self.selected_package()
            .map(|p| p.fee_for(self.values.pay_type))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_processing {
            "Processing..."
        } else if self.selected_package().is_some_and(Package::unlocks_btc) {
            "Get them now"
        } else {
            "Get it now"
        }
    }

    fn apply_defaults(&mut self, defaults: &PackageDefaults) {
        self.values.amount_tc = defaults.amount_tc.clone();
        self.values.amount_btc = defaults.amount_btc.clone();
        self.values.amount_wbtc = defaults.amount_wbtc.clone();
    }

    fn enter_editing(&mut self) {
        self.state = SessionState::Editing;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.errors = validate(&self.values, self.btc_network);
    }
}
