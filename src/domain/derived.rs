//! Which purchase-form fields are visible, and the amounts a package implies.

use super::package::{Currency, Package};

/// Amounts a selected package fills into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDefaults {
    pub amount_tc: String,
    pub amount_btc: String,
    pub amount_wbtc: String,
}

impl PackageDefaults {
    pub fn from_package(package: &Package) -> Self {
        Self {
            amount_tc: package.amount(Currency::Tc),
            amount_btc: package.amount(Currency::Btc),
            amount_wbtc: package.amount(Currency::Wbtc),
        }
    }
}

/// Visibility of each form section for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub show_packages: bool,
    pub show_amount_tc: bool,
    pub show_amount_btc: bool,
    pub show_amount_wbtc: bool,
    pub show_btc_address: bool,
    pub defaults: Option<PackageDefaults>,
}

pub fn derive_visible_fields(selected: Option<&Package>, is_custom: bool) -> DerivedFields {
    let unlocks_btc = selected.is_some_and(Package::unlocks_btc);
    let unlocks_wbtc = selected.is_some_and(Package::unlocks_wbtc);

    DerivedFields {
        show_packages: !is_custom,
        show_amount_tc: is_custom,
        show_amount_btc: is_custom && unlocks_btc,
        show_amount_wbtc: is_custom && unlocks_wbtc,
        show_btc_address: unlocks_btc,
        defaults: selected.map(PackageDefaults::from_package),
    }
}
