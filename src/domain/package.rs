//! Purchasable gas packages, pay types and the fetched package catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Asset legs a package can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    Tc,
    Btc,
    Wbtc,
}

impl Currency {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TC" => Some(Currency::Tc),
            "BTC" => Some(Currency::Btc),
            "WBTC" => Some(Currency::Wbtc),
            _ => None,
        }
    }
}

/// Currency the network fee is paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PayType {
    #[strum(serialize = "BTC")]
    Btc,
    #[strum(serialize = "ETH")]
    Eth,
}

impl PayType {
    pub const ALL: [PayType; 2] = [PayType::Btc, PayType::Eth];

    pub fn label(&self) -> &'static str {
        match self {
            PayType::Btc => "BTC",
            PayType::Eth => "ETH",
        }
    }
}

/// A predefined bundle of token amounts with its network fee.
///
/// The id doubles as the tier: tier 1 delivers TC only, tier 2 adds BTC and
/// tier 3 adds WBTC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PackageWire", into = "PackageWire")]
pub struct Package {
    pub id: u32,
    pub title: String,
    pub amounts: BTreeMap<Currency, String>,
    pub fee: String,
    pub fee_btc: String,
    pub fee_eth: String,
}

impl Package {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, currency: Currency, amount: impl Into<String>) -> Self {
        self.amounts.insert(currency, amount.into());
        self
    }

    pub fn with_fees(mut self, fee_btc: impl Into<String>, fee_eth: impl Into<String>) -> Self {
        self.fee_btc = fee_btc.into();
        self.fee_eth = fee_eth.into();
        self
    }

    /// Tier 2 and above deliver a BTC leg and need a BTC receiving address.
    pub fn unlocks_btc(&self) -> bool {
        self.id > 1
    }

    pub fn unlocks_wbtc(&self) -> bool {
        self.id > 2
    }

    /// Amount of `currency` in this package, `"0"` when the package has none.
    pub fn amount(&self, currency: Currency) -> String {
        self.amounts
            .get(&currency)
            .filter(|a| !a.is_empty())
            .cloned()
            .unwrap_or_else(|| "0".to_string())
    }

    /// Network fee line for the chosen pay type. BTC is shown until a pay
    /// type is picked.
    pub fn fee_for(&self, pay_type: Option<PayType>) -> String {
        match pay_type {
            Some(PayType::Eth) => format!("{} ETH", self.fee_eth),
            _ => format!("{} BTC", self.fee_btc),
        }
    }
}

/// Wire shape of a package as served by the gas-station API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageWire {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    details: Vec<CoinWire>,
    #[serde(default)]
    fee: Option<String>,
    #[serde(default)]
    fee_btc: Option<String>,
    #[serde(default)]
    fee_eth: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoinWire {
    currency: String,
    amount: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
}

impl From<PackageWire> for Package {
    fn from(wire: PackageWire) -> Self {
        let mut amounts = BTreeMap::new();
        for coin in wire.details {
            let Some(currency) = Currency::parse(&coin.currency) else {
                continue;
            };
            let amount = match coin.amount {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            amounts.entry(currency).or_insert(amount);
        }

        Self {
            id: wire.id.unwrap_or_default(),
            title: wire.title.unwrap_or_default(),
            amounts,
            fee: wire.fee.unwrap_or_default(),
            fee_btc: wire.fee_btc.unwrap_or_default(),
            fee_eth: wire.fee_eth.unwrap_or_default(),
        }
    }
}

impl From<Package> for PackageWire {
    fn from(p: Package) -> Self {
        let details = p
            .amounts
            .into_iter()
            .map(|(currency, amount)| CoinWire {
                currency: currency.to_string(),
                amount: serde_json::Value::String(amount),
                id: None,
            })
            .collect();

        Self {
            id: Some(p.id),
            title: Some(p.title),
            details,
            fee: Some(p.fee),
            fee_btc: Some(p.fee_btc),
            fee_eth: Some(p.fee_eth),
        }
    }
}

/// Selectable packages plus the custom-package fee template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    pub packages: Vec<Package>,
    pub custom_template: Option<Package>,
    pub initial_index: Option<usize>,
}

impl PackageCatalog {
    /// Split a fetched list: the last entry is the custom template and the
    /// second remaining entry is preselected. Nothing is preselected when
    /// fewer than two selectable packages remain.
    pub fn from_list(mut list: Vec<Package>) -> Self {
        let custom_template = list.pop();
        let initial_index = (list.len() > 1).then_some(1);
        Self {
            packages: list,
            custom_template,
            initial_index,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Package> {
        self.packages.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }
}
