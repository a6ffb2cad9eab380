//! Address format checks for the receiving wallets.

use bitcoin::{Address, AddressType, Network, address::NetworkUnchecked};

/// Length of a TC wallet address without the `0x` prefix.
const TC_ADDRESS_HEX_LEN: usize = 40;

/// Check a TC (EVM-style) wallet address: `0x` followed by 20 bytes of hex.
pub fn validate_wallet_address(address: &str) -> bool {
    let Some(body) = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
    else {
        return false;
    };

    body.len() == TC_ADDRESS_HEX_LEN && hex::decode(body).is_ok()
}

/// Check that `address` is a Taproot (P2TR) address on `network`.
pub fn validate_btc_address_taproot(address: &str, network: Network) -> bool {
    let Ok(unchecked) = address.parse::<Address<NetworkUnchecked>>() else {
        return false;
    };

    match unchecked.require_network(network) {
        Ok(addr) => addr.address_type() == Some(AddressType::P2tr),
        Err(_) => false,
    }
}

/// Shorten an address for table display, e.g. `0x1234...abcd`.
pub fn format_long_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
