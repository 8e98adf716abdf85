//! Balance aggregation and table rendering for `getbalance`

use crate::address::{render_address, render_asset_address, AddressVersions};
use crate::constants::SATOSHIS_PER_BTC;
use crate::types::*;
use std::collections::BTreeMap;

/// Asset column label for the base currency
pub const BITCOIN_LABEL: &str = "Bitcoin";

/// One line of the balance table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub address: String,
    pub asset: String,
    pub quantity: String,
}

#[derive(Default)]
struct AddressBalance {
    value: u128,
    assets: BTreeMap<AssetId, u128>,
}

/// Sum unspent outputs per address, then per asset within each address
///
/// Each address yields a base-currency row followed by one row per asset it
/// holds. Addresses are sorted; assets are sorted by identifier.
pub fn summarize(outputs: &[ColoredOutput], versions: &AddressVersions) -> Vec<BalanceRow> {
    let mut balances: BTreeMap<String, AddressBalance> = BTreeMap::new();
    for output in outputs {
        let address = render_address(output.script_pubkey(), versions);
        let balance = balances.entry(address).or_default();
        balance.value += output.value() as u128;
        if let Some(asset_id) = output.asset_id {
            *balance.assets.entry(asset_id).or_default() += output.asset_quantity as u128;
        }
    }

    let mut rows = Vec::new();
    for (address, balance) in balances {
        rows.push(BalanceRow {
            address: address.clone(),
            asset: BITCOIN_LABEL.to_string(),
            quantity: format_btc(balance.value),
        });
        for (asset_id, quantity) in balance.assets {
            rows.push(BalanceRow {
                address: address.clone(),
                asset: render_asset_address(&asset_id, versions),
                quantity: quantity.to_string(),
            });
        }
    }
    rows
}

/// Satoshis as a decimal BTC amount
pub fn format_btc(satoshis: u128) -> String {
    let coin = SATOSHIS_PER_BTC as u128;
    format!("{}.{:08}", satoshis / coin, satoshis % coin)
}

/// Render rows as a bordered plain-text table
pub fn render_table(rows: &[BalanceRow]) -> String {
    let headers = ["Address", "Asset", "Quantity"];
    let mut widths = headers.map(str::len);
    for row in rows {
        widths[0] = widths[0].max(row.address.len());
        widths[1] = widths[1].max(row.asset.len());
        widths[2] = widths[2].max(row.quantity.len());
    }

    let border = widths
        .iter()
        .fold(String::from("+"), |acc, w| acc + &"-".repeat(w + 2) + "+");
    let line = |cells: [&str; 3]| {
        let mut s = String::from("|");
        for (cell, width) in cells.iter().zip(widths.iter()) {
            s.push_str(&format!(" {:<width$} |", cell, width = *width));
        }
        s
    };

    let mut out = vec![border.clone(), line(headers), border.clone()];
    for row in rows {
        out.push(line([row.address.as_str(), row.asset.as_str(), row.quantity.as_str()]));
    }
    out.push(border);
    out.join("\n")
}
