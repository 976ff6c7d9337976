//! Joins holdings with the current tick's snapshots

use crate::types::Holding;
use common::{LiveOptionSnapshot, PortfolioPosition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Positions priced from the latest snapshots, plus holdings that had no quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionBook {
    /// Holdings order is preserved
    pub positions: Vec<PortfolioPosition>,
    pub missing: Vec<String>,
}

impl PositionBook {
    /// Spot of the held contracts when they all share one underlying level
    pub fn common_spot(&self, snapshots: &[LiveOptionSnapshot]) -> Option<f64> {
        let by_symbol: HashMap<&str, f64> = snapshots
            .iter()
            .map(|s| (s.symbol.as_str(), s.spot_price))
            .collect();

        let mut spots = self
            .positions
            .iter()
            .filter_map(|p| by_symbol.get(p.symbol.as_str()).copied());
        let first = spots.next()?;
        spots.all(|s| s == first).then_some(first)
    }
}

/// Each position takes the snapshot's Greeks and last traded price.
/// Unknown symbols are reported in `missing` and skipped.
pub fn build_positions(holdings: &[Holding], snapshots: &[LiveOptionSnapshot]) -> PositionBook {
    let by_symbol: HashMap<&str, &LiveOptionSnapshot> =
        snapshots.iter().map(|s| (s.symbol.as_str(), s)).collect();

    let mut book = PositionBook::default();
    for holding in holdings {
        match by_symbol.get(holding.symbol.as_str()) {
            Some(snapshot) => book.positions.push(PortfolioPosition {
                symbol: holding.symbol.clone(),
                quantity: holding.quantity,
                greeks: snapshot.greeks,
                price: snapshot.last_price,
            }),
            None => {
                warn!(symbol = %holding.symbol, "Holding has no quote this tick");
                book.missing.push(holding.symbol.clone());
            }
        }
    }
    book
}
