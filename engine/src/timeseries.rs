//! Holder counts and Gini coefficients sampled at regular block intervals.
//!
//! Two streams are tracked side by side, a token's current contract and the
//! legacy contract it was migrated from, together with their union.

use std::{collections::HashSet, str::FromStr};

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use holders_common::transfer::{BalanceEntry, TransferEvent};
use serde::Serialize;
use tracing::debug;

use crate::{gini::gini, ledger::LedgerCursor};

/// Roughly one day of 15 second blocks.
pub const BLOCKS_PER_DAY: u64 = 5760;

/// Gini values are stored with this many decimal places.
pub const GINI_SCALE: i64 = 18;

pub fn default_cutoffs() -> Vec<BigDecimal> {
    ["0", "0.1", "1"]
        .iter()
        .filter_map(|s| BigDecimal::from_str(s).ok())
        .collect()
}

/// Which balance set the Gini coefficient is computed over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GiniSource {
    #[default]
    Current,
    Legacy,
    Combined,
}

#[derive(Clone, Debug)]
pub struct HistoryConfig {
    pub step: u64,
    pub cutoffs: Vec<BigDecimal>,
    pub source: GiniSource,
    /// Addresses left out of the Gini calculation (treasuries, migration contracts, ...).
    pub excluded: HashSet<Address>,
    /// Keep only the most recent `days` snapshots.
    pub days: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            step: BLOCKS_PER_DAY,
            cutoffs: default_cutoffs(),
            source: GiniSource::default(),
            excluded: HashSet::new(),
            days: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HolderCounts {
    pub current: usize,
    pub legacy: usize,
    pub combined: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CutoffGini {
    pub cutoff: BigDecimal,
    pub gini: BigDecimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub block_height: u64,
    pub holders: HolderCounts,
    /// One entry per configured cutoff, in configuration order.
    pub gini: Vec<CutoffGini>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Series {
    pub source: GiniSource,
    pub cutoffs: Vec<BigDecimal>,
    pub snapshots: Vec<Snapshot>,
}

/// The series as parallel arrays, one row index per snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeriesColumns {
    pub heights: Vec<u64>,
    pub holders_current: Vec<usize>,
    pub holders_legacy: Vec<usize>,
    pub holders_combined: Vec<usize>,
    /// Indexed by cutoff, then by snapshot.
    pub gini: Vec<Vec<BigDecimal>>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Keeps the most recent `days` snapshots.
    pub fn last_days(mut self, days: usize) -> Self {
        let skip = self.snapshots.len().saturating_sub(days);
        self.snapshots = self.snapshots.split_off(skip);
        self
    }

    pub fn columns(&self) -> SeriesColumns {
        let mut columns = SeriesColumns {
            gini: vec![Vec::with_capacity(self.len()); self.cutoffs.len()],
            ..Default::default()
        };
        for snapshot in &self.snapshots {
            columns.heights.push(snapshot.block_height);
            columns.holders_current.push(snapshot.holders.current);
            columns.holders_legacy.push(snapshot.holders.legacy);
            columns.holders_combined.push(snapshot.holders.combined);
            for (column, entry) in columns.gini.iter_mut().zip(&snapshot.gini) {
                column.push(entry.gini.clone());
            }
        }
        columns
    }
}

/// Fails on the first transfer whose height is below its predecessor's.
pub fn ensure_ordered(transfers: &[TransferEvent]) -> crate::Result<()> {
    match transfers
        .windows(2)
        .position(|pair| pair[1].block_height < pair[0].block_height)
    {
        Some(i) => Err(crate::Error::UnorderedStream {
            index: i + 1,
            height: transfers[i + 1].block_height,
        }),
        None => Ok(()),
    }
}

/// Merges two block-ordered streams into one. Within a block, `legacy`
/// transfers come before `current` ones.
pub fn merge_streams(legacy: &[TransferEvent], current: &[TransferEvent]) -> Vec<TransferEvent> {
    let mut merged = Vec::with_capacity(legacy.len() + current.len());
    let (mut l, mut c) = (legacy.iter().peekable(), current.iter().peekable());
    loop {
        let take_current = match (l.peek(), c.peek()) {
            (Some(a), Some(b)) => b.block_height < a.block_height,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_current { c.next() } else { l.next() };
        merged.extend(next.cloned());
    }
    merged
}

/// Gini over `balances` minus excluded addresses and entries below `cutoff`.
/// `None` when nothing qualifies.
fn cutoff_gini(
    balances: &[BalanceEntry],
    excluded: &HashSet<Address>,
    cutoff: &BigDecimal,
) -> crate::Result<Option<BigDecimal>> {
    let values: Vec<BigDecimal> = balances
        .iter()
        .filter(|entry| !excluded.contains(&entry.address) && entry.amount >= *cutoff)
        .map(|entry| entry.amount.clone())
        .collect();

    match gini(&values, false) {
        Ok(g) => Ok(Some(g.round(GINI_SCALE))),
        Err(crate::Error::EmptyDistribution | crate::Error::ZeroSum) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Samples every `config.step` blocks from the first to the last transfer of
/// either stream. A step where any cutoff leaves no balances is dropped whole.
pub fn history(
    current: &[TransferEvent],
    legacy: &[TransferEvent],
    config: &HistoryConfig,
) -> crate::Result<Series> {
    if config.step == 0 {
        return Err(crate::Error::InvalidStep);
    }
    ensure_ordered(current)?;
    ensure_ordered(legacy)?;

    let combined = merge_streams(legacy, current);
    let mut series = Series {
        source: config.source,
        cutoffs: config.cutoffs.clone(),
        snapshots: Vec::new(),
    };

    let (Some(first), Some(last)) = (combined.first(), combined.last()) else {
        return Ok(series);
    };
    let (start, finish) = (first.block_height, last.block_height);
    debug!(start, finish, step = config.step, "building history");

    let mut current_cursor = LedgerCursor::new(current);
    let mut legacy_cursor = LedgerCursor::new(legacy);
    let mut combined_cursor = LedgerCursor::new(&combined);

    let heights = std::iter::successors(Some(start), |h| h.checked_add(config.step))
        .take_while(|h| *h <= finish);

    for to_block in heights {
        let current_balances = current_cursor.advance_to(Some(to_block)).balances(None);
        let legacy_balances = legacy_cursor.advance_to(Some(to_block)).balances(None);
        let combined_balances = combined_cursor.advance_to(Some(to_block)).balances(None);

        let holders = HolderCounts {
            current: current_balances.len(),
            legacy: legacy_balances.len(),
            combined: combined_balances.len(),
        };
        debug!(
            to_block,
            current = holders.current,
            legacy = holders.legacy,
            combined = holders.combined,
            "holders"
        );

        let balances = match config.source {
            GiniSource::Current => &current_balances,
            GiniSource::Legacy => &legacy_balances,
            GiniSource::Combined => &combined_balances,
        };

        let mut gini = Vec::with_capacity(config.cutoffs.len());
        for cutoff in &config.cutoffs {
            match cutoff_gini(balances, &config.excluded, cutoff)? {
                Some(g) => gini.push(CutoffGini {
                    cutoff: cutoff.clone(),
                    gini: g,
                }),
                None => break,
            }
        }
        if gini.len() < config.cutoffs.len() {
            debug!(to_block, "no balances above a cutoff, skipping step");
            continue;
        }

        series.snapshots.push(Snapshot {
            block_height: to_block,
            holders,
            gini,
        });
    }

    Ok(match config.days {
        Some(days) => series.last_days(days),
        None => series,
    })
}
