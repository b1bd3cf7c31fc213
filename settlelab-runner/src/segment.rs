//! Filter/segmentation engine — conditional re-runs of the performance
//! statistics over ledger partitions.
//!
//! Each dimension splits the trade records (NoTrade entries are excluded
//! up front) into exhaustive, non-overlapping categories, so the category
//! trade counts always sum back to the parent's.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use settlelab_core::domain::{EventKind, TradeRecord};

use crate::metrics::PerformanceStats;

/// The fixed segmentation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentDimension {
    /// Sign of the trend indicator: up vs down.
    TrendDirection,
    /// Previous day's candle color: bullish vs bearish.
    PriorCandle,
    /// Event-day open relative to the previous close: gap up vs gap down.
    GapDirection,
    /// Weekly vs monthly settlement (fixed-day for benchmark ledgers).
    EventKind,
}

impl SegmentDimension {
    pub const ALL: [SegmentDimension; 4] = [
        SegmentDimension::TrendDirection,
        SegmentDimension::PriorCandle,
        SegmentDimension::GapDirection,
        SegmentDimension::EventKind,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SegmentDimension::TrendDirection => "trend_direction",
            SegmentDimension::PriorCandle => "prior_candle",
            SegmentDimension::GapDirection => "gap_direction",
            SegmentDimension::EventKind => "event_kind",
        }
    }

    /// Category label for one trade record.
    fn label(&self, record: &TradeRecord) -> &'static str {
        match self {
            SegmentDimension::TrendDirection => {
                if record.trend_indicator > 0.0 {
                    "up"
                } else {
                    "down"
                }
            }
            SegmentDimension::PriorCandle => {
                if record.prior_candle_bullish {
                    "bullish"
                } else {
                    "bearish"
                }
            }
            SegmentDimension::GapDirection => {
                if record.gapped_up {
                    "gap_up"
                } else {
                    "gap_down"
                }
            }
            SegmentDimension::EventKind => match record.event_kind {
                EventKind::Weekly => "weekly",
                EventKind::Monthly => "monthly",
                EventKind::FixedDay => "fixed_day",
            },
        }
    }
}

/// Partition `ledger` along `dimension` and compute per-category stats.
///
/// `candidate_days` is forwarded to every category, so the per-category
/// event rates share the parent's denominator. Categories with zero trades
/// simply do not appear.
pub fn segment(
    ledger: &[TradeRecord],
    dimension: SegmentDimension,
    candidate_days: usize,
) -> BTreeMap<String, PerformanceStats> {
    let mut partitions: BTreeMap<&'static str, Vec<TradeRecord>> = BTreeMap::new();
    for record in ledger.iter().filter(|r| r.is_trade()) {
        partitions
            .entry(dimension.label(record))
            .or_default()
            .push(record.clone());
    }

    partitions
        .into_iter()
        .map(|(label, subset)| {
            (
                label.to_string(),
                PerformanceStats::compute(&subset, candidate_days),
            )
        })
        .collect()
}

/// Run every dimension, keyed by dimension name.
pub fn segment_all(
    ledger: &[TradeRecord],
    candidate_days: usize,
) -> BTreeMap<String, BTreeMap<String, PerformanceStats>> {
    SegmentDimension::ALL
        .iter()
        .map(|dim| {
            (
                dim.name().to_string(),
                segment(ledger, *dim, candidate_days),
            )
        })
        .collect()
}
