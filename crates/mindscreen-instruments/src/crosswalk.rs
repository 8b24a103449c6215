//! Qualitative severity comparison across instruments.
//!
//! Each instrument's total is placed into a shared, ordered list of tiers
//! using that instrument's own cut points; instruments are then compared by
//! tier rank, never by raw score.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::document::CrosswalkDocument;
use crate::error::{CrosswalkError, InstrumentError};
use crate::instrument::{InstrumentDefinition, ScoringRule};

#[derive(Debug, Clone, Default)]
pub struct SeverityCrosswalk {
    tiers: Vec<String>,
    cut_points: BTreeMap<String, CutPoints>,
}

#[derive(Debug, Clone)]
struct CutPoints {
    max: i32,
    /// (tier rank, lowest total in tier), ascending in both.
    cuts: Vec<(usize, i32)>,
}

impl CutPoints {
    fn classify(&self, total: i32) -> usize {
        self.cuts
            .iter()
            .rev()
            .find(|(_, lower)| *lower <= total)
            .map(|(rank, _)| *rank)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierPlacement {
    pub instrument_id: String,
    pub total: i32,
    pub tier: String,
    /// Position in the tier list; higher is more severe.
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TierOrdering {
    Higher,
    Same,
    Lower,
}

impl From<Ordering> for TierOrdering {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Greater => TierOrdering::Higher,
            Ordering::Equal => TierOrdering::Same,
            Ordering::Less => TierOrdering::Lower,
        }
    }
}

/// How `left`'s tier relates to `right`'s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PairwiseComparison {
    pub left: String,
    pub right: String,
    pub left_tier: String,
    pub right_tier: String,
    pub ordering: TierOrdering,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComparisonResult {
    /// Sorted by instrument id.
    pub placements: Vec<TierPlacement>,
    pub pairs: Vec<PairwiseComparison>,
    pub highest_tier: Option<String>,
    /// Instruments that reached `highest_tier`.
    pub highest: Vec<String>,
    /// Submitted instruments with no cut points configured.
    pub unclassified: Vec<String>,
}

impl ComparisonResult {
    pub fn placement(&self, instrument_id: &str) -> Option<&TierPlacement> {
        self.placements
            .iter()
            .find(|p| p.instrument_id == instrument_id)
    }

    pub fn pair(&self, left: &str, right: &str) -> Option<&PairwiseComparison> {
        self.pairs.iter().find(|p| p.left == left && p.right == right)
    }
}

impl SeverityCrosswalk {
    pub(crate) fn from_document<'a>(
        doc: CrosswalkDocument,
        lookup: impl Fn(&str) -> Option<&'a InstrumentDefinition>,
    ) -> Result<Self, CrosswalkError> {
        let mut seen = HashSet::new();
        for tier in &doc.tiers {
            if !seen.insert(tier.as_str()) {
                return Err(CrosswalkError::DuplicateTier(tier.clone()));
            }
        }

        let mut cut_points = BTreeMap::new();
        for (instrument_id, tier_cuts) in doc.instruments {
            let instrument = lookup(instrument_id.as_str())
                .ok_or_else(|| CrosswalkError::UnknownInstrument(instrument_id.clone()))?;
            let ScoringRule::Sum { max_score, .. } = &instrument.scoring else {
                return Err(CrosswalkError::NotSumScored(instrument_id));
            };
            let max = *max_score;

            let mut cuts = Vec::with_capacity(tier_cuts.len());
            for (tier, lower) in tier_cuts {
                let rank = doc.tiers.iter().position(|t| *t == tier).ok_or_else(|| {
                    CrosswalkError::UnknownTier {
                        instrument_id: instrument_id.clone(),
                        tier: tier.clone(),
                    }
                })?;
                cuts.push((rank, lower));
            }
            cuts.sort_by_key(|(rank, _)| *rank);

            let Some(&(_, first)) = cuts.first() else {
                return Err(CrosswalkError::NoCutPoints(instrument_id));
            };
            if first != 0 {
                return Err(CrosswalkError::FirstCutNotZero {
                    instrument_id,
                    found: first,
                });
            }
            for pair in cuts.windows(2) {
                let (rank, lower) = pair[1];
                if lower <= pair[0].1 {
                    return Err(CrosswalkError::NotIncreasing {
                        instrument_id,
                        tier: doc.tiers[rank].clone(),
                        value: lower,
                    });
                }
            }
            if let Some(&(_, value)) = cuts.iter().find(|(_, lower)| *lower > max) {
                return Err(CrosswalkError::CutAboveMax {
                    instrument_id,
                    value,
                    max,
                });
            }

            cut_points.insert(instrument_id, CutPoints { max, cuts });
        }

        Ok(Self {
            tiers: doc.tiers,
            cut_points,
        })
    }

    /// Tier names, least to most severe.
    pub fn tiers(&self) -> &[String] {
        &self.tiers
    }

    pub fn covers(&self, instrument_id: &str) -> bool {
        self.cut_points.contains_key(instrument_id)
    }

    pub fn is_empty(&self) -> bool {
        self.cut_points.is_empty()
    }
}

/// Place each submitted total into its severity tier and compare every pair.
pub fn compare(
    crosswalk: &SeverityCrosswalk,
    totals: &BTreeMap<String, i32>,
) -> Result<ComparisonResult, InstrumentError> {
    let mut result = ComparisonResult::default();

    for (instrument_id, &total) in totals {
        let Some(points) = crosswalk.cut_points.get(instrument_id) else {
            result.unclassified.push(instrument_id.clone());
            continue;
        };
        if total < 0 || total > points.max {
            return Err(InstrumentError::OutOfRange {
                instrument_id: instrument_id.clone(),
                category: None,
                score: total,
                max: points.max,
            });
        }
        let rank = points.classify(total);
        result.placements.push(TierPlacement {
            instrument_id: instrument_id.clone(),
            total,
            tier: crosswalk.tiers[rank].clone(),
            rank,
        });
    }

    for (i, left) in result.placements.iter().enumerate() {
        for right in &result.placements[i + 1..] {
            result.pairs.push(PairwiseComparison {
                left: left.instrument_id.clone(),
                right: right.instrument_id.clone(),
                left_tier: left.tier.clone(),
                right_tier: right.tier.clone(),
                ordering: left.rank.cmp(&right.rank).into(),
            });
        }
    }

    if let Some(top) = result.placements.iter().map(|p| p.rank).max() {
        result.highest_tier = Some(crosswalk.tiers[top].clone());
        result.highest = result
            .placements
            .iter()
            .filter(|p| p.rank == top)
            .map(|p| p.instrument_id.clone())
            .collect();
    }

    if !result.unclassified.is_empty() {
        tracing::debug!(
            unclassified = ?result.unclassified,
            "instruments without severity cut points left out of comparison"
        );
    }

    Ok(result)
}
