use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::document::{BandDocument, LocalizedText};

/// A contiguous, inclusive score range mapped to a qualitative label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Band {
    pub low: i32,
    pub high: i32,
    pub label: LocalizedText,
    pub description: LocalizedText,
}

impl Band {
    pub fn contains(&self, score: i32) -> bool {
        self.low <= score && score <= self.high
    }
}

impl From<BandDocument> for Band {
    fn from(doc: BandDocument) -> Self {
        let [low, high] = doc.range;
        Band {
            low,
            high,
            label: doc.label,
            description: doc.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandError {
    #[error("no bands defined")]
    Empty,

    #[error("band [{low}, {high}] has low above high")]
    Inverted { low: i32, high: i32 },

    #[error("lowest band starts at {low}, expected 0")]
    DoesNotStartAtZero { low: i32 },

    #[error("gap between band ending at {previous_high} and band starting at {next_low}")]
    Gap { previous_high: i32, next_low: i32 },

    #[error("band starting at {next_low} overlaps band ending at {previous_high}")]
    Overlap { previous_high: i32, next_low: i32 },

    #[error("highest band ends at {high}, below max score {max}")]
    EndsBeforeMax { high: i32, max: i32 },

    #[error("highest band ends at {high}, above max score {max}")]
    ExceedsMax { high: i32, max: i32 },
}

/// Bands that partition `[0, max]` exactly, sorted by `low`.
///
/// Only constructible through [`BandSet::new`], so every score in range maps
/// to exactly one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct BandSet {
    bands: Vec<Band>,
    max: i32,
}

impl BandSet {
    pub fn new(mut bands: Vec<Band>, max: i32) -> Result<Self, BandError> {
        if bands.is_empty() {
            return Err(BandError::Empty);
        }
        if let Some(band) = bands.iter().find(|b| b.low > b.high) {
            return Err(BandError::Inverted {
                low: band.low,
                high: band.high,
            });
        }

        bands.sort_by_key(|b| (b.low, b.high));

        if bands[0].low != 0 {
            return Err(BandError::DoesNotStartAtZero { low: bands[0].low });
        }
        for pair in bands.windows(2) {
            let (previous_high, next_low) = (pair[0].high, pair[1].low);
            // i64 so that high == i32::MAX cannot overflow
            let expected = i64::from(previous_high) + 1;
            let next = i64::from(next_low);
            if next < expected {
                return Err(BandError::Overlap {
                    previous_high,
                    next_low,
                });
            }
            if next > expected {
                return Err(BandError::Gap {
                    previous_high,
                    next_low,
                });
            }
        }

        let high = bands[bands.len() - 1].high;
        if high < max {
            return Err(BandError::EndsBeforeMax { high, max });
        }
        if high > max {
            return Err(BandError::ExceedsMax { high, max });
        }

        Ok(Self { bands, max })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// The band containing `score`, or `None` when `score` is outside `[0, max]`.
    pub fn find(&self, score: i32) -> Option<&Band> {
        if score < 0 || score > self.max {
            return None;
        }
        let idx = self.bands.partition_point(|b| b.high < score);
        self.bands.get(idx).filter(|b| b.contains(score))
    }
}
