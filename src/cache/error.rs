use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// One stage of the lookup hierarchy, ordered fastest to slowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Memory,
    Distributed,
    Listing,
    Origin,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Memory => "memory cache",
            Stage::Distributed => "distributed cache",
            Stage::Listing => "listing resolution",
            Stage::Origin => "origin store",
        };
        f.write_str(name)
    }
}

/// Transport or storage failure inside one tier.
///
/// An absent entry is `Ok(None)` at the tier seam; this type is reserved
/// for failures talking to the backing store.
#[derive(Debug, Error)]
#[error("tier transport failed: {message}")]
pub struct TierError {
    message: String,
}

impl TierError {
    pub fn transport(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Failures surfaced by the lookup pipeline to its consumers.
///
/// Tier-local misses are routing signals and never appear here; every
/// variant that wraps an underlying failure names the stage it came from.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The requested index is outside the resolved catalog range.
    #[error("joke {id} is outside the catalog range (total {total})")]
    NotFound { id: usize, total: usize },
    /// The catalog has no entries at all.
    #[error("the joke catalog is empty")]
    Empty,
    /// A tier or the origin store failed in a way other than a clean miss.
    #[error("{stage} failed")]
    Upstream {
        stage: Stage,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// A cached payload could not be decoded back into bytes.
    #[error("{stage} returned an undecodable payload")]
    Decode {
        stage: Stage,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The per-operation budget elapsed before the stage responded.
    #[error("{stage} timed out")]
    Timeout { stage: Stage },
}

impl LookupError {
    pub fn upstream(stage: Stage, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Upstream {
            stage,
            source: Box::new(source),
        }
    }

    pub fn decode(stage: Stage, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Decode {
            stage,
            source: Box::new(source),
        }
    }
}
