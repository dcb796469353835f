use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(pub String);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pricing band of a treatment package, ordered from cheapest to most exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Basic,
    Premium,
    Luxury,
    Ultra,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] =
        [PriceTier::Basic, PriceTier::Premium, PriceTier::Luxury, PriceTier::Ultra];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Luxury => "luxury",
            Self::Ultra => "ultra",
        }
    }

    /// Position in the presentation order used for the final shortlist.
    pub fn display_rank(&self) -> usize {
        match self {
            Self::Basic => 0,
            Self::Premium => 1,
            Self::Luxury => 2,
            Self::Ultra => 3,
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "luxury" => Ok(Self::Luxury),
            "ultra" => Ok(Self::Ultra),
            other => Err(format!(
                "unknown price tier `{other}` (expected basic|premium|luxury|ultra)"
            )),
        }
    }
}

/// A validated, active catalog package eligible for scoring.
///
/// Instances are produced by [`crate::catalog::Catalog`] so that
/// `concern_tags` is duplicate-free and `final_price` is positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCandidate {
    pub id: PackageId,
    pub code: String,
    pub display_name: String,
    pub category_id: String,
    pub concern_tags: Vec<String>,
    pub price_tier: PriceTier,
    pub final_price: u64,
}
