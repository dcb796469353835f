//! Catalog boundary: raw package records in, validated candidates out.
//!
//! Every contract check on catalog data happens here, before any scoring,
//! so the engine can assume well-formed candidates.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::package::{PackageCandidate, PackageId, PriceTier};
use crate::errors::{ApplicationError, DomainError};
use crate::fixtures;

/// Package row as delivered by the catalog source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPackage {
    pub id: String,
    pub code: String,
    #[serde(alias = "displayName")]
    pub display_name: String,
    #[serde(alias = "categoryId")]
    pub category_id: String,
    #[serde(default, alias = "concernTags")]
    pub concern_tags: Vec<String>,
    #[serde(alias = "priceTier")]
    pub price_tier: String,
    #[serde(alias = "finalPrice")]
    pub final_price: u64,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    packages: Vec<PackageCandidate>,
}

impl Catalog {
    /// Validates raw records and keeps the active ones, in source order.
    pub fn from_records(records: Vec<CatalogPackage>) -> Result<Self, DomainError> {
        let mut seen_ids = HashSet::new();
        let mut seen_codes = HashSet::new();
        let mut packages = Vec::with_capacity(records.len());

        for record in records {
            if !record.is_active {
                continue;
            }

            let candidate = validate_record(record)?;

            if !seen_ids.insert(candidate.id.0.clone()) {
                return Err(DomainError::DuplicatePackage { field: "id", value: candidate.id.0 });
            }
            if !seen_codes.insert(candidate.code.clone()) {
                return Err(DomainError::DuplicatePackage { field: "code", value: candidate.code });
            }

            packages.push(candidate);
        }

        Ok(Self { packages })
    }

    /// Reads a JSON array of package records from disk.
    pub fn load_json(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            ApplicationError::Catalog(format!("could not read `{}`: {error}", path.display()))
        })?;
        let records: Vec<CatalogPackage> = serde_json::from_str(&raw).map_err(|error| {
            ApplicationError::Catalog(format!("could not parse `{}`: {error}", path.display()))
        })?;

        Ok(Self::from_records(records)?)
    }

    /// Loads from `path` when given, otherwise falls back to the demo catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, ApplicationError> {
        match path {
            Some(path) => Self::load_json(path),
            None => Ok(Self::demo()?),
        }
    }

    pub fn demo() -> Result<Self, DomainError> {
        Self::from_records(fixtures::demo_catalog())
    }

    pub fn packages(&self) -> &[PackageCandidate] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of packages per price tier, in tier order.
    pub fn tier_counts(&self) -> Vec<(PriceTier, usize)> {
        PriceTier::ALL
            .iter()
            .map(|tier| {
                (*tier, self.packages.iter().filter(|package| package.price_tier == *tier).count())
            })
            .collect()
    }
}

fn validate_record(record: CatalogPackage) -> Result<PackageCandidate, DomainError> {
    let invalid = |reason: String| DomainError::InvalidPackage {
        package_id: if record.id.trim().is_empty() {
            record.code.clone()
        } else {
            record.id.clone()
        },
        reason,
    };

    for (field, value) in [
        ("id", &record.id),
        ("code", &record.code),
        ("display_name", &record.display_name),
        ("category_id", &record.category_id),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("{field} must not be empty")));
        }
    }

    if record.final_price == 0 {
        return Err(invalid("final_price must be positive".to_string()));
    }

    let price_tier = record.price_tier.parse::<PriceTier>().map_err(invalid)?;

    let mut tags = HashSet::new();
    for tag in &record.concern_tags {
        if !tags.insert(tag.as_str()) {
            return Err(invalid(format!("concern tag `{tag}` is listed more than once")));
        }
    }

    Ok(PackageCandidate {
        id: PackageId(record.id.clone()),
        code: record.code.clone(),
        display_name: record.display_name.clone(),
        category_id: record.category_id.clone(),
        concern_tags: record.concern_tags.clone(),
        price_tier,
        final_price: record.final_price,
    })
}
