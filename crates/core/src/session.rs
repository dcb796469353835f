//! Wizard session state.
//!
//! A session owns the recorded wizard steps and the user's interest list.
//! Only the session id and the interests survive a reload; recorded steps
//! are rebuilt from the step store.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::package::PackageId;
use crate::domain::wizard::{WizardStepRecord, WizardSteps};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
            DomainError::InvariantViolation(format!("invalid session id `{value}`: {error}"))
        })
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The subset of a session that is persisted across reloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub session_id: SessionId,
    #[serde(default)]
    pub interests: Vec<PackageId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardSession {
    session_id: SessionId,
    interests: Vec<PackageId>,
    steps: WizardSteps,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(session_id: SessionId) -> Self {
        Self { session_id, ..Self::default() }
    }

    pub fn restore(persisted: PersistedSession) -> Self {
        Self { session_id: persisted.session_id, interests: persisted.interests, ..Self::default() }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn interests(&self) -> &[PackageId] {
        &self.interests
    }

    pub fn steps(&self) -> &WizardSteps {
        &self.steps
    }

    /// Records a wizard answer, replacing any earlier answer for that step.
    pub fn record_step(&mut self, record: &WizardStepRecord) -> Result<(), DomainError> {
        self.steps.apply(record)
    }

    /// Returns false when the package was already in the list.
    pub fn add_interest(&mut self, package_id: PackageId) -> bool {
        if self.interests.contains(&package_id) {
            return false;
        }
        self.interests.push(package_id);
        true
    }

    pub fn remove_interest(&mut self, package_id: &PackageId) -> bool {
        let before = self.interests.len();
        self.interests.retain(|id| id != package_id);
        self.interests.len() != before
    }

    pub fn persisted(&self) -> PersistedSession {
        PersistedSession { session_id: self.session_id.clone(), interests: self.interests.clone() }
    }
}
