pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod recommendations;
pub mod session;

pub use catalog::{Catalog, CatalogPackage};
pub use domain::package::{PackageCandidate, PackageId, PriceTier};
pub use domain::wizard::{
    BudgetRange, Preference, WizardInputs, WizardPreferences, WizardStepRecord, WizardSteps,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommendations::{
    calculate_recommendations, InMemoryRecommendationSink, MatchReason, RecommendationEngine,
    RecommendationResult, RecommendationService, RecommendationSink, SelectionPolicy,
    StoredRecommendation,
};
pub use session::{PersistedSession, SessionId, WizardSession};
