//! Wizard inputs as recorded by the three-step treatment wizard.
//!
//! Steps arrive as sparse, step-number-keyed records. [`WizardSteps`] gives
//! each step its own optional slot so an absent step is visible in the type,
//! and [`WizardInputs`] is the flattened view the scoring engine consumes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::package::PriceTier;
use crate::errors::DomainError;

pub const CATEGORY_STEP: u8 = 1;
pub const CONCERN_STEP: u8 = 2;
pub const PREFERENCE_STEP: u8 = 3;

/// Budget band chosen in the preferences step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetRange {
    Economy,
    Standard,
    Premium,
    Luxury,
}

impl BudgetRange {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "economy" => Some(Self::Economy),
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }

    /// Price tiers that satisfy this budget band.
    pub fn allowed_tiers(&self) -> &'static [PriceTier] {
        match self {
            Self::Economy => &[PriceTier::Basic],
            Self::Standard => &[PriceTier::Basic, PriceTier::Premium],
            Self::Premium => &[PriceTier::Premium, PriceTier::Luxury],
            Self::Luxury => &[PriceTier::Luxury, PriceTier::Ultra],
        }
    }

    pub fn allows(&self, tier: PriceTier) -> bool {
        self.allowed_tiers().contains(&tier)
    }
}

/// Preference keys the engine understands. Anything else in the raw
/// preference bag is dropped while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preference {
    BudgetRange(BudgetRange),
}

impl Preference {
    pub fn parse(key: &str, value: &Value) -> Option<Self> {
        match key {
            "budgetRange" | "budget_range" => {
                value.as_str().and_then(BudgetRange::parse).map(Self::BudgetRange)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardPreferences {
    pub budget_range: Option<BudgetRange>,
}

impl WizardPreferences {
    pub fn from_map(raw: &Map<String, Value>) -> Self {
        let mut preferences = Self::default();
        for (key, value) in raw {
            match Preference::parse(key, value) {
                Some(Preference::BudgetRange(range)) => preferences.budget_range = Some(range),
                None => {}
            }
        }
        preferences
    }
}

/// Flattened wizard answers used for scoring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardInputs {
    pub selected_categories: BTreeSet<String>,
    pub selected_concerns: BTreeSet<String>,
    pub preferences: WizardPreferences,
}

impl WizardInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_concerns<I, S>(mut self, concerns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_concerns = concerns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_budget_range(mut self, budget_range: BudgetRange) -> Self {
        self.preferences.budget_range = Some(budget_range);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStep {
    #[serde(default, alias = "selectedCategories")]
    pub selected_categories: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcernStep {
    #[serde(default, alias = "selectedConcerns")]
    pub selected_concerns: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceStep {
    pub preferences: WizardPreferences,
}

#[derive(Debug, Default, Deserialize)]
struct RawPreferenceStep {
    #[serde(default)]
    preferences: Map<String, Value>,
}

/// One persisted wizard answer, keyed by step number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WizardStepRecord {
    #[serde(alias = "stepNumber")]
    pub step_number: u8,
    #[serde(default)]
    pub data: Value,
}

impl WizardStepRecord {
    pub fn new(step_number: u8, data: Value) -> Self {
        Self { step_number, data }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardSteps {
    pub step1: Option<CategoryStep>,
    pub step2: Option<ConcernStep>,
    pub step3: Option<PreferenceStep>,
}

impl WizardSteps {
    /// Builds the step slots from sparse records. Unknown step numbers are
    /// ignored and a later record for the same step replaces an earlier one.
    pub fn from_records(records: &[WizardStepRecord]) -> Result<Self, DomainError> {
        let mut steps = Self::default();
        for record in records {
            steps.apply(record)?;
        }
        Ok(steps)
    }

    pub fn apply(&mut self, record: &WizardStepRecord) -> Result<(), DomainError> {
        match record.step_number {
            CATEGORY_STEP => self.step1 = Some(parse_step(record)?),
            CONCERN_STEP => self.step2 = Some(parse_step(record)?),
            PREFERENCE_STEP => {
                let raw: RawPreferenceStep = parse_step(record)?;
                let preferences = WizardPreferences::from_map(&raw.preferences);
                self.step3 = Some(PreferenceStep { preferences });
            }
            _ => {}
        }
        Ok(())
    }

    pub fn inputs(&self) -> WizardInputs {
        WizardInputs {
            selected_categories: self
                .step1
                .as_ref()
                .map(|step| step.selected_categories.iter().cloned().collect())
                .unwrap_or_default(),
            selected_concerns: self
                .step2
                .as_ref()
                .map(|step| step.selected_concerns.iter().cloned().collect())
                .unwrap_or_default(),
            preferences: self
                .step3
                .as_ref()
                .map(|step| step.preferences.clone())
                .unwrap_or_default(),
        }
    }
}

fn parse_step<T>(record: &WizardStepRecord) -> Result<T, DomainError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if record.data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(record.data.clone()).map_err(|error| DomainError::InvalidWizardStep {
        step_number: record.step_number,
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn budget_mapping_matches_tier_table() {
        assert_eq!(BudgetRange::Economy.allowed_tiers(), &[PriceTier::Basic]);
        assert_eq!(BudgetRange::Standard.allowed_tiers(), &[PriceTier::Basic, PriceTier::Premium]);
        assert_eq!(BudgetRange::Premium.allowed_tiers(), &[PriceTier::Premium, PriceTier::Luxury]);
        assert_eq!(BudgetRange::Luxury.allowed_tiers(), &[PriceTier::Luxury, PriceTier::Ultra]);
    }

    #[test]
    fn unrecognized_preferences_are_dropped() {
        let raw = json!({
            "budgetRange": "platinum",
            "wantsFinancing": true,
            "travelMonth": "june",
        });
        let Value::Object(map) = raw else { panic!("fixture must be an object") };

        assert_eq!(WizardPreferences::from_map(&map), WizardPreferences::default());
    }

    #[test]
    fn budget_range_accepts_both_key_spellings() {
        let camel = json!({ "budgetRange": "standard" });
        let snake = json!({ "budget_range": "Luxury" });
        let (Value::Object(camel), Value::Object(snake)) = (camel, snake) else {
            panic!("fixtures must be objects")
        };

        assert_eq!(WizardPreferences::from_map(&camel).budget_range, Some(BudgetRange::Standard));
        assert_eq!(WizardPreferences::from_map(&snake).budget_range, Some(BudgetRange::Luxury));
    }

    #[test]
    fn missing_steps_yield_empty_inputs() {
        let steps = WizardSteps::from_records(&[]).expect("empty records are valid");
        assert_eq!(steps.inputs(), WizardInputs::default());
    }

    #[test]
    fn records_map_to_step_slots() {
        let records = vec![
            WizardStepRecord::new(2, json!({ "selectedConcerns": ["wrinkles", "sagging_skin"] })),
            WizardStepRecord::new(1, json!({ "selected_categories": ["facial"] })),
            WizardStepRecord::new(3, json!({ "preferences": { "budgetRange": "premium" } })),
            WizardStepRecord::new(7, json!({ "anything": 1 })),
        ];

        let inputs = WizardSteps::from_records(&records).expect("records are valid").inputs();

        assert_eq!(inputs.selected_categories.iter().collect::<Vec<_>>(), vec!["facial"]);
        assert_eq!(inputs.selected_concerns.len(), 2);
        assert_eq!(inputs.preferences.budget_range, Some(BudgetRange::Premium));
    }

    #[test]
    fn later_record_replaces_earlier_for_same_step() {
        let records = vec![
            WizardStepRecord::new(1, json!({ "selectedCategories": ["body"] })),
            WizardStepRecord::new(1, json!({ "selectedCategories": ["facial"] })),
        ];

        let inputs = WizardSteps::from_records(&records).expect("records are valid").inputs();
        assert!(inputs.selected_categories.contains("facial"));
        assert!(!inputs.selected_categories.contains("body"));
    }

    #[test]
    fn malformed_step_payload_is_a_validation_failure() {
        let records = vec![WizardStepRecord::new(2, json!({ "selectedConcerns": "wrinkles" }))];

        let error = WizardSteps::from_records(&records).unwrap_err();
        assert!(matches!(error, DomainError::InvalidWizardStep { step_number: 2, .. }));
    }

    #[test]
    fn null_step_payload_counts_as_empty_answer() {
        let records = vec![WizardStepRecord::new(3, Value::Null)];

        let steps = WizardSteps::from_records(&records).expect("null payload is valid");
        assert_eq!(steps.step3, Some(PreferenceStep::default()));
        assert_eq!(steps.inputs().preferences.budget_range, None);
    }
}
