use std::fs;
use std::path::Path;

use crate::commands::catalog::load_catalog;
use crate::commands::CommandResult;
use serde_json::json;
use treatmatch_core::{RecommendationEngine, WizardStepRecord, WizardSteps};

pub fn run(steps_path: &Path, catalog_path: Option<&Path>) -> CommandResult {
    let loaded = match load_catalog("recommend", catalog_path) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let steps = match read_steps(steps_path) {
        Ok(steps) => steps,
        Err(message) => return CommandResult::failure("recommend", "wizard_input", message, 4),
    };

    let recommendations =
        RecommendationEngine::new().recommend(loaded.catalog.packages(), &steps);

    tracing::info!(
        event_name = "cli.recommend.completed",
        catalog_source = %loaded.source,
        recommendation_count = recommendations.len(),
        "recommendations computed"
    );

    let data = match serde_json::to_value(&recommendations) {
        Ok(value) => value,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "serialization",
                format!("could not serialize recommendations: {error}"),
                5,
            )
        }
    };

    CommandResult::success_with_data(
        "recommend",
        format!(
            "{} recommendations from {} packages ({})",
            recommendations.len(),
            loaded.catalog.len(),
            loaded.source
        ),
        Some(json!({ "recommendations": data })),
    )
}

fn read_steps(path: &Path) -> Result<WizardSteps, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read wizard steps `{}`: {error}", path.display()))?;
    let records: Vec<WizardStepRecord> = serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse wizard steps `{}`: {error}", path.display()))?;

    WizardSteps::from_records(&records).map_err(|error| error.to_string())
}
