use std::path::{Path, PathBuf};

use crate::commands::CommandResult;
use serde_json::json;
use treatmatch_core::config::{AppConfig, LoadOptions};
use treatmatch_core::Catalog;

pub(crate) struct LoadedCatalog {
    pub catalog: Catalog,
    pub source: String,
}

/// Loads the catalog from the explicit path, the configured path, or the
/// built-in demo catalog, in that order.
pub(crate) fn load_catalog(
    command: &str,
    explicit_path: Option<&Path>,
) -> Result<LoadedCatalog, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })?;

    let path: Option<PathBuf> = explicit_path.map(Path::to_path_buf).or(config.catalog.path);
    let source = path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in demo catalog".to_string());

    let catalog = Catalog::load(path.as_deref()).map_err(|error| {
        CommandResult::failure(command, "catalog", format!("catalog issue: {error}"), 3)
    })?;

    Ok(LoadedCatalog { catalog, source })
}

pub fn run(catalog_path: Option<&Path>) -> CommandResult {
    let loaded = match load_catalog("catalog", catalog_path) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let tiers = loaded
        .catalog
        .tier_counts()
        .into_iter()
        .map(|(tier, count)| (tier.as_str().to_string(), json!(count)))
        .collect::<serde_json::Map<_, _>>();

    CommandResult::success_with_data(
        "catalog",
        format!(
            "catalog from {} is valid with {} active packages",
            loaded.source,
            loaded.catalog.len()
        ),
        Some(json!({
            "source": loaded.source,
            "package_count": loaded.catalog.len(),
            "tiers": tiers,
        })),
    )
}
