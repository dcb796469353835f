use std::env;
use std::fs;
use std::path::Path;

use toml::Value;
use treatmatch_core::config::{resolve_config_path, AppConfig, LoadOptions};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: 2,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset> (built-in demo catalog)".to_string());

    let fields: [(&str, &[&str], String); 7] = [
        ("catalog.path", &["TREATMATCH_CATALOG_PATH"], catalog_path),
        (
            "server.bind_address",
            &["TREATMATCH_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        ("server.port", &["TREATMATCH_SERVER_PORT"], config.server.port.to_string()),
        (
            "server.graceful_shutdown_secs",
            &["TREATMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            config.server.graceful_shutdown_secs.to_string(),
        ),
        (
            "server.max_stored_sessions",
            &["TREATMATCH_SERVER_MAX_STORED_SESSIONS"],
            config.server.max_stored_sessions.to_string(),
        ),
        (
            "logging.level",
            &["TREATMATCH_LOGGING_LEVEL", "TREATMATCH_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        (
            "logging.format",
            &["TREATMATCH_LOGGING_FORMAT", "TREATMATCH_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, env_keys, value) in fields {
        lines.push(render_line(
            key_path,
            &value,
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

/// Env keys are checked in the loader's order; blank values do not count.
fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_hit = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = env_hit {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
