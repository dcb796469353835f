use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tempfile::TempDir;
use treatmatch_cli::commands::{catalog, config, doctor, recommend};

const STEPS: &str = r#"[
  { "step_number": 1, "data": { "selectedCategories": ["facial"] } },
  { "step_number": 2, "data": { "selectedConcerns": ["sagging_skin", "wrinkles"] } },
  { "step_number": 3, "data": { "preferences": { "budgetRange": "premium" } } }
]"#;

const CATALOG: &str = r#"[
  { "id": "a", "code": "A", "display_name": "Alpha", "category_id": "facial",
    "concern_tags": ["wrinkles"], "price_tier": "luxury", "final_price": 9000 },
  { "id": "b", "code": "B", "display_name": "Bravo", "category_id": "body",
    "concern_tags": [], "price_tier": "basic", "final_price": 1200 }
]"#;

#[test]
fn recommend_uses_demo_catalog_by_default() {
    with_env(&[], |dir| {
        let steps = write_file(dir, "steps.json", STEPS);

        let result = recommend::run(&steps, None);
        assert_eq!(result.exit_code, 0, "expected successful recommend run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");

        let codes: Vec<_> = payload["data"]["recommendations"]
            .as_array()
            .expect("recommendations array")
            .iter()
            .map(|item| item["package_code"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(codes, vec!["FACE-LIFT-P", "FACE-LIFT-L", "FACE-LIFT-U"]);
        assert_eq!(payload["data"]["recommendations"][0]["price_tier"], "premium");
        assert_eq!(payload["data"]["recommendations"][0]["match_score"], 100);
    });
}

#[test]
fn recommend_honors_explicit_catalog_and_orders_by_tier() {
    with_env(&[], |dir| {
        let steps = write_file(dir, "steps.json", STEPS);
        let catalog = write_file(dir, "catalog.json", CATALOG);

        let result = recommend::run(&steps, Some(&catalog));
        assert_eq!(result.exit_code, 0, "expected successful recommend run");

        let payload = parse_payload(&result.output);
        let recommendations = payload["data"]["recommendations"].as_array().expect("array");
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0]["package_id"], "b");
        assert_eq!(recommendations[0]["reasoning"][0], "default recommendation");
        assert_eq!(recommendations[1]["package_id"], "a");
        assert_eq!(recommendations[1]["match_score"], 75);
    });
}

#[test]
fn recommend_reads_catalog_path_from_env() {
    with_env(&[], |dir| {
        let steps = write_file(dir, "steps.json", STEPS);
        let catalog = write_file(dir, "catalog.json", CATALOG);
        env::set_var("TREATMATCH_CATALOG_PATH", &catalog);

        let result = recommend::run(&steps, None);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["recommendations"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn recommend_rejects_malformed_steps() {
    with_env(&[], |dir| {
        let steps = write_file(
            dir,
            "steps.json",
            r#"[{ "step_number": 2, "data": { "selectedConcerns": "wrinkles" } }]"#,
        );

        let result = recommend::run(&steps, None);
        assert_eq!(result.exit_code, 4, "expected wizard input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "wizard_input");
    });
}

#[test]
fn catalog_reports_invalid_rows() {
    with_env(&[], |dir| {
        let catalog = write_file(
            dir,
            "catalog.json",
            r#"[{ "id": "a", "code": "A", "display_name": "Alpha", "category_id": "facial",
                  "price_tier": "diamond", "final_price": 100 }]"#,
        );

        let result = catalog::run(Some(&catalog));
        assert_eq!(result.exit_code, 3, "expected catalog failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "catalog");
        assert_eq!(payload["error_class"], "catalog");
        assert!(payload["message"].as_str().unwrap_or_default().contains("diamond"));
    });
}

#[test]
fn catalog_summarizes_demo_tiers() {
    with_env(&[], |_dir| {
        let result = catalog::run(None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["package_count"], 8);
        assert_eq!(payload["data"]["tiers"]["basic"], 2);
        assert_eq!(payload["data"]["tiers"]["ultra"], 1);
    });
}

#[test]
fn invalid_config_is_reported_before_catalog_load() {
    with_env(&[("TREATMATCH_LOG_LEVEL", "loud")], |_dir| {
        let result = catalog::run(None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_exits_non_zero_when_a_check_fails() {
    with_env(&[("TREATMATCH_LOG_LEVEL", "loud")], |_dir| {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1, "failed readiness report should exit non-zero");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["name"], "config_validation");
        assert_eq!(payload["checks"][0]["status"], "fail");
    });
}

#[test]
fn doctor_exits_zero_with_demo_catalog() {
    with_env(&[], |_dir| {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);
        assert_eq!(parse_payload(&result.output)["overall_status"], "pass");
    });
}

#[test]
fn config_reports_alias_env_source_and_fails_on_invalid_values() {
    with_env(&[("TREATMATCH_LOG_LEVEL", "debug")], |_dir| {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result
            .output
            .contains("- logging.level = debug (source: env (TREATMATCH_LOG_LEVEL))"));
    });

    with_env(&[("TREATMATCH_LOG_FORMAT", "xml")], |_dir| {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "invalid config should exit non-zero");
        assert!(result.output.starts_with("config validation failed"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture file should be writable");
    path
}

const ENV_KEYS: [&str; 9] = [
    "TREATMATCH_CATALOG_PATH",
    "TREATMATCH_SERVER_BIND_ADDRESS",
    "TREATMATCH_SERVER_PORT",
    "TREATMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS",
    "TREATMATCH_SERVER_MAX_STORED_SESSIONS",
    "TREATMATCH_LOGGING_LEVEL",
    "TREATMATCH_LOGGING_FORMAT",
    "TREATMATCH_LOG_LEVEL",
    "TREATMATCH_LOG_FORMAT",
];

/// Puts the captured env values back when dropped, including on panic.
struct EnvRestore {
    previous_values: Vec<(&'static str, Option<String>)>,
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in &self.previous_values {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce(&TempDir)) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    // A panicking test poisons the lock; the env is already restored by then.
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let _restore = EnvRestore {
        previous_values: ENV_KEYS.iter().map(|key| (*key, env::var(key).ok())).collect(),
    };

    for key in ENV_KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    let dir = TempDir::new().expect("temp dir should be created");
    test_fn(&dir);
}
