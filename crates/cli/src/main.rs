use std::process::ExitCode;

use treatmatch_core::config::{AppConfig, LoadOptions, LogFormat};

// Command output goes to stdout as JSON, so logs are written to stderr.
fn init_logging() {
    use tracing::Level;

    let (level, format) = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            let level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
            (level, config.logging.format)
        }
        Err(_) => (Level::WARN, LogFormat::Compact),
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    init_logging();
    treatmatch_cli::run()
}
