use std::{fs, path::PathBuf, sync::Mutex};

use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::config;

lazy_static::lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", config::PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Initialize logging with custom path and/or level
pub fn init_with(custom_log_path: Option<PathBuf>, level: Option<tracing::Level>) -> Result<()> {
    let log_path = match custom_log_path {
        Some(path) => path,
        None => config::get_data_dir().join(LOG_FILE.clone()),
    };
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // CLI level wins; otherwise <PROJECT>_LOG_LEVEL or RUST_LOG, then WARN
    let env_filter = match level {
        Some(lvl) => EnvFilter::default().add_directive(LevelFilter::from_level(lvl).into()),
        None => {
            let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
            match std::env::var(LOG_ENV.clone()) {
                Ok(directives) => builder.parse_lossy(directives),
                Err(_) => builder.from_env_lossy(),
            }
        }
    };

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
