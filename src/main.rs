mod cli;
mod commands;
mod config;
mod error;
mod io_utils;
mod key_resolver;
mod launcher;
mod output;
mod prompt;
mod selector;
mod vault;

use clap::Parser;
use cli::App;
use commands::AppContext;
use config::{resolve_data_dir, AppConfig, CONFIG_ENV, HOME_ENV};
use output::{emit_err, OutputConfig, OutputMode};

fn build_output_config(app: &App) -> OutputConfig {
    OutputConfig {
        mode: if app.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        },
        quiet: app.quiet,
        no_color: app.no_color,
        verbose: app.verbose,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let app = App::parse();
    let output_cfg = build_output_config(&app);
    let (config_flag, data_dir_flag) = (app.config.clone(), app.data_dir.clone());
    let command = app.into_command().unwrap_or_else(|err| err.exit());

    // Logging depends on the config file, so load it first and report a bad
    // file once the subscriber is up.
    let config_path = AppConfig::locate(config_flag, std::env::var_os(CONFIG_ENV));
    let loaded = match &config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => Ok(AppConfig::default()),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_tracing(&config);
    if let Err(err) = &loaded {
        tracing::warn!("{err:#}; using default configuration");
    }

    let data_dir = match resolve_data_dir(data_dir_flag, std::env::var_os(HOME_ENV)) {
        Ok(dir) => dir,
        Err(err) => {
            let code = err.exit_code();
            emit_err(output_cfg, err);
            std::process::exit(code);
        }
    };
    let paths = config.store_paths(&data_dir);
    let ctx = AppContext::new(config, paths);
    tracing::debug!(
        keys = %ctx.store.path().display(),
        config = ?config_path,
        "starting"
    );
    let exit_code = commands::dispatch(&ctx, command, output_cfg);
    std::process::exit(exit_code);
}
