//! scenescript - run a procedural scene script
//!
//! Usage: `scenescript [buildings|rotating_wall|preview]`
//!
//! Without an argument the script named in the configuration runs.

use scenescript::config::AppConfig;

fn main() {
    let (mut config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse() {
            Ok(script) => config.scene.script = script,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(2);
            }
        }
    }

    log::info!("Starting scenescript");
    match scenescript::run(&config) {
        Ok(run) => {
            log::info!(
                "Done: {} models, {} point lights, {} model keyframes",
                run.stats.models,
                run.stats.point_lights,
                run.stats.model_keyframes
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
