pub mod app;
pub mod canvas;
pub mod capture;
mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod notification;
pub mod state;
pub mod storage;
pub use error::{AppError, AppResult};

/// Starts the GTK application and blocks until its window closes.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting SlimShot");

    let config = config::load_app_config();
    tracing::debug!(?config, "loaded configuration");

    let app = app::App::new(config);
    app.start()?;

    tracing::info!("SlimShot exited");
    Ok(())
}
