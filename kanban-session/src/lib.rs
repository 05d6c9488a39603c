//! Kanban session: config loading, logging setup, and the board session
//! the presentation layer drives.

pub mod config;
mod error;
pub mod log_bridge;
pub mod session;

pub use error::SessionError;
pub use session::BoardSession;

/// Load the config, install logging, and open the stored board.
/// Must be called inside a tokio runtime.
pub fn start() -> Result<BoardSession, SessionError> {
    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    let log_path = config::log_file_path(&config::data_dir(&config));

    if let Err(e) = log_bridge::init(&log_path) {
        log_bridge::write_fallback_line(
            &log_path,
            &format!("failed to initialize kanban logger: {}", e),
        );
    }

    BoardSession::open_with_config(&config)
}
