//! SpotiPulse Gateway Library
//!
//! This library implements a thin HTTP gateway in front of the Spotify Web API.
//! It exchanges OAuth credentials for access tokens and re-exposes a handful of
//! Spotify endpoints (now playing, top tracks, followed artists, play/pause)
//! under simpler routes with simplified JSON contracts.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers exposed by the gateway
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading and the process-wide `Config` struct
//! - `error` - Error taxonomy shared by token provider, upstream calls and routes
//! - `server` - Router assembly and listener
//! - `spotify` - Token provider and Spotify Web API client
//! - `types` - Wire types and reshaped gateway contracts
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotipulse::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotipulse::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Failure};

/// A convenient Result type alias for top-level glue that may fail.
///
/// Library operations return the typed [`error::Result`]; this alias is used
/// where several unrelated error types meet (CLI commands, process start).
///
/// # Example
///
/// ```
/// use spotipulse::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Token exchange completed");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used from CLI glue. Library and gateway code return errors instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("GET /spotify/top-tracks failed: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
