//! # CLI Module
//!
//! Command-line entry points for SpotiPulse. The binary is mostly a launcher
//! for the gateway, plus the one-off authorization flow needed to obtain the
//! long-lived refresh token the gateway runs on.
//!
//! ## Commands
//!
//! - [`serve`] - Starts the HTTP gateway on `SERVER_ADDRESS`
//! - [`auth`] - Interactive authorization-code flow that prints a refresh token
//! - [`top_tracks`] - Prints the user's top ten tracks as a table
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! spotipulse auth          # Authorize and copy the printed refresh token
//!                          # into SPOTIFY_REFRESH_TOKEN
//! spotipulse top-tracks    # Check that the refresh token works
//! ```
//!
//! ### Running the gateway
//! ```bash
//! spotipulse serve
//! curl http://127.0.0.1:8000/spotify/now-playing
//! ```
//!
//! ## Error Handling
//!
//! Commands report failures with the crate's console macros. Fatal problems
//! (missing configuration, a rejected token exchange) terminate the process
//! through [`crate::error!`].

mod auth;
mod serve;
mod tracks;

pub use auth::auth;
pub use serve::serve;
pub use tracks::top_tracks;
