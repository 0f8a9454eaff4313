//! Relay version.

/// The version advertised in ping responses.
pub const RELAY_VERSION: &str = env!("CARGO_PKG_VERSION");
