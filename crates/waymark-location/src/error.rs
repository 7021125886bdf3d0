//! Error types for location adapters.

/// Errors raised by location adapters and the platform behind them.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
	/// The adapter was configured to require the Navigation API and the
	/// platform does not provide it.
	#[error("Navigation API is not available")]
	NavigationApiUnavailable,

	#[error("Invalid URL '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },

	/// A platform call (history, location, navigation) failed.
	#[error("Platform call failed: {0}")]
	Platform(String),
}
