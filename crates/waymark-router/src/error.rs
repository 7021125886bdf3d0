//! Error types for route registration and navigation.

use waymark_location::LocationError;
use waymark_pattern::PatternError;

/// Errors raised while registering routes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("Invalid route template: {0}")]
	InvalidTemplate(#[from] PatternError),

	/// Two templates match exactly the same paths, such as `/users/:id`
	/// and `/users/:uid`.
	#[error("Route '{path}' matches the same paths as '{existing}'")]
	DuplicatePattern { path: String, existing: String },

	#[error("Duplicate route name: {0}")]
	DuplicateName(String),
}

/// Errors raised by [`Router`](crate::Router) operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error("Navigation failed: {0}")]
	Navigation(#[from] LocationError),

	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),

	#[error("Cannot build path: {0}")]
	Reverse(PatternError),

	/// The router behind a [`RouterHandle`](crate::RouterHandle) was dropped.
	#[error("Router is no longer available")]
	Detached,
}
