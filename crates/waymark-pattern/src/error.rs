//! Error types for path template compilation and reversal.

/// Errors raised while compiling or reversing a path template.
///
/// Every compile-time variant is a registration error: a template that fails
/// here never reaches the matcher.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
	#[error("Pattern must start with '/': '{0}'")]
	MissingLeadingSlash(String),

	#[error("Pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong { length: usize, max: usize },

	#[error("Pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments { count: usize, max: usize },

	#[error("Empty parameter name in pattern '{0}'")]
	EmptyParameterName(String),

	#[error("Invalid parameter name '{name}' in pattern '{pattern}'")]
	InvalidParameterName { pattern: String, name: String },

	#[error("Parameter '{name}' appears more than once in pattern '{pattern}'")]
	DuplicateParameter { pattern: String, name: String },

	#[error("Wildcard must be the last segment of pattern '{0}'")]
	MisplacedWildcard(String),

	#[error("Failed to compile pattern regex: {0}")]
	Regex(String),

	#[error("Missing parameter: {0}")]
	MissingParameter(String),
}
