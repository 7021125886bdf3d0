//! Parsed location strings.

use std::collections::HashMap;
use std::fmt;

/// A location split into path, query and fragment.
///
/// Adapters report locations as plain strings (`/blog/1?tab=2#top`); the
/// router parses them with [`Location::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	path: String,
	query: String,
	hash: String,
}

impl Location {
	/// Parses `path?query#hash`. Every part is optional; an empty path reads
	/// as `/`.
	pub fn parse(raw: &str) -> Self {
		let (rest, hash) = raw.split_once('#').unwrap_or((raw, ""));
		let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

		let path = if path.is_empty() {
			"/".to_string()
		} else {
			crate::ensure_leading_slash(path)
		};

		Self {
			path,
			query: query.to_string(),
			hash: hash.to_string(),
		}
	}

	/// The path, always starting with `/`.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The raw query string without the leading `?`.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// The fragment without the leading `#`.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// Decodes the query string into a map.
	///
	/// Repeated keys keep the last value. A malformed query is logged and
	/// yields an empty map.
	pub fn query_map(&self) -> HashMap<String, String> {
		if self.query.is_empty() {
			return HashMap::new();
		}

		match serde_urlencoded::from_str::<Vec<(String, String)>>(&self.query) {
			Ok(pairs) => pairs.into_iter().collect(),
			Err(err) => {
				tracing::warn!(query = %self.query, "Failed to decode query string: {}", err);
				HashMap::new()
			}
		}
	}
}

impl From<&str> for Location {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path)?;
		if !self.query.is_empty() {
			write!(f, "?{}", self.query)?;
		}
		if !self.hash.is_empty() {
			write!(f, "#{}", self.hash)?;
		}
		Ok(())
	}
}
