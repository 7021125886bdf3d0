//! Compiled path templates.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::PatternError;

/// Named parameters captured from a matched pathname.
pub type Params = HashMap<String, String>;

/// Maximum allowed length for a path template in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a template.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled template regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Matched verbatim.
	Literal(String),
	/// `:name` or `:name?`.
	Param { name: String, optional: bool },
	/// `*name`, only valid as the last segment.
	Wildcard(String),
}

/// A compiled path template.
///
/// Matching is exact: the whole pathname has to be consumed. Parameter
/// segments never capture an empty value, so `/blog/` does not match
/// `/blog/:id`.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// Template as written at registration.
	template: String,
	/// Template with the trailing slash normalized away.
	normalized: String,
	segments: Vec<Segment>,
	param_names: Vec<String>,
	regex: regex::Regex,
}

/// Normalizes a pathname the way templates are normalized.
///
/// Adds a leading `/` when missing and strips a single trailing `/` (the root
/// path stays `/`).
pub fn normalize_path(path: &str) -> String {
	let mut normalized = if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	};
	if normalized.len() > 1 && normalized.ends_with('/') {
		normalized.pop();
	}
	normalized
}

impl PathPattern {
	/// Compiles a template.
	///
	/// # Errors
	///
	/// - the template does not start with `/`
	/// - it exceeds 1024 bytes or 32 segments
	/// - a parameter name is empty, not an identifier, or used twice
	/// - a wildcard is not the last segment
	pub fn new(template: &str) -> Result<Self, PatternError> {
		if !template.starts_with('/') {
			return Err(PatternError::MissingLeadingSlash(template.to_string()));
		}

		if template.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: template.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let segment_count = template.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let normalized = normalize_path(template);
		let segments = parse_segments(&normalized)?;
		let param_names: Vec<String> = segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Param { name, .. } | Segment::Wildcard(name) => Some(name.clone()),
				Segment::Literal(_) => None,
			})
			.collect();

		let regex = regex::RegexBuilder::new(&compile_regex(&segments))
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		Ok(Self {
			template: template.to_string(),
			normalized,
			segments,
			param_names,
			regex,
		})
	}

	/// Returns the template as registered.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the normalized template (no trailing slash).
	pub fn as_str(&self) -> &str {
		&self.normalized
	}

	/// Returns the parsed segments.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Returns the parameter names in template order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Whether the template has no parameter or wildcard segment.
	pub fn is_static(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Canonical shape of the template with parameter names erased.
	///
	/// `/users/:id` and `/users/:uid` share the signature `/users/:`, so they
	/// can never both be reachable.
	pub fn signature(&self) -> String {
		let mut signature = String::new();
		for segment in &self.segments {
			signature.push('/');
			match segment {
				Segment::Literal(literal) => signature.push_str(literal),
				Segment::Param { optional: false, .. } => signature.push(':'),
				Segment::Param { optional: true, .. } => signature.push_str(":?"),
				Segment::Wildcard(_) => signature.push('*'),
			}
		}
		if signature.is_empty() {
			signature.push('/');
		}
		signature
	}

	/// Matches a pathname against this template.
	///
	/// The pathname is normalized first. Captured values are percent-decoded;
	/// optional parameters that are absent are left out of the result.
	pub fn matches(&self, path: &str) -> Option<Params> {
		let normalized = normalize_path(path);
		let candidate = if normalized == "/" { "" } else { normalized.as_str() };

		self.regex.captures(candidate).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.filter(|m| !m.as_str().is_empty())
						.map(|m| (name.clone(), decode(m.as_str())))
				})
				.collect()
		})
	}

	/// Checks if this template would match the given pathname.
	pub fn is_match(&self, path: &str) -> bool {
		self.matches(path).is_some()
	}

	/// Builds a pathname from parameter values.
	///
	/// Values are percent-encoded; wildcard values keep their `/` separators.
	///
	/// # Errors
	///
	/// Returns [`PatternError::MissingParameter`] when a required parameter or
	/// wildcard has no (or an empty) value.
	pub fn reverse(&self, params: &Params) -> Result<String, PatternError> {
		let mut path = String::new();

		for segment in &self.segments {
			match segment {
				Segment::Literal(literal) => {
					path.push('/');
					path.push_str(literal);
				}
				Segment::Param { name, optional } => {
					match params.get(name).filter(|value| !value.is_empty()) {
						Some(value) => {
							path.push('/');
							path.push_str(&urlencoding::encode(value));
						}
						None if *optional => {}
						None => return Err(PatternError::MissingParameter(name.clone())),
					}
				}
				Segment::Wildcard(name) => {
					let value = params
						.get(name)
						.filter(|value| !value.is_empty())
						.ok_or_else(|| PatternError::MissingParameter(name.clone()))?;
					for part in value.trim_start_matches('/').split('/') {
						path.push('/');
						path.push_str(&urlencoding::encode(part));
					}
				}
			}
		}

		if path.is_empty() {
			path.push('/');
		}
		Ok(path)
	}
}

fn parse_segments(normalized: &str) -> Result<Vec<Segment>, PatternError> {
	if normalized == "/" {
		return Ok(Vec::new());
	}

	let raw: Vec<&str> = normalized[1..].split('/').collect();
	let mut seen = HashSet::new();
	let mut segments = Vec::with_capacity(raw.len());

	for (index, part) in raw.iter().enumerate() {
		let segment = if let Some(rest) = part.strip_prefix(':') {
			let (name, optional) = match rest.strip_suffix('?') {
				Some(name) => (name, true),
				None => (rest, false),
			};
			Segment::Param {
				name: validate_name(normalized, name)?,
				optional,
			}
		} else if let Some(name) = part.strip_prefix('*') {
			if index + 1 != raw.len() {
				return Err(PatternError::MisplacedWildcard(normalized.to_string()));
			}
			Segment::Wildcard(validate_name(normalized, name)?)
		} else {
			Segment::Literal((*part).to_string())
		};

		if let Segment::Param { name, .. } | Segment::Wildcard(name) = &segment
			&& !seen.insert(name.clone())
		{
			return Err(PatternError::DuplicateParameter {
				pattern: normalized.to_string(),
				name: name.clone(),
			});
		}

		segments.push(segment);
	}

	Ok(segments)
}

fn validate_name(pattern: &str, name: &str) -> Result<String, PatternError> {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return Err(PatternError::EmptyParameterName(pattern.to_string()));
	};

	let valid = (first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
	if !valid {
		return Err(PatternError::InvalidParameterName {
			pattern: pattern.to_string(),
			name: name.to_string(),
		});
	}

	Ok(name.to_string())
}

fn compile_regex(segments: &[Segment]) -> String {
	let mut regex_str = String::from("^");

	for segment in segments {
		match segment {
			Segment::Literal(literal) => {
				regex_str.push('/');
				regex_str.push_str(&regex::escape(literal));
			}
			Segment::Param {
				name,
				optional: false,
			} => regex_str.push_str(&format!("/(?P<{}>[^/]+)", name)),
			Segment::Param {
				name,
				optional: true,
			} => regex_str.push_str(&format!("(?:/(?P<{}>[^/]+))?", name)),
			Segment::Wildcard(name) => regex_str.push_str(&format!("/(?P<{}>.+)", name)),
		}
	}

	regex_str.push('$');
	regex_str
}

fn decode(raw: &str) -> String {
	urlencoding::decode(raw)
		.map(Cow::into_owned)
		.unwrap_or_else(|_| raw.to_string())
}

impl FromStr for PathPattern {
	type Err = PatternError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.normalized == other.normalized
	}
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.normalized)
	}
}
