//! Path template matching for the waymark client-side router.
//!
//! Templates are written with literal segments and `:name` parameter segments:
//!
//! - `/about` - Exact match
//! - `/blog/:id` - Single parameter (one non-empty segment, never crosses `/`)
//! - `/users/:user_id/posts/:post_id` - Multiple parameters
//! - `/archive/:year?` - Optional parameter (absent values are not reported)
//! - `/files/*path` - Trailing wildcard (rest of the path, including `/`)
//!
//! A single trailing slash is normalized away on both the template and the
//! matched pathname, so `/about/` and `/about` are the same route.
//!
//! ## Example
//!
//! ```
//! use waymark_pattern::PathPattern;
//!
//! let pattern = PathPattern::new("/blog/:id").unwrap();
//! let params = pattern.matches("/blog/42").unwrap();
//! assert_eq!(params.get("id").map(String::as_str), Some("42"));
//! assert!(pattern.matches("/blog/").is_none());
//! ```

mod error;
mod pattern;

pub use error::PatternError;
pub use pattern::{Params, PathPattern, Segment, normalize_path};
