//! What a route sees while it is being mounted.

use std::collections::HashMap;
use std::fmt;
use std::rc::Weak;

use waymark_location::Location;
use waymark_pattern::Params;

use crate::{Disposers, RouterError};

/// Navigation operations available to routes.
///
/// Implemented by the router; routes reach it through [`RouterHandle`].
pub(crate) trait Navigator {
	fn push(&self, path: &str) -> Result<(), RouterError>;
	fn replace(&self, path: &str) -> Result<(), RouterError>;
	fn back(&self);
	fn forward(&self);
	fn href(&self, path: &str) -> String;
	fn reverse(&self, name: &str, params: &Params) -> Result<String, RouterError>;
	fn current_location(&self) -> Option<Location>;
}

/// A weak handle to the router.
///
/// Routes keep it to navigate from event handlers without keeping the router
/// alive. Once the router is dropped, fallible operations return
/// [`RouterError::Detached`] and the rest do nothing.
#[derive(Clone)]
pub struct RouterHandle {
	navigator: Weak<dyn Navigator>,
}

impl RouterHandle {
	pub(crate) fn new(navigator: Weak<dyn Navigator>) -> Self {
		Self { navigator }
	}

	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.navigator
			.upgrade()
			.ok_or(RouterError::Detached)?
			.push(path)
	}

	pub fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.navigator
			.upgrade()
			.ok_or(RouterError::Detached)?
			.replace(path)
	}

	pub fn back(&self) {
		if let Some(navigator) = self.navigator.upgrade() {
			navigator.back();
		}
	}

	pub fn forward(&self) {
		if let Some(navigator) = self.navigator.upgrade() {
			navigator.forward();
		}
	}

	/// The anchor `href` for `path`; `path` itself once detached.
	pub fn href(&self, path: &str) -> String {
		match self.navigator.upgrade() {
			Some(navigator) => navigator.href(path),
			None => path.to_string(),
		}
	}

	/// Builds the path of a named route.
	pub fn reverse(&self, name: &str, params: &Params) -> Result<String, RouterError> {
		self.navigator
			.upgrade()
			.ok_or(RouterError::Detached)?
			.reverse(name, params)
	}

	pub fn current_location(&self) -> Option<Location> {
		self.navigator.upgrade()?.current_location()
	}

	pub fn is_attached(&self) -> bool {
		self.navigator.strong_count() > 0
	}
}

impl fmt::Debug for RouterHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterHandle")
			.field("attached", &self.is_attached())
			.finish()
	}
}

/// Built fresh for every transition and handed to the route's lifecycle
/// hooks.
#[derive(Debug, Clone)]
pub struct NavigationContext {
	location: Location,
	query: HashMap<String, String>,
	params: Params,
	router: RouterHandle,
	disposers: Disposers,
}

impl NavigationContext {
	pub(crate) fn new(location: Location, params: Params, router: RouterHandle) -> Self {
		let query = location.query_map();
		Self {
			location,
			query,
			params,
			router,
			disposers: Disposers::new(),
		}
	}

	pub fn location(&self) -> &Location {
		&self.location
	}

	/// Decoded query parameters.
	pub fn query(&self) -> &HashMap<String, String> {
		&self.query
	}

	/// Named parameters captured from the path.
	pub fn params(&self) -> &Params {
		&self.params
	}

	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	pub fn router(&self) -> &RouterHandle {
		&self.router
	}

	/// Cleanup tied to this transition.
	pub fn disposers(&self) -> &Disposers {
		&self.disposers
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn detached() -> RouterHandle {
		let navigator: Weak<dyn Navigator> = Weak::<Dangling>::new();
		RouterHandle::new(navigator)
	}

	struct Dangling;

	impl Navigator for Dangling {
		fn push(&self, _path: &str) -> Result<(), RouterError> {
			Ok(())
		}
		fn replace(&self, _path: &str) -> Result<(), RouterError> {
			Ok(())
		}
		fn back(&self) {}
		fn forward(&self) {}
		fn href(&self, path: &str) -> String {
			path.to_string()
		}
		fn reverse(&self, name: &str, _params: &Params) -> Result<String, RouterError> {
			Err(RouterError::InvalidRouteName(name.to_string()))
		}
		fn current_location(&self) -> Option<Location> {
			None
		}
	}

	#[rstest]
	fn test_detached_handle() {
		let handle = detached();

		assert!(!handle.is_attached());
		assert_eq!(handle.push("/a"), Err(RouterError::Detached));
		assert_eq!(handle.href("/a"), "/a");
		assert!(handle.current_location().is_none());
		handle.back();
	}

	#[rstest]
	fn test_context_decodes_query() {
		let ctx = NavigationContext::new(
			Location::parse("/blog/42?tab=comments&sort=new"),
			Params::from([("id".to_string(), "42".to_string())]),
			detached(),
		);

		assert_eq!(ctx.param("id"), Some("42"));
		assert_eq!(ctx.query().get("tab").map(String::as_str), Some("comments"));
		assert_eq!(ctx.location().path(), "/blog/42");
		assert!(ctx.disposers().is_empty());
	}
}
