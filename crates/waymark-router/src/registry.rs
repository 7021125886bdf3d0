//! Ordered route storage and first-match resolution.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use waymark_pattern::{Params, PathPattern, normalize_path};

use crate::{RegistryError, Route, RouteProps};

/// A route together with its compiled pattern.
pub struct RegisteredRoute<N> {
	route: Rc<dyn Route<N>>,
	// Same allocation as `route`, kept for typed lookups.
	concrete: Rc<dyn Any>,
	pattern: PathPattern,
}

impl<N: 'static> RegisteredRoute<N> {
	pub fn route(&self) -> &Rc<dyn Route<N>> {
		&self.route
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub fn props(&self) -> &RouteProps {
		self.route.props()
	}

	fn downcast<T: Route<N>>(&self) -> Option<Rc<T>> {
		self.concrete.clone().downcast::<T>().ok()
	}
}

impl<N: 'static> fmt::Debug for RegisteredRoute<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegisteredRoute")
			.field("props", self.props())
			.field("pattern", &self.pattern.as_str())
			.finish()
	}
}

/// A successful resolution.
pub struct RouteMatch<N> {
	pub entry: Rc<RegisteredRoute<N>>,
	pub params: Params,
}

impl<N: 'static> RouteMatch<N> {
	pub fn route(&self) -> &Rc<dyn Route<N>> {
		self.entry.route()
	}
}

impl<N: 'static> fmt::Debug for RouteMatch<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteMatch")
			.field("entry", &self.entry)
			.field("params", &self.params)
			.finish()
	}
}

/// How to find a route without a pathname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFilter<'a> {
	/// By `RouteProps::name`.
	Name(&'a str),
	/// By template, compared after trailing-slash normalization.
	Path(&'a str),
}

/// Routes in registration order.
///
/// Resolution walks the routes in order and returns the first match, so an
/// earlier `/users/:id` shadows a later `/users/new`.
pub struct RouteRegistry<N> {
	routes: Vec<Rc<RegisteredRoute<N>>>,
	by_path: HashMap<String, usize>,
	by_name: HashMap<String, usize>,
	by_signature: HashMap<String, usize>,
}

impl<N: 'static> Default for RouteRegistry<N> {
	fn default() -> Self {
		Self {
			routes: Vec::new(),
			by_path: HashMap::new(),
			by_name: HashMap::new(),
			by_signature: HashMap::new(),
		}
	}
}

impl<N: 'static> RouteRegistry<N> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Compiles the route's template and appends it.
	///
	/// # Errors
	///
	/// - [`RegistryError::InvalidTemplate`] when the template does not compile
	/// - [`RegistryError::DuplicatePattern`] when an earlier route matches
	///   exactly the same paths
	/// - [`RegistryError::DuplicateName`] when the name is taken
	pub fn register<R: Route<N>>(&mut self, route: R) -> Result<(), RegistryError> {
		self.register_rc(Rc::new(route))
	}

	/// Like [`register`](Self::register), for a route the caller keeps a
	/// handle to.
	pub fn register_rc<R: Route<N>>(&mut self, route: Rc<R>) -> Result<(), RegistryError> {
		let props = route.props().clone();
		let pattern = PathPattern::new(&props.path)?;

		let signature = pattern.signature();
		if let Some(&existing) = self.by_signature.get(&signature) {
			return Err(RegistryError::DuplicatePattern {
				path: props.path,
				existing: self.routes[existing].props().path.clone(),
			});
		}
		if let Some(name) = &props.name
			&& self.by_name.contains_key(name)
		{
			return Err(RegistryError::DuplicateName(name.clone()));
		}

		let index = self.routes.len();
		self.by_signature.insert(signature, index);
		self.by_path.insert(pattern.as_str().to_string(), index);
		if let Some(name) = props.name {
			self.by_name.insert(name, index);
		}

		let concrete: Rc<dyn Any> = route.clone();
		self.routes.push(Rc::new(RegisteredRoute {
			route,
			concrete,
			pattern,
		}));
		Ok(())
	}

	/// First route whose pattern matches `pathname`.
	pub fn resolve(&self, pathname: &str) -> Option<RouteMatch<N>> {
		self.routes.iter().find_map(|entry| {
			entry.pattern.matches(pathname).map(|params| RouteMatch {
				entry: entry.clone(),
				params,
			})
		})
	}

	pub fn lookup_by_path(&self, path: &str) -> Option<&Rc<RegisteredRoute<N>>> {
		self.by_path
			.get(&normalize_path(path))
			.map(|&index| &self.routes[index])
	}

	pub fn lookup_by_name(&self, name: &str) -> Option<&Rc<RegisteredRoute<N>>> {
		self.by_name.get(name).map(|&index| &self.routes[index])
	}

	pub fn lookup(&self, filter: RouteFilter<'_>) -> Option<&Rc<RegisteredRoute<N>>> {
		match filter {
			RouteFilter::Name(name) => self.lookup_by_name(name),
			RouteFilter::Path(path) => self.lookup_by_path(path),
		}
	}

	/// The route matching `filter`, if it is a `T`.
	pub fn lookup_as<T: Route<N>>(&self, filter: RouteFilter<'_>) -> Option<Rc<T>> {
		self.lookup(filter)?.downcast::<T>()
	}

	/// Builds a path for the route named `name`.
	///
	/// Returns `None` for an unknown name.
	pub fn reverse(
		&self,
		name: &str,
		params: &Params,
	) -> Option<Result<String, waymark_pattern::PatternError>> {
		self.lookup_by_name(name)
			.map(|entry| entry.pattern.reverse(params))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Rc<RegisteredRoute<N>>> {
		self.routes.iter()
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

impl<N: 'static> fmt::Debug for RouteRegistry<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteRegistry")
			.field(
				"routes",
				&self
					.routes
					.iter()
					.map(|entry| entry.pattern.as_str())
					.collect::<Vec<_>>(),
			)
			.field("named", &self.by_name.keys().collect::<Vec<_>>())
			.finish()
	}
}
