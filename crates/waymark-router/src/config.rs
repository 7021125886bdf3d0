//! Router construction.

use std::fmt;
use std::rc::Rc;

use futures::task::LocalSpawn;
use waymark_location::LocationAdapter;

use crate::{Dom, RegistryError, Route, RouteProps, RouteRegistry};

/// Tunables that do not depend on the DOM or the routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSettings {
	/// Class put on the link of the current route.
	pub active_class: String,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			active_class: "active".to_string(),
		}
	}
}

pub(crate) type ContainerFn<N> = Box<dyn Fn() -> Option<N>>;
pub(crate) type RenderLinkFn<N> = Box<dyn Fn(&RouteProps) -> N>;

/// Everything a [`Router`](crate::Router) is built from.
///
/// Routes are registered in call order, which is also match precedence.
/// Registration errors are kept and reported by
/// [`Router::new`](crate::Router::new).
///
/// ```ignore
/// let config = RouterConfig::new(dom, adapter, Rc::new(WebSpawner))
/// 	.route(HomeRoute::default())
/// 	.route(BlogRoute::default())
/// 	.render_root(|| document_element("app"))
/// 	.navigation_root(|| document_element("nav"))
/// 	.render_link(|props| link_element(props));
/// let router = Router::new(config)?;
/// router.start();
/// ```
pub struct RouterConfig<D: Dom> {
	pub(crate) dom: D,
	pub(crate) adapter: Rc<dyn LocationAdapter>,
	pub(crate) spawner: Rc<dyn LocalSpawn>,
	pub(crate) registry: RouteRegistry<D::Node>,
	pub(crate) render_root: Option<ContainerFn<D::Node>>,
	pub(crate) navigation_root: Option<ContainerFn<D::Node>>,
	pub(crate) render_link: Option<RenderLinkFn<D::Node>>,
	pub(crate) settings: RouterSettings,
	pub(crate) error: Option<RegistryError>,
}

impl<D: Dom> RouterConfig<D> {
	pub fn new(dom: D, adapter: Rc<dyn LocationAdapter>, spawner: Rc<dyn LocalSpawn>) -> Self {
		Self {
			dom,
			adapter,
			spawner,
			registry: RouteRegistry::new(),
			render_root: None,
			navigation_root: None,
			render_link: None,
			settings: RouterSettings::default(),
			error: None,
		}
	}

	pub fn route<R: Route<D::Node>>(self, route: R) -> Self {
		self.route_rc(Rc::new(route))
	}

	/// Registers a route the caller keeps a handle to.
	pub fn route_rc<R: Route<D::Node>>(mut self, route: Rc<R>) -> Self {
		if let Err(err) = self.registry.register_rc(route)
			&& self.error.is_none()
		{
			self.error = Some(err);
		}
		self
	}

	/// Where views are mounted. Looked up on every navigation.
	pub fn render_root(mut self, root: impl Fn() -> Option<D::Node> + 'static) -> Self {
		self.render_root = Some(Box::new(root));
		self
	}

	/// Where navigation links are rendered. Looked up on `start`.
	pub fn navigation_root(mut self, root: impl Fn() -> Option<D::Node> + 'static) -> Self {
		self.navigation_root = Some(Box::new(root));
		self
	}

	/// Builds the link node for a static route. The router fills in the
	/// anchor's `href` and text.
	pub fn render_link(mut self, render: impl Fn(&RouteProps) -> D::Node + 'static) -> Self {
		self.render_link = Some(Box::new(render));
		self
	}

	pub fn settings(mut self, settings: RouterSettings) -> Self {
		self.settings = settings;
		self
	}
}

impl<D: Dom> fmt::Debug for RouterConfig<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterConfig")
			.field("registry", &self.registry)
			.field("has_render_root", &self.render_root.is_some())
			.field("has_navigation_root", &self.navigation_root.is_some())
			.field("has_render_link", &self.render_link.is_some())
			.field("settings", &self.settings)
			.field("error", &self.error)
			.finish()
	}
}
