//! The navigation controller.
//!
//! A transition runs `Resolving → TearingDown → SettingUp → Rendering` and
//! returns to `Idle`. Each transition takes a generation token; after every
//! suspension point it checks that no newer transition has started. A
//! superseded transition never touches the render container or the current
//! route. If its mount succeeded it unmounts the route (unless a newer
//! transition holds the same route) and disposes whatever its context
//! collected.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use futures::task::{LocalSpawn, LocalSpawnExt};
use waymark_location::{Location, LocationAdapter, Subscription};
use waymark_pattern::Params;

use crate::config::{ContainerFn, RenderLinkFn};
use crate::context::Navigator;
use crate::links::{self, Hover, NavigationLink};
use crate::{
	Disposers, Dom, DomEvent, NavigationContext, RegisteredRoute, Route, RouteFilter,
	RouteRegistry, RouterConfig, RouterError, RouterHandle, RouterSettings,
};

/// Where the router is in the transition protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPhase {
	#[default]
	Idle,
	Resolving,
	TearingDown,
	SettingUp,
	Rendering,
}

/// How a transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The new view is displayed and its route is current.
	Rendered,
	/// The render container was not available; nothing changed.
	NoRenderRoot,
	/// No route matched; nothing changed.
	NotFound,
	/// The route produced no view or failed to set up. The previous route
	/// has been torn down; its view stays in place.
	NoView,
	/// A newer transition started before this one finished.
	Superseded,
}

type Teardown = Shared<LocalBoxFuture<'static, ()>>;

struct Mounted<N> {
	entry: Rc<RegisteredRoute<N>>,
	location: Location,
	disposers: Disposers,
}

struct TransitionState<N> {
	current: Option<Mounted<N>>,
	/// The displayed view and the container it was appended to.
	displayed: Option<(N, N)>,
	teardown: Option<Teardown>,
}

impl<N> Default for TransitionState<N> {
	fn default() -> Self {
		Self {
			current: None,
			displayed: None,
			teardown: None,
		}
	}
}

struct RouterInner<D: Dom> {
	this: Weak<RouterInner<D>>,
	dom: D,
	adapter: Rc<dyn LocationAdapter>,
	spawner: Rc<dyn LocalSpawn>,
	registry: RouteRegistry<D::Node>,
	render_root: Option<ContainerFn<D::Node>>,
	navigation_root: Option<ContainerFn<D::Node>>,
	render_link: Option<RenderLinkFn<D::Node>>,
	settings: RouterSettings,
	state: RefCell<TransitionState<D::Node>>,
	/// Routes whose `mount` is in flight, keyed by transition token.
	mounting: RefCell<Vec<(u64, Rc<RegisteredRoute<D::Node>>)>>,
	links: RefCell<Vec<NavigationLink<D::Node>>>,
	adapter_subscription: RefCell<Option<Subscription>>,
	generation: Cell<u64>,
	phase: Cell<TransitionPhase>,
}

/// A client-side router.
///
/// Cheap to clone; clones drive the same state. Nothing happens until
/// [`start`](Router::start) is called.
pub struct Router<D: Dom> {
	inner: Rc<RouterInner<D>>,
}

impl<D: Dom> Clone for Router<D> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<D: Dom> Router<D> {
	/// Builds the router.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Registry`] for the first route that failed to
	/// register.
	pub fn new(config: RouterConfig<D>) -> Result<Self, RouterError> {
		let RouterConfig {
			dom,
			adapter,
			spawner,
			registry,
			render_root,
			navigation_root,
			render_link,
			settings,
			error,
		} = config;

		if let Some(err) = error {
			return Err(err.into());
		}

		let inner = Rc::new_cyclic(|this| RouterInner {
			this: this.clone(),
			dom,
			adapter,
			spawner,
			registry,
			render_root,
			navigation_root,
			render_link,
			settings,
			state: RefCell::new(TransitionState::default()),
			mounting: RefCell::new(Vec::new()),
			links: RefCell::new(Vec::new()),
			adapter_subscription: RefCell::new(None),
			generation: Cell::new(0),
			phase: Cell::new(TransitionPhase::Idle),
		});

		Ok(Self { inner })
	}

	/// Renders the navigation links, subscribes to the adapter and starts the
	/// transition to the current location.
	pub fn start(&self) {
		self.inner.render_navigation();

		let router = self.inner.this.clone();
		let subscription = self.inner.adapter.listen(Rc::new(move |location: &str| {
			if let Some(inner) = router.upgrade() {
				RouterInner::spawn_transition(&inner, Location::parse(location));
			}
		}));
		let previous = self.inner.adapter_subscription.replace(Some(subscription));
		drop(previous);

		RouterInner::spawn_transition(&self.inner, Location::parse(&self.inner.adapter.location()));
	}

	/// Stops listening, tears down the current route and removes its view.
	/// In-flight transitions become superseded.
	pub async fn shutdown(&self) {
		let inner = self.inner.clone();

		let subscription = inner.adapter_subscription.take();
		drop(subscription);
		let links = inner.links.take();
		drop(links);

		inner.generation.set(inner.generation.get() + 1);
		inner.phase.set(TransitionPhase::TearingDown);
		inner.run_teardown().await;

		let displayed = inner.state.borrow_mut().displayed.take();
		if let Some((container, view)) = displayed {
			inner.dom.remove_child(&container, &view);
		}
		inner.phase.set(TransitionPhase::Idle);
		tracing::debug!("Router shut down");
	}

	/// Runs one transition to `location` to completion.
	///
	/// Adapter notifications run this on the spawner; calling it directly is
	/// useful when the caller wants the outcome.
	pub async fn handle_navigation(&self, location: &str) -> NavigationOutcome {
		RouterInner::transition(self.inner.clone(), Location::parse(location)).await
	}

	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.inner.push(path)
	}

	pub fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.inner.replace(path)
	}

	pub fn back(&self) {
		self.inner.back();
	}

	pub fn forward(&self) {
		self.inner.forward();
	}

	/// Finds a registered route by name or template.
	///
	/// A miss is logged and returns `None`.
	pub fn lookup(&self, filter: RouteFilter<'_>) -> Option<Rc<dyn Route<D::Node>>> {
		let found = self.inner.registry.lookup(filter).map(|entry| entry.route().clone());
		if found.is_none() {
			tracing::warn!(?filter, "Route not found");
		}
		found
	}

	/// Like [`lookup`](Self::lookup), returning the concrete route type.
	///
	/// A miss or a type mismatch is logged and returns `None`.
	pub fn lookup_as<T: Route<D::Node>>(&self, filter: RouteFilter<'_>) -> Option<Rc<T>> {
		let found = self.inner.registry.lookup_as::<T>(filter);
		if found.is_none() {
			tracing::warn!(
				?filter,
				expected = std::any::type_name::<T>(),
				"Route not found"
			);
		}
		found
	}

	/// Builds the path of a named route.
	pub fn reverse(&self, name: &str, params: &Params) -> Result<String, RouterError> {
		self.inner.reverse(name, params)
	}

	/// The anchor `href` for `path` under the configured adapter.
	pub fn href(&self, path: &str) -> String {
		self.inner.href(path)
	}

	pub fn current_route(&self) -> Option<Rc<dyn Route<D::Node>>> {
		self.inner
			.state
			.borrow()
			.current
			.as_ref()
			.map(|mounted| mounted.entry.route().clone())
	}

	/// The location the current route was mounted for.
	pub fn current_location(&self) -> Option<Location> {
		self.inner.current_location()
	}

	pub fn phase(&self) -> TransitionPhase {
		self.inner.phase.get()
	}

	/// A weak handle for routes and event handlers.
	pub fn handle(&self) -> RouterHandle {
		self.inner.handle()
	}

	pub fn registry(&self) -> &RouteRegistry<D::Node> {
		&self.inner.registry
	}

	pub fn adapter(&self) -> &Rc<dyn LocationAdapter> {
		&self.inner.adapter
	}
}

impl<D: Dom> RouterInner<D> {
	fn handle(&self) -> RouterHandle {
		let navigator: Weak<dyn Navigator> = self.this.clone();
		RouterHandle::new(navigator)
	}

	fn spawn_transition(inner: &Rc<Self>, location: Location) {
		let task = Self::transition(inner.clone(), location).map(|_| ());
		if let Err(err) = inner.spawner.spawn_local(task) {
			tracing::error!("Failed to spawn navigation: {}", err);
		}
	}

	fn is_current(&self, token: u64) -> bool {
		self.generation.get() == token
	}

	/// Ends a transition early. Only the newest transition may reset the
	/// phase.
	fn abort(&self, token: u64, outcome: NavigationOutcome) -> NavigationOutcome {
		if self.is_current(token) {
			self.phase.set(TransitionPhase::Idle);
		}
		outcome
	}

	async fn transition(self: Rc<Self>, location: Location) -> NavigationOutcome {
		let token = self.generation.get() + 1;
		self.generation.set(token);
		self.phase.set(TransitionPhase::Resolving);
		tracing::debug!(%location, token, "Transition started");

		let Some(container) = self.render_root.as_ref().and_then(|root| root()) else {
			tracing::warn!(%location, "Render container not found");
			return self.abort(token, NavigationOutcome::NoRenderRoot);
		};
		let Some(matched) = self.registry.resolve(location.path()) else {
			tracing::warn!(%location, "Route not found");
			return self.abort(token, NavigationOutcome::NotFound);
		};

		self.phase.set(TransitionPhase::TearingDown);
		self.run_teardown().await;
		if !self.is_current(token) {
			tracing::debug!(%location, token, "Transition superseded during teardown");
			return NavigationOutcome::Superseded;
		}

		self.phase.set(TransitionPhase::SettingUp);
		let entry = matched.entry;
		let ctx = NavigationContext::new(location.clone(), matched.params, self.handle());
		let route = entry.route().clone();
		self.mounting.borrow_mut().push((token, entry.clone()));
		let mounted = route.mount(&ctx).await;
		self.mounting.borrow_mut().retain(|(other, _)| *other != token);

		if !self.is_current(token) {
			tracing::debug!(%location, token, "Transition superseded during setup");
			// A newer transition may own the same route instance.
			if mounted.is_ok() && !self.is_in_use(&entry) {
				if let Err(err) = route.unmount().await {
					tracing::warn!(path = %entry.props().path, "Route unmount failed: {:#}", err);
				}
			}
			ctx.disposers().dispose();
			return NavigationOutcome::Superseded;
		}

		let view = match mounted {
			Ok(Some(view)) => view,
			Ok(None) => {
				tracing::warn!(path = %entry.props().path, "Route produced no view");
				ctx.disposers().dispose();
				self.update_active_links(None);
				return self.abort(token, NavigationOutcome::NoView);
			}
			Err(err) => {
				tracing::warn!(path = %entry.props().path, "Route setup failed: {:#}", err);
				ctx.disposers().dispose();
				self.update_active_links(None);
				return self.abort(token, NavigationOutcome::NoView);
			}
		};

		self.phase.set(TransitionPhase::Rendering);
		let previous = self.state.borrow_mut().displayed.take();
		if let Some((previous_container, previous_view)) = previous {
			self.dom.remove_child(&previous_container, &previous_view);
		}
		self.dom.append_child(&container, &view);

		let pattern = entry.pattern().as_str().to_string();
		{
			let mut state = self.state.borrow_mut();
			state.displayed = Some((container, view));
			state.current = Some(Mounted {
				entry,
				location,
				disposers: ctx.disposers().clone(),
			});
		}
		self.update_active_links(Some(&pattern));

		self.phase.set(TransitionPhase::Idle);
		tracing::debug!(pattern = %pattern, token, "Transition complete");
		NavigationOutcome::Rendered
	}

	/// Whether `entry` is mounted or being mounted by another transition.
	fn is_in_use(&self, entry: &Rc<RegisteredRoute<D::Node>>) -> bool {
		let mounted = self
			.state
			.borrow()
			.current
			.as_ref()
			.is_some_and(|current| Rc::ptr_eq(&current.entry, entry));
		mounted
			|| self
				.mounting
				.borrow()
				.iter()
				.any(|(_, pending)| Rc::ptr_eq(pending, entry))
	}

	/// Tears down the current route, or joins a teardown already running.
	async fn run_teardown(&self) {
		let teardown = {
			let mut state = self.state.borrow_mut();
			if let Some(mounted) = state.current.take() {
				let route = mounted.entry.route().clone();
				let disposers = mounted.disposers;
				let path = mounted.entry.props().path.clone();
				let future: LocalBoxFuture<'static, ()> = Box::pin(async move {
					if let Err(err) = route.unmount().await {
						tracing::warn!(path = %path, "Route unmount failed: {:#}", err);
					}
					disposers.dispose();
				});
				state.teardown = Some(future.shared());
			}
			state.teardown.clone()
		};

		let Some(teardown) = teardown else {
			return;
		};
		teardown.await;

		let mut state = self.state.borrow_mut();
		if state
			.teardown
			.as_ref()
			.is_some_and(|pending| pending.peek().is_some())
		{
			state.teardown = None;
		}
	}

	/// Marks the link for `pattern` active and clears every other link.
	fn update_active_links(&self, pattern: Option<&str>) {
		let links: Vec<(D::Node, bool)> = self
			.links
			.borrow()
			.iter()
			.map(|link| (link.node.clone(), Some(link.pattern.as_str()) == pattern))
			.collect();

		for (node, active) in links {
			self.dom.toggle_class(&node, &self.settings.active_class, active);
		}
	}

	fn render_navigation(&self) {
		let Some(navigation_root) = &self.navigation_root else {
			tracing::debug!("No navigation container configured");
			return;
		};
		let Some(render_link) = &self.render_link else {
			tracing::debug!("No link renderer configured");
			return;
		};
		let Some(container) = navigation_root() else {
			tracing::warn!("Navigation container not found");
			return;
		};

		self.dom.clear_children(&container);

		let mut rendered = Vec::new();
		for entry in self.registry.iter() {
			if !entry.pattern().is_static() || entry.props().hidden {
				continue;
			}

			let props = entry.props();
			let path = entry.pattern().as_str().to_string();
			let node = render_link(props);
			let anchor = self.dom.find_anchor(&node);

			let mut subscriptions = Vec::new();
			if let Some(anchor) = &anchor {
				self.dom.set_href(anchor, &self.adapter.create_href(&path));
				self.dom.set_text(anchor, props.link_text());
				subscriptions.push(self.dom.listen(
					anchor,
					DomEvent::Click,
					links::click_handler(self.handle(), path.clone()),
				));
				subscriptions.push(self.dom.listen(
					anchor,
					DomEvent::MouseEnter,
					links::hover_handler(self.handle(), entry.route().clone(), Hover::Enter),
				));
				subscriptions.push(self.dom.listen(
					anchor,
					DomEvent::MouseLeave,
					links::hover_handler(self.handle(), entry.route().clone(), Hover::Leave),
				));
			} else {
				tracing::warn!(path = %path, "Rendered link has no anchor");
			}

			self.dom.append_child(&container, &node);
			rendered.push(NavigationLink {
				pattern: path,
				node: anchor.unwrap_or(node),
				subscriptions,
			});
		}

		let previous = self.links.replace(rendered);
		drop(previous);

		let current = self
			.state
			.borrow()
			.current
			.as_ref()
			.map(|mounted| mounted.entry.pattern().as_str().to_string());
		self.update_active_links(current.as_deref());
	}
}

impl<D: Dom> Navigator for RouterInner<D> {
	fn push(&self, path: &str) -> Result<(), RouterError> {
		self.adapter.navigate(path, false)?;
		Ok(())
	}

	fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.adapter.navigate(path, true)?;
		Ok(())
	}

	fn back(&self) {
		self.adapter.back();
	}

	fn forward(&self) {
		self.adapter.forward();
	}

	fn href(&self, path: &str) -> String {
		self.adapter.create_href(path)
	}

	fn reverse(&self, name: &str, params: &Params) -> Result<String, RouterError> {
		match self.registry.reverse(name, params) {
			Some(result) => result.map_err(RouterError::Reverse),
			None => {
				tracing::warn!(name, "Route not found");
				Err(RouterError::InvalidRouteName(name.to_string()))
			}
		}
	}

	fn current_location(&self) -> Option<Location> {
		self.state
			.borrow()
			.current
			.as_ref()
			.map(|mounted| mounted.location.clone())
	}
}

impl<D: Dom> fmt::Debug for Router<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.borrow();
		f.debug_struct("Router")
			.field("phase", &self.inner.phase.get())
			.field(
				"current",
				&state
					.current
					.as_ref()
					.map(|mounted| mounted.entry.pattern().as_str()),
			)
			.field("registry", &self.inner.registry)
			.field("links", &self.inner.links.borrow().len())
			.finish()
	}
}

impl<N> fmt::Debug for NavigationLink<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationLink")
			.field("pattern", &self.pattern)
			.field("subscriptions", &self.subscriptions.len())
			.finish()
	}
}
