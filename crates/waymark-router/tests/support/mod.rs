//! Shared fixtures for the router integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawn;
use waymark_location::{LocationAdapter, MemoryAdapter};
use waymark_router::testing::{MemoryDom, NodeId};
use waymark_router::{
	Dom, NavigationContext, Route, RouteProps, RouteResult, Router, RouterConfig, RouterHandle,
	async_trait,
};

pub type Log = Rc<RefCell<Vec<String>>>;

/// Holds async hooks until the test opens it.
#[derive(Clone, Default)]
pub struct Gate {
	waiting: Rc<RefCell<Vec<oneshot::Sender<()>>>>,
}

impl Gate {
	pub async fn wait(&self) {
		let (sender, receiver) = oneshot::channel();
		self.waiting.borrow_mut().push(sender);
		let _ = receiver.await;
	}

	pub fn open(&self) {
		let senders: Vec<_> = self.waiting.borrow_mut().drain(..).collect();
		for sender in senders {
			let _ = sender.send(());
		}
	}

	pub fn waiting(&self) -> usize {
		self.waiting.borrow().len()
	}
}

#[derive(Clone, Default)]
pub enum Behavior {
	#[default]
	Plain,
	GatedSetup(Gate),
	GatedUnmount(Gate),
	NoView,
	FailingSetup,
}

/// A route that records its lifecycle into a shared log.
pub struct TestRoute {
	props: RouteProps,
	dom: MemoryDom,
	log: Log,
	behavior: Behavior,
}

impl TestRoute {
	fn record(&self, entry: String) {
		self.log.borrow_mut().push(entry);
	}
}

#[async_trait(?Send)]
impl Route<NodeId> for TestRoute {
	fn props(&self) -> &RouteProps {
		&self.props
	}

	async fn setup(&self, ctx: &NavigationContext) -> RouteResult {
		self.record(format!("setup:{}", self.props.path));

		let log = self.log.clone();
		let path = self.props.path.clone();
		ctx.disposers()
			.add(move || log.borrow_mut().push(format!("dispose:{}", path)));

		match &self.behavior {
			Behavior::GatedSetup(gate) => gate.wait().await,
			Behavior::FailingSetup => anyhow::bail!("setup failed"),
			_ => {}
		}
		Ok(())
	}

	fn render(&self, ctx: &NavigationContext) -> Option<NodeId> {
		if matches!(self.behavior, Behavior::NoView) {
			return None;
		}
		self.record(format!("render:{}", self.props.path));

		let mut params: Vec<String> = ctx
			.params()
			.iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect();
		params.sort();
		let mut query: Vec<String> = ctx
			.query()
			.iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect();
		query.sort();

		let text = format!(
			"{} [{}] [{}]",
			self.props.path,
			params.join(","),
			query.join(",")
		);
		Some(self.dom.create_text_element("section", &text))
	}

	async fn unmount(&self) -> RouteResult {
		if let Behavior::GatedUnmount(gate) = &self.behavior {
			gate.wait().await;
		}
		self.record(format!("unmount:{}", self.props.path));
		Ok(())
	}

	fn on_link_mouse_enter(&self, _router: &RouterHandle) -> RouteResult {
		self.record(format!("enter:{}", self.props.path));
		Ok(())
	}

	fn on_link_mouse_leave(&self, _router: &RouterHandle) -> RouteResult {
		anyhow::bail!("leave hook failed")
	}
}

/// DOM, containers and log shared by a router and its routes.
#[derive(Clone)]
pub struct Fixture {
	pub dom: MemoryDom,
	pub log: Log,
	pub app: NodeId,
	pub nav: NodeId,
}

impl Default for Fixture {
	fn default() -> Self {
		let dom = MemoryDom::new();
		let app = dom.create_element("main");
		let nav = dom.create_element("nav");
		Self {
			dom,
			log: Rc::new(RefCell::new(Vec::new())),
			app,
			nav,
		}
	}
}

impl Fixture {
	pub fn route(&self, props: RouteProps) -> TestRoute {
		self.route_with(props, Behavior::Plain)
	}

	pub fn route_with(&self, props: RouteProps, behavior: Behavior) -> TestRoute {
		TestRoute {
			props,
			dom: self.dom.clone(),
			log: self.log.clone(),
			behavior,
		}
	}

	/// A config with both containers and `<li><a/></li>` links.
	pub fn config(
		&self,
		adapter: Rc<dyn LocationAdapter>,
		spawner: Rc<dyn LocalSpawn>,
	) -> RouterConfig<MemoryDom> {
		let app = self.app;
		let nav = self.nav;
		let dom = self.dom.clone();
		RouterConfig::new(self.dom.clone(), adapter, spawner)
			.render_root(move || Some(app))
			.navigation_root(move || Some(nav))
			.render_link(move |_props| {
				let item = dom.create_element("li");
				let anchor = dom.create_element("a");
				dom.append_child(&item, &anchor);
				item
			})
	}

	pub fn entries(&self) -> Vec<String> {
		self.log.borrow().clone()
	}

	pub fn count(&self, entry: &str) -> usize {
		self.log.borrow().iter().filter(|e| e.as_str() == entry).count()
	}

	pub fn clear_log(&self) {
		self.log.borrow_mut().clear();
	}

	/// Text of every view in the render container.
	pub fn views(&self) -> Vec<String> {
		self.dom
			.children(self.app)
			.into_iter()
			.map(|node| self.dom.text(node))
			.collect()
	}

	/// Anchors rendered in the navigation container.
	pub fn anchors(&self) -> Vec<NodeId> {
		self.dom
			.children(self.nav)
			.into_iter()
			.filter_map(|item| self.dom.find_anchor(&item))
			.collect()
	}

	pub fn anchor(&self, href: &str) -> NodeId {
		self.anchors()
			.into_iter()
			.find(|anchor| self.dom.href(*anchor).as_deref() == Some(href))
			.unwrap_or_else(|| panic!("no link with href {}", href))
	}
}

/// A started router over a [`MemoryAdapter`] with the standard routes.
pub struct Harness {
	pub pool: LocalPool,
	pub fixture: Fixture,
	pub adapter: MemoryAdapter,
	pub router: Router<MemoryDom>,
	pub slow_setup: Gate,
	pub slow_unmount: Gate,
}

impl Harness {
	pub fn new() -> Self {
		Self::at("/")
	}

	pub fn at(initial_path: &str) -> Self {
		let pool = LocalPool::new();
		let fixture = Fixture::default();
		let adapter = MemoryAdapter::new(initial_path);
		let slow_setup = Gate::default();
		let slow_unmount = Gate::default();

		let config = fixture
			.config(Rc::new(adapter.clone()), Rc::new(pool.spawner()))
			.route(fixture.route(RouteProps::new("/").name("home")))
			.route(fixture.route(RouteProps::new("/about").label("About").name("about")))
			.route(fixture.route(RouteProps::new("/posts").label("Posts")))
			.route(fixture.route(RouteProps::new("/blog/:id").name("blog")))
			.route(fixture.route(RouteProps::new("/users/:id").name("user")))
			.route(fixture.route(RouteProps::new("/users/new")))
			.route(fixture.route_with(
				RouteProps::new("/slow"),
				Behavior::GatedSetup(slow_setup.clone()),
			))
			.route(fixture.route_with(
				RouteProps::new("/sticky"),
				Behavior::GatedUnmount(slow_unmount.clone()),
			))
			.route(fixture.route_with(RouteProps::new("/empty"), Behavior::NoView))
			.route(fixture.route_with(RouteProps::new("/broken"), Behavior::FailingSetup));

		let router = Router::new(config).expect("standard routes register");

		Self {
			pool,
			fixture,
			adapter,
			router,
			slow_setup,
			slow_unmount,
		}
	}

	/// Starts the router and runs the initial transition.
	pub fn started() -> Self {
		let mut harness = Self::new();
		harness.router.start();
		harness.settle();
		harness
	}

	pub fn settle(&mut self) {
		self.pool.run_until_stalled();
	}

	pub fn push(&mut self, path: &str) {
		self.router.push(path).expect("push succeeds");
		self.settle();
	}

	pub fn current_path(&self) -> Option<String> {
		self.router
			.current_route()
			.map(|route| route.props().path.clone())
	}
}
