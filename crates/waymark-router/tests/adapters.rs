//! Integration tests for the router over browser-backed adapters
//!
//! The router runs against simulated windows so that every path through the
//! adapters (hash changes, popstate, Navigation API interception) ends in a
//! transition:
//! 1. Hash adapter
//! 2. History fallback with a base path
//! 3. Navigation API interception

mod support;

use std::rc::Rc;

use futures::executor::LocalPool;
use rstest::rstest;
use support::Fixture;
use waymark_location::{
	BrowserWindow, HashAdapter, LocationAdapter, NavigationAdapter, NavigationAdapterOptions,
};
use waymark_router::testing::{MemoryDom, SimulatedNavigateEvent, SimulatedNavigation, SimulatedWindow};
use waymark_router::{Modifiers, RouteProps, Router};

struct App {
	pool: LocalPool,
	fixture: Fixture,
	window: SimulatedWindow,
	router: Router<MemoryDom>,
}

impl App {
	fn new(window: SimulatedWindow, adapter: Rc<dyn LocationAdapter>) -> Self {
		let pool = LocalPool::new();
		let fixture = Fixture::default();
		let config = fixture
			.config(adapter, Rc::new(pool.spawner()))
			.route(fixture.route(RouteProps::new("/").name("home")))
			.route(fixture.route(RouteProps::new("/about").label("About")))
			.route(fixture.route(RouteProps::new("/posts/:slug")));
		let router = Router::new(config).unwrap();

		let mut app = Self {
			pool,
			fixture,
			window,
			router,
		};
		app.router.start();
		app.settle();
		app
	}

	fn hash(url: &str) -> Self {
		let window = SimulatedWindow::new(url);
		let adapter = Rc::new(HashAdapter::new(Rc::new(window.clone())));
		Self::new(window, adapter)
	}

	fn history(url: &str, base: &str) -> Self {
		let window = SimulatedWindow::new(url);
		let adapter = NavigationAdapter::new(
			Rc::new(window.clone()),
			NavigationAdapterOptions::new().base(base),
		)
		.unwrap();
		Self::new(window, Rc::new(adapter))
	}

	fn navigation_api(url: &str) -> (Self, SimulatedNavigation) {
		let (window, navigation) = SimulatedWindow::with_navigation_api(url);
		let adapter = NavigationAdapter::new(
			Rc::new(window.clone()),
			NavigationAdapterOptions::new().require_navigation_api(true),
		)
		.unwrap();
		(Self::new(window, Rc::new(adapter)), navigation)
	}

	fn settle(&mut self) {
		self.pool.run_until_stalled();
	}
}

// ============================================================================
// Hash adapter
// ============================================================================

#[rstest]
fn test_hash_initial_location_from_fragment() {
	let app = App::hash("https://app.test/#/about");

	assert_eq!(app.fixture.views(), vec!["/about [] []"]);
}

#[rstest]
fn test_hash_links_use_fragment_hrefs() {
	let app = App::hash("https://app.test/");

	assert_eq!(app.fixture.dom.text(app.fixture.anchor("#/about")), "About");
	assert_eq!(app.router.href("/posts/x"), "#/posts/x");
}

#[rstest]
fn test_hash_link_click_and_history_back() {
	// Arrange
	let mut app = App::hash("https://app.test/");
	let about = app.fixture.anchor("#/about");

	// Act
	assert!(app.fixture.dom.click(about, Modifiers::NONE));
	app.settle();
	let after_click = app.fixture.views();
	app.window.history_go(-1).unwrap();
	app.settle();

	// Assert
	assert_eq!(after_click, vec!["/about [] []"]);
	assert_eq!(app.window.hash(), "");
	assert_eq!(app.fixture.views(), vec!["/ [] []"]);
}

#[rstest]
fn test_hash_replace_keeps_history_length() {
	let mut app = App::hash("https://app.test/#/about");
	let before = app.window.history_len();

	app.router.replace("/posts/first?draft=1").unwrap();
	app.settle();

	assert_eq!(app.window.history_len(), before);
	assert_eq!(
		app.fixture.views(),
		vec!["/posts/:slug [slug=first] [draft=1]"]
	);
}

// ============================================================================
// History fallback
// ============================================================================

#[rstest]
fn test_history_base_is_stripped_and_prefixed() {
	// Arrange
	let mut app = App::history("https://app.test/app/about", "/app");

	// Act
	app.router.push("/posts/hello").unwrap();
	app.settle();

	// Assert
	assert_eq!(app.fixture.anchors().len(), 2);
	assert_eq!(app.fixture.dom.text(app.fixture.anchor("/app/about")), "About");
	assert_eq!(app.window.pathname(), "/app/posts/hello");
	assert_eq!(app.fixture.views(), vec!["/posts/:slug [slug=hello] []"]);
}

#[rstest]
fn test_history_back_fires_popstate_transition() {
	let mut app = App::history("https://app.test/", "");
	app.router.push("/about").unwrap();
	app.settle();

	app.router.back();
	app.settle();

	assert_eq!(app.fixture.views(), vec!["/ [] []"]);
	assert_eq!(app.router.current_location().unwrap().path(), "/");
}

// ============================================================================
// Navigation API
// ============================================================================

#[rstest]
fn test_navigation_api_push_runs_after_interception() {
	// Arrange
	let (mut app, navigation) = App::navigation_api("https://app.test/");

	// Act
	app.router.push("/about").unwrap();
	app.settle();
	let before_flush = app.fixture.views();
	navigation.flush();
	app.settle();

	// Assert
	assert_eq!(before_flush, vec!["/ [] []"]);
	assert_eq!(app.window.pathname(), "/about");
	assert_eq!(app.fixture.views(), vec!["/about [] []"]);
}

#[rstest]
fn test_navigation_api_intercepts_user_navigation() {
	let (mut app, navigation) = App::navigation_api("https://app.test/");

	let intercepted =
		navigation.dispatch(SimulatedNavigateEvent::new("https://app.test/posts/news?page=2"));
	navigation.flush();
	app.settle();

	assert!(intercepted);
	assert_eq!(
		app.fixture.views(),
		vec!["/posts/:slug [slug=news] [page=2]"]
	);
}

#[rstest]
#[case::download(SimulatedNavigateEvent::new("https://app.test/about").download(true))]
#[case::cross_document(SimulatedNavigateEvent::new("https://other.test/about").can_intercept(false))]
fn test_navigation_api_leaves_uninterceptable_events(#[case] event: SimulatedNavigateEvent) {
	let (mut app, navigation) = App::navigation_api("https://app.test/");

	let intercepted = navigation.dispatch(event);
	navigation.flush();
	app.settle();

	assert!(!intercepted);
	assert_eq!(app.fixture.views(), vec!["/ [] []"]);
}

#[rstest]
fn test_navigation_api_back_and_forward() {
	// Arrange
	let (mut app, navigation) = App::navigation_api("https://app.test/");
	app.router.push("/about").unwrap();
	navigation.flush();
	app.settle();

	// Act
	app.router.back();
	navigation.flush();
	app.settle();
	let after_back = app.fixture.views();
	app.router.forward();
	navigation.flush();
	app.settle();

	// Assert
	assert_eq!(after_back, vec!["/ [] []"]);
	assert_eq!(app.fixture.views(), vec!["/about [] []"]);
}
