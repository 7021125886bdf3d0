//! Integration tests for file-based settings
//!
//! Settings are written to a temporary directory, loaded, and used to build
//! a running router:
//! 1. Loading and format errors
//! 2. A router configured entirely from a file

use std::io::Write;
use std::rc::Rc;

use futures::executor::LocalPool;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use waymark::prelude::*;
use waymark::router::testing::{MemoryDom, NodeId, SimulatedWindow};

#[fixture]
fn dir() -> TempDir {
	tempfile::tempdir().unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
	let path = dir.path().join(name);
	let mut file = std::fs::File::create(&path).unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	path
}

struct Page {
	props: RouteProps,
	dom: MemoryDom,
}

#[async_trait(?Send)]
impl Route<NodeId> for Page {
	fn props(&self) -> &RouteProps {
		&self.props
	}

	fn render(&self, ctx: &NavigationContext) -> Option<NodeId> {
		Some(self.dom.create_text_element("section", &ctx.location().to_string()))
	}
}

// ============================================================================
// Loading
// ============================================================================

#[rstest]
fn test_from_file(dir: TempDir) {
	// Arrange
	let path = write(
		&dir,
		"waymark.toml",
		r#"
		[router]
		active_class = "current"

		[adapter]
		kind = "history"
		base = "/app"
		require_navigation_api = true
		"#,
	);

	// Act
	let settings = Settings::from_file(&path).unwrap();

	// Assert
	assert_eq!(settings.router.active_class, "current");
	assert_eq!(settings.adapter.kind, AdapterKind::History);
	assert_eq!(settings.adapter.base, "/app");
	assert!(settings.adapter.require_navigation_api);
}

#[rstest]
fn test_missing_file(dir: TempDir) {
	let result = Settings::from_file(dir.path().join("absent.toml"));

	assert!(matches!(result, Err(SettingsError::FileError(_))));
}

#[rstest]
fn test_unsupported_extension(dir: TempDir) {
	let path = write(&dir, "waymark.json", "{}");

	let result = Settings::from_file(&path);

	assert!(matches!(result, Err(SettingsError::UnsupportedFormat(_))));
}

#[rstest]
fn test_malformed_file(dir: TempDir) {
	let path = write(&dir, "waymark.toml", "[adapter\nkind = ");

	let result = Settings::from_file(&path);

	assert!(matches!(result, Err(SettingsError::ParseError(_))));
}

// ============================================================================
// Router from settings
// ============================================================================

#[rstest]
fn test_router_built_from_settings_file(dir: TempDir) {
	// Arrange
	let path = write(
		&dir,
		"waymark.toml",
		r#"
		[router]
		active_class = "current"

		[adapter]
		kind = "hash"
		"#,
	);
	let settings = Settings::from_file(&path).unwrap();
	let window = SimulatedWindow::new("https://app.test/#/docs?page=2");
	let adapter = settings.build_adapter(Some(Rc::new(window))).unwrap();

	let mut pool = LocalPool::new();
	let dom = MemoryDom::new();
	let app = dom.create_element("main");
	let nav = dom.create_element("nav");
	let link_dom = dom.clone();
	let config = RouterConfig::new(dom.clone(), adapter, Rc::new(pool.spawner()))
		.settings(settings.router_settings())
		.render_root(move || Some(app))
		.navigation_root(move || Some(nav))
		.render_link(move |_props| link_dom.create_element("a"))
		.route(Page {
			props: RouteProps::new("/"),
			dom: dom.clone(),
		})
		.route(Page {
			props: RouteProps::new("/docs").label("Docs"),
			dom: dom.clone(),
		});
	let router = Router::new(config).unwrap();

	// Act
	router.start();
	pool.run_until_stalled();

	// Assert
	let views: Vec<String> = dom.children(app).into_iter().map(|node| dom.text(node)).collect();
	assert_eq!(views, vec!["/docs?page=2"]);

	let links = dom.children(nav);
	assert_eq!(links.len(), 2);
	assert_eq!(dom.href(links[1]).as_deref(), Some("#/docs"));
	assert!(dom.has_class(links[1], "current"));
	assert!(!dom.has_class(links[0], "current"));
}
