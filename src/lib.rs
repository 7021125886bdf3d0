//! # Waymark
//!
//! A client-side router for single-page applications.
//!
//! Waymark maps a location (path, query, fragment) to a registered route,
//! mounts the route's view into a host container, and keeps the navigation
//! links in sync with the current location. One [`LocationAdapter`] abstracts
//! over where the location lives:
//!
//! - [`HashAdapter`]: the URL fragment (`#/posts`)
//! - [`MemoryAdapter`]: an in-process history, for embedding and tests
//! - [`NavigationAdapter`]: real paths through the Navigation API, falling
//!   back to `pushState`/`popstate`
//!
//! ## Crates
//!
//! - [`pattern`]: path templates (`/blog/:id`) and matching
//! - [`location`]: adapters and the browser abstraction behind them
//! - [`router`]: route registry, lifecycle and the navigation controller
//! - [`settings`]: TOML settings that choose and configure an adapter
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//!
//! use futures::executor::LocalPool;
//! use waymark::prelude::*;
//! use waymark::router::testing::{MemoryDom, NodeId};
//!
//! struct Home {
//! 	props: RouteProps,
//! 	dom: MemoryDom,
//! }
//!
//! #[async_trait(?Send)]
//! impl Route<NodeId> for Home {
//! 	fn props(&self) -> &RouteProps {
//! 		&self.props
//! 	}
//!
//! 	fn render(&self, ctx: &NavigationContext) -> Option<NodeId> {
//! 		Some(self.dom.create_text_element("h1", ctx.location().path()))
//! 	}
//! }
//!
//! let mut pool = LocalPool::new();
//! let dom = MemoryDom::new();
//! let app = dom.create_element("main");
//!
//! let settings = Settings::from_toml_str("[adapter]\nkind = \"memory\"").unwrap();
//! let adapter = settings.build_adapter(None).unwrap();
//!
//! let config = RouterConfig::new(dom.clone(), adapter, Rc::new(pool.spawner()))
//! 	.settings(settings.router_settings())
//! 	.render_root(move || Some(app))
//! 	.route(Home {
//! 		props: RouteProps::new("/").name("home"),
//! 		dom: dom.clone(),
//! 	});
//! let router = Router::new(config).unwrap();
//!
//! router.start();
//! pool.run_until_stalled();
//!
//! assert_eq!(dom.children(app).len(), 1);
//! ```

pub mod settings;

pub use waymark_location as location;
pub use waymark_pattern as pattern;
pub use waymark_router as router;

pub use settings::{Settings, SettingsError};
pub use waymark_location::{
	HashAdapter, Location, LocationAdapter, LocationError, MemoryAdapter, NavigationAdapter,
	NavigationAdapterOptions,
};
pub use waymark_pattern::{Params, PathPattern, PatternError};
pub use waymark_router::{
	NavigationContext, NavigationOutcome, Route, RouteProps, RouteResult, Router, RouterConfig,
	RouterError, RouterHandle, RouterSettings,
};

/// Commonly used types
pub mod prelude {
	pub use crate::settings::{AdapterKind, Settings, SettingsError};
	pub use waymark_location::{Location, LocationAdapter};
	pub use waymark_pattern::Params;
	pub use waymark_router::{
		Disposers, Dom, NavigationContext, NavigationOutcome, Route, RouteFilter, RouteProps,
		RouteResult, Router, RouterConfig, RouterError, RouterHandle, RouterSettings,
		async_trait,
	};
}
