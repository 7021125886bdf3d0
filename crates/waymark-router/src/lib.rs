//! Route registry and navigation controller for the waymark client-side
//! router.
//!
//! ## Overview
//!
//! - [`RouteRegistry`]: routes in registration order, resolved first-match-wins
//! - [`Router`]: listens to a [`LocationAdapter`], resolves each new location,
//!   tears down the previous route, mounts the next and swaps its view into
//!   the render container
//! - [`Route`]: the lifecycle a page implements (`setup`/`render` or `mount`,
//!   `unmount`, link hover hooks)
//! - [`Dom`]: the handful of DOM operations the router performs, implemented
//!   by `web::WebDom` on wasm32 and `testing::MemoryDom` for tests
//!
//! ## Transitions
//!
//! Every location change is a transition. Teardown of the mounted route
//! (its `unmount`, then its [`Disposers`]) completes before the next route's
//! setup starts. When a new location arrives while a transition is still
//! setting up, the new one wins; the late view is dropped and the disposers
//! it registered are run.
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use waymark_router::{Router, RouterConfig};
//! use waymark_router::web::{WebDom, WebSpawner, element_by_id};
//!
//! let config = RouterConfig::new(WebDom, adapter, Rc::new(WebSpawner))
//! 	.route(HomeRoute::new())
//! 	.route(PostsRoute::new())
//! 	.render_root(|| element_by_id("app"))
//! 	.navigation_root(|| element_by_id("nav"))
//! 	.render_link(render_nav_item);
//!
//! let router = Router::new(config)?;
//! router.start();
//! ```

mod config;
mod context;
mod disposers;
mod dom;
mod error;
mod links;
mod registry;
mod route;
mod router;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use async_trait::async_trait;
pub use config::{RouterConfig, RouterSettings};
pub use context::{NavigationContext, RouterHandle};
pub use disposers::Disposers;
pub use dom::{Dom, DomEvent, Modifiers, PointerEvent, PointerHandler};
pub use error::{RegistryError, RouterError};
pub use registry::{RegisteredRoute, RouteFilter, RouteMatch, RouteRegistry};
pub use route::{Route, RouteProps, RouteResult};
pub use router::{NavigationOutcome, Router, TransitionPhase};

pub use waymark_location::{Location, LocationAdapter, Subscription};
pub use waymark_pattern::Params;
