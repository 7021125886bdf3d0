//! Location adapters for the waymark client-side router.
//!
//! An adapter answers three questions for one navigation backend: where the
//! application currently is, how to move somewhere else, and how to hear
//! about moves the application did not make itself. Three backends ship:
//!
//! - [`HashAdapter`]: the location lives in the URL fragment (`#/about`)
//! - [`MemoryAdapter`]: an in-process history stack for embedded and headless use
//! - [`NavigationAdapter`]: real paths, driven by the Navigation API when
//!   available and by `popstate` otherwise
//!
//! Browser-backed adapters never reach for globals. They receive the platform
//! through [`BrowserWindow`], implemented over `web-sys` by
//! [`web::WebWindow`] on wasm32 and by [`testing::SimulatedWindow`] for tests.
//!
//! ## Example
//!
//! ```
//! use waymark_location::{LocationAdapter, MemoryAdapter};
//!
//! let adapter = MemoryAdapter::new("/");
//! adapter.navigate("/about", false).unwrap();
//! adapter.back();
//! assert_eq!(adapter.location(), "/");
//! ```

mod adapter;
mod browser;
mod error;
mod hash;
mod location;
mod memory;
mod navigation;
mod subscription;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use adapter::{LocationAdapter, LocationCallback};
pub use browser::{BrowserWindow, HistoryMode, NavigateEvent, NavigationApi, WindowEvent};
pub use error::LocationError;
pub use hash::HashAdapter;
pub use location::Location;
pub use memory::MemoryAdapter;
pub use navigation::{NavigationAdapter, NavigationAdapterOptions};
pub use subscription::Subscription;

/// Prefixes `/` when the path does not already start with one.
pub(crate) fn ensure_leading_slash(path: &str) -> String {
	if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	}
}
