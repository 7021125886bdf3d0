//! Platform seams for browser-backed adapters.
//!
//! [`HashAdapter`](crate::HashAdapter) and
//! [`NavigationAdapter`](crate::NavigationAdapter) talk to the browser only
//! through these traits. On wasm32 they are implemented over `web-sys`
//! (see [`web`](crate::web)); headless tests use the simulators in
//! [`testing`](crate::testing).

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::{LocationError, Subscription};

/// Window events the adapters listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
	HashChange,
	PopState,
}

impl WindowEvent {
	/// The DOM event type name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::HashChange => "hashchange",
			Self::PopState => "popstate",
		}
	}
}

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
	Push,
	Replace,
}

/// The subset of `window` the adapters use.
pub trait BrowserWindow {
	/// `location.href`.
	fn href(&self) -> String;

	/// `location.pathname`.
	fn pathname(&self) -> String;

	/// `location.search`, including the leading `?` when present.
	fn search(&self) -> String;

	/// `location.hash`, including the leading `#` when present.
	fn hash(&self) -> String;

	/// Assigns `location.hash`, pushing a history entry.
	fn set_hash(&self, hash: &str) -> Result<(), LocationError>;

	/// `location.replace(href)`.
	fn replace_href(&self, href: &str) -> Result<(), LocationError>;

	/// `history.go(delta)`.
	fn history_go(&self, delta: i32) -> Result<(), LocationError>;

	/// `history.pushState(null, "", url)`.
	fn push_state(&self, url: &str) -> Result<(), LocationError>;

	/// `history.replaceState(null, "", url)`.
	fn replace_state(&self, url: &str) -> Result<(), LocationError>;

	/// Dispatches a synthetic `popstate` event on the window.
	fn dispatch_pop_state(&self) -> Result<(), LocationError>;

	fn add_listener(&self, event: WindowEvent, listener: Rc<dyn Fn()>) -> Subscription;

	/// `window.navigation`, when the platform implements the Navigation API.
	fn navigation(&self) -> Option<Rc<dyn NavigationApi>>;
}

/// The subset of the Navigation API the adapters use.
pub trait NavigationApi {
	fn navigate(&self, url: &str, mode: HistoryMode) -> Result<(), LocationError>;

	fn back(&self) -> Result<(), LocationError>;

	fn forward(&self) -> Result<(), LocationError>;

	/// Registers a `navigate` event handler.
	fn on_navigate(&self, handler: Rc<dyn Fn(&dyn NavigateEvent)>) -> Subscription;
}

/// A `NavigateEvent` as seen by a handler.
pub trait NavigateEvent {
	fn can_intercept(&self) -> bool;

	fn is_hash_change(&self) -> bool;

	/// Whether the navigation is a download request.
	fn is_download(&self) -> bool;

	/// The absolute destination URL.
	fn destination_url(&self) -> String;

	/// Converts the navigation into a same-document one completed by
	/// `handler`.
	fn intercept(&self, handler: LocalBoxFuture<'static, ()>);
}
