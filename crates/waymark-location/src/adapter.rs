//! The location adapter contract.

use std::rc::Rc;

use crate::{LocationError, Subscription};

/// Callback invoked with the new location string after an external move.
pub type LocationCallback = Rc<dyn Fn(&str)>;

/// A navigation backend.
///
/// Locations are strings of the form `path[?query][#hash]` and always start
/// with `/`. Adapters are single-threaded; the router holds them behind
/// `Rc<dyn LocationAdapter>`.
pub trait LocationAdapter {
	/// The current location.
	fn location(&self) -> String;

	/// Registers `callback` for location changes.
	///
	/// Dropping the returned [`Subscription`] removes the callback.
	fn listen(&self, callback: LocationCallback) -> Subscription;

	/// Moves to `path`, replacing the current history entry when `replace`
	/// is set.
	fn navigate(&self, path: &str, replace: bool) -> Result<(), LocationError>;

	/// Moves through history by `delta` entries. Out-of-range moves are
	/// ignored.
	fn go(&self, delta: i32);

	/// The `href` an anchor needs to reach `path` through this adapter.
	fn create_href(&self, path: &str) -> String;

	fn back(&self) {
		self.go(-1);
	}

	fn forward(&self) {
		self.go(1);
	}
}
