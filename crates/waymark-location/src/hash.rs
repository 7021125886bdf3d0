//! Fragment-based adapter.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::{BrowserWindow, LocationAdapter, LocationCallback, LocationError, Subscription, WindowEvent};

/// Keeps the application location in the URL fragment: `https://host/#/about`.
///
/// Works on any static host since the server only ever sees `/`.
pub struct HashAdapter {
	window: Rc<dyn BrowserWindow>,
}

impl HashAdapter {
	pub fn new(window: Rc<dyn BrowserWindow>) -> Self {
		Self { window }
	}
}

fn location_of(window: &dyn BrowserWindow) -> String {
	let hash = window.hash();
	let fragment = hash.strip_prefix('#').unwrap_or(hash.as_str());
	crate::ensure_leading_slash(fragment)
}

impl LocationAdapter for HashAdapter {
	fn location(&self) -> String {
		location_of(self.window.as_ref())
	}

	fn listen(&self, callback: LocationCallback) -> Subscription {
		// The window owns the listener; a strong reference back would leak both.
		let window: Weak<dyn BrowserWindow> = Rc::downgrade(&self.window);
		self.window.add_listener(
			WindowEvent::HashChange,
			Rc::new(move || {
				if let Some(window) = window.upgrade() {
					callback(&location_of(window.as_ref()));
				}
			}),
		)
	}

	fn navigate(&self, path: &str, replace: bool) -> Result<(), LocationError> {
		if replace {
			let href = self.window.href();
			let document = href.split('#').next().unwrap_or_default();
			self.window
				.replace_href(&format!("{}{}", document, self.create_href(path)))
		} else {
			self.window.set_hash(path)
		}
	}

	fn go(&self, delta: i32) {
		if let Err(err) = self.window.history_go(delta) {
			tracing::warn!(delta, "history.go failed: {}", err);
		}
	}

	fn create_href(&self, path: &str) -> String {
		format!("#{}", path)
	}
}

impl fmt::Debug for HashAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HashAdapter")
			.field("location", &self.location())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::SimulatedWindow;
	use rstest::{fixture, rstest};
	use std::cell::RefCell;

	#[fixture]
	fn window() -> SimulatedWindow {
		SimulatedWindow::new("https://app.test/")
	}

	fn adapter(window: &SimulatedWindow) -> HashAdapter {
		HashAdapter::new(Rc::new(window.clone()))
	}

	#[rstest]
	#[case("https://app.test/", "/")]
	#[case("https://app.test/#/about", "/about")]
	#[case("https://app.test/#about", "/about")]
	#[case("https://app.test/#/search?q=1", "/search?q=1")]
	fn test_location_reads_fragment(#[case] url: &str, #[case] expected: &str) {
		let window = SimulatedWindow::new(url);
		assert_eq!(adapter(&window).location(), expected);
	}

	#[rstest]
	fn test_push_assigns_hash_and_notifies(window: SimulatedWindow) {
		// Arrange
		let adapter = adapter(&window);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let _subscription = adapter.listen(Rc::new(move |location: &str| {
			sink.borrow_mut().push(location.to_string());
		}));

		// Act
		adapter.navigate("/about", false).unwrap();

		// Assert
		assert_eq!(window.href(), "https://app.test/#/about");
		assert_eq!(window.history_len(), 2);
		assert_eq!(*seen.borrow(), vec!["/about"]);
	}

	#[rstest]
	fn test_replace_keeps_history_length(window: SimulatedWindow) {
		let adapter = adapter(&window);
		adapter.navigate("/a", false).unwrap();

		adapter.navigate("/b", true).unwrap();

		assert_eq!(adapter.location(), "/b");
		assert_eq!(window.history_len(), 2);
		adapter.back();
		assert_eq!(adapter.location(), "/");
	}

	#[rstest]
	fn test_back_and_forward(window: SimulatedWindow) {
		let adapter = adapter(&window);
		adapter.navigate("/a", false).unwrap();
		adapter.navigate("/b", false).unwrap();

		adapter.back();
		assert_eq!(adapter.location(), "/a");

		adapter.forward();
		assert_eq!(adapter.location(), "/b");
	}

	#[rstest]
	fn test_create_href_prefixes_hash(window: SimulatedWindow) {
		assert_eq!(adapter(&window).create_href("/blog/1"), "#/blog/1");
	}
}
