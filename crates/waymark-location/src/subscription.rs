//! Listener registration handles.

use std::fmt;

/// Handle returned by every `listen`-style registration.
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the
/// listener. [`Subscription::forget`] keeps the listener registered for the
/// lifetime of the page, the same trade-off as `Closure::forget`.
#[must_use = "dropping a Subscription removes the listener; call `forget` to keep it"]
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Creates a subscription that runs `cancel` when released.
	pub fn new(cancel: impl FnOnce() + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// A subscription with nothing to release.
	pub fn noop() -> Self {
		Self { cancel: None }
	}

	/// Removes the listener now.
	pub fn unsubscribe(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}

	/// Keeps the listener registered forever.
	pub fn forget(mut self) {
		if let Some(cancel) = self.cancel.take() {
			// The cancel closure may own the JS callback; leaking it keeps the
			// callback valid.
			std::mem::forget(cancel);
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}
