//! Per-transition cleanup callbacks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future::AbortHandle;

/// Cleanup registered by a route during one transition.
///
/// The router runs the set once: after the route's `unmount` when the next
/// transition tears it down, or immediately when the transition that created
/// it is superseded or produces no view. Callbacks run in reverse
/// registration order. Clones share the same set.
#[derive(Clone, Default)]
pub struct Disposers {
	callbacks: Rc<RefCell<Vec<Box<dyn FnOnce()>>>>,
}

impl Disposers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&self, dispose: impl FnOnce() + 'static) {
		self.callbacks.borrow_mut().push(Box::new(dispose));
	}

	/// Aborts `handle` on disposal.
	pub fn add_abort(&self, handle: AbortHandle) {
		self.add(move || handle.abort());
	}

	pub fn len(&self) -> usize {
		self.callbacks.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.callbacks.borrow().is_empty()
	}

	/// Runs and clears every callback.
	pub fn dispose(&self) {
		// Callbacks may register more disposers; take the list first.
		let callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
		for dispose in callbacks.into_iter().rev() {
			dispose();
		}
	}
}

impl fmt::Debug for Disposers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Disposers")
			.field("pending", &self.len())
			.finish()
	}
}
