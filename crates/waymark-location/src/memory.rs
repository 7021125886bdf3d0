//! In-process history stack.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{LocationAdapter, LocationCallback, LocationError, Subscription};

/// An adapter backed by an in-memory history stack.
///
/// Clones share the same stack and listeners. Listeners run synchronously
/// inside [`navigate`](LocationAdapter::navigate) and
/// [`go`](LocationAdapter::go).
#[derive(Clone)]
pub struct MemoryAdapter {
	inner: Rc<MemoryInner>,
}

struct MemoryInner {
	history: RefCell<MemoryHistory>,
	listeners: RefCell<Vec<(u64, LocationCallback)>>,
	next_listener_id: Cell<u64>,
}

struct MemoryHistory {
	entries: Vec<String>,
	index: usize,
}

impl MemoryAdapter {
	/// Creates a stack holding the single entry `initial_path`.
	pub fn new(initial_path: &str) -> Self {
		Self {
			inner: Rc::new(MemoryInner {
				history: RefCell::new(MemoryHistory {
					entries: vec![crate::ensure_leading_slash(initial_path)],
					index: 0,
				}),
				listeners: RefCell::new(Vec::new()),
				next_listener_id: Cell::new(0),
			}),
		}
	}

	/// Number of entries in the stack.
	pub fn len(&self) -> usize {
		self.inner.history.borrow().entries.len()
	}

	/// Always false: the stack holds at least the initial entry.
	pub fn is_empty(&self) -> bool {
		self.inner.history.borrow().entries.is_empty()
	}

	/// Position of the current entry.
	pub fn index(&self) -> usize {
		self.inner.history.borrow().index
	}

	fn notify(&self) {
		let location = self.location();
		// Listeners may navigate again; release the borrow before calling out.
		let listeners: Vec<LocationCallback> = self
			.inner
			.listeners
			.borrow()
			.iter()
			.map(|(_, callback)| callback.clone())
			.collect();

		for listener in listeners {
			listener(&location);
		}
	}
}

impl Default for MemoryAdapter {
	fn default() -> Self {
		Self::new("/")
	}
}

impl LocationAdapter for MemoryAdapter {
	fn location(&self) -> String {
		let history = self.inner.history.borrow();
		history.entries[history.index].clone()
	}

	fn listen(&self, callback: LocationCallback) -> Subscription {
		let id = self.inner.next_listener_id.get();
		self.inner.next_listener_id.set(id + 1);
		self.inner.listeners.borrow_mut().push((id, callback));

		let inner: Weak<MemoryInner> = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = inner.upgrade() {
				inner.listeners.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}

	fn navigate(&self, path: &str, replace: bool) -> Result<(), LocationError> {
		let path = crate::ensure_leading_slash(path);
		{
			let mut history = self.inner.history.borrow_mut();
			let index = history.index;
			if replace {
				history.entries[index] = path;
			} else {
				history.entries.truncate(index + 1);
				history.entries.push(path);
				history.index = index + 1;
			}
		}

		self.notify();
		Ok(())
	}

	fn go(&self, delta: i32) {
		if delta == 0 {
			return;
		}

		{
			let mut history = self.inner.history.borrow_mut();
			let target = history.index as i64 + i64::from(delta);
			if target < 0 || target >= history.entries.len() as i64 {
				tracing::debug!(delta, index = history.index, "Ignoring out-of-range history move");
				return;
			}
			history.index = target as usize;
		}

		self.notify();
	}

	fn create_href(&self, path: &str) -> String {
		path.to_string()
	}
}

impl fmt::Debug for MemoryAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let history = self.inner.history.borrow();
		f.debug_struct("MemoryAdapter")
			.field("entries", &history.entries)
			.field("index", &history.index)
			.field("listeners", &self.inner.listeners.borrow().len())
			.finish()
	}
}
