use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;

use super::window::{WindowInner, only_fragment_differs};
use crate::{HistoryMode, LocationError, NavigateEvent, NavigationApi, Subscription};

/// The Navigation API of a [`SimulatedWindow`](super::SimulatedWindow).
#[derive(Clone)]
pub struct SimulatedNavigation {
	inner: Rc<NavigationInner>,
}

type NavigateHandler = Rc<dyn Fn(&dyn NavigateEvent)>;

struct NavigationInner {
	window: Weak<WindowInner>,
	handlers: RefCell<Vec<(u64, NavigateHandler)>>,
	next_handler_id: Cell<u64>,
	pending: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
}

#[derive(Debug, Clone, Copy)]
enum Commit {
	Navigate(HistoryMode),
	Traverse(i32),
}

/// A `navigate` event, dispatched by the simulator or by a test through
/// [`SimulatedNavigation::dispatch`].
pub struct SimulatedNavigateEvent {
	destination: String,
	can_intercept: bool,
	hash_change: bool,
	download: bool,
	handler: RefCell<Option<LocalBoxFuture<'static, ()>>>,
}

impl SimulatedNavigateEvent {
	/// An interceptable, same-document navigation to `destination`.
	pub fn new(destination: impl Into<String>) -> Self {
		Self {
			destination: destination.into(),
			can_intercept: true,
			hash_change: false,
			download: false,
			handler: RefCell::new(None),
		}
	}

	pub fn can_intercept(mut self, can_intercept: bool) -> Self {
		self.can_intercept = can_intercept;
		self
	}

	pub fn hash_change(mut self, hash_change: bool) -> Self {
		self.hash_change = hash_change;
		self
	}

	pub fn download(mut self, download: bool) -> Self {
		self.download = download;
		self
	}
}

impl NavigateEvent for SimulatedNavigateEvent {
	fn can_intercept(&self) -> bool {
		self.can_intercept
	}

	fn is_hash_change(&self) -> bool {
		self.hash_change
	}

	fn is_download(&self) -> bool {
		self.download
	}

	fn destination_url(&self) -> String {
		self.destination.clone()
	}

	fn intercept(&self, handler: LocalBoxFuture<'static, ()>) {
		if !self.can_intercept {
			tracing::warn!(destination = %self.destination, "intercept() on a non-interceptable navigation");
			return;
		}
		*self.handler.borrow_mut() = Some(handler);
	}
}

impl fmt::Debug for SimulatedNavigateEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SimulatedNavigateEvent")
			.field("destination", &self.destination)
			.field("can_intercept", &self.can_intercept)
			.field("hash_change", &self.hash_change)
			.field("download", &self.download)
			.field("intercepted", &self.handler.borrow().is_some())
			.finish()
	}
}

impl SimulatedNavigation {
	pub(super) fn attach(window: Weak<WindowInner>) -> Self {
		Self {
			inner: Rc::new(NavigationInner {
				window,
				handlers: RefCell::new(Vec::new()),
				next_handler_id: Cell::new(0),
				pending: RefCell::new(VecDeque::new()),
			}),
		}
	}

	/// Dispatches an event as if the user had triggered it (a plain link,
	/// a download, a fragment jump). Returns whether a handler intercepted it.
	///
	/// Downloads leave the history untouched; anything else is pushed.
	pub fn dispatch(&self, event: SimulatedNavigateEvent) -> bool {
		self.run(event, Commit::Navigate(HistoryMode::Push))
	}

	/// Runs queued interception handlers to completion, in dispatch order.
	pub fn flush(&self) {
		loop {
			let next = self.inner.pending.borrow_mut().pop_front();
			match next {
				Some(handler) => futures::executor::block_on(handler),
				None => break,
			}
		}
	}

	/// Interception handlers waiting for [`flush`](Self::flush).
	pub fn pending_intercepts(&self) -> usize {
		self.inner.pending.borrow().len()
	}

	fn window(&self) -> Result<Rc<WindowInner>, LocationError> {
		self.inner
			.window
			.upgrade()
			.ok_or_else(|| LocationError::Platform("window was dropped".to_string()))
	}

	fn run(&self, event: SimulatedNavigateEvent, commit: Commit) -> bool {
		let handlers: Vec<NavigateHandler> = self
			.inner
			.handlers
			.borrow()
			.iter()
			.map(|(_, handler)| handler.clone())
			.collect();
		for handler in handlers {
			handler(&event);
		}

		if !event.download {
			match (self.window(), commit) {
				(Ok(window), Commit::Navigate(mode)) => match window.resolve(&event.destination) {
					Ok(url) => window.commit(url, mode),
					Err(err) => tracing::warn!("Navigation not committed: {}", err),
				},
				(Ok(window), Commit::Traverse(delta)) => {
					window.traverse(delta);
				}
				(Err(err), _) => tracing::warn!("Navigation not committed: {}", err),
			}
		}

		match event.handler.borrow_mut().take() {
			Some(handler) => {
				self.inner.pending.borrow_mut().push_back(handler);
				true
			}
			None => false,
		}
	}

	fn traverse(&self, delta: i32) -> Result<(), LocationError> {
		let window = self.window()?;
		let Some(destination) = window.entry_at(delta) else {
			return Ok(());
		};
		let current = window.current();

		let event = SimulatedNavigateEvent::new(destination.to_string())
			.hash_change(only_fragment_differs(&current, &destination));
		self.run(event, Commit::Traverse(delta));
		Ok(())
	}
}

impl NavigationApi for SimulatedNavigation {
	fn navigate(&self, url: &str, mode: HistoryMode) -> Result<(), LocationError> {
		let window = self.window()?;
		let destination = window.resolve(url)?;
		let current = window.current();

		let event = SimulatedNavigateEvent::new(destination.to_string())
			.can_intercept(destination.origin() == current.origin())
			.hash_change(only_fragment_differs(&current, &destination));
		self.run(event, Commit::Navigate(mode));
		Ok(())
	}

	fn back(&self) -> Result<(), LocationError> {
		self.traverse(-1)
	}

	fn forward(&self) -> Result<(), LocationError> {
		self.traverse(1)
	}

	fn on_navigate(&self, handler: Rc<dyn Fn(&dyn NavigateEvent)>) -> Subscription {
		let id = self.inner.next_handler_id.get();
		self.inner.next_handler_id.set(id + 1);
		self.inner.handlers.borrow_mut().push((id, handler));

		let inner = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = inner.upgrade() {
				inner.handlers.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}
}

impl fmt::Debug for SimulatedNavigation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SimulatedNavigation")
			.field("handlers", &self.inner.handlers.borrow().len())
			.field("pending", &self.inner.pending.borrow().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::BrowserWindow;
	use crate::testing::SimulatedWindow;
	use rstest::rstest;

	#[rstest]
	fn test_navigate_commits_before_handler_runs() {
		// Arrange
		let (window, navigation) = SimulatedWindow::with_navigation_api("https://app.test/");
		let observed = Rc::new(RefCell::new(None));
		let sink = observed.clone();
		let handler_window = window.clone();
		let _subscription = navigation.on_navigate(Rc::new(move |event: &dyn NavigateEvent| {
			let sink = sink.clone();
			let handler_window = handler_window.clone();
			event.intercept(Box::pin(async move {
				*sink.borrow_mut() = Some(handler_window.pathname());
			}));
		}));

		// Act
		navigation.navigate("/next", HistoryMode::Push).unwrap();

		// Assert
		assert_eq!(navigation.pending_intercepts(), 1);
		assert!(observed.borrow().is_none());
		navigation.flush();
		assert_eq!(observed.borrow().as_deref(), Some("/next"));
		assert_eq!(window.history_len(), 2);
	}

	#[rstest]
	fn test_download_does_not_commit() {
		let (window, navigation) = SimulatedWindow::with_navigation_api("https://app.test/");

		navigation.dispatch(SimulatedNavigateEvent::new("https://app.test/report.pdf").download(true));

		assert_eq!(window.pathname(), "/");
		assert_eq!(window.history_len(), 1);
	}

	#[rstest]
	fn test_cross_origin_navigation_is_not_interceptable() {
		let (_window, navigation) = SimulatedWindow::with_navigation_api("https://app.test/");
		let flags = Rc::new(Cell::new(None));
		let sink = flags.clone();
		let _subscription = navigation.on_navigate(Rc::new(move |event: &dyn NavigateEvent| {
			sink.set(Some(event.can_intercept()));
		}));

		navigation.navigate("https://elsewhere.test/", HistoryMode::Push).unwrap();

		assert_eq!(flags.get(), Some(false));
	}

	#[rstest]
	fn test_back_at_start_is_ignored() {
		let (window, navigation) = SimulatedWindow::with_navigation_api("https://app.test/");

		navigation.back().unwrap();

		assert_eq!(window.history_index(), 0);
	}
}
