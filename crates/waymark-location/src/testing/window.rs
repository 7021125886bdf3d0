use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use url::{Position, Url};

use super::SimulatedNavigation;
use crate::{BrowserWindow, HistoryMode, LocationError, NavigationApi, Subscription, WindowEvent};

/// An in-memory `window` with `location`, `history` and event listeners.
///
/// Clones share state.
#[derive(Clone)]
pub struct SimulatedWindow {
	pub(super) inner: Rc<WindowInner>,
}

pub(super) struct WindowInner {
	history: RefCell<History>,
	listeners: RefCell<Vec<(u64, WindowEvent, Rc<dyn Fn()>)>>,
	next_listener_id: Cell<u64>,
	navigation: RefCell<Option<SimulatedNavigation>>,
}

struct History {
	entries: Vec<Url>,
	index: usize,
}

/// True when two URLs name the same document and differ only by fragment.
pub(super) fn only_fragment_differs(a: &Url, b: &Url) -> bool {
	a[..Position::AfterQuery] == b[..Position::AfterQuery] && a.fragment() != b.fragment()
}

fn parse_error(url: &str, err: url::ParseError) -> LocationError {
	LocationError::InvalidUrl {
		url: url.to_string(),
		reason: err.to_string(),
	}
}

impl WindowInner {
	pub(super) fn current(&self) -> Url {
		let history = self.history.borrow();
		history.entries[history.index].clone()
	}

	/// Resolves `url` against the current entry.
	pub(super) fn resolve(&self, url: &str) -> Result<Url, LocationError> {
		self.current().join(url).map_err(|err| parse_error(url, err))
	}

	/// The entry `delta` steps away, if it exists.
	pub(super) fn entry_at(&self, delta: i32) -> Option<Url> {
		let history = self.history.borrow();
		let target = history.index as i64 + i64::from(delta);
		if target < 0 || target >= history.entries.len() as i64 {
			return None;
		}
		Some(history.entries[target as usize].clone())
	}

	/// Pushes or replaces an entry, firing `hashchange` for fragment-only moves.
	pub(super) fn commit(&self, url: Url, mode: HistoryMode) {
		let previous = self.current();
		{
			let mut history = self.history.borrow_mut();
			let index = history.index;
			match mode {
				HistoryMode::Push => {
					history.entries.truncate(index + 1);
					history.entries.push(url.clone());
					history.index = index + 1;
				}
				HistoryMode::Replace => history.entries[index] = url.clone(),
			}
		}

		if only_fragment_differs(&previous, &url) {
			self.fire(WindowEvent::HashChange);
		}
	}

	/// Moves `delta` entries, firing `popstate` (and `hashchange` when only
	/// the fragment changed). Returns false when out of range.
	pub(super) fn traverse(&self, delta: i32) -> bool {
		let Some(target) = self.entry_at(delta) else {
			return false;
		};
		if delta == 0 {
			return true;
		}

		let previous = self.current();
		{
			let mut history = self.history.borrow_mut();
			history.index = (history.index as i64 + i64::from(delta)) as usize;
		}

		self.fire(WindowEvent::PopState);
		if only_fragment_differs(&previous, &target) {
			self.fire(WindowEvent::HashChange);
		}
		true
	}

	pub(super) fn fire(&self, event: WindowEvent) {
		let listeners: Vec<Rc<dyn Fn()>> = self
			.listeners
			.borrow()
			.iter()
			.filter(|(_, kind, _)| *kind == event)
			.map(|(_, _, listener)| listener.clone())
			.collect();

		for listener in listeners {
			listener();
		}
	}
}

impl SimulatedWindow {
	/// Creates a window whose history holds `url`.
	///
	/// # Panics
	///
	/// Panics when `url` is not an absolute URL; use
	/// [`SimulatedWindow::try_new`] to handle that case.
	pub fn new(url: &str) -> Self {
		Self::try_new(url).unwrap_or_else(|err| panic!("invalid initial URL: {}", err))
	}

	pub fn try_new(url: &str) -> Result<Self, LocationError> {
		let initial = Url::parse(url).map_err(|err| parse_error(url, err))?;
		Ok(Self {
			inner: Rc::new(WindowInner {
				history: RefCell::new(History {
					entries: vec![initial],
					index: 0,
				}),
				listeners: RefCell::new(Vec::new()),
				next_listener_id: Cell::new(0),
				navigation: RefCell::new(None),
			}),
		})
	}

	/// Creates a window that also exposes the Navigation API.
	pub fn with_navigation_api(url: &str) -> (Self, SimulatedNavigation) {
		let window = Self::new(url);
		let navigation = SimulatedNavigation::attach(Rc::downgrade(&window.inner));
		*window.inner.navigation.borrow_mut() = Some(navigation.clone());
		(window, navigation)
	}

	pub fn history_len(&self) -> usize {
		self.inner.history.borrow().entries.len()
	}

	pub fn history_index(&self) -> usize {
		self.inner.history.borrow().index
	}

	/// Number of registered listeners for `event`.
	pub fn listener_count(&self, event: WindowEvent) -> usize {
		self.inner
			.listeners
			.borrow()
			.iter()
			.filter(|(_, kind, _)| *kind == event)
			.count()
	}
}

impl BrowserWindow for SimulatedWindow {
	fn href(&self) -> String {
		self.inner.current().to_string()
	}

	fn pathname(&self) -> String {
		self.inner.current().path().to_string()
	}

	fn search(&self) -> String {
		self.inner
			.current()
			.query()
			.map(|query| format!("?{}", query))
			.unwrap_or_default()
	}

	fn hash(&self) -> String {
		self.inner
			.current()
			.fragment()
			.filter(|fragment| !fragment.is_empty())
			.map(|fragment| format!("#{}", fragment))
			.unwrap_or_default()
	}

	fn set_hash(&self, hash: &str) -> Result<(), LocationError> {
		let fragment = hash.strip_prefix('#').unwrap_or(hash);
		let mut url = self.inner.current();
		if url.fragment() == Some(fragment) {
			return Ok(());
		}
		url.set_fragment(Some(fragment));
		self.inner.commit(url, HistoryMode::Push);
		Ok(())
	}

	fn replace_href(&self, href: &str) -> Result<(), LocationError> {
		let url = self.inner.resolve(href)?;
		self.inner.commit(url, HistoryMode::Replace);
		Ok(())
	}

	fn history_go(&self, delta: i32) -> Result<(), LocationError> {
		self.inner.traverse(delta);
		Ok(())
	}

	fn push_state(&self, url: &str) -> Result<(), LocationError> {
		let url = self.inner.resolve(url)?;
		let mut history = self.inner.history.borrow_mut();
		let index = history.index;
		history.entries.truncate(index + 1);
		history.entries.push(url);
		history.index = index + 1;
		Ok(())
	}

	fn replace_state(&self, url: &str) -> Result<(), LocationError> {
		let url = self.inner.resolve(url)?;
		let mut history = self.inner.history.borrow_mut();
		let index = history.index;
		history.entries[index] = url;
		Ok(())
	}

	fn dispatch_pop_state(&self) -> Result<(), LocationError> {
		self.inner.fire(WindowEvent::PopState);
		Ok(())
	}

	fn add_listener(&self, event: WindowEvent, listener: Rc<dyn Fn()>) -> Subscription {
		let id = self.inner.next_listener_id.get();
		self.inner.next_listener_id.set(id + 1);
		self.inner.listeners.borrow_mut().push((id, event, listener));

		let inner = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = inner.upgrade() {
				inner.listeners.borrow_mut().retain(|(other, _, _)| *other != id);
			}
		})
	}

	fn navigation(&self) -> Option<Rc<dyn NavigationApi>> {
		self.inner
			.navigation
			.borrow()
			.clone()
			.map(|navigation| Rc::new(navigation) as Rc<dyn NavigationApi>)
	}
}

impl fmt::Debug for SimulatedWindow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let history = self.inner.history.borrow();
		f.debug_struct("SimulatedWindow")
			.field(
				"entries",
				&history.entries.iter().map(Url::as_str).collect::<Vec<_>>(),
			)
			.field("index", &history.index)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn count_events(window: &SimulatedWindow, event: WindowEvent) -> (Rc<Cell<usize>>, Subscription) {
		let count = Rc::new(Cell::new(0));
		let counter = count.clone();
		let subscription = window.add_listener(event, Rc::new(move || counter.set(counter.get() + 1)));
		(count, subscription)
	}

	#[rstest]
	fn test_set_hash_pushes_and_fires_hashchange() {
		let window = SimulatedWindow::new("https://app.test/");
		let (hash_changes, _subscription) = count_events(&window, WindowEvent::HashChange);

		window.set_hash("/about").unwrap();

		assert_eq!(window.hash(), "#/about");
		assert_eq!(window.history_len(), 2);
		assert_eq!(hash_changes.get(), 1);
	}

	#[rstest]
	fn test_set_same_hash_is_noop() {
		let window = SimulatedWindow::new("https://app.test/#/about");
		let (hash_changes, _subscription) = count_events(&window, WindowEvent::HashChange);

		window.set_hash("#/about").unwrap();

		assert_eq!(window.history_len(), 1);
		assert_eq!(hash_changes.get(), 0);
	}

	#[rstest]
	fn test_push_state_is_silent() {
		let window = SimulatedWindow::new("https://app.test/");
		let (pops, _subscription) = count_events(&window, WindowEvent::PopState);

		window.push_state("/a?x=1").unwrap();

		assert_eq!(window.pathname(), "/a");
		assert_eq!(window.search(), "?x=1");
		assert_eq!(pops.get(), 0);
	}

	#[rstest]
	fn test_history_go_fires_popstate_in_range_only() {
		let window = SimulatedWindow::new("https://app.test/");
		window.push_state("/a").unwrap();
		let (pops, _subscription) = count_events(&window, WindowEvent::PopState);

		window.history_go(-1).unwrap();
		window.history_go(-1).unwrap();

		assert_eq!(window.pathname(), "/");
		assert_eq!(window.history_index(), 0);
		assert_eq!(pops.get(), 1);
	}

	#[rstest]
	fn test_dropping_subscription_removes_listener() {
		let window = SimulatedWindow::new("https://app.test/");
		let (_, subscription) = count_events(&window, WindowEvent::PopState);
		assert_eq!(window.listener_count(WindowEvent::PopState), 1);

		drop(subscription);

		assert_eq!(window.listener_count(WindowEvent::PopState), 0);
	}

	#[rstest]
	fn test_try_new_rejects_relative_url() {
		assert!(matches!(
			SimulatedWindow::try_new("/relative"),
			Err(LocationError::InvalidUrl { .. })
		));
	}
}
