//! Path-based adapter driven by the Navigation API, with a `popstate`
//! fallback.

use std::fmt;
use std::rc::{Rc, Weak};

use url::Url;

use crate::{
	BrowserWindow, HistoryMode, LocationAdapter, LocationCallback, LocationError, NavigateEvent,
	NavigationApi, Subscription, WindowEvent,
};

/// Options for [`NavigationAdapter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationAdapterOptions {
	/// Path prefix the application is mounted under, such as `/app`.
	pub base: String,
	/// Fail construction instead of falling back to `popstate` when the
	/// Navigation API is missing.
	pub require_navigation_api: bool,
}

impl NavigationAdapterOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	pub fn require_navigation_api(mut self, require: bool) -> Self {
		self.require_navigation_api = require;
		self
	}
}

/// Uses real URL paths (`https://host/app/blog/1`).
///
/// With the Navigation API every same-document navigation is intercepted,
/// including ones started by plain anchors. Without it, moves go through
/// `history.pushState` followed by a synthetic `popstate` so listeners hear
/// about them.
pub struct NavigationAdapter {
	window: Rc<dyn BrowserWindow>,
	navigation: Option<Rc<dyn NavigationApi>>,
	base: String,
}

impl NavigationAdapter {
	pub fn new(
		window: Rc<dyn BrowserWindow>,
		options: NavigationAdapterOptions,
	) -> Result<Self, LocationError> {
		let navigation = window.navigation();
		if navigation.is_none() && options.require_navigation_api {
			return Err(LocationError::NavigationApiUnavailable);
		}

		Ok(Self {
			window,
			navigation,
			base: normalize_base(&options.base),
		})
	}

	/// The normalized base; empty when the application is mounted at `/`.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// Whether the Navigation API drives this adapter.
	pub fn uses_navigation_api(&self) -> bool {
		self.navigation.is_some()
	}
}

/// `""` and `"/"` mean no base; otherwise a leading slash and no trailing one.
fn normalize_base(base: &str) -> String {
	let trimmed = base.trim_end_matches('/');
	if trimmed.is_empty() {
		String::new()
	} else {
		crate::ensure_leading_slash(trimmed)
	}
}

/// Strips `base` from `pathname` at a segment boundary.
fn strip_base(base: &str, pathname: &str) -> String {
	if !base.is_empty()
		&& let Some(rest) = pathname.strip_prefix(base)
		&& (rest.is_empty() || rest.starts_with('/'))
	{
		return crate::ensure_leading_slash(rest);
	}

	if pathname.is_empty() {
		"/".to_string()
	} else {
		pathname.to_string()
	}
}

fn window_location(window: &dyn BrowserWindow, base: &str) -> String {
	format!(
		"{}{}{}",
		strip_base(base, &window.pathname()),
		window.search(),
		window.hash()
	)
}

fn destination_location(base: &str, destination: &str) -> Result<String, LocationError> {
	let url = Url::parse(destination).map_err(|err| LocationError::InvalidUrl {
		url: destination.to_string(),
		reason: err.to_string(),
	})?;

	let mut location = strip_base(base, url.path());
	if let Some(query) = url.query() {
		location.push('?');
		location.push_str(query);
	}
	if let Some(fragment) = url.fragment() {
		location.push('#');
		location.push_str(fragment);
	}
	Ok(location)
}

fn should_intercept(event: &dyn NavigateEvent) -> bool {
	event.can_intercept() && !event.is_hash_change() && !event.is_download()
}

impl LocationAdapter for NavigationAdapter {
	fn location(&self) -> String {
		window_location(self.window.as_ref(), &self.base)
	}

	fn listen(&self, callback: LocationCallback) -> Subscription {
		let base = self.base.clone();

		if let Some(navigation) = &self.navigation {
			return navigation.on_navigate(Rc::new(move |event: &dyn NavigateEvent| {
				if !should_intercept(event) {
					return;
				}

				let destination = event.destination_url();
				let base = base.clone();
				let callback = callback.clone();
				event.intercept(Box::pin(async move {
					match destination_location(&base, &destination) {
						Ok(location) => callback(&location),
						Err(err) => tracing::warn!("Ignoring navigation: {}", err),
					}
				}));
			}));
		}

		let window: Weak<dyn BrowserWindow> = Rc::downgrade(&self.window);
		self.window.add_listener(
			WindowEvent::PopState,
			Rc::new(move || {
				if let Some(window) = window.upgrade() {
					callback(&window_location(window.as_ref(), &base));
				}
			}),
		)
	}

	fn navigate(&self, path: &str, replace: bool) -> Result<(), LocationError> {
		let href = self.create_href(path);
		let mode = if replace {
			HistoryMode::Replace
		} else {
			HistoryMode::Push
		};

		match &self.navigation {
			Some(navigation) => navigation.navigate(&href, mode),
			None => {
				match mode {
					HistoryMode::Push => self.window.push_state(&href)?,
					HistoryMode::Replace => self.window.replace_state(&href)?,
				}
				self.window.dispatch_pop_state()
			}
		}
	}

	fn go(&self, delta: i32) {
		let result = match (&self.navigation, delta) {
			(_, 0) => Ok(()),
			(Some(navigation), -1) => navigation.back(),
			(Some(navigation), 1) => navigation.forward(),
			_ => self.window.history_go(delta),
		};

		if let Err(err) = result {
			tracing::warn!(delta, "History traversal failed: {}", err);
		}
	}

	fn create_href(&self, path: &str) -> String {
		format!("{}{}", self.base, crate::ensure_leading_slash(path))
	}
}

impl fmt::Debug for NavigationAdapter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationAdapter")
			.field("base", &self.base)
			.field("navigation_api", &self.navigation.is_some())
			.finish()
	}
}
