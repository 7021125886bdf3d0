//! The per-route lifecycle contract.

use async_trait::async_trait;

use crate::{NavigationContext, RouterHandle};

/// Result type for route hooks. Route authors may fail with any error.
pub type RouteResult<T = ()> = anyhow::Result<T>;

/// Static description of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteProps {
	/// Path template, such as `/blog/:id`.
	pub path: String,
	/// Link text shown in the navigation.
	pub label: Option<String>,
	/// Name used for lookups and reverse routing.
	pub name: Option<String>,
	/// Leaves the route out of the rendered navigation.
	pub hidden: bool,
}

impl RouteProps {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			label: None,
			name: None,
			hidden: false,
		}
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Link text: the label, else the name, else the path.
	pub fn link_text(&self) -> &str {
		self.label
			.as_deref()
			.or(self.name.as_deref())
			.unwrap_or(&self.path)
	}
}

/// A routable page.
///
/// `N` is the view node type of the [`Dom`](crate::Dom) the router drives.
/// Implement either [`mount`](Route::mount) directly, or
/// [`setup`](Route::setup) plus [`render`](Route::render) and let the default
/// `mount` sequence them.
///
/// ```
/// use waymark_router::{NavigationContext, Route, RouteProps};
///
/// struct About {
/// 	props: RouteProps,
/// }
///
/// #[waymark_router::async_trait(?Send)]
/// impl Route<String> for About {
/// 	fn props(&self) -> &RouteProps {
/// 		&self.props
/// 	}
///
/// 	fn render(&self, ctx: &NavigationContext) -> Option<String> {
/// 		Some(format!("about {}", ctx.location()))
/// 	}
/// }
/// ```
#[async_trait(?Send)]
pub trait Route<N: 'static>: 'static {
	fn props(&self) -> &RouteProps;

	/// Prepares state before rendering. Runs after the previous route has
	/// been torn down.
	async fn setup(&self, _ctx: &NavigationContext) -> RouteResult {
		Ok(())
	}

	/// Produces the view. `None` leaves the current view in place.
	fn render(&self, _ctx: &NavigationContext) -> Option<N> {
		None
	}

	async fn mount(&self, ctx: &NavigationContext) -> RouteResult<Option<N>> {
		self.setup(ctx).await?;
		Ok(self.render(ctx))
	}

	/// Releases whatever the last successful mount acquired.
	///
	/// Called exactly once per successful mount: before the next route's
	/// setup, on shutdown, or when a newer navigation supersedes the mount.
	async fn unmount(&self) -> RouteResult {
		Ok(())
	}

	fn on_link_mouse_enter(&self, _router: &RouterHandle) -> RouteResult {
		Ok(())
	}

	fn on_link_mouse_leave(&self, _router: &RouterHandle) -> RouteResult {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RouteProps::new("/posts").label("Posts").name("posts"), "Posts")]
	#[case(RouteProps::new("/posts").name("posts"), "posts")]
	#[case(RouteProps::new("/posts"), "/posts")]
	fn test_link_text_fallback(#[case] props: RouteProps, #[case] expected: &str) {
		assert_eq!(props.link_text(), expected);
	}
}
