//! Navigation link handlers and bookkeeping.

use std::rc::Rc;

use waymark_location::Subscription;

use crate::{PointerEvent, PointerHandler, Route, RouterHandle};

/// A rendered link for one static route.
pub(crate) struct NavigationLink<N> {
	/// Normalized template of the route the link leads to.
	pub(crate) pattern: String,
	/// The node that carries the active class.
	pub(crate) node: N,
	pub(crate) subscriptions: Vec<Subscription>,
}

/// Whether a click should stay in the application.
///
/// Modified clicks (new tab, new window, download) and non-primary buttons
/// keep the browser's default behaviour.
pub(crate) fn is_plain_click(event: &dyn PointerEvent) -> bool {
	!event.modifiers().any() && event.button() == 0
}

pub(crate) fn click_handler(router: RouterHandle, path: String) -> PointerHandler {
	Rc::new(move |event: &dyn PointerEvent| {
		if !is_plain_click(event) {
			return;
		}

		event.prevent_default();
		if let Err(err) = router.push(&path) {
			tracing::warn!(path = %path, "Link navigation failed: {}", err);
		}
	})
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Hover {
	Enter,
	Leave,
}

pub(crate) fn hover_handler<N: 'static>(
	router: RouterHandle,
	route: Rc<dyn Route<N>>,
	hover: Hover,
) -> PointerHandler {
	Rc::new(move |_event: &dyn PointerEvent| {
		let result = match hover {
			Hover::Enter => route.on_link_mouse_enter(&router),
			Hover::Leave => route.on_link_mouse_leave(&router),
		};

		if let Err(err) = result {
			tracing::warn!(
				path = %route.props().path,
				?hover,
				"Link hover hook failed: {:#}",
				err
			);
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Modifiers;
	use rstest::rstest;
	use std::cell::Cell;

	struct Event {
		modifiers: Modifiers,
		button: i16,
		prevented: Cell<bool>,
	}

	impl PointerEvent for Event {
		fn modifiers(&self) -> Modifiers {
			self.modifiers
		}

		fn button(&self) -> i16 {
			self.button
		}

		fn prevent_default(&self) {
			self.prevented.set(true);
		}
	}

	#[rstest]
	#[case(Modifiers::NONE, 0, true)]
	#[case(Modifiers { ctrl: true, ..Modifiers::NONE }, 0, false)]
	#[case(Modifiers { meta: true, ..Modifiers::NONE }, 0, false)]
	#[case(Modifiers::NONE, 1, false)]
	#[case(Modifiers::NONE, 2, false)]
	fn test_is_plain_click(#[case] modifiers: Modifiers, #[case] button: i16, #[case] expected: bool) {
		let event = Event {
			modifiers,
			button,
			prevented: Cell::new(false),
		};

		assert_eq!(is_plain_click(&event), expected);
	}
}
