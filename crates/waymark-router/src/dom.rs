//! The DOM operations the router needs.
//!
//! The router never creates elements itself; views come from routes and link
//! nodes from the link-rendering callback. It only moves nodes in and out of
//! the host containers, writes `href`/text on anchors, toggles the active
//! class, and listens for pointer events on links.

use std::rc::Rc;

use waymark_location::Subscription;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
	pub ctrl: bool,
	pub meta: bool,
	pub alt: bool,
	pub shift: bool,
}

impl Modifiers {
	pub const NONE: Self = Self {
		ctrl: false,
		meta: false,
		alt: false,
		shift: false,
	};

	pub fn any(&self) -> bool {
		self.ctrl || self.meta || self.alt || self.shift
	}
}

/// Pointer events the router listens to on navigation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
	Click,
	MouseEnter,
	MouseLeave,
}

impl DomEvent {
	/// The DOM event type name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Click => "click",
			Self::MouseEnter => "mouseenter",
			Self::MouseLeave => "mouseleave",
		}
	}
}

/// A pointer event as seen by a link handler.
pub trait PointerEvent {
	fn modifiers(&self) -> Modifiers;

	/// `MouseEvent.button`; `0` is the primary button.
	fn button(&self) -> i16;

	fn prevent_default(&self);
}

/// Handler type for [`Dom::listen`].
pub type PointerHandler = Rc<dyn Fn(&dyn PointerEvent)>;

/// A DOM the router can drive.
///
/// Operations are infallible from the router's point of view; implementations
/// log platform failures.
pub trait Dom: 'static {
	type Node: Clone + 'static;

	fn append_child(&self, parent: &Self::Node, child: &Self::Node);

	fn remove_child(&self, parent: &Self::Node, child: &Self::Node);

	fn clear_children(&self, node: &Self::Node);

	/// `node` itself when it is an anchor, else its first anchor descendant.
	fn find_anchor(&self, node: &Self::Node) -> Option<Self::Node>;

	fn set_href(&self, anchor: &Self::Node, href: &str);

	/// Replaces the node's text content.
	fn set_text(&self, node: &Self::Node, text: &str);

	fn toggle_class(&self, node: &Self::Node, class: &str, on: bool);

	fn listen(&self, node: &Self::Node, event: DomEvent, handler: PointerHandler) -> Subscription;
}
