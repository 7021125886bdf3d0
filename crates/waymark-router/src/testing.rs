//! An in-process DOM for headless tests.
//!
//! [`MemoryDom`] keeps nodes in an arena addressed by [`NodeId`] and can
//! dispatch pointer events to the listeners the router attaches. Clicks
//! bubble to ancestors; `mouseenter`/`mouseleave` do not.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use waymark_location::Subscription;

use crate::{Dom, DomEvent, Modifiers, PointerEvent, PointerHandler};

pub use waymark_location::testing::{SimulatedNavigateEvent, SimulatedNavigation, SimulatedWindow};

/// Handle to a node of a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
	tag: String,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	text: String,
	classes: BTreeSet<String>,
	attributes: BTreeMap<String, String>,
}

#[derive(Default)]
struct Arena {
	nodes: Vec<NodeData>,
	listeners: Vec<(u64, NodeId, DomEvent, PointerHandler)>,
	next_listener_id: u64,
}

/// A pointer event dispatched by [`MemoryDom`].
#[derive(Debug, Default)]
pub struct SimulatedPointerEvent {
	modifiers: Modifiers,
	button: i16,
	default_prevented: Cell<bool>,
}

impl SimulatedPointerEvent {
	pub fn new(modifiers: Modifiers, button: i16) -> Self {
		Self {
			modifiers,
			button,
			default_prevented: Cell::new(false),
		}
	}

	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

impl PointerEvent for SimulatedPointerEvent {
	fn modifiers(&self) -> Modifiers {
		self.modifiers
	}

	fn button(&self) -> i16 {
		self.button
	}

	fn prevent_default(&self) {
		self.default_prevented.set(true);
	}
}

/// An arena-backed DOM. Clones share the arena.
#[derive(Clone, Default)]
pub struct MemoryDom {
	arena: Rc<RefCell<Arena>>,
}

impl MemoryDom {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_element(&self, tag: &str) -> NodeId {
		let mut arena = self.arena.borrow_mut();
		arena.nodes.push(NodeData {
			tag: tag.to_ascii_lowercase(),
			..NodeData::default()
		});
		NodeId(arena.nodes.len() - 1)
	}

	/// Creates an element holding `text`.
	pub fn create_text_element(&self, tag: &str, text: &str) -> NodeId {
		let node = self.create_element(tag);
		self.arena.borrow_mut().nodes[node.0].text = text.to_string();
		node
	}

	pub fn tag(&self, node: NodeId) -> String {
		self.arena.borrow().nodes[node.0].tag.clone()
	}

	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.arena.borrow().nodes[node.0].parent
	}

	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.arena.borrow().nodes[node.0].children.clone()
	}

	pub fn text(&self, node: NodeId) -> String {
		self.arena.borrow().nodes[node.0].text.clone()
	}

	pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.arena.borrow().nodes[node.0].attributes.get(name).cloned()
	}

	pub fn href(&self, node: NodeId) -> Option<String> {
		self.attribute(node, "href")
	}

	pub fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.arena.borrow().nodes[node.0].classes.contains(class)
	}

	/// Listeners attached to `node`.
	pub fn listener_count(&self, node: NodeId) -> usize {
		self.arena
			.borrow()
			.listeners
			.iter()
			.filter(|(_, target, _, _)| *target == node)
			.count()
	}

	/// A primary-button click. Returns whether a listener prevented the
	/// default action.
	pub fn click(&self, node: NodeId, modifiers: Modifiers) -> bool {
		self.click_button(node, 0, modifiers)
	}

	pub fn click_button(&self, node: NodeId, button: i16, modifiers: Modifiers) -> bool {
		let event = SimulatedPointerEvent::new(modifiers, button);
		let mut target = Some(node);
		while let Some(current) = target {
			self.dispatch(current, DomEvent::Click, &event);
			target = self.parent(current);
		}
		event.default_prevented()
	}

	pub fn mouse_enter(&self, node: NodeId) {
		self.dispatch(node, DomEvent::MouseEnter, &SimulatedPointerEvent::default());
	}

	pub fn mouse_leave(&self, node: NodeId) {
		self.dispatch(node, DomEvent::MouseLeave, &SimulatedPointerEvent::default());
	}

	fn dispatch(&self, node: NodeId, event: DomEvent, payload: &SimulatedPointerEvent) {
		let handlers: Vec<PointerHandler> = self
			.arena
			.borrow()
			.listeners
			.iter()
			.filter(|(_, target, kind, _)| *target == node && *kind == event)
			.map(|(_, _, _, handler)| handler.clone())
			.collect();

		for handler in handlers {
			handler(payload);
		}
	}

	fn detach(arena: &mut Arena, child: NodeId) {
		if let Some(parent) = arena.nodes[child.0].parent.take() {
			arena.nodes[parent.0].children.retain(|other| *other != child);
		}
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn append_child(&self, parent: &NodeId, child: &NodeId) {
		let mut arena = self.arena.borrow_mut();
		Self::detach(&mut arena, *child);
		arena.nodes[child.0].parent = Some(*parent);
		arena.nodes[parent.0].children.push(*child);
	}

	fn remove_child(&self, parent: &NodeId, child: &NodeId) {
		let mut arena = self.arena.borrow_mut();
		if arena.nodes[child.0].parent != Some(*parent) {
			tracing::warn!(?parent, ?child, "removeChild: not a child");
			return;
		}
		Self::detach(&mut arena, *child);
	}

	fn clear_children(&self, node: &NodeId) {
		let mut arena = self.arena.borrow_mut();
		let children = std::mem::take(&mut arena.nodes[node.0].children);
		for child in children {
			arena.nodes[child.0].parent = None;
		}
	}

	fn find_anchor(&self, node: &NodeId) -> Option<NodeId> {
		let arena = self.arena.borrow();
		let mut stack = vec![*node];
		while let Some(current) = stack.pop() {
			let data = &arena.nodes[current.0];
			if data.tag == "a" {
				return Some(current);
			}
			stack.extend(data.children.iter().rev());
		}
		None
	}

	fn set_href(&self, anchor: &NodeId, href: &str) {
		self.arena.borrow_mut().nodes[anchor.0]
			.attributes
			.insert("href".to_string(), href.to_string());
	}

	fn set_text(&self, node: &NodeId, text: &str) {
		let mut arena = self.arena.borrow_mut();
		let children = std::mem::take(&mut arena.nodes[node.0].children);
		for child in children {
			arena.nodes[child.0].parent = None;
		}
		arena.nodes[node.0].text = text.to_string();
	}

	fn toggle_class(&self, node: &NodeId, class: &str, on: bool) {
		let mut arena = self.arena.borrow_mut();
		let classes = &mut arena.nodes[node.0].classes;
		if on {
			classes.insert(class.to_string());
		} else {
			classes.remove(class);
		}
	}

	fn listen(&self, node: &NodeId, event: DomEvent, handler: PointerHandler) -> Subscription {
		let id = {
			let mut arena = self.arena.borrow_mut();
			let id = arena.next_listener_id;
			arena.next_listener_id += 1;
			arena.listeners.push((id, *node, event, handler));
			id
		};

		let arena = Rc::downgrade(&self.arena);
		Subscription::new(move || {
			if let Some(arena) = arena.upgrade() {
				arena
					.borrow_mut()
					.listeners
					.retain(|(other, _, _, _)| *other != id);
			}
		})
	}
}

impl fmt::Debug for MemoryDom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let arena = self.arena.borrow();
		f.debug_struct("MemoryDom")
			.field("nodes", &arena.nodes)
			.field("listeners", &arena.listeners.len())
			.finish()
	}
}
