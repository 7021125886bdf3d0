//! Browser bindings: [`WebDom`] over `web-sys` and [`WebSpawner`] over
//! `wasm-bindgen-futures`.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, MouseEvent};

use waymark_location::Subscription;

use crate::{Dom, DomEvent, Modifiers, PointerEvent, PointerHandler};

/// Spawns router tasks on the browser microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSpawner;

impl LocalSpawn for WebSpawner {
	fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
		wasm_bindgen_futures::spawn_local(future);
		Ok(())
	}
}

/// Looks up an element of the current document by id.
///
/// Handy as a container callback: `.render_root(|| element_by_id("app"))`.
pub fn element_by_id(id: &str) -> Option<Element> {
	web_sys::window()?.document()?.get_element_by_id(id)
}

/// The browser DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDom;

struct WebPointerEvent(MouseEvent);

impl PointerEvent for WebPointerEvent {
	fn modifiers(&self) -> Modifiers {
		Modifiers {
			ctrl: self.0.ctrl_key(),
			meta: self.0.meta_key(),
			alt: self.0.alt_key(),
			shift: self.0.shift_key(),
		}
	}

	fn button(&self) -> i16 {
		self.0.button()
	}

	fn prevent_default(&self) {
		self.0.prevent_default();
	}
}

impl Dom for WebDom {
	type Node = Element;

	fn append_child(&self, parent: &Element, child: &Element) {
		if let Err(err) = parent.append_child(child) {
			tracing::warn!("appendChild failed: {:?}", err);
		}
	}

	fn remove_child(&self, parent: &Element, child: &Element) {
		if let Err(err) = parent.remove_child(child) {
			tracing::warn!("removeChild failed: {:?}", err);
		}
	}

	fn clear_children(&self, node: &Element) {
		while let Some(child) = node.first_child() {
			if node.remove_child(&child).is_err() {
				break;
			}
		}
	}

	fn find_anchor(&self, node: &Element) -> Option<Element> {
		if node.tag_name().eq_ignore_ascii_case("a") {
			return Some(node.clone());
		}
		node.query_selector("a").ok().flatten()
	}

	fn set_href(&self, anchor: &Element, href: &str) {
		if let Err(err) = anchor.set_attribute("href", href) {
			tracing::warn!("Failed to set href: {:?}", err);
		}
	}

	fn set_text(&self, node: &Element, text: &str) {
		node.set_text_content(Some(text));
	}

	fn toggle_class(&self, node: &Element, class: &str, on: bool) {
		if let Err(err) = node.class_list().toggle_with_force(class, on) {
			tracing::warn!(class, "Failed to toggle class: {:?}", err);
		}
	}

	fn listen(&self, node: &Element, event: DomEvent, handler: PointerHandler) -> Subscription {
		let closure = Closure::wrap(Box::new(move |event: Event| {
			if let Ok(mouse) = event.dyn_into::<MouseEvent>() {
				handler(&WebPointerEvent(mouse));
			}
		}) as Box<dyn FnMut(_)>);

		let name = event.as_str();
		if let Err(err) = node.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
			tracing::warn!(event = name, "Failed to add event listener: {:?}", err);
			return Subscription::noop();
		}

		let node = node.clone();
		Subscription::new(move || {
			let _ = node.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
		})
	}
}
