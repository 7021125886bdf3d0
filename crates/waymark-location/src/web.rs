//! `web-sys` implementations of the browser seams.
//!
//! The Navigation API is not covered by `web-sys` bindings yet, so
//! [`WebNavigation`] reaches it through `js_sys::Reflect`.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use crate::{
	BrowserWindow, HistoryMode, LocationError, NavigateEvent, NavigationApi, Subscription,
	WindowEvent,
};

fn js_error(err: JsValue) -> LocationError {
	LocationError::Platform(format!("{:?}", err))
}

/// Adds `handler` for `event` on `target`, removing it when the returned
/// subscription is released.
fn listen(target: EventTarget, event: &'static str, handler: Closure<dyn FnMut(Event)>) -> Subscription {
	if let Err(err) = target.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref()) {
		tracing::warn!(event, "Failed to add event listener: {:?}", err);
		return Subscription::noop();
	}

	Subscription::new(move || {
		let _ = target.remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
	})
}

/// The global `window`.
#[derive(Debug, Clone)]
pub struct WebWindow {
	window: web_sys::Window,
}

impl WebWindow {
	pub fn new() -> Result<Self, LocationError> {
		web_sys::window()
			.map(|window| Self { window })
			.ok_or_else(|| LocationError::Platform("no global window".to_string()))
	}

	fn history(&self) -> Result<web_sys::History, LocationError> {
		self.window.history().map_err(js_error)
	}
}

impl BrowserWindow for WebWindow {
	fn href(&self) -> String {
		self.window.location().href().unwrap_or_default()
	}

	fn pathname(&self) -> String {
		self.window
			.location()
			.pathname()
			.unwrap_or_else(|_| "/".to_string())
	}

	fn search(&self) -> String {
		self.window.location().search().unwrap_or_default()
	}

	fn hash(&self) -> String {
		self.window.location().hash().unwrap_or_default()
	}

	fn set_hash(&self, hash: &str) -> Result<(), LocationError> {
		self.window.location().set_hash(hash).map_err(js_error)
	}

	fn replace_href(&self, href: &str) -> Result<(), LocationError> {
		self.window.location().replace(href).map_err(js_error)
	}

	fn history_go(&self, delta: i32) -> Result<(), LocationError> {
		self.history()?.go_with_delta(delta).map_err(js_error)
	}

	fn push_state(&self, url: &str) -> Result<(), LocationError> {
		self.history()?
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_error)
	}

	fn replace_state(&self, url: &str) -> Result<(), LocationError> {
		self.history()?
			.replace_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_error)
	}

	fn dispatch_pop_state(&self) -> Result<(), LocationError> {
		let event = web_sys::PopStateEvent::new("popstate").map_err(js_error)?;
		self.window.dispatch_event(&event).map(|_| ()).map_err(js_error)
	}

	fn add_listener(&self, event: WindowEvent, listener: Rc<dyn Fn()>) -> Subscription {
		let handler = Closure::wrap(Box::new(move |_event: Event| {
			listener();
		}) as Box<dyn FnMut(_)>);

		listen(self.window.clone().unchecked_into(), event.as_str(), handler)
	}

	fn navigation(&self) -> Option<Rc<dyn NavigationApi>> {
		let navigation = Reflect::get(&self.window, &JsValue::from_str("navigation")).ok()?;
		if navigation.is_undefined() || navigation.is_null() {
			return None;
		}
		Some(Rc::new(WebNavigation { navigation }))
	}
}

/// `window.navigation`.
#[derive(Debug, Clone)]
pub struct WebNavigation {
	navigation: JsValue,
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Result<JsValue, LocationError> {
	let method: Function = Reflect::get(target, &JsValue::from_str(name))
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	method.apply(target, args).map_err(js_error)
}

impl NavigationApi for WebNavigation {
	fn navigate(&self, url: &str, mode: HistoryMode) -> Result<(), LocationError> {
		let options = Object::new();
		let history = match mode {
			HistoryMode::Push => "push",
			HistoryMode::Replace => "replace",
		};
		Reflect::set(&options, &JsValue::from_str("history"), &JsValue::from_str(history))
			.map_err(js_error)?;

		call_method(
			&self.navigation,
			"navigate",
			&Array::of2(&JsValue::from_str(url), &options),
		)
		.map(|_| ())
	}

	fn back(&self) -> Result<(), LocationError> {
		call_method(&self.navigation, "back", &Array::new()).map(|_| ())
	}

	fn forward(&self) -> Result<(), LocationError> {
		call_method(&self.navigation, "forward", &Array::new()).map(|_| ())
	}

	fn on_navigate(&self, handler: Rc<dyn Fn(&dyn NavigateEvent)>) -> Subscription {
		let closure = Closure::wrap(Box::new(move |event: Event| {
			handler(&WebNavigateEvent {
				event: event.into(),
			});
		}) as Box<dyn FnMut(_)>);

		listen(self.navigation.clone().unchecked_into(), "navigate", closure)
	}
}

struct WebNavigateEvent {
	event: JsValue,
}

impl WebNavigateEvent {
	fn property(&self, name: &str) -> JsValue {
		Reflect::get(&self.event, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
	}
}

impl NavigateEvent for WebNavigateEvent {
	fn can_intercept(&self) -> bool {
		self.property("canIntercept").as_bool().unwrap_or(false)
	}

	fn is_hash_change(&self) -> bool {
		self.property("hashChange").as_bool().unwrap_or(false)
	}

	fn is_download(&self) -> bool {
		let request = self.property("downloadRequest");
		!request.is_null() && !request.is_undefined()
	}

	fn destination_url(&self) -> String {
		let destination = self.property("destination");
		Reflect::get(&destination, &JsValue::from_str("url"))
			.ok()
			.and_then(|url| url.as_string())
			.unwrap_or_default()
	}

	fn intercept(&self, handler: LocalBoxFuture<'static, ()>) {
		let handler = Closure::once_into_js(move || {
			wasm_bindgen_futures::future_to_promise(async move {
				handler.await;
				Ok(JsValue::UNDEFINED)
			})
		});

		let options = Object::new();
		let result = Reflect::set(&options, &JsValue::from_str("handler"), &handler)
			.map_err(js_error)
			.and_then(|_| call_method(&self.event, "intercept", &Array::of1(&options)));
		if let Err(err) = result {
			tracing::warn!("NavigateEvent.intercept failed: {}", err);
		}
	}
}
