//! The browser [`Host`], rendering into a [`web_sys::Document`].

use crate::{rc_hash_map::RcHashMap, Host, Listener, Value};
use js_sys::Reflect;
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, throw_str, throw_val, JsCast, JsValue};

type EventClosure = Closure<dyn Fn(web_sys::Event)>;

/// Mutates the DOM of one [`web_sys::Document`].
///
/// Fields are assigned as plain JavaScript properties, like `node[key] = value`.
/// `nodeValue`, `id`, `className` and friends therefore behave as they would in a script, and unknown names become expando properties.
///
/// Listeners are attached to the document itself and receive the [`web_sys::Event`] (as `&dyn Any`).
/// Each distinct (event, [`Listener`]) pair is added to the document only once and removed once its last binding goes away.
///
/// # Panics
///
/// Throws into JavaScript if the document rejects a tag name, just like `document.createElement` would.
#[derive(Debug)]
pub struct DomHost {
	document: web_sys::Document,
	listeners: RcHashMap<(String, Listener), u16, EventClosure>,
}
impl DomHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			listeners: RcHashMap::new(),
		}
	}

	/// The current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// Number of listeners currently attached to the document.
	#[must_use]
	pub fn registration_count(&self) -> usize {
		self.listeners.len()
	}
}

fn to_js(value: &Value) -> JsValue {
	match value {
		Value::Null => JsValue::NULL,
		Value::Bool(value) => JsValue::from_bool(*value),
		Value::Number(value) => JsValue::from_f64(*value),
		Value::Str(value) => JsValue::from_str(value),
		Value::Listener(_) | Value::Children(_) => {
			warn!("Can't assign {} to a DOM property. Assigning `undefined` instead.", value.kind());
			JsValue::UNDEFINED
		}
	}
}

impl Host for DomHost {
	type Node = web_sys::Node;

	#[instrument(skip(self))]
	fn create_element(&mut self, tag: &str) -> web_sys::Node {
		match self.document.create_element(tag) {
			Ok(element) => element.into(),
			Err(error) => {
				error!("Failed to create element: {:?}", error);
				throw_val(error)
			}
		}
	}

	fn create_text_node(&mut self) -> web_sys::Node {
		self.document.create_text_node("").into()
	}

	fn append_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) {
		if let Err(error) = parent.append_child(child) {
			error!("Failed to append child: {:?}", error)
		}
	}

	fn replace_child(&mut self, parent: &web_sys::Node, old: &web_sys::Node, new: &web_sys::Node) {
		if let Err(error) = parent.replace_child(new, old) {
			error!("Failed to replace child: {:?}", error)
		}
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) {
		if let Err(error) = parent.remove_child(child) {
			error!("Failed to remove child: {:?}", error)
		}
	}

	fn set_field(&mut self, node: &web_sys::Node, key: &str, value: &Value) {
		if let Err(error) = Reflect::set(node.as_ref(), &JsValue::from_str(key), &to_js(value)) {
			error!("Failed to assign field {:?}: {:?}", key, error)
		}
	}

	fn clear_field(&mut self, node: &web_sys::Node, key: &str) {
		if let Err(error) = Reflect::set(node.as_ref(), &JsValue::from_str(key), &JsValue::NULL) {
			error!("Failed to clear field {:?}: {:?}", key, error)
		}
	}

	#[instrument(skip(self))]
	fn add_listener(&mut self, event: &str, listener: &Listener) {
		let document = &self.document;
		let registration = self.listeners.increment_or_insert_with((event.to_owned(), listener.clone()), || {
			let listener = listener.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| listener.call(&event)) as Box<dyn Fn(web_sys::Event)>)
		});
		match registration {
			Ok((closure, true)) => {
				if let Err(error) = document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
					error!("Failed to add event listener: {:?}", error)
				}
			}
			Ok((_, false)) => trace!("Listener already attached. Counting."),
			Err(_) => throw_str("Too many (more than 65k) active bindings of the same listener"),
		}
	}

	#[instrument(skip(self))]
	fn remove_listener(&mut self, event: &str, listener: &Listener) {
		match self.listeners.decrement(&(event.to_owned(), listener.clone())) {
			Ok(Some(closure)) => {
				if let Err(error) = self.document.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
					error!("Failed to remove event listener: {:?}", error)
				}
				trace!("Freed event listener.");
			}
			Ok(None) => trace!("Listener still bound elsewhere."),
			Err(_) => warn!("Tried to remove a listener that isn't attached."),
		}
	}
}
