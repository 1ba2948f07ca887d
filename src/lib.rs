#![doc(html_root_url = "https://docs.rs/real-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A minimal virtual DOM: Describe the desired tree as [`Element`]s, and [`Root::render`] patches a [`Host`] tree to match,
//! reusing host nodes wherever the element type at a position stays the same.
//!
//! Child lists are reconciled strictly by position. There are no keys, no components and no batching: Each render runs to completion synchronously.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod element;
mod error;
mod host;
mod instance;
mod props;
mod rc_hash_map;
mod root;

pub mod memory;
pub mod reconcile;
pub mod web;

pub use element::{create_element, create_text_element, event_name, is_attribute, is_listener, Child, Element, Listener, PropertyBag, Tag, Value, CHILDREN, NODE_VALUE};
pub use error::ValidationError;
pub use host::Host;
pub use instance::Instance;
pub use props::update_props;
pub use root::{Root, DEFAULT_DEPTH_LIMIT};
