//! An in-memory [`Host`], for rendering without a browser and for inspecting what the reconciler did.

use crate::{rc_hash_map::RcHashMap, Host, Listener, Value};
use core::any::Any;
use std::collections::BTreeMap;
use tracing::{error, instrument, trace, warn};

/// Handle to a node in a [`MemoryHost`]. Only meaningful for the host that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Element(String),
	Text,
}

/// One call the reconciler made into a [`MemoryHost`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
	CreateElement { node: NodeId, tag: String },
	CreateText { node: NodeId },
	AppendChild { parent: NodeId, child: NodeId },
	ReplaceChild { parent: NodeId, old: NodeId, new: NodeId },
	RemoveChild { parent: NodeId, child: NodeId },
	SetField { node: NodeId, key: String, value: Value },
	ClearField { node: NodeId, key: String },
	AddListener { event: String, listener: Listener },
	RemoveListener { event: String, listener: Listener },
}
impl Mutation {
	/// Whether this mutation changes the shape of the node tree.
	#[must_use]
	pub fn is_structural(&self) -> bool {
		matches!(
			self,
			Mutation::CreateElement { .. } | Mutation::CreateText { .. } | Mutation::AppendChild { .. } | Mutation::ReplaceChild { .. } | Mutation::RemoveChild { .. }
		)
	}
}

#[derive(Debug)]
struct MemoryNode {
	kind: NodeKind,
	fields: BTreeMap<String, Value>,
	children: Vec<NodeId>,
	parent: Option<NodeId>,
}

/// A document held in memory.
///
/// Nodes are never freed; detached ones stay inspectable through their [`NodeId`].
/// Cleared fields are removed entirely, which is how this host represents null.
///
/// Delegated listeners are kept in registration order and invoked by [`MemoryHost::dispatch`] with the payload it's given.
#[derive(Debug, Default)]
pub struct MemoryHost {
	nodes: Vec<MemoryNode>,
	listeners: RcHashMap<(String, Listener), u32, u64>,
	registrations: u64,
	mutations: Vec<Mutation>,
}
impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn insert(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(MemoryNode {
			kind,
			fields: BTreeMap::new(),
			children: Vec::new(),
			parent: None,
		});
		id
	}

	fn detach(&mut self, node: NodeId) {
		if let Some(parent) = self.nodes[node.0].parent.take() {
			self.nodes[parent.0].children.retain(|&child| child != node)
		}
	}

	fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
		self.nodes[parent.0].children.iter().position(|&c| c == child)
	}

	#[must_use]
	pub fn kind(&self, node: NodeId) -> &NodeKind {
		&self.nodes[node.0].kind
	}

	/// The tag name, or [`None`] for text nodes.
	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match &self.nodes[node.0].kind {
			NodeKind::Element(tag) => Some(tag),
			NodeKind::Text => None,
		}
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		&self.nodes[node.0].children
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.nodes[node.0].parent
	}

	#[must_use]
	pub fn field(&self, node: NodeId, key: &str) -> Option<&Value> {
		self.nodes[node.0].fields.get(key)
	}

	/// All fields currently set on `node`, sorted by key.
	pub fn fields(&self, node: NodeId) -> impl Iterator<Item = (&str, &Value)> {
		self.nodes[node.0].fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Concatenated `nodeValue`s of all text nodes in `node`'s subtree, in document order.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let mut text = String::new();
		self.write_text(node, &mut text);
		text
	}

	fn write_text(&self, node: NodeId, text: &mut String) {
		match self.nodes[node.0].kind {
			NodeKind::Text => {
				if let Some(value) = self.field(node, "nodeValue") {
					text.push_str(&value.to_string())
				}
			}
			NodeKind::Element(_) => {
				for &child in self.children(node) {
					self.write_text(child, text)
				}
			}
		}
	}

	/// Serialises `node` HTML-style: Fields become attributes, text nodes their escaped `nodeValue`.
	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(node, &mut html);
		html
	}

	/// Like [`MemoryHost::outer_html`], but only `node`'s children.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(child, &mut html)
		}
		html
	}

	fn write_html(&self, node: NodeId, html: &mut String) {
		let memory_node = &self.nodes[node.0];
		match &memory_node.kind {
			NodeKind::Text => {
				if let Some(value) = memory_node.fields.get("nodeValue") {
					escape_into(&value.to_string(), html)
				}
			}
			NodeKind::Element(tag) => {
				html.push('<');
				html.push_str(tag);
				for (key, value) in &memory_node.fields {
					html.push(' ');
					html.push_str(key);
					html.push_str("=\"");
					escape_into(&value.to_string(), html);
					html.push('"');
				}
				html.push('>');
				for &child in &memory_node.children {
					self.write_html(child, html)
				}
				html.push_str("</");
				html.push_str(tag);
				html.push('>');
			}
		}
	}

	/// Registered listeners for `event`, in registration order.
	#[must_use]
	pub fn listeners(&self, event: &str) -> Vec<Listener> {
		let mut listeners = self
			.listeners
			.iter()
			.filter(|((e, _), _)| e == event)
			.map(|((_, listener), &sequence)| (sequence, listener.clone()))
			.collect::<Vec<_>>();
		listeners.sort_by_key(|&(sequence, _)| sequence);
		listeners.into_iter().map(|(_, listener)| listener).collect()
	}

	/// How often the (`event`, `listener`) pair is currently registered.
	#[must_use]
	pub fn listener_count(&self, event: &str, listener: &Listener) -> u32 {
		self.listeners.count(&(event.to_owned(), listener.clone()))
	}

	/// Number of distinct (event, listener) registrations.
	#[must_use]
	pub fn registration_count(&self) -> usize {
		self.listeners.len()
	}

	/// Invokes every listener registered for `event` with `payload`, in registration order.
	///
	/// Returns how many listeners were invoked.
	#[instrument(skip(self, payload))]
	pub fn dispatch(&self, event: &str, payload: &dyn Any) -> usize {
		let listeners = self.listeners(event);
		for listener in &listeners {
			listener.call(payload)
		}
		trace!("Dispatched to {} listener(s).", listeners.len());
		listeners.len()
	}

	#[must_use]
	pub fn mutations(&self) -> &[Mutation] {
		&self.mutations
	}

	/// Returns and clears the mutation log.
	pub fn take_mutations(&mut self) -> Vec<Mutation> {
		core::mem::take(&mut self.mutations)
	}

	#[must_use]
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}
}

fn escape_into(text: &str, html: &mut String) {
	for c in text.chars() {
		match c {
			'&' => html.push_str("&amp;"),
			'<' => html.push_str("&lt;"),
			'>' => html.push_str("&gt;"),
			'"' => html.push_str("&quot;"),
			c => html.push(c),
		}
	}
}

impl Host for MemoryHost {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str) -> NodeId {
		let node = self.insert(NodeKind::Element(tag.to_owned()));
		trace!(?node, tag, "Created element.");
		self.mutations.push(Mutation::CreateElement { node, tag: tag.to_owned() });
		node
	}

	fn create_text_node(&mut self) -> NodeId {
		let node = self.insert(NodeKind::Text);
		trace!(?node, "Created text node.");
		self.mutations.push(Mutation::CreateText { node });
		node
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
		let (parent, child) = (*parent, *child);
		self.detach(child);
		self.nodes[parent.0].children.push(child);
		self.nodes[child.0].parent = Some(parent);
		self.mutations.push(Mutation::AppendChild { parent, child });
	}

	fn replace_child(&mut self, parent: &NodeId, old: &NodeId, new: &NodeId) {
		let (parent, old, new) = (*parent, *old, *new);
		self.mutations.push(Mutation::ReplaceChild { parent, old, new });
		self.detach(new);
		let i = match self.position(parent, old) {
			Some(i) => i,
			None => return error!(?parent, ?old, "Node to replace is not a child of the given parent."),
		};
		self.nodes[parent.0].children[i] = new;
		self.nodes[old.0].parent = None;
		self.nodes[new.0].parent = Some(parent);
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
		let (parent, child) = (*parent, *child);
		self.mutations.push(Mutation::RemoveChild { parent, child });
		match self.position(parent, child) {
			Some(i) => {
				self.nodes[parent.0].children.remove(i);
				self.nodes[child.0].parent = None;
			}
			None => error!(?parent, ?child, "Node to remove is not a child of the given parent."),
		}
	}

	fn set_field(&mut self, node: &NodeId, key: &str, value: &Value) {
		self.nodes[node.0].fields.insert(key.to_owned(), value.clone());
		self.mutations.push(Mutation::SetField {
			node: *node,
			key: key.to_owned(),
			value: value.clone(),
		});
	}

	fn clear_field(&mut self, node: &NodeId, key: &str) {
		self.nodes[node.0].fields.remove(key);
		self.mutations.push(Mutation::ClearField { node: *node, key: key.to_owned() });
	}

	fn add_listener(&mut self, event: &str, listener: &Listener) {
		let sequence = self.registrations;
		match self.listeners.increment_or_insert_with((event.to_owned(), listener.clone()), || sequence) {
			Ok((_, true)) => self.registrations += 1,
			Ok((_, false)) => trace!(event, ?listener, "Listener already registered. Counting."),
			Err(_) => return error!(event, ?listener, "Too many registrations of the same listener."),
		}
		self.mutations.push(Mutation::AddListener {
			event: event.to_owned(),
			listener: listener.clone(),
		});
	}

	fn remove_listener(&mut self, event: &str, listener: &Listener) {
		if self.listeners.decrement(&(event.to_owned(), listener.clone())).is_err() {
			warn!(event, ?listener, "Tried to remove a listener that isn't registered.");
		}
		self.mutations.push(Mutation::RemoveListener {
			event: event.to_owned(),
			listener: listener.clone(),
		});
	}
}
