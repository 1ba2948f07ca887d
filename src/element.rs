//! Immutable descriptions of desired host nodes, and the factory functions that build them.

use crate::ValidationError;
use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
	hash::{Hash, Hasher},
	iter::FromIterator,
};
use std::{borrow::Cow, rc::Rc};

/// The reserved property key holding an element's child sequence.
pub const CHILDREN: &str = "children";

/// The property key carrying a text element's content.
pub const NODE_VALUE: &str = "nodeValue";

/// Whether `key` names an event listener, i.e. starts with `on`.
#[must_use]
pub fn is_listener(key: &str) -> bool {
	key.starts_with("on")
}

/// Whether `key` names an attribute: Anything that's neither a listener nor [`CHILDREN`].
#[must_use]
pub fn is_attribute(key: &str) -> bool {
	!is_listener(key) && key != CHILDREN
}

/// Derives the event name for a listener key by lower-casing it and stripping the `on` prefix.
///
/// `onClick` becomes `click`, `onMouseOver` becomes `mouseover`.
#[must_use]
pub fn event_name(listener_key: &str) -> String {
	listener_key.to_lowercase().chars().skip(2).collect()
}

/// An element's type: Either the text sentinel or the name of a host node type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
	Text,
	Host(Cow<'static, str>),
}
impl Tag {
	/// The type name that converts into [`Tag::Text`].
	pub const TEXT_NAME: &'static str = "text";

	#[must_use]
	pub fn name(&self) -> &str {
		match self {
			Tag::Text => Self::TEXT_NAME,
			Tag::Host(name) => name,
		}
	}

	#[must_use]
	pub fn is_text(&self) -> bool {
		matches!(self, Tag::Text)
	}

	fn from_cow(name: Cow<'static, str>) -> Self {
		if name == Self::TEXT_NAME {
			Tag::Text
		} else {
			Tag::Host(name)
		}
	}
}
impl From<&'static str> for Tag {
	fn from(name: &'static str) -> Self {
		Self::from_cow(Cow::Borrowed(name))
	}
}
impl From<String> for Tag {
	fn from(name: String) -> Self {
		Self::from_cow(Cow::Owned(name))
	}
}
impl Display for Tag {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A shared event callback.
///
/// Identity is pointer identity: Clones of one [`Listener`] compare equal, separately created ones never do,
/// even if they wrap the same function.
/// The event payload is passed type-erased. Host adapters document what they pass.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&dyn Any)>);
impl Listener {
	pub fn new(callback: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(callback))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}

	fn address(&self) -> *const () {
		Rc::as_ptr(&self.0) as *const ()
	}
}
impl PartialEq for Listener {
	fn eq(&self, other: &Self) -> bool {
		self.address() == other.address()
	}
}
impl Eq for Listener {}
impl Hash for Listener {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.address().hash(state)
	}
}
impl Debug for Listener {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Listener({:p})", self.address())
	}
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Number(f64),
	Str(Cow<'static, str>),
	Listener(Listener),
	Children(Vec<Element>),
}
impl Value {
	/// A short name of the variant, for diagnostics.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "a boolean",
			Value::Number(_) => "a number",
			Value::Str(_) => "a string",
			Value::Listener(_) => "a listener",
			Value::Children(_) => "a child sequence",
		}
	}

	#[must_use]
	pub fn as_listener(&self) -> Option<&Listener> {
		match self {
			Value::Listener(listener) => Some(listener),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(value) => Some(value),
			_ => None,
		}
	}
}
/// Formats primitives the way a document would render them as text.
impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Bool(value) => Display::fmt(value, f),
			Value::Number(number) if number.is_infinite() => f.write_str(if *number > 0.0 { "Infinity" } else { "-Infinity" }),
			Value::Number(number) => Display::fmt(number, f),
			Value::Str(value) => f.write_str(value),
			Value::Listener(_) => f.write_str("[listener]"),
			Value::Children(children) => write!(f, "[{} children]", children.len()),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}
impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Number(value)
	}
}
impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Number(value.into())
	}
}
impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::Number(value.into())
	}
}
impl From<i64> for Value {
	#[allow(clippy::cast_precision_loss)]
	fn from(value: i64) -> Self {
		Value::Number(value as f64)
	}
}
impl From<usize> for Value {
	#[allow(clippy::cast_precision_loss)]
	fn from(value: usize) -> Self {
		Value::Number(value as f64)
	}
}
impl From<&'static str> for Value {
	fn from(value: &'static str) -> Self {
		Value::Str(Cow::Borrowed(value))
	}
}
impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Str(Cow::Owned(value))
	}
}
impl From<Cow<'static, str>> for Value {
	fn from(value: Cow<'static, str>) -> Self {
		Value::Str(value)
	}
}
impl From<Listener> for Value {
	fn from(value: Listener) -> Self {
		Value::Listener(value)
	}
}
impl From<Vec<Element>> for Value {
	fn from(value: Vec<Element>) -> Self {
		Value::Children(value)
	}
}
impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

/// An insertion-ordered mapping from property key to [`Value`].
///
/// Keys fall into three classes by name alone. See [`is_listener`], [`is_attribute`] and [`CHILDREN`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag(Vec<(Cow<'static, str>, Value)>);
impl PropertyBag {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces (in place) the value at `key`, returning the previous one.
	pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Option<Value> {
		let key = key.into();
		let value = value.into();
		match self.0.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => Some(core::mem::replace(existing, value)),
			None => {
				self.0.push((key, value));
				None
			}
		}
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (&**k, v))
	}

	pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.iter().filter(|(k, _)| is_attribute(k))
	}

	pub fn listeners(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.iter().filter(|(k, _)| is_listener(k))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K: Into<Cow<'static, str>>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut bag = Self::new();
		bag.extend(iter);
		bag
	}
}
impl<K: Into<Cow<'static, str>>, V: Into<Value>> Extend<(K, V)> for PropertyBag {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (k, v) in iter {
			self.insert(k, v);
		}
	}
}

/// An immutable description of one desired host node.
///
/// Cloning is cheap: The property bag is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	tag: Tag,
	props: Rc<PropertyBag>,
}
impl Element {
	/// Wraps `props` verbatim. Prefer [`create_element`], which normalises children.
	pub fn new(tag: impl Into<Tag>, props: PropertyBag) -> Self {
		Self {
			tag: tag.into(),
			props: Rc::new(props),
		}
	}

	#[must_use]
	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	#[must_use]
	pub fn props(&self) -> &PropertyBag {
		&self.props
	}

	/// The child sequence. An absent [`CHILDREN`] entry reads as empty.
	///
	/// # Errors
	///
	/// Iff the [`CHILDREN`] entry holds anything but [`Value::Children`].
	pub fn children(&self) -> Result<&[Element], ValidationError> {
		match self.props.get(CHILDREN) {
			None => Ok(&[]),
			Some(Value::Children(children)) => Ok(children),
			Some(other) => Err(ValidationError::ChildrenNotSequence {
				tag: self.tag.name().to_owned(),
				found: other.kind(),
			}),
		}
	}

	#[must_use]
	pub fn node_value(&self) -> Option<&Value> {
		self.props.get(NODE_VALUE)
	}
}

/// One argument in the child list of [`create_element`], classified when it's constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
	Element(Element),
	/// A bare value, wrapped into a text element.
	Text(Value),
	/// Renders nothing.
	Empty,
}
impl From<Element> for Child {
	fn from(element: Element) -> Self {
		Child::Element(element)
	}
}
impl From<&'static str> for Child {
	fn from(text: &'static str) -> Self {
		Child::Text(text.into())
	}
}
impl From<String> for Child {
	fn from(text: String) -> Self {
		Child::Text(text.into())
	}
}
impl From<f64> for Child {
	fn from(number: f64) -> Self {
		Child::Text(number.into())
	}
}
impl From<i32> for Child {
	fn from(number: i32) -> Self {
		Child::Text(number.into())
	}
}
impl From<u32> for Child {
	fn from(number: u32) -> Self {
		Child::Text(number.into())
	}
}
impl From<i64> for Child {
	fn from(number: i64) -> Self {
		Child::Text(number.into())
	}
}
impl From<usize> for Child {
	fn from(number: usize) -> Self {
		Child::Text(number.into())
	}
}
/// `false` renders nothing, `true` renders as text.
impl From<bool> for Child {
	fn from(value: bool) -> Self {
		if value {
			Child::Text(Value::Bool(true))
		} else {
			Child::Empty
		}
	}
}
impl From<()> for Child {
	fn from((): ()) -> Self {
		Child::Empty
	}
}
impl<T: Into<Child>> From<Option<T>> for Child {
	fn from(child: Option<T>) -> Self {
		child.map_or(Child::Empty, Into::into)
	}
}

/// Creates a text element with an empty child sequence.
pub fn create_text_element(value: impl Into<Value>) -> Element {
	let mut props = PropertyBag::new();
	props.insert(NODE_VALUE, value);
	props.insert(CHILDREN, Value::Children(Vec::new()));
	Element::new(Tag::Text, props)
}

/// Creates an element from `config` and a child list.
///
/// Empty children (and text children that are `null` or `false`) are dropped, remaining bare values are wrapped via [`create_text_element`].
/// Any [`CHILDREN`] entry in `config` is overwritten.
pub fn create_element(tag: impl Into<Tag>, config: PropertyBag, children: impl IntoIterator<Item = Child>) -> Element {
	let children = children
		.into_iter()
		.filter_map(|child| match child {
			Child::Element(element) => Some(element),
			Child::Text(Value::Null) | Child::Text(Value::Bool(false)) | Child::Empty => None,
			Child::Text(value) => Some(create_text_element(value)),
		})
		.collect::<Vec<_>>();

	let mut props = config;
	props.insert(CHILDREN, Value::Children(children));
	Element::new(tag, props)
}

/// Variadic shorthand for [`create_element`](`crate::create_element`).
///
/// ```
/// use real_dom::{element, Listener};
///
/// let on_click = Listener::new(|_| ());
/// let button = element!("button", { "id" => "hello", "onClick" => on_click }, "Click to say Hello");
/// let list = element!("ul", element!("li", "a"), None::<&str>, false, element!("li", "b"));
///
/// assert_eq!(button.children().unwrap().len(), 1);
/// assert_eq!(list.children().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! element {
	($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)* $(,)?) => {{
		#[allow(unused_mut)]
		let mut config = $crate::PropertyBag::new();
		$(config.insert($key, $value);)*
		let children: ::std::vec::Vec<$crate::Child> = ::std::vec![$($crate::Child::from($child)),*];
		$crate::create_element($tag, config, children)
	}};
	($tag:expr $(, $child:expr)* $(,)?) => {{
		let children: ::std::vec::Vec<$crate::Child> = ::std::vec![$($crate::Child::from($child)),*];
		$crate::create_element($tag, $crate::PropertyBag::new(), children)
	}};
}
