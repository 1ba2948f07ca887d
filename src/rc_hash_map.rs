use core::{
	borrow::Borrow,
	hash::{BuildHasher, Hash},
};
use hashbrown::{
	hash_map::{DefaultHashBuilder, Entry},
	HashMap,
};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};

/// A [`HashMap`] whose entries are reference-counted: Inserting an existing key increments its count instead,
/// and an entry is only removed once it was decremented as often as it was inserted.
#[derive(Debug)]
pub struct RcHashMap<K, C, V, S = DefaultHashBuilder>(HashMap<K, (C, V), S>)
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: BuildHasher;
impl<K, C, V, S> Default for RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: Default + BuildHasher,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, C, V, S> RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: BuildHasher,
{
	#[must_use]
	pub fn new() -> Self
	where
		S: Default,
	{
		Self(HashMap::with_hasher(S::default()))
	}

	/// Increments the count at `k`, or inserts `v()` with a count of one.
	///
	/// The returned flag is `true` iff the entry was inserted.
	///
	/// # Errors
	///
	/// Iff the count would overflow `C`. The map is unchanged in that case.
	pub fn increment_or_insert_with<F: FnOnce() -> V>(&mut self, k: K, v: F) -> Result<(&mut V, bool), CountSaturatedError> {
		match self.0.entry(k) {
			Entry::Occupied(occupied) => {
				let (c, v) = occupied.into_mut();
				*c = c.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok((v, false))
			}
			Entry::Vacant(vacant) => {
				let (_, v) = vacant.insert((C::one(), v()));
				Ok((v, true))
			}
		}
	}

	/// Decrements the count at `k`, removing the entry once the count reaches zero.
	///
	/// Returns the removed value, if any.
	///
	/// # Errors
	///
	/// Iff there is no entry for `k`.
	pub fn decrement<Q: ?Sized>(&mut self, k: &Q) -> Result<Option<V>, UnknownKeyError>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		let (c, _) = self.0.get_mut(k).ok_or(UnknownKeyError)?;
		*c = c.checked_sub(&C::one()).ok_or(UnknownKeyError)?;
		if c.is_zero() {
			Ok(self.0.remove(k).map(|(_, v)| v))
		} else {
			Ok(None)
		}
	}

	/// The current count at `k`, or zero.
	pub fn count<Q: ?Sized>(&self, k: &Q) -> C
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
		C: Clone,
	{
		self.0.get(k).map_or_else(C::zero, |(c, _)| c.clone())
	}

	/// Iterates the entries in arbitrary order, without counts.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.0.iter().map(|(k, (_, v))| (k, v))
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

#[derive(Debug)]
pub struct CountSaturatedError;

#[derive(Debug)]
pub struct UnknownKeyError;
