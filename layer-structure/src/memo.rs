use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// A lazily filled table of computed values, owned by a single snapshot.
///
/// The lock is never held while a value is computed, so computing one entry may look up others.
/// Two readers racing on the same key both compute it; the values are equal, so the second insert is harmless.
#[derive(Debug)]
pub struct Memo<K, V> {
	table: RwLock<FxHashMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
	fn default() -> Self {
		Self { table: RwLock::new(FxHashMap::default()) }
	}
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
	pub fn get(&self, key: &K) -> Option<V> {
		self.table.read().ok()?.get(key).cloned()
	}

	pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
		if let Some(value) = self.get(&key) {
			return value;
		}

		let value = compute();
		// A poisoned table only loses the cached entry
		if let Ok(mut table) = self.table.write() {
			table.insert(key, value.clone());
		}
		value
	}

	pub fn len(&self) -> usize {
		self.table.read().map(|table| table.len()).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod test {
	use super::*;

	use std::cell::Cell;

	#[test]
	fn computes_once() {
		let memo = Memo::<u32, u32>::default();
		let calls = Cell::new(0);
		let compute = || {
			calls.set(calls.get() + 1);
			42
		};

		assert_eq!(memo.get_or_insert_with(1, compute), 42);
		assert_eq!(memo.get_or_insert_with(1, compute), 42);
		assert_eq!(calls.get(), 1);
		assert_eq!(memo.len(), 1);
	}

	#[test]
	fn nested_lookups_do_not_deadlock() {
		let memo = Memo::<u32, u32>::default();
		let value = memo.get_or_insert_with(2, || memo.get_or_insert_with(1, || 1) + 1);

		assert_eq!(value, 2);
		assert_eq!(memo.get(&1), Some(1));
	}
}
