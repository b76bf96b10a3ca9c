//! The descriptor cache.
//!
//! One slot per [`DescriptorKey`], with an explicit in-flight state: the
//! first requester of a key resolves it, any concurrent requester parks
//! on a condvar and reuses the winner's result instead of re-running the
//! rule pipeline. All mutation is insert-if-absent; a failed resolution
//! clears its slot and wakes waiters so a later request can retry.
//!
//! Two storage tiers mirror the eligibility rules: `Cached` entries
//! survive [`DescriptorCache::begin_session`], `Session` entries are
//! dropped by it. Project-local types always land in the session tier,
//! so they are deduplicated within a session but recomputed on the first
//! request of the next one.

use std::sync::Arc;

use armature_model::{Descriptor, DescriptorKey};
use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

/// Which tier a resolved descriptor was admitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
	/// Survives session boundaries (cache-eligible library types).
	Cached,
	/// Deduplicated within the current session only.
	Session,
}

enum Slot {
	Resolving,
	Ready { descriptor: Arc<Descriptor>, tier: CacheTier },
}

/// Outcome of a cache lookup.
pub enum CacheOutcome {
	/// A resolved descriptor was found (or a concurrent resolution was
	/// awaited).
	Hit(Arc<Descriptor>),
	/// The caller owns resolution for this key and must call
	/// [`DescriptorCache::fulfill`] or [`DescriptorCache::abort`].
	MustResolve,
}

/// Keyed descriptor storage with at-most-one resolution in flight per
/// key.
#[derive(Default)]
pub struct DescriptorCache {
	slots: Mutex<FxHashMap<DescriptorKey, Slot>>,
	ready: Condvar,
}

impl DescriptorCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Looks up `key`, claiming resolution ownership on a miss.
	///
	/// Blocks while another requester is resolving the same key.
	pub fn get_or_begin(&self, key: &DescriptorKey) -> CacheOutcome {
		let mut slots = self.slots.lock();
		loop {
			match slots.get(key) {
				None => {
					slots.insert(key.clone(), Slot::Resolving);
					return CacheOutcome::MustResolve;
				}
				Some(Slot::Ready { descriptor, .. }) => {
					return CacheOutcome::Hit(descriptor.clone());
				}
				Some(Slot::Resolving) => {
					self.ready.wait(&mut slots);
				}
			}
		}
	}

	/// Publishes a resolved descriptor and wakes waiters.
	pub fn fulfill(&self, key: &DescriptorKey, descriptor: Arc<Descriptor>, tier: CacheTier) {
		let mut slots = self.slots.lock();
		slots.insert(key.clone(), Slot::Ready { descriptor, tier });
		self.ready.notify_all();
	}

	/// Clears a failed resolution's slot and wakes waiters.
	pub fn abort(&self, key: &DescriptorKey) {
		let mut slots = self.slots.lock();
		slots.remove(key);
		self.ready.notify_all();
	}

	/// Drops every session-tier entry; cached entries survive.
	pub fn begin_session(&self) {
		let mut slots = self.slots.lock();
		slots.retain(|_, slot| matches!(slot, Slot::Ready { tier: CacheTier::Cached, .. }));
	}

	/// Drops a single entry regardless of tier.
	pub fn evict(&self, key: &DescriptorKey) {
		let mut slots = self.slots.lock();
		slots.remove(key);
	}

	/// Number of resolved entries currently held.
	pub fn len(&self) -> usize {
		self.slots.lock().values().filter(|s| matches!(s, Slot::Ready { .. })).count()
	}

	/// True when no resolved entries are held.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use armature_model::{IconRef, TypeName};

	use super::*;
	use crate::merge::DescriptorBuilder;

	fn key(name: &str) -> DescriptorKey {
		DescriptorKey::component(TypeName::from(name))
	}

	fn descriptor(name: &str) -> Arc<Descriptor> {
		let builder = DescriptorBuilder::new(key(name));
		Arc::new(builder.finalize(IconRef::placeholder(), false, true))
	}

	#[test]
	fn miss_then_hit_returns_identical_instance() {
		let cache = DescriptorCache::new();
		let k = key("toolkit.Button");

		assert!(matches!(cache.get_or_begin(&k), CacheOutcome::MustResolve));
		let resolved = descriptor("toolkit.Button");
		cache.fulfill(&k, resolved.clone(), CacheTier::Cached);

		let CacheOutcome::Hit(hit) = cache.get_or_begin(&k) else {
			panic!("expected hit");
		};
		assert!(Arc::ptr_eq(&hit, &resolved));
	}

	#[test]
	fn session_tier_dropped_on_new_session() {
		let cache = DescriptorCache::new();
		let lib = key("toolkit.Button");
		let project = key("app.MainPanel");

		let CacheOutcome::MustResolve = cache.get_or_begin(&lib) else {
			panic!()
		};
		cache.fulfill(&lib, descriptor("toolkit.Button"), CacheTier::Cached);
		let CacheOutcome::MustResolve = cache.get_or_begin(&project) else {
			panic!()
		};
		cache.fulfill(&project, descriptor("app.MainPanel"), CacheTier::Session);
		assert_eq!(cache.len(), 2);

		cache.begin_session();
		assert!(matches!(cache.get_or_begin(&lib), CacheOutcome::Hit(_)));
		assert!(matches!(cache.get_or_begin(&project), CacheOutcome::MustResolve));
	}

	#[test]
	fn abort_allows_retry() {
		let cache = DescriptorCache::new();
		let k = key("toolkit.Button");

		assert!(matches!(cache.get_or_begin(&k), CacheOutcome::MustResolve));
		cache.abort(&k);
		assert!(matches!(cache.get_or_begin(&k), CacheOutcome::MustResolve));
	}

	#[test]
	fn concurrent_requesters_observe_single_resolution() {
		let cache = Arc::new(DescriptorCache::new());
		let resolutions = Arc::new(AtomicUsize::new(0));
		let k = key("toolkit.Button");

		let mut handles = Vec::new();
		for _ in 0..8 {
			let cache = cache.clone();
			let resolutions = resolutions.clone();
			let k = k.clone();
			handles.push(std::thread::spawn(move || match cache.get_or_begin(&k) {
				CacheOutcome::MustResolve => {
					resolutions.fetch_add(1, Ordering::SeqCst);
					// Hold the in-flight state long enough for the other
					// threads to park.
					std::thread::sleep(std::time::Duration::from_millis(20));
					cache.fulfill(&k, descriptor("toolkit.Button"), CacheTier::Cached);
				}
				CacheOutcome::Hit(_) => {}
			}));
		}
		for handle in handles {
			handle.join().expect("thread panicked");
		}
		assert_eq!(resolutions.load(Ordering::SeqCst), 1);
	}
}
