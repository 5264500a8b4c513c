//! # IDs
//! Strokes (and anything else that needs telling apart) get a process-unique ID through
//! `SketchID<T>`, namespaced by the type T. Order of IDs is not guaranteed.
//!
//! To get a fresh ID, use `SketchID<YourNamespaceTy>`'s `Default` impl.

// A RwLock'd BTreeMap from TypeId to the next available raw ID of that namespace.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is guaranteed unique within this execution of the program.
/// IDs with different types may share a value but should not be considered equal.
pub struct SketchID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for SketchID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SketchID<T> {}
impl<T: std::any::Any> PartialEq for SketchID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SketchID<T> {}

// Safety - it's just a u64.
// If T is !Send or !Sync that would be carried over to the ID even though no T is stored.
unsafe impl<T: std::any::Any> Send for SketchID<T> {}
unsafe impl<T: std::any::Any> Sync for SketchID<T> {}

impl<T: std::any::Any> std::hash::Hash for SketchID<T> {
    /// Relies on the internal representation of `TypeId`, which is unstable between compilations.
    /// Do NOT persist these hashes.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::any::TypeId::of::<T>().hash(state);
        self.id.hash(state);
    }
}

impl<T: std::any::Any> SketchID<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    fn next_raw() -> u64 {
        use std::sync::atomic::Ordering;
        let ty = std::any::TypeId::of::<T>();
        let read = ID_SERVER.upgradable_read();
        if let Some(atomic) = read.get(&ty) {
            return atomic.fetch_add(1, Ordering::Relaxed);
        }
        // First ID of this namespace. Happens once per type, so take the slow path.
        let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
        // ID of zero is invalid, hand out 1 and store 2 as next.
        write
            .entry(ty)
            .or_insert_with(|| 1.into())
            .fetch_add(1, Ordering::Relaxed)
    }
}
impl<T: std::any::Any> Default for SketchID<T> {
    fn default() -> Self {
        let raw = Self::next_raw();
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // Wrapped after u64::MAX allocations. Nothing sane to continue with.
            log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
            log::logger().flush();
            std::process::abort();
        };
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> std::fmt::Display for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element, even for empty strings.
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap_or_default();
        write!(f, "{name}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
