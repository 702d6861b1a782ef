use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::store::GeoStore;

/// Shared handle to the current store generation.
///
/// Readers take a `snapshot` and keep it for the duration of one request;
/// re-ingestion builds a new `GeoStore` off to the side and `replace`s the
/// current one atomically. Snapshots already handed out stay valid.
#[derive(Debug)]
pub struct StoreHandle {
    current: ArcSwap<GeoStore>,
}

impl StoreHandle {
    pub fn new(store: GeoStore) -> Self {
        Self { current: ArcSwap::from_pointee(store) }
    }

    /// The current generation.
    #[inline] pub fn snapshot(&self) -> Arc<GeoStore> { self.current.load_full() }

    /// Swap in a new generation, returning the previous one.
    pub fn replace(&self, store: GeoStore) -> Arc<GeoStore> {
        self.current.swap(Arc::new(store))
    }
}

impl Default for StoreHandle {
    fn default() -> Self { Self::new(GeoStore::default()) }
}
