use std::sync::Arc;

/// Full and displayed record sets of one catalog.
///
/// `full` is replaced once per successful load and never mutated. `displayed`
/// is replaced wholesale on every load or filter, and every replacement bumps
/// the generation so indices handed out by an older render can be rejected.
#[derive(Clone, Debug)]
pub struct CatalogStore<R> {
    full: Arc<[R]>,
    displayed: Arc<[R]>,
    generation: u64,
    loaded: bool,
}

impl<R> Default for CatalogStore<R> {
    fn default() -> Self {
        Self {
            full: Arc::from(Vec::new()),
            displayed: Arc::from(Vec::new()),
            generation: 0,
            loaded: false,
        }
    }
}

impl<R: Clone> CatalogStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fresh load result. The displayed set starts as an identical copy.
    pub fn set_full(&mut self, records: Vec<R>) -> u64 {
        self.full = Arc::from(records);
        self.loaded = true;
        self.displayed = Arc::clone(&self.full);
        self.bump()
    }

    /// Drops any previous load after a failed one, invalidating rendered indices.
    pub fn mark_failed(&mut self) -> u64 {
        self.full = Arc::from(Vec::new());
        self.displayed = Arc::clone(&self.full);
        self.loaded = false;
        self.bump()
    }

    pub fn set_displayed(&mut self, records: Vec<R>) -> u64 {
        self.displayed = Arc::from(records);
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Resolves against whatever is displayed right now.
    pub fn resolve(&self, index: usize) -> Option<&R> {
        self.displayed.get(index)
    }

    /// Resolves an index captured at render time. Returns `None` when the
    /// displayed set has been replaced since that render.
    pub fn resolve_at(&self, generation: u64, index: usize) -> Option<&R> {
        if generation != self.generation {
            return None;
        }
        self.resolve(index)
    }

    pub fn full(&self) -> &[R] {
        &self.full
    }

    pub fn displayed(&self) -> &[R] {
        &self.displayed
    }

    pub fn displayed_snapshot(&self) -> Arc<[R]> {
        Arc::clone(&self.displayed)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
