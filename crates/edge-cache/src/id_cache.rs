//! Known-id sets with a completeness flag.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use edge_core::Entity;
use parking_lot::RwLock;

/// Derives the tracked id of an entity.
pub type IdExtractor<E> = fn(&E) -> String;

fn primary_id<E: Entity>(entity: &E) -> String {
    entity.id().to_string()
}

#[derive(Debug, Default)]
struct IdState {
    ids: BTreeSet<String>,
    all: bool,
}

/// The set of known identifiers of one entity collection.
///
/// The completeness flag may only be raised by a caller that has just read
/// the full, unpaginated remote listing. Removing any tracked id lowers it.
pub struct EntityIdCache<E> {
    state: RwLock<IdState>,
    extractor: IdExtractor<E>,
    _entity: PhantomData<fn(&E)>,
}

impl<E: Entity> EntityIdCache<E> {
    /// Tracks entities by their primary id.
    pub fn new() -> Self {
        Self::with_extractor(primary_id::<E>)
    }

    /// Tracks entities by a different identifier, e.g. developers by email.
    pub fn with_extractor(extractor: IdExtractor<E>) -> Self {
        Self {
            state: RwLock::new(IdState::default()),
            extractor,
            _entity: PhantomData,
        }
    }

    /// Returns the id this cache tracks `entity` under.
    pub fn extract_id(&self, entity: &E) -> String {
        (self.extractor)(entity)
    }

    pub fn save_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write();
        state.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn save_entities(&self, entities: &[E]) {
        self.save_ids(entities.iter().map(|e| self.extract_id(e)));
    }

    /// Forgets the given ids. Unknown ids are ignored.
    pub fn remove_ids<S: AsRef<str>>(&self, ids: &[S]) {
        let mut state = self.state.write();
        let mut removed = false;
        for id in ids {
            removed |= state.ids.remove(id.as_ref());
        }
        if removed || state.ids.is_empty() {
            state.all = false;
        }
    }

    pub fn remove_entities(&self, entities: &[E]) {
        let ids: Vec<String> = entities.iter().map(|e| self.extract_id(e)).collect();
        self.remove_ids(&ids);
    }

    /// Known ids in ascending order.
    pub fn get_ids(&self) -> Vec<String> {
        self.state.read().ids.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().ids.contains(id)
    }

    pub fn all_ids_in_cache(&self, all: bool) {
        self.state.write().all = all;
    }

    pub fn is_all_ids_in_cache(&self) -> bool {
        self.state.read().all
    }

    /// Forgets every id and lowers the completeness flag.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.ids.clear();
        state.all = false;
    }
}

impl<E: Entity> Default for EntityIdCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EntityIdCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("EntityIdCache")
            .field("ids", &state.ids.len())
            .field("all", &state.all)
            .finish()
    }
}
