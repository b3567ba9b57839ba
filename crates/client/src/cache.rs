//! Normalized client cache
//!
//! Entities are stored once, keyed by kind and id, and the list query keeps
//! only the ordered keys. Optimistic toggles never overwrite a stored entity:
//! they live as pending mutation records that are overlaid when reading, and
//! each record is settled exactly once by [`NormalizedCache::confirm`] or
//! [`NormalizedCache::fail`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::api::{TaskEntity, TaskPatch};

/// Entity kind for tasks
pub const TASK_KIND: &str = "Task";

/// Cache key of a normalized entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    kind: &'static str,
    id: i64,
}

impl EntityKey {
    pub fn task(id: i64) -> Self {
        Self {
            kind: TASK_KIND,
            id,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Identifies one issued mutation; later mutations compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationId(u64);

/// State of a toggle mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRecord {
    /// Issued; `predicted` is shown until the record settles
    Pending {
        key: EntityKey,
        predicted: bool,
        prior: bool,
    },
    /// The server value was applied
    Confirmed { key: EntityKey, server: bool },
    /// The prediction was dropped; `restored` is the value shown again
    Failed {
        key: EntityKey,
        restored: Option<bool>,
    },
    /// The server reported the task gone; the entity was evicted
    Vanished { key: EntityKey },
    /// The entity had already left the cache, so the response was not applied
    Discarded { key: EntityKey },
}

/// Handle for an optimistic toggle that is awaiting its server response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimisticToggle {
    pub mutation: MutationId,
    pub id: i64,
    /// Value requested from the server
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingToggle {
    key: EntityKey,
    predicted: bool,
    prior: bool,
}

/// Client-local store of task entities and the list query result
#[derive(Debug, Default)]
pub struct NormalizedCache {
    entities: HashMap<EntityKey, TaskEntity>,
    list: Option<Vec<EntityKey>>,
    pending: BTreeMap<MutationId, PendingToggle>,
    next_mutation: u64,
}

impl NormalizedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a list query result.
    ///
    /// Entities are merged by key and entities the list no longer references
    /// are dropped.
    pub fn write_list(&mut self, tasks: Vec<TaskEntity>) {
        let keys: Vec<EntityKey> = tasks.iter().map(|t| EntityKey::task(t.id)).collect();
        for task in tasks {
            self.entities.insert(EntityKey::task(task.id), task);
        }
        self.entities.retain(|key, _| keys.contains(key));
        self.list = Some(keys);
    }

    /// Whether a list result has been written
    pub fn has_list(&self) -> bool {
        self.list.is_some()
    }

    /// The list query result as displayed, in stored order
    pub fn read_list(&self) -> Option<Vec<TaskEntity>> {
        let keys = self.list.as_ref()?;
        Some(keys.iter().filter_map(|key| self.read(*key)).collect())
    }

    /// An entity as displayed: the stored value with the newest pending
    /// prediction applied
    pub fn read(&self, key: EntityKey) -> Option<TaskEntity> {
        let mut entity = self.entities.get(&key)?.clone();
        if let Some(predicted) = self.latest_prediction(key) {
            entity.is_completed = predicted;
        }
        Some(entity)
    }

    /// The last server-confirmed value of an entity
    pub fn confirmed(&self, key: EntityKey) -> Option<&TaskEntity> {
        self.entities.get(&key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    /// Whether any toggle on the entity is awaiting a response
    pub fn is_pending(&self, key: EntityKey) -> bool {
        self.pending.values().any(|p| p.key == key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Current record of an unsettled mutation
    pub fn record(&self, mutation: MutationId) -> Option<MutationRecord> {
        self.pending.get(&mutation).map(|p| MutationRecord::Pending {
            key: p.key,
            predicted: p.predicted,
            prior: p.prior,
        })
    }

    /// Start an optimistic toggle of the displayed completion flag.
    ///
    /// Returns `None` when the task is not cached; there is nothing to patch.
    pub fn begin_toggle(&mut self, id: i64) -> Option<OptimisticToggle> {
        let key = EntityKey::task(id);
        let prior = self.read(key)?.is_completed;
        let predicted = !prior;

        let mutation = MutationId(self.next_mutation);
        self.next_mutation += 1;
        self.pending.insert(
            mutation,
            PendingToggle {
                key,
                predicted,
                prior,
            },
        );
        debug!("Optimistic toggle {} -> {}", key, predicted);

        Some(OptimisticToggle {
            mutation,
            id,
            is_completed: predicted,
        })
    }

    /// Settle a toggle with the server response.
    ///
    /// `None` means the server no longer has the task. The server value
    /// always replaces the stored value, whatever was predicted.
    pub fn confirm(&mut self, mutation: MutationId, server: Option<TaskPatch>) -> Option<MutationRecord> {
        let pending = self.pending.remove(&mutation)?;
        let key = pending.key;

        let Some(patch) = server else {
            self.evict(key);
            debug!("{} vanished on the server", key);
            return Some(MutationRecord::Vanished { key });
        };

        match self.entities.get_mut(&key) {
            Some(entity) if patch.id == key.id() => {
                entity.is_completed = patch.is_completed;
                Some(MutationRecord::Confirmed {
                    key,
                    server: patch.is_completed,
                })
            }
            _ => {
                debug!("Discarding response for stale {}", key);
                Some(MutationRecord::Discarded { key })
            }
        }
    }

    /// Settle a toggle that the server rejected or never answered
    pub fn fail(&mut self, mutation: MutationId) -> Option<MutationRecord> {
        let pending = self.pending.remove(&mutation)?;
        let key = pending.key;
        let restored = self.read(key).map(|e| e.is_completed);
        Some(MutationRecord::Failed { key, restored })
    }

    fn latest_prediction(&self, key: EntityKey) -> Option<bool> {
        self.pending
            .values()
            .rev()
            .find(|p| p.key == key)
            .map(|p| p.predicted)
    }

    fn evict(&mut self, key: EntityKey) {
        self.entities.remove(&key);
        if let Some(list) = self.list.as_mut() {
            list.retain(|k| *k != key);
        }
    }
}
