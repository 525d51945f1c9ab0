//! Durable key-value persistence boundary.
//!
//! The engine mirrors economy/streak/tier/milestone state to an injected
//! [`PersistenceGateway`] on every mutation and rehydrates from it at
//! construction. Implementations wrap whatever the platform offers
//! (UserDefaults, SharedPreferences, a SQLite table, a file); the engine
//! only requires get/set/remove of primitives and small blobs.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::error::StorageError;

/// Namespaced persistence keys, one per durable state field.
pub mod keys {
    pub const TOTAL_POINTS: &str = "revel.total_points";
    pub const CURRENT_STREAK: &str = "revel.current_streak";
    pub const LAST_VISIT_DATE: &str = "revel.last_visit_date";
    pub const FREEZE_USED: &str = "revel.freeze_used";
    pub const FREEZE_RESET_DATE: &str = "revel.freeze_reset_date";
    pub const UNLOCKED_TIERS: &str = "revel.unlocked_tiers";
    pub const ACHIEVED_MILESTONES: &str = "revel.achieved_milestones";

    /// Every key the engine owns, for wholesale reset.
    pub const ALL: [&str; 7] = [
        TOTAL_POINTS,
        CURRENT_STREAK,
        LAST_VISIT_DATE,
        FREEZE_USED,
        FREEZE_RESET_DATE,
        UNLOCKED_TIERS,
        ACHIEVED_MILESTONES,
    ];
}

/// A value the gateway can store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Blob(Vec<u8>),
}

impl StoredValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StoredValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            StoredValue::Blob(v) => Some(v),
            _ => None,
        }
    }
}

/// Durable key-value store contract.
///
/// Injected at engine construction, never reached through a global. A
/// failed or slow write must never block the caller's frame loop; cheap
/// synchronous stores satisfy that directly, while heavier backends should
/// buffer internally.
pub trait PersistenceGateway {
    fn get(&self, key: &str) -> Result<Option<StoredValue>>;
    fn set(&self, key: &str, value: StoredValue) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory gateway used in tests and as a default for hosts that defer
/// durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, StoredValue>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes all fail, for exercising the best-effort
    /// persistence contract.
    pub fn failing() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.lock().expect("memory store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceGateway for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self
            .values
            .lock()
            .expect("memory store poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: StoredValue) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Backend("writes disabled".to_string()));
        }
        self.values
            .lock()
            .expect("memory store poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Backend("writes disabled".to_string()));
        }
        self.values
            .lock()
            .expect("memory store poisoned")
            .remove(key);
        Ok(())
    }
}
