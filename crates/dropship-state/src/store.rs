//! HistoryStore — redb-backed deployment history.
//!
//! All values are JSON-serialized into redb's `&[u8]` value columns. The
//! store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Database>,
}

impl HistoryStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "history store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory history store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Record a deployment for `user_id`, stamped with the current time.
    pub fn create(&self, user_id: &str, new: NewDeployment) -> StateResult<DeploymentRecord> {
        self.create_at(user_id, new, now_ms())
    }

    pub fn create_at(
        &self,
        user_id: &str,
        new: NewDeployment,
        now_ms: u64,
    ) -> StateResult<DeploymentRecord> {
        let record = DeploymentRecord::new(user_id, new, now_ms);
        self.put(&record)?;
        Ok(record)
    }

    /// Insert or replace a record.
    pub fn put(&self, record: &DeploymentRecord) -> StateResult<()> {
        let key = record.table_key();
        let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, "deployment record stored");
        Ok(())
    }

    pub fn get(&self, user_id: &str, deployment_id: &str) -> StateResult<Option<DeploymentRecord>> {
        let key = table_key(user_id, deployment_id);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: DeploymentRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// All records for `user_id`, newest first.
    pub fn list_for_user(&self, user_id: &str) -> StateResult<Vec<DeploymentRecord>> {
        let prefix = format!("{user_id}/");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEPLOYMENTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let record: DeploymentRecord =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                // Guards against user ids that themselves contain '/'.
                if record.user_id == user_id {
                    results.push(record);
                }
            }
        }
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.deployment_id.cmp(&b.deployment_id))
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(deployment_id: &str) -> NewDeployment {
        NewDeployment {
            deployment_id: deployment_id.to_string(),
            code: "print(1)".to_string(),
            language: "Python".to_string(),
            live_url: format!("https://{deployment_id}.example.com"),
        }
    }

    #[test]
    fn create_and_get() {
        let store = HistoryStore::open_in_memory().unwrap();
        let record = store.create("alice", new("d1")).unwrap();
        assert_eq!(record.status, DeploymentStatus::Active);
        assert_eq!(store.get("alice", "d1").unwrap(), Some(record));
        assert_eq!(store.get("bob", "d1").unwrap(), None);
    }

    #[test]
    fn list_is_per_user_newest_first() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.create_at("alice", new("old"), 100).unwrap();
        store.create_at("alice", new("new"), 200).unwrap();
        store.create_at("bob", new("other"), 150).unwrap();
        store.create_at("alice/x", new("sneaky"), 300).unwrap();

        let ids: Vec<String> = store
            .list_for_user("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.deployment_id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(store.list_for_user("bob").unwrap().len(), 1);
        assert!(store.list_for_user("carol").unwrap().is_empty());
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.redb");
        {
            let store = HistoryStore::open(&path).unwrap();
            store.create("alice", new("d1")).unwrap();
        }
        let store = HistoryStore::open(&path).unwrap();
        assert_eq!(store.list_for_user("alice").unwrap().len(), 1);
    }
}
