//! In-memory session store

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion};
use tower_sessions::SessionStore;

/// DashMap-backed record store. Records past their expiry date are never
/// returned and are dropped by [`ExpiredDeletion::delete_expired`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    records: Arc<DashMap<Id, Record>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        self.records.remove_if(id, |_, record| !is_active(record));
        Ok(self.records.get(id).map(|record| record.value().clone()))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for InMemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        self.records.retain(|_, record| is_active(record));
        Ok(())
    }
}
