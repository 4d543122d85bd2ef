//! Persistence seam for resource records.
//!
//! Routes only see `ResourceStore`; the in-memory implementation is what the
//! binary wires by default.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use wsrelay_core::error::Result;

use super::model::{Category, Item, Resource, User};

/// Offset pagination (`skip` rows, then at most `limit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    async fn create(&self, input: R::Create) -> Result<R>;
    /// Records ordered by id.
    async fn list(&self, page: Page) -> Result<Vec<R>>;
    async fn get(&self, id: u64) -> Result<Option<R>>;
    /// `None` when no record has `id`.
    async fn update(&self, id: u64, patch: R::Update) -> Result<Option<R>>;
    /// `false` when no record has `id`.
    async fn delete(&self, id: u64) -> Result<bool>;
}

/// Process-local store: `id -> record`, ids allocated from 1.
pub struct InMemoryStore<R> {
    rows: DashMap<u64, R>,
    seq: AtomicU64,
}

impl<R> InMemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }
}

impl<R> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for InMemoryStore<R> {
    async fn create(&self, input: R::Create) -> Result<R> {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        let row = R::from_create(id, input);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn list(&self, page: Page) -> Result<Vec<R>> {
        let mut rows: Vec<R> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|r| r.id());
        Ok(rows.into_iter().skip(page.skip).take(page.limit).collect())
    }

    async fn get(&self, id: u64) -> Result<Option<R>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn update(&self, id: u64, patch: R::Update) -> Result<Option<R>> {
        Ok(self.rows.get_mut(&id).map(|mut row| {
            row.apply(patch);
            row.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.rows.remove(&id).is_some())
    }
}

/// One store per resource kind.
#[derive(Clone)]
pub struct Stores {
    pub categories: Arc<dyn ResourceStore<Category>>,
    pub items: Arc<dyn ResourceStore<Item>>,
    pub users: Arc<dyn ResourceStore<User>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            categories: Arc::new(InMemoryStore::<Category>::new()),
            items: Arc::new(InMemoryStore::<Item>::new()),
            users: Arc::new(InMemoryStore::<User>::new()),
        }
    }
}
