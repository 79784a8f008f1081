use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use models::Ad;

use super::{AdRepository, StoreError};

const ENTITY: &str = "ad";

#[derive(Default)]
struct AdTable {
    ads: HashMap<i64, Ad>,
    next_id: i64,
}

/// Volatile ad store. Ids start at 0 and are never handed out twice.
#[derive(Default)]
pub struct InMemoryAdStore {
    inner: RwLock<AdTable>,
}

impl InMemoryAdStore {
    pub fn new() -> Self { Self::default() }

    fn read(&self) -> Result<RwLockReadGuard<'_, AdTable>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned(ENTITY))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AdTable>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned(ENTITY))
    }

    /// Apply `f` to the ad under the write guard and stamp `updated_at`.
    fn modify<F>(&self, id: i64, f: F) -> Result<Ad, StoreError>
    where
        F: FnOnce(&mut Ad),
    {
        let mut table = self.write()?;
        let ad = table.ads.get_mut(&id).ok_or(StoreError::NotFound(ENTITY))?;
        f(ad);
        ad.updated_at = Utc::now();
        Ok(ad.clone())
    }
}

impl AdRepository for InMemoryAdStore {
    fn create(&self, title: &str, text: &str, author_id: i64) -> Result<Ad, StoreError> {
        let mut table = self.write()?;
        let id = table.next_id;
        let ad = Ad::new(id, title, text, author_id, Utc::now());
        table.ads.insert(id, ad.clone());
        table.next_id += 1;
        Ok(ad)
    }

    fn get(&self, id: i64) -> Result<Ad, StoreError> {
        let table = self.read()?;
        table.ads.get(&id).cloned().ok_or(StoreError::NotFound(ENTITY))
    }

    fn get_by_title(&self, title: &str) -> Result<Ad, StoreError> {
        let table = self.read()?;
        table
            .ads
            .values()
            .find(|ad| ad.title == title)
            .cloned()
            .ok_or(StoreError::NotFound(ENTITY))
    }

    fn list_published(&self) -> Result<Vec<Ad>, StoreError> {
        let table = self.read()?;
        Ok(table.ads.values().filter(|ad| ad.published).cloned().collect())
    }

    fn update_content(&self, id: i64, title: &str, text: &str) -> Result<Ad, StoreError> {
        self.modify(id, |ad| {
            ad.title = title.to_string();
            ad.text = text.to_string();
        })
    }

    fn update_status(&self, id: i64, published: bool) -> Result<Ad, StoreError> {
        self.modify(id, |ad| ad.published = published)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.write()?;
        table.ads.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(ENTITY))
    }
}
