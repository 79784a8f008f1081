use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use models::User;

use super::{StoreError, UserRepository};

const ENTITY: &str = "user";

#[derive(Default)]
struct UserTable {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// Volatile user store keeping emails unique.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self { Self::default() }

    fn read(&self) -> Result<RwLockReadGuard<'_, UserTable>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned(ENTITY))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, UserTable>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned(ENTITY))
    }
}

impl UserRepository for InMemoryUserStore {
    fn create(&self, nickname: &str, email: &str) -> Result<User, StoreError> {
        let mut table = self.write()?;
        if table.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("user already exists".into()));
        }
        let id = table.next_id;
        let user = User::new(id, nickname, email);
        table.users.insert(id, user.clone());
        table.next_id += 1;
        Ok(user)
    }

    fn get(&self, id: i64) -> Result<User, StoreError> {
        let table = self.read()?;
        table.users.get(&id).cloned().ok_or(StoreError::NotFound(ENTITY))
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.write()?;
        table.users.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(ENTITY))
    }

    fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let table = self.read()?;
        Ok(table.users.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_store_crud() {
        let store = InMemoryUserStore::new();
        let alice = store.create("alice", "alice@example.com").unwrap();
        let bob = store.create("bob", "bob@example.com").unwrap();
        assert_eq!(alice.id, 0);
        assert_eq!(bob.id, 1);

        assert_eq!(store.get(1).unwrap(), bob);
        assert_eq!(store.list_all().unwrap().len(), 2);

        store.delete(0).unwrap();
        assert_eq!(store.get(0), Err(StoreError::NotFound("user")));
        assert_eq!(store.delete(0), Err(StoreError::NotFound("user")));

        let carol = store.create("carol", "carol@example.com").unwrap();
        assert_eq!(carol.id, 2);
    }

    #[test]
    fn duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.create("a", "same@example.com").unwrap();
        let err = store.create("b", "same@example.com").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn email_is_free_again_after_delete() {
        let store = InMemoryUserStore::new();
        let u = store.create("a", "x@example.com").unwrap();
        store.delete(u.id).unwrap();
        assert!(store.create("a", "x@example.com").is_ok());
    }

    #[test]
    fn list_is_a_snapshot() {
        let store = InMemoryUserStore::new();
        store.create("a", "a@example.com").unwrap();
        let mut snapshot = store.list_all().unwrap();
        snapshot.clear();
        store.create("b", "b@example.com").unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn concurrent_same_email_single_winner() {
        let store = InMemoryUserStore::new();
        let wins = std::sync::atomic::AtomicUsize::new(0);
        std::thread::scope(|s| {
            for i in 0..16 {
                let store = &store;
                let wins = &wins;
                s.spawn(move || {
                    if store.create(&format!("user{i}"), "race@example.com").is_ok() {
                        wins.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(wins.into_inner(), 1);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
