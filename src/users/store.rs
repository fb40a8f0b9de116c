//! In-memory user store.
//!
//! # Responsibilities
//! - Own the user collection and the identifier counter
//! - Enforce case-insensitive email uniqueness
//! - Keep identifiers monotonic, never reusing one after deletion
//!
//! # Design Decisions
//! - Not thread-safe on its own; shared as [`SharedStore`] behind one mutex
//! - Insertion order is preserved for listing
//! - A rejected operation leaves the store untouched

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;

use crate::users::model::{User, UserCandidate};

/// Store shared between request handlers.
///
/// `parking_lot::Mutex` never poisons and is never held across an `.await`.
pub type SharedStore = Arc<Mutex<UserStore>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Email must be unique.")]
    DuplicateEmail,

    #[error("user {0} not found")]
    NotFound(u64),

    #[error("user identifiers exhausted")]
    IdsExhausted,
}

#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    next_id: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap a fresh store for sharing across handlers.
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Insert a new user, assigning the next identifier.
    pub fn create(&mut self, candidate: UserCandidate) -> Result<User, StoreError> {
        if self.email_taken(candidate.email(), None) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let (username, email) = candidate.into_parts();
        let user = User {
            id,
            username,
            email,
            created_at: Utc::now(),
        };

        self.next_id = next_id;
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn list(&self) -> Vec<User> {
        self.users.clone()
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    /// Overwrite username and email; identifier and creation time are kept.
    pub fn update(&mut self, id: u64, candidate: UserCandidate) -> Result<User, StoreError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if self.email_taken(candidate.email(), Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }

        let (username, email) = candidate.into_parts();
        let user = &mut self.users[index];
        user.username = username;
        user.email = email;
        Ok(user.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;

        self.users.remove(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn email_taken(&self, email: &str, exclude: Option<u64>) -> bool {
        self.users
            .iter()
            .filter(|u| Some(u.id) != exclude)
            .any(|u| eq_ignore_case(&u.email, email))
    }

    #[cfg(test)]
    fn with_next_id(next_id: u64) -> Self {
        Self {
            users: Vec::new(),
            next_id,
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Character-for-character comparison; strings of different length never match.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && a.chars().map(fold).eq(b.chars().map(fold))
}

/// Simple uppercase fold. Characters whose uppercase form expands to several
/// characters (`ß` → `SS`) are left as they are.
fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::model::UserInput;

    fn candidate(username: &str, email: &str) -> UserCandidate {
        UserInput::new(username, email).sanitize()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = UserStore::new();
        let a = store.create(candidate("alice", "alice@example.com")).unwrap();
        let b = store.create(candidate("bob", "bob@example.com")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = UserStore::new();
        let a = store.create(candidate("alice", "alice@example.com")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(candidate("bob", "bob@example.com")).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn duplicate_email_is_case_insensitive_and_does_not_consume_an_id() {
        let mut store = UserStore::new();
        store.create(candidate("alice", "a@b.com")).unwrap();

        let err = store.create(candidate("other", "A@B.COM")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail);
        assert_eq!(err.to_string(), "Email must be unique.");
        assert_eq!(store.len(), 1);

        let next = store.create(candidate("bob", "bob@b.com")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn email_fold_is_one_to_one() {
        let mut store = UserStore::new();
        store.create(candidate("fritz", "straße@x.de")).unwrap();

        let other = store.create(candidate("franz", "STRASSE@x.de")).unwrap();
        assert_eq!(other.id, 2);

        assert_eq!(
            store.create(candidate("greta", "STRAßE@X.DE")).unwrap_err(),
            StoreError::DuplicateEmail
        );
        assert_eq!(
            store.create(candidate("otto", "Ärger@x.de")).map(|u| u.id),
            Ok(3)
        );
        assert_eq!(
            store.create(candidate("ute", "ärger@X.DE")).unwrap_err(),
            StoreError::DuplicateEmail
        );
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut store = UserStore::new();
        for (name, email) in [("carl", "c@x"), ("anna", "a@x"), ("bert", "b@x")] {
            store.create(candidate(name, email)).unwrap();
        }
        let names: Vec<_> = store.list().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["carl", "anna", "bert"]);
    }

    #[test]
    fn update_keeps_id_and_created_at() {
        let mut store = UserStore::new();
        let original = store.create(candidate("alice", "alice@example.com")).unwrap();

        let updated = store
            .update(original.id, candidate("alicia", "alicia@example.com"))
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.username, "alicia");
        assert_eq!(store.get(original.id), Some(updated));
    }

    #[test]
    fn update_may_keep_own_email_with_different_case() {
        let mut store = UserStore::new();
        let user = store.create(candidate("alice", "alice@example.com")).unwrap();
        let updated = store
            .update(user.id, candidate("alice", "ALICE@example.com"))
            .unwrap();
        assert_eq!(updated.email, "ALICE@example.com");
    }

    #[test]
    fn update_rejects_email_of_another_user() {
        let mut store = UserStore::new();
        store.create(candidate("alice", "alice@example.com")).unwrap();
        let bob = store.create(candidate("bob", "bob@example.com")).unwrap();

        let err = store
            .update(bob.id, candidate("bob", "Alice@Example.com"))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail);
        assert_eq!(store.get(bob.id).unwrap().email, "bob@example.com");
    }

    #[test]
    fn update_and_delete_unknown_id() {
        let mut store = UserStore::new();
        assert_eq!(
            store.update(7, candidate("ghost", "g@x")).unwrap_err(),
            StoreError::NotFound(7)
        );
        assert_eq!(store.delete(7).unwrap_err(), StoreError::NotFound(7));
        assert!(store.get(7).is_none());
    }

    #[test]
    fn stored_values_are_sanitized() {
        let mut store = UserStore::new();
        let user = store
            .create(candidate(" <b>dora</b> ", "dora@example.com"))
            .unwrap();
        assert_eq!(user.username, "dora");
    }

    #[test]
    fn exhausted_ids_fail_without_mutation() {
        let mut store = UserStore::with_next_id(u64::MAX);
        let err = store.create(candidate("last", "last@x")).unwrap_err();
        assert_eq!(err, StoreError::IdsExhausted);
        assert!(store.is_empty());
    }

    #[test]
    fn shared_store_serializes_concurrent_creates() {
        let store = UserStore::shared();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .lock()
                        .create(candidate("same", &format!("user{i}@x")))
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
