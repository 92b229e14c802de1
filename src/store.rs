//! In-memory record store.
//!
//! # Locking
//!
//! All records live in one `Vec` behind one `Mutex`. Every operation holds
//! the lock for its whole duration, so at most one read or write is in flight
//! at any moment. Throughput is not a goal; the service expects low traffic.
//!
//! Handlers that need to inspect the store and then decode a request body
//! (update does this) take the lock once with [`Store::lock`] and work through
//! the returned [`Records`] guard. It offers the same operations as `Store`
//! and nothing else, so the backing `Vec` is never exposed.
//!
//! # Ids
//!
//! New ids come from an [`IdGenerator`]. The default, [`LastElementIds`],
//! takes the last record's numeric id plus one. Because update moves a
//! record to the end of the list, that policy can hand out an id that is
//! already taken. [`SequentialIds`] never reuses an id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::Error;
use crate::filter::Query;
use crate::model::Application;
use crate::validate::validate;

// ── Id generation ─────────────────────────────────────────────────────────────

/// Picks the id for the next created record.
///
/// Called with the store lock held, before the new record is appended.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, records: &[Application]) -> String;
}

/// Last stored record's id plus one, or `"1"` for an empty store.
///
/// A last id that is not a decimal integer counts as `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LastElementIds;

impl IdGenerator for LastElementIds {
    fn next_id(&self, records: &[Application]) -> String {
        let last = records.last().and_then(|app| app.id.parse::<u64>().ok()).unwrap_or(0);
        (last + 1).to_string()
    }
}

/// Monotonic counter. Skips past any numeric id already in the store.
#[derive(Debug, Default)]
pub struct SequentialIds {
    issued: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, records: &[Application]) -> String {
        let highest = records
            .iter()
            .filter_map(|app| app.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = self.issued.load(Ordering::Relaxed).max(highest) + 1;
        self.issued.store(next, Ordering::Relaxed);
        next.to_string()
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// The shared, lock-guarded collection of application records.
pub struct Store {
    records: Mutex<Vec<Application>>,
    ids: Box<dyn IdGenerator>,
}

impl Store {
    /// An empty store using [`LastElementIds`].
    pub fn new() -> Self {
        Self::with_ids(LastElementIds)
    }

    pub fn with_ids(ids: impl IdGenerator + 'static) -> Self {
        Self { records: Mutex::new(Vec::new()), ids: Box::new(ids) }
    }

    /// Takes the store lock. It is released when the guard drops.
    ///
    /// A panic inside a previous holder does not poison the store: every
    /// mutation validates first and then touches the `Vec` in one step.
    pub fn lock(&self) -> Records<'_> {
        Records {
            records: self.records.lock().unwrap_or_else(PoisonError::into_inner),
            ids: self.ids.as_ref(),
        }
    }

    pub fn list(&self) -> Vec<Application> {
        self.lock().list()
    }

    pub fn filter(&self, query: &Query) -> Vec<Application> {
        self.lock().filter(query)
    }

    pub fn get(&self, id: &str) -> Result<Application, Error> {
        self.lock().get(id)
    }

    pub fn create(&self, candidate: Application) -> Result<Vec<Application>, Error> {
        self.lock().create(candidate)
    }

    pub fn replace(&self, id: &str, candidate: Application) -> Result<Vec<Application>, Error> {
        self.lock().replace(id, candidate)
    }

    pub fn remove(&self, id: &str) -> Vec<Application> {
        self.lock().remove(id)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

// ── Records guard ─────────────────────────────────────────────────────────────

/// Exclusive access to the store's records for as long as it lives.
pub struct Records<'a> {
    records: MutexGuard<'a, Vec<Application>>,
    ids: &'a dyn IdGenerator,
}

impl Records<'_> {
    /// Every record, in insertion order.
    pub fn list(&self) -> Vec<Application> {
        self.records.clone()
    }

    /// Records satisfying every pair in `query`. An empty query lists all.
    pub fn filter(&self, query: &Query) -> Vec<Application> {
        if query.is_empty() {
            return self.list();
        }
        self.records.iter().filter(|app| query.matches(app)).cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Result<Application, Error> {
        self.records.iter().find(|app| app.id == id).cloned().ok_or(Error::NotFound)
    }

    /// Assigns an id, validates, and appends. Returns the updated list.
    pub fn create(&mut self, mut candidate: Application) -> Result<Vec<Application>, Error> {
        candidate.id = self.ids.next_id(&self.records);
        validate(&candidate, false)?;

        debug!(id = %candidate.id, "record created");
        self.records.push(candidate);
        Ok(self.list())
    }

    /// Replaces the record with `id` wholesale and moves it to the end.
    ///
    /// If no such record exists nothing is inserted and the current list is
    /// returned unchanged. The candidate must not carry an id of its own.
    pub fn replace(
        &mut self,
        id: &str,
        mut candidate: Application,
    ) -> Result<Vec<Application>, Error> {
        let Some(pos) = self.position(id) else {
            debug!(id, "replace of absent record ignored");
            return Ok(self.list());
        };
        validate(&candidate, true)?;

        self.records.remove(pos);
        candidate.id = id.to_owned();
        self.records.push(candidate);
        debug!(id, "record replaced");
        Ok(self.list())
    }

    /// Removes the first record with `id`, if any. Returns the updated list.
    pub fn remove(&mut self, id: &str) -> Vec<Application> {
        if let Some(pos) = self.position(id) {
            self.records.remove(pos);
            debug!(id, "record removed");
        }
        self.list()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|app| app.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Maintainer;
    use crate::validate::ValidationError;

    fn app(title: &str, version: &str) -> Application {
        Application {
            title: title.into(),
            version: version.into(),
            maintainers: vec![Maintainer::new("A", "a@x.co")],
            company: "Random Inc.".into(),
            website: "https://website.com".into(),
            source: "https://github.com/random/repo".into(),
            license: "Apache-2.0".into(),
            description: "desc".into(),
            ..Default::default()
        }
    }

    fn ids(list: &[Application]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let store = Store::new();
        let list = store.create(app("one", "1.0")).unwrap();
        assert_eq!(ids(&list), ["1"]);
        let list = store.create(app("two", "1.0")).unwrap();
        assert_eq!(ids(&list), ["1", "2"]);
    }

    #[test]
    fn create_then_get_returns_submitted_record() {
        let store = Store::new();
        let submitted = app("one", "1.0");
        store.create(submitted.clone()).unwrap();
        let got = store.get("1").unwrap();
        assert_eq!(got, Application { id: "1".into(), ..submitted });
    }

    #[test]
    fn create_rejects_invalid_without_mutating() {
        let store = Store::new();
        let err = store.create(app("", "1.0")).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::TitleRequired)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn create_ignores_payload_id() {
        let store = Store::new();
        let list = store.create(Application { id: "42".into(), ..app("one", "1.0") }).unwrap();
        assert_eq!(ids(&list), ["1"]);
    }

    #[test]
    fn get_absent_is_not_found() {
        assert!(matches!(Store::new().get("1"), Err(Error::NotFound)));
    }

    #[test]
    fn replace_overwrites_and_moves_to_end() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();
        store.create(app("two", "1.0")).unwrap();

        let list = store.replace("1", app("uno", "2.0")).unwrap();
        assert_eq!(ids(&list), ["2", "1"]);
        assert_eq!(list[1].title, "uno");
        assert_eq!(list[1].version, "2.0");
    }

    #[test]
    fn replace_absent_is_a_no_op() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();
        let list = store.replace("99", app("ninety-nine", "1.0")).unwrap();
        assert_eq!(list, store.list());
        assert_eq!(ids(&list), ["1"]);
    }

    #[test]
    fn replace_validates_before_removing() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();

        let err = store.replace("1", Application { id: "1".into(), ..app("uno", "1.0") });
        assert!(matches!(err, Err(Error::Validation(ValidationError::IdPatched))));
        let err = store.replace("1", app("uno", ""));
        assert!(matches!(err, Err(Error::Validation(ValidationError::VersionRequired))));

        assert_eq!(store.get("1").unwrap().title, "one");
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();
        store.create(app("two", "1.0")).unwrap();

        assert_eq!(ids(&store.remove("1")), ["2"]);
        assert!(matches!(store.get("1"), Err(Error::NotFound)));
        assert_eq!(ids(&store.remove("1")), ["2"]);
    }

    #[test]
    fn filter_empty_query_lists_everything() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();
        store.create(app("two", "1.0")).unwrap();
        assert_eq!(store.filter(&Query::new()), store.list());
    }

    #[test]
    fn filter_ands_fields() {
        let store = Store::new();
        store.create(app("App One", "1.0.0")).unwrap();
        store.create(app("App Two", "2.0.0")).unwrap();
        store.create(app("Other", "1.0.0")).unwrap();

        let hits = store.filter(&Query::new().with("title", "app"));
        assert_eq!(ids(&hits), ["1", "2"]);
        let hits = store.filter(&Query::new().with("title", "app").with("version", "1.0"));
        assert_eq!(ids(&hits), ["1"]);
        assert!(store.filter(&Query::new().with("stars", "5")).is_empty());
    }

    #[test]
    fn last_element_ids_can_collide_after_update() {
        let store = Store::new();
        store.create(app("one", "1.0")).unwrap();
        store.create(app("two", "1.0")).unwrap();
        store.replace("1", app("uno", "1.0")).unwrap();

        let list = store.create(app("three", "1.0")).unwrap();
        assert_eq!(ids(&list), ["2", "1", "2"]);
    }

    #[test]
    fn sequential_ids_never_reuse() {
        let store = Store::with_ids(SequentialIds::default());
        store.create(app("one", "1.0")).unwrap();
        store.create(app("two", "1.0")).unwrap();
        store.replace("1", app("uno", "1.0")).unwrap();
        store.remove("2");

        let list = store.create(app("three", "1.0")).unwrap();
        assert_eq!(ids(&list), ["1", "3"]);
    }

    #[test]
    fn last_element_ids_treats_non_numeric_as_zero() {
        let records = [Application { id: "abc".into(), ..Default::default() }];
        assert_eq!(LastElementIds.next_id(&records), "1");
        assert_eq!(LastElementIds.next_id(&[]), "1");
    }
}
