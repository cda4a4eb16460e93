//! In-memory stand-in for the remote directory.
//!
//! Serves pages out of a record list, logs every call, and can be told to
//! fail or to hold a response until the test releases it. A held page
//! response is computed when the request arrives, so it reflects the
//! directory as it was at issue time.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use roster::{DirectoryClient, Page, Record, RecordId, RecordPatch, Result, RosterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(u32),
    Update(RecordId, RecordPatch),
    Delete(RecordId),
}

struct Inner {
    records: Mutex<Vec<Record>>,
    per_page: usize,
    /// Whether confirmed updates and deletes change the served records
    persist: bool,
    calls: Mutex<Vec<Call>>,
    failing_pages: Mutex<HashSet<u32>>,
    fail_updates: Mutex<bool>,
    fail_deletes: Mutex<bool>,
    held_pages: Mutex<HashMap<u32, Arc<Notify>>>,
}

#[derive(Clone)]
pub struct FakeDirectory {
    inner: Arc<Inner>,
}

impl FakeDirectory {
    pub fn new(records: Vec<Record>, per_page: usize) -> Self {
        Self::build(records, per_page, true)
    }

    /// A server that answers mutations with success but never applies them
    pub fn forgetful(records: Vec<Record>, per_page: usize) -> Self {
        Self::build(records, per_page, false)
    }

    fn build(records: Vec<Record>, per_page: usize, persist: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: Mutex::new(records),
                per_page,
                persist,
                calls: Mutex::new(Vec::new()),
                failing_pages: Mutex::new(HashSet::new()),
                fail_updates: Mutex::new(false),
                fail_deletes: Mutex::new(false),
                held_pages: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().clone()
    }

    pub fn fetches(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(page) => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .count()
    }

    pub fn delete_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Delete(_)))
            .count()
    }

    pub fn fail_page(&self, page: u32, failing: bool) {
        let mut pages = self.inner.failing_pages.lock();
        if failing {
            pages.insert(page);
        } else {
            pages.remove(&page);
        }
    }

    pub fn fail_updates(&self, failing: bool) {
        *self.inner.fail_updates.lock() = failing;
    }

    pub fn fail_deletes(&self, failing: bool) {
        *self.inner.fail_deletes.lock() = failing;
    }

    /// Hold the next response for `page` until the returned handle is notified
    pub fn hold_page(&self, page: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.held_pages.lock().insert(page, gate.clone());
        gate
    }

    fn serve(&self, number: u32) -> Result<Page> {
        if self.inner.failing_pages.lock().contains(&number) {
            return Err(RosterError::Network(format!(
                "list users failed (503 Service Unavailable) for page {number}"
            )));
        }
        let records = self.inner.records.lock();
        let per_page = self.inner.per_page;
        let total_pages = records.len().div_ceil(per_page).max(1) as u32;
        let start = (number.saturating_sub(1) as usize) * per_page;
        Ok(Page {
            number,
            records: records.iter().skip(start).take(per_page).cloned().collect(),
            total_pages,
            per_page: Some(per_page as u32),
        })
    }
}

impl DirectoryClient for FakeDirectory {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        self.inner.calls.lock().push(Call::Fetch(page));
        let response = self.serve(page);
        let gate = self.inner.held_pages.lock().remove(&page);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn update_record(&self, id: RecordId, patch: &RecordPatch) -> Result<()> {
        self.inner.calls.lock().push(Call::Update(id, patch.clone()));
        if *self.inner.fail_updates.lock() {
            return Err(RosterError::Network(
                "update user failed (500 Internal Server Error)".to_string(),
            ));
        }
        if self.inner.persist {
            let mut records = self.inner.records.lock();
            if let Some(record) = records.iter_mut().find(|r| r.id == id) {
                *record = patch.apply_to(record);
            }
        }
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        self.inner.calls.lock().push(Call::Delete(id));
        if *self.inner.fail_deletes.lock() {
            return Err(RosterError::Network(
                "delete user failed (500 Internal Server Error)".to_string(),
            ));
        }
        if self.inner.persist {
            self.inner.records.lock().retain(|r| r.id != id);
        }
        Ok(())
    }
}
