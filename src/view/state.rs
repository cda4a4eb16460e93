//! Explicit state of an open directory view.
//!
//! Everything the controller tracks between awaits lives here: the session,
//! the mode, the cache, in-flight request bookkeeping, and the current
//! notification. Methods are synchronous; the async controller locks the
//! state, calls into it, and releases the lock before awaiting the network.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use jiff::Timestamp;

use crate::auth::Session;
use crate::cache::{CollectionCache, Mutation};
use crate::notification::Notification;
use crate::types::{Page, Record, RecordId};

use super::mode::Mode;

/// The two places a fetch result can land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A single server page
    Page,
    /// A full materialization of every page
    Full,
}

/// Issued with every fetch and handed back on completion.
///
/// `generation` orders fetches within a slot; `epoch` is the mutation count
/// when the fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
    pub epoch: u64,
}

#[derive(Debug)]
pub struct ViewState {
    pub session: Session,
    pub mode: Mode,
    pub cache: CollectionCache,
    pub notice: Option<Notification>,
    generations: HashMap<Slot, u64>,
    /// Generation of the full materialization currently running, if any
    full_in_flight: Option<u64>,
    in_flight: usize,
    pending_deletes: HashSet<RecordId>,
    /// Ids deleted this session; later fetches never bring them back
    tombstones: HashSet<RecordId>,
    /// Updates applied this session, with the epoch they were applied at
    edits: HashMap<RecordId, (u64, Record)>,
    epoch: u64,
}

impl ViewState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            mode: Mode::default(),
            cache: CollectionCache::new(),
            notice: None,
            generations: HashMap::new(),
            full_in_flight: None,
            in_flight: 0,
            pending_deletes: HashSet::new(),
            tombstones: HashSet::new(),
            edits: HashMap::new(),
            epoch: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start an operation: clears a lingering error and bumps the loading count
    pub fn begin_operation(&mut self) {
        self.in_flight += 1;
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.expires_at.is_none())
        {
            self.notice = None;
        }
    }

    pub fn end_operation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn generation(&self, slot: Slot) -> u64 {
        self.generations.get(&slot).copied().unwrap_or(0)
    }

    /// Invalidate whatever is in flight for `slot` without issuing a fetch
    pub fn supersede(&mut self, slot: Slot) -> u64 {
        let next = self.generation(slot) + 1;
        self.generations.insert(slot, next);
        if slot == Slot::Full {
            self.full_in_flight = None;
        }
        next
    }

    /// Issue a fetch for `slot`, superseding any earlier one
    pub fn issue(&mut self, slot: Slot) -> Ticket {
        let generation = self.supersede(slot);
        if slot == Slot::Full {
            self.full_in_flight = Some(generation);
        }
        self.begin_operation();
        Ticket {
            slot,
            generation,
            epoch: self.epoch,
        }
    }

    pub fn full_in_flight(&self) -> bool {
        self.full_in_flight.is_some()
    }

    /// Finish a fetch. Returns whether its result may still be applied.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        self.end_operation();
        let current = self.generation(ticket.slot) == ticket.generation;
        if ticket.slot == Slot::Full && self.full_in_flight == Some(ticket.generation) {
            self.full_in_flight = None;
        }
        current
    }

    /// Bring a fetched page in line with mutations confirmed since `ticket`
    /// was issued.
    pub fn reconcile(&self, mut page: Page, ticket: Ticket) -> Page {
        page.records.retain(|r| !self.tombstones.contains(&r.id));
        for record in &mut page.records {
            if let Some((applied_at, edited)) = self.edits.get(&record.id)
                && *applied_at > ticket.epoch
            {
                *record = edited.clone();
            }
        }
        page
    }

    pub fn is_deleted(&self, id: RecordId) -> bool {
        self.tombstones.contains(&id)
    }

    /// Mark a delete as in flight. Returns `false` if one already is.
    pub fn claim_delete(&mut self, id: RecordId) -> bool {
        self.pending_deletes.insert(id)
    }

    pub fn release_delete(&mut self, id: RecordId) {
        self.pending_deletes.remove(&id);
    }

    /// Apply a server-confirmed mutation to every view and record it so that
    /// in-flight fetches cannot undo it.
    pub fn confirm(&mut self, mutation: Mutation) {
        self.epoch += 1;
        match &mutation {
            Mutation::Update(record) => {
                self.edits.insert(record.id, (self.epoch, record.clone()));
            }
            Mutation::Delete(id) => {
                self.edits.remove(id);
                self.tombstones.insert(*id);
            }
        }
        self.cache.apply_mutation(mutation, &self.mode);
        self.sync_page_number();
    }

    /// Keep the mode's page in step with the page view after re-slicing
    pub fn sync_page_number(&mut self) {
        if let Some(number) = self.cache.page_number() {
            self.mode.set_page(number);
        }
    }

    pub fn notify_success(&mut self, message: &str, ttl: Duration) {
        self.notice = Some(Notification::success(message, ttl, Timestamp::now()));
    }

    pub fn notify_error(&mut self, message: &str) {
        self.notice = Some(Notification::error(message));
    }
}
