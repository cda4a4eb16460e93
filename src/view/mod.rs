//! The directory view controller.
//!
//! [`DirectoryView`] owns a [`ViewState`] behind a lock and a
//! [`DirectoryClient`]. Every operation follows the same shape: lock, decide
//! what to fetch and take a [`Ticket`], unlock, await the network, lock
//! again and apply the result only if the ticket is still current.
//!
//! Several operations may be in flight at once (a page fetch racing a
//! search, a delete racing a re-fetch). Generations per slot discard
//! superseded fetch results, and confirmed mutations are replayed over any
//! fetch that was issued before them.

pub mod mode;
pub mod state;
pub mod sync;

use std::time::Duration;

use jiff::Timestamp;
use parking_lot::Mutex;
use serde::Serialize;

use crate::auth::{Admission, Session, SessionStore, admit};
use crate::cache::Mutation;
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::error::{Result, RosterError};
use crate::notification::Notification;
use crate::types::{Page, Record, RecordId, RecordPatch};

pub use mode::{Mode, TermChange};
pub use state::{Slot, Ticket, ViewState};

pub const LOAD_FAILED: &str = "Failed to load users. Please try again.";
pub const SEARCH_LOAD_FAILED: &str = "Failed to load all users for search.";
pub const UPDATE_FAILED: &str = "Failed to update user.";
pub const DELETE_FAILED: &str = "Failed to delete user.";
pub const UPDATED: &str = "User updated successfully!";
pub const DELETED: &str = "User deleted successfully!";
pub const NO_USERS: &str = "No users found.";

#[derive(Debug, Clone)]
pub struct ViewSettings {
    /// How long success notifications stay live
    pub notice_ttl: Duration,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            notice_ttl: Duration::from_secs(3),
        }
    }
}

impl ViewSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            notice_ttl: config.notice_ttl(),
        }
    }
}

/// Result of trying to open the directory
pub enum Entry<C> {
    /// No session; the caller should send the user to login
    RedirectToLogin,
    Admitted(DirectoryView<C>),
}

impl<C> Entry<C> {
    pub fn into_view(self) -> Option<DirectoryView<C>> {
        match self {
            Entry::Admitted(view) => Some(view),
            Entry::RedirectToLogin => None,
        }
    }
}

/// Everything a renderer needs, copied out of the locked state
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub records: Vec<Record>,
    pub mode: Mode,
    pub page: u32,
    pub total_pages: u32,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub loading: bool,
    #[serde(skip)]
    pub notice: Option<Notification>,
}

impl ViewSnapshot {
    /// "Page {p} of {total}", or `None` while searching
    pub fn page_label(&self) -> Option<String> {
        if self.mode.is_searching() {
            None
        } else {
            Some(format!("Page {} of {}", self.page, self.total_pages))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What to do after a state decision, once the lock is released
enum Step {
    Done,
    FetchPage(u32),
    Materialize(Ticket),
    ClearSearch,
}

pub struct DirectoryView<C> {
    client: C,
    state: Mutex<ViewState>,
    settings: ViewSettings,
}

impl<C: DirectoryClient> DirectoryView<C> {
    pub fn new(client: C, session: Session, settings: ViewSettings) -> Self {
        Self {
            client,
            state: Mutex::new(ViewState::new(session)),
            settings,
        }
    }

    /// Check for a session and build the view without touching the network.
    ///
    /// `connect` builds the directory client for the admitted session; it is
    /// not called when the user must log in first.
    pub fn open<S, F>(store: &S, connect: F, settings: ViewSettings) -> Result<Entry<C>>
    where
        S: SessionStore,
        F: FnOnce(&Session) -> Result<C>,
    {
        match admit(store)? {
            Admission::RedirectToLogin => Ok(Entry::RedirectToLogin),
            Admission::Admitted(session) => {
                let client = connect(&session)?;
                Ok(Entry::Admitted(Self::new(client, session, settings)))
            }
        }
    }

    /// Open the view and load the first page.
    ///
    /// A failed first load does not fail entry; it is reported through the
    /// view's notification like any other fetch failure.
    pub async fn enter<S, F>(store: &S, connect: F, settings: ViewSettings) -> Result<Entry<C>>
    where
        S: SessionStore,
        F: FnOnce(&Session) -> Result<C>,
    {
        let entry = Self::open(store, connect, settings)?;
        if let Entry::Admitted(view) = &entry
            && let Err(e) = view.go_to_page(1).await
        {
            tracing::warn!("initial page load failed: {e}");
        }
        Ok(entry)
    }

    /// Run `f` against the current state
    pub fn inspect<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot_at(Timestamp::now())
    }

    pub fn snapshot_at(&self, now: Timestamp) -> ViewSnapshot {
        let state = self.state.lock();
        let searching = state.mode.is_searching();
        let page = state.cache.page_number().unwrap_or_else(|| state.mode.page());
        let total_pages = state.cache.total_pages().unwrap_or(page).max(1);
        ViewSnapshot {
            records: state.cache.display_records().into_iter().cloned().collect(),
            mode: state.mode.clone(),
            page,
            total_pages,
            can_go_previous: !searching && page > 1,
            can_go_next: !searching && page < total_pages,
            loading: state.is_loading(),
            notice: Notification::live(&state.notice, now).cloned(),
        }
    }

    /// Show page `number` (1-based).
    ///
    /// Slices the full view when it is materialized and fetches the page
    /// otherwise. Unavailable while searching.
    pub async fn go_to_page(&self, number: u32) -> Result<()> {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.mode.is_searching() {
                return Err(RosterError::Validation(
                    "page navigation is unavailable while searching".to_string(),
                ));
            }
            let total = state.cache.total_pages();
            if number == 0 || total.is_some_and(|t| number > t) {
                return Err(RosterError::PageOutOfRange {
                    requested: number,
                    total_pages: total.unwrap_or(1),
                });
            }
            if state.cache.can_derive_pages() {
                state.supersede(Slot::Page);
                state.cache.derive_page(number);
                state.cache.show_page();
                state.sync_page_number();
                return Ok(());
            }
        }
        self.fetch_into_page(number).await
    }

    pub async fn next_page(&self) -> Result<()> {
        let page = self.state.lock().mode.page();
        self.go_to_page(page.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> Result<()> {
        let page = self.state.lock().mode.page();
        self.go_to_page(page.saturating_sub(1)).await
    }

    /// Change the search term. A blank term leaves searching.
    pub async fn set_search_term(&self, term: &str) -> Result<()> {
        let step = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let change = state.mode.on_term(term);
            if change == TermChange::Exit {
                Step::ClearSearch
            } else {
                state.mode = state.mode.apply(&change);
                match state.mode.term().map(str::to_string) {
                    None => Step::Done,
                    Some(term) if state.cache.has_full() => {
                        state.cache.apply_filter(&term, &state.mode);
                        Step::Done
                    }
                    // The running materialization filters by the term current at completion
                    Some(_) if state.full_in_flight() => Step::Done,
                    Some(_) => Step::Materialize(state.issue(Slot::Full)),
                }
            }
        };
        self.run(step).await
    }

    /// Leave searching and show the page that was active before it.
    pub async fn clear_search(&self) -> Result<()> {
        let page = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if !state.mode.is_searching() {
                return Ok(());
            }
            let page = state.mode.page();
            state.mode = Mode::Paginated { page };
            if state.cache.can_derive_pages() {
                state.supersede(Slot::Page);
                state.cache.derive_page(page);
                state.cache.show_page();
                state.sync_page_number();
                return Ok(());
            }
            // Show the cached page while a fresh copy loads
            state.cache.show_page();
            page
        };
        self.fetch_into_page(page).await
    }

    /// Drop the full view and reload whatever the current mode shows
    pub async fn refresh(&self) -> Result<()> {
        let step = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.supersede(Slot::Full);
            state.cache.invalidate_full();
            if state.mode.is_searching() {
                Step::Materialize(state.issue(Slot::Full))
            } else {
                Step::FetchPage(state.mode.page())
            }
        };
        self.run(step).await
    }

    /// Find a record by id, materializing the full view if no current view
    /// holds it.
    pub async fn locate(&self, id: RecordId) -> Result<Record> {
        let ticket = {
            let mut state = self.state.lock();
            if let Some(record) = state.cache.get(id) {
                return Ok(record.clone());
            }
            if state.is_deleted(id) || state.cache.has_full() {
                return Err(RosterError::RecordNotFound(id));
            }
            state.issue(Slot::Full)
        };
        self.materialize(ticket).await?;
        self.state
            .lock()
            .cache
            .get(id)
            .cloned()
            .ok_or(RosterError::RecordNotFound(id))
    }

    /// Validate and send an update, then apply the merged record to every view.
    ///
    /// Nothing is sent when validation fails, and nothing changes locally
    /// when the server rejects the update.
    pub async fn update(&self, id: RecordId, patch: RecordPatch) -> Result<Record> {
        let merged = {
            let mut state = self.state.lock();
            match sync::plan_update(&state.cache, id, &patch) {
                Ok(merged) => {
                    state.begin_operation();
                    merged
                }
                Err(e) => {
                    let message = match &e {
                        RosterError::Validation(message) => message.clone(),
                        other => other.to_string(),
                    };
                    state.notify_error(&message);
                    return Err(e);
                }
            }
        };

        let result = self
            .client
            .update_record(id, &RecordPatch::from(&merged))
            .await;

        let mut state = self.state.lock();
        state.end_operation();
        match result {
            Ok(()) => {
                tracing::debug!(%id, "update confirmed");
                state.confirm(Mutation::Update(merged.clone()));
                state.notify_success(UPDATED, self.settings.notice_ttl);
                Ok(merged)
            }
            Err(e) => {
                tracing::warn!(%id, "update failed: {e}");
                state.notify_error(UPDATE_FAILED);
                Err(e)
            }
        }
    }

    /// Delete a record and remove it from every view.
    ///
    /// A record that is already deleted, or not in any view, is never sent;
    /// a second delete while the first is in flight is ignored.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.is_deleted(id) || state.cache.get(id).is_none() {
                return Err(RosterError::RecordNotFound(id));
            }
            if !state.claim_delete(id) {
                tracing::debug!(%id, "delete already in flight");
                return Ok(());
            }
            state.begin_operation();
        }

        let result = self.client.delete_record(id).await;

        let mut state = self.state.lock();
        state.end_operation();
        state.release_delete(id);
        match result {
            Ok(()) => {
                tracing::debug!(%id, "delete confirmed");
                state.confirm(Mutation::Delete(id));
                state.notify_success(DELETED, self.settings.notice_ttl);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%id, "delete failed: {e}");
                state.notify_error(DELETE_FAILED);
                Err(e)
            }
        }
    }

    async fn run(&self, step: Step) -> Result<()> {
        match step {
            Step::Done => Ok(()),
            Step::FetchPage(number) => self.fetch_into_page(number).await,
            Step::Materialize(ticket) => self.materialize(ticket).await,
            Step::ClearSearch => self.clear_search().await,
        }
    }

    async fn fetch_into_page(&self, number: u32) -> Result<()> {
        let ticket = self.state.lock().issue(Slot::Page);
        tracing::debug!(page = number, generation = ticket.generation, "fetching page");

        let result = self.client.fetch_page(number).await.and_then(|page| {
            if page.number > page.total_pages {
                Err(RosterError::PageOutOfRange {
                    requested: number,
                    total_pages: page.total_pages,
                })
            } else {
                Ok(page)
            }
        });

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !state.complete(ticket) {
            tracing::debug!(page = number, "discarding superseded page response");
            return Ok(());
        }
        match result {
            Ok(page) => {
                let page = state.reconcile(page, ticket);
                state.cache.load_page(page, &state.mode);
                state.mode.set_page(number);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(page = number, "page load failed: {e}");
                state.notify_error(LOAD_FAILED);
                Err(e)
            }
        }
    }

    async fn materialize(&self, ticket: Ticket) -> Result<()> {
        tracing::debug!(generation = ticket.generation, "materializing full directory");
        let result = self.fetch_all_pages().await;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        if !state.complete(ticket) {
            tracing::debug!("discarding superseded full directory");
            return Ok(());
        }
        let stored = match result {
            Ok(pages) => {
                let pages = pages
                    .into_iter()
                    .map(|page| state.reconcile(page, ticket))
                    .collect();
                state.cache.materialize_full(pages, &state.mode)
            }
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            tracing::warn!("full directory load failed: {e}");
            state.notify_error(SEARCH_LOAD_FAILED);
            return Err(e);
        }

        state.sync_page_number();
        if let Some(term) = state.mode.term() {
            state.cache.apply_filter(term, &state.mode);
        }
        Ok(())
    }

    /// Fetch pages `1..=total_pages`, stopping at the first failure
    async fn fetch_all_pages(&self) -> Result<Vec<Page>> {
        let first = self.client.fetch_page(1).await?;
        let total = first.total_pages;
        let mut pages = Vec::with_capacity(total as usize);
        pages.push(first);
        for number in 2..=total {
            pages.push(self.client.fetch_page(number).await?);
        }
        Ok(pages)
    }
}
