//! In-memory views of the remote directory.
//!
//! The cache keeps one copy of every record it knows about, keyed by id, and
//! three ordered id lists over that store:
//!
//! - the page view: one server page (or a slice of the full view)
//! - the full view: every record across all pages, once materialized
//! - the display view: what is rendered, either the page view or a name
//!   filter over the full view
//!
//! Because the views only hold ids, an update is a single write to the store
//! and every view sees it. Once the full view exists it is the source for
//! page navigation as well: pages are sliced from it instead of fetched.

pub mod filter;

use std::collections::{HashMap, HashSet};

use crate::error::{Result, RosterError};
use crate::types::{Page, Record, RecordId};
use crate::view::Mode;

/// A confirmed change to apply to every view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Update(Record),
    Delete(RecordId),
}

/// Position of the page view within the directory
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageIndex {
    number: u32,
    total_pages: u32,
    ids: Vec<RecordId>,
}

#[derive(Debug, Default)]
pub struct CollectionCache {
    records: HashMap<RecordId, Record>,
    page: Option<PageIndex>,
    full: Option<Vec<RecordId>>,
    display: Vec<RecordId>,
    /// Page size used to slice the full view
    per_page: Option<u32>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the page view. In `Paginated` mode the display follows it.
    pub fn load_page(&mut self, page: Page, mode: &Mode) {
        if let Some(per_page) = page.per_page {
            self.per_page = Some(per_page);
        } else if self.per_page.is_none() && page.number == 1 && page.total_pages > 1 {
            self.per_page = u32::try_from(page.records.len()).ok().filter(|n| *n > 0);
        }

        let ids = page.records.iter().map(|r| r.id).collect();
        for record in page.records {
            self.records.insert(record.id, record);
        }
        self.page = Some(PageIndex {
            number: page.number,
            total_pages: page.total_pages,
            ids,
        });
        if !mode.is_searching() {
            self.show_page();
        }
        self.prune();
    }

    /// Store every page as the full view.
    ///
    /// `pages` must be pages `1..=total_pages` in ascending order with an
    /// agreeing `total_pages`; anything else is rejected and the previous full
    /// view (or its absence) is kept.
    pub fn materialize_full(&mut self, pages: Vec<Page>, mode: &Mode) -> Result<()> {
        let total = pages.first().map(|p| p.total_pages).unwrap_or(0);
        let complete = total >= 1
            && pages.len() == total as usize
            && pages
                .iter()
                .enumerate()
                .all(|(i, p)| p.number as usize == i + 1 && p.total_pages == total);
        if !complete {
            return Err(RosterError::Network(format!(
                "incomplete directory: expected {total} pages, got {}",
                pages.len()
            )));
        }

        if let Some(first) = pages.first() {
            self.per_page = first.per_page.or_else(|| {
                u32::try_from(first.records.len())
                    .ok()
                    .filter(|n| *n > 0 && total > 1)
            });
        }

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for record in pages.into_iter().flat_map(|p| p.records) {
            // A record shifted across a page boundary between fetches shows up twice
            if seen.insert(record.id) {
                ids.push(record.id);
                self.records.insert(record.id, record);
            }
        }
        self.full = Some(ids);

        if let Some(number) = self.page.as_ref().map(|p| p.number) {
            self.derive_page(number);
        }
        if !mode.is_searching() {
            self.show_page();
        }
        self.prune();
        Ok(())
    }

    /// Point the display at records in the full view whose name contains
    /// `term`. Only applies while searching with a materialized full view.
    pub fn apply_filter(&mut self, term: &str, mode: &Mode) -> bool {
        let Some(full) = &self.full else {
            return false;
        };
        if !mode.is_searching() {
            return false;
        }
        self.display = filter::filter_records(full.iter().filter_map(|id| self.records.get(id)), term)
            .into_iter()
            .map(|r| r.id)
            .collect();
        true
    }

    /// Apply a confirmed update or delete to every view holding the record.
    ///
    /// Returns whether any view held it. An id missing from a view is a
    /// no-op for that view. In `Paginated` mode the display follows the
    /// re-sliced page; while searching it stays the filter result.
    pub fn apply_mutation(&mut self, mutation: Mutation, mode: &Mode) -> bool {
        match mutation {
            Mutation::Update(record) => match self.records.get_mut(&record.id) {
                Some(slot) => {
                    *slot = record;
                    true
                }
                None => false,
            },
            Mutation::Delete(id) => {
                let held = self.records.remove(&id).is_some();
                if let Some(page) = &mut self.page {
                    page.ids.retain(|r| *r != id);
                }
                if let Some(full) = &mut self.full {
                    full.retain(|r| *r != id);
                }
                self.display.retain(|r| *r != id);

                if let Some(number) = self.page.as_ref().map(|p| p.number) {
                    self.derive_page(number);
                }
                if !mode.is_searching() {
                    self.show_page();
                }
                held
            }
        }
    }

    /// Rebuild the page view for `number` from the full view.
    ///
    /// The page number is clamped to the derived page count. Returns `false`
    /// (and changes nothing) when there is no full view to slice or the page
    /// size is unknown.
    pub fn derive_page(&mut self, number: u32) -> bool {
        let (Some(full), Some(per_page)) = (&self.full, self.per_page) else {
            return false;
        };
        let per_page = per_page as usize;
        let total_pages = full.len().div_ceil(per_page).max(1);
        let number = (number.max(1) as usize).min(total_pages);
        let ids = full
            .iter()
            .skip((number - 1) * per_page)
            .take(per_page)
            .copied()
            .collect();

        self.page = Some(PageIndex {
            number: number as u32,
            total_pages: total_pages as u32,
            ids,
        });
        true
    }

    /// Point the display at the page view
    pub fn show_page(&mut self) {
        self.display = self
            .page
            .as_ref()
            .map(|p| p.ids.clone())
            .unwrap_or_default();
    }

    /// Forget the full view; the next search re-materializes it
    pub fn invalidate_full(&mut self) {
        self.full = None;
        self.prune();
    }

    pub fn has_full(&self) -> bool {
        self.full.is_some()
    }

    /// Whether the full view can stand in for page fetches
    pub fn can_derive_pages(&self) -> bool {
        self.full.is_some() && self.per_page.is_some()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page.as_ref().map(|p| p.number)
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.page.as_ref().map(|p| p.total_pages)
    }

    pub fn page_records(&self) -> Vec<&Record> {
        self.page
            .as_ref()
            .map(|p| self.resolve(&p.ids))
            .unwrap_or_default()
    }

    pub fn full_records(&self) -> Option<Vec<&Record>> {
        self.full.as_ref().map(|ids| self.resolve(ids))
    }

    pub fn display_records(&self) -> Vec<&Record> {
        self.resolve(&self.display)
    }

    fn resolve(&self, ids: &[RecordId]) -> Vec<&Record> {
        ids.iter().filter_map(|id| self.records.get(id)).collect()
    }

    /// Drop stored records no view refers to
    fn prune(&mut self) {
        let mut live: HashSet<RecordId> = self.display.iter().copied().collect();
        if let Some(page) = &self.page {
            live.extend(page.ids.iter().copied());
        }
        if let Some(full) = &self.full {
            live.extend(full.iter().copied());
        }
        self.records.retain(|id, _| live.contains(id));
    }
}
