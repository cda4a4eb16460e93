//! The search/pagination state machine.
//!
//! `Paginated` shows one server page. `Searching` shows a name filter over
//! the whole directory and remembers the page to go back to when the search
//! is cleared.

use serde::Serialize;

/// Which view feeds the display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    Paginated { page: u32 },
    Searching { term: String, return_page: u32 },
}

/// What a search-term change asks the controller to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermChange {
    /// Leave pagination and start searching for the term
    Enter(String),
    /// Keep searching with a new term over the existing full view
    Refilter(String),
    /// The term was cleared while searching; go back to pagination
    Exit,
    /// Nothing to do
    Unchanged,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Paginated { page: 1 }
    }
}

impl Mode {
    pub fn is_searching(&self) -> bool {
        matches!(self, Mode::Searching { .. })
    }

    pub fn term(&self) -> Option<&str> {
        match self {
            Mode::Searching { term, .. } => Some(term),
            Mode::Paginated { .. } => None,
        }
    }

    /// The active page, or the page a search will return to
    pub fn page(&self) -> u32 {
        match self {
            Mode::Paginated { page } => *page,
            Mode::Searching { return_page, .. } => *return_page,
        }
    }

    /// Record `page` as the active page (or the return page while searching).
    pub fn set_page(&mut self, number: u32) {
        match self {
            Mode::Paginated { page } => *page = number,
            Mode::Searching { return_page, .. } => *return_page = number,
        }
    }

    /// Classify a new search term against the current mode.
    ///
    /// A term that is empty after trimming always means "leave searching";
    /// there is no "show everything" search.
    pub fn on_term(&self, term: &str) -> TermChange {
        let blank = term.trim().is_empty();
        match self {
            Mode::Paginated { .. } if blank => TermChange::Unchanged,
            Mode::Paginated { .. } => TermChange::Enter(term.to_string()),
            Mode::Searching { .. } if blank => TermChange::Exit,
            Mode::Searching { term: current, .. } if current == term => TermChange::Unchanged,
            Mode::Searching { .. } => TermChange::Refilter(term.to_string()),
        }
    }

    /// Apply a term change, returning the resulting mode
    pub fn apply(&self, change: &TermChange) -> Mode {
        match (self, change) {
            (_, TermChange::Unchanged) => self.clone(),
            (_, TermChange::Exit) => Mode::Paginated { page: self.page() },
            (_, TermChange::Enter(term) | TermChange::Refilter(term)) => Mode::Searching {
                term: term.clone(),
                return_page: self.page(),
            },
        }
    }
}
