//! Remote directory access.
//!
//! The directory is a paginated user collection behind a small REST surface:
//! `GET /api/users?page=n`, `PUT /api/users/{id}` and `DELETE /api/users/{id}`.
//! Clients are stateless: one call issues exactly one request and never
//! retries.

pub mod error;
pub mod http;

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Result, RosterError};
use crate::types::{Page, Record, RecordId, RecordPatch};

pub use http::HttpDirectoryClient;

/// Body of a successful `GET /api/users?page=n`
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    pub data: Vec<Record>,
    pub total_pages: u32,
}

impl ListResponse {
    /// Convert into a [`Page`], checking it against the page that was asked for.
    pub fn into_page(self, requested: u32) -> Result<Page> {
        let number = self.page.unwrap_or(requested);
        if number != requested {
            return Err(RosterError::Network(format!(
                "asked for page {requested} but the server returned page {number}"
            )));
        }
        // An empty directory reports zero pages; page 1 still exists.
        let total_pages = self.total_pages.max(1);
        Ok(Page {
            number,
            records: self.data,
            total_pages,
            per_page: self.per_page.filter(|n| *n > 0),
        })
    }
}

/// Request/response boundary to the remote directory
pub trait DirectoryClient: Send + Sync {
    /// Fetch one page (1-based) of the directory
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page>> + Send;

    /// Send changed fields for a record. The response body is not used.
    fn update_record(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete a record
    fn delete_record(&self, id: RecordId) -> impl Future<Output = Result<()>> + Send;
}

impl<T: DirectoryClient> DirectoryClient for Arc<T> {
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Page>> + Send {
        (**self).fetch_page(page)
    }

    fn update_record(
        &self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).update_record(id, patch)
    }

    fn delete_record(&self, id: RecordId) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_record(id)
    }
}
