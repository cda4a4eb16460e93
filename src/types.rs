use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RosterError;

/// Server-assigned identifier of a directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| RosterError::Validation(format!("invalid user id '{s}'")))
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// A user in the remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
}

impl Record {
    /// The `"{first_name} {last_name}"` string that searches match against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Partial set of record fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
    }

    /// Merge this patch onto `record`, leaving `record` untouched.
    pub fn apply_to(&self, record: &Record) -> Record {
        Record {
            id: record.id,
            first_name: self
                .first_name
                .clone()
                .unwrap_or_else(|| record.first_name.clone()),
            last_name: self
                .last_name
                .clone()
                .unwrap_or_else(|| record.last_name.clone()),
            email: self.email.clone().unwrap_or_else(|| record.email.clone()),
            avatar: self.avatar.clone().unwrap_or_else(|| record.avatar.clone()),
        }
    }
}

impl From<&Record> for RecordPatch {
    /// A patch carrying every editable field of `record`
    fn from(record: &Record) -> Self {
        Self {
            first_name: Some(record.first_name.clone()),
            last_name: Some(record.last_name.clone()),
            email: Some(record.email.clone()),
            avatar: Some(record.avatar.clone()),
        }
    }
}

/// One server page of the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub records: Vec<Record>,
    pub total_pages: u32,
    /// Page size reported by the server, when it reports one
    pub per_page: Option<u32>,
}
