//! Directory records used across integration tests.

use roster::{Record, RecordId};

pub fn user(id: u64, first: &str, last: &str) -> Record {
    Record {
        id: RecordId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

/// Four users over two pages of two. Only Janet Weaver (page 1) and
/// Byron Sanders (page 2) contain "an".
pub fn four_users() -> Vec<Record> {
    vec![
        user(1, "George", "Bluth"),
        user(2, "Janet", "Weaver"),
        user(3, "Emma", "Wong"),
        user(4, "Byron", "Sanders"),
    ]
}

pub fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().map(|r| r.id.0).collect()
}
