//! Readers for the two destinations file formats.
//!
//! - [`automatic`] - `*.automaticDestinations-ms`, a compound file with one link per stream,
//!   maintained by the shell itself (recent and frequent items)
//! - [`custom`] - `*.customDestinations-ms`, a sequential layout of categories written by the
//!   application (custom categories and tasks)
//!
//! Both readers contain failures at the file level: an error ends the file but never discards
//! what was already decoded. [`Destinations`] carries both the items and the reason reading
//! stopped early, if any.

pub mod automatic;
pub mod custom;

use crate::{records::LinkRecord, Error};

/// Category label of automatic destinations and unnamed custom categories
pub const RECENT_CATEGORY: &str = "Recent";
/// Category label of application tasks
pub const TASKS_CATEGORY: &str = "Tasks";

/// Items read from one destinations file
#[derive(Debug, Default)]
pub struct Destinations {
    /// Records in file order
    pub items: Vec<LinkRecord>,
    /// Why reading stopped before the end of the file
    pub error: Option<Error>,
}

impl Destinations {
    fn failed(items: Vec<LinkRecord>, error: Error) -> Destinations {
        Destinations {
            items,
            error: Some(error),
        }
    }

    /// Returns `true` if the whole file was read
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Counts the objects of one category against its item limit.
///
/// Every decoded object counts, also separators and discarded ones.
#[derive(Debug, Clone, Copy)]
struct CategoryCounter {
    count: usize,
    limit: Option<usize>,
}

impl CategoryCounter {
    fn new(limit: Option<usize>) -> CategoryCounter {
        CategoryCounter { count: 0, limit }
    }

    fn over_limit(&self) -> bool {
        self.limit.is_some_and(|limit| self.count >= limit)
    }

    fn increment(&mut self) {
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_limits() {
        let mut counter = CategoryCounter::new(Some(2));
        assert!(!counter.over_limit());
        counter.increment();
        counter.increment();
        assert!(counter.over_limit());

        let mut unlimited = CategoryCounter::new(None);
        for _ in 0..5000 {
            unlimited.increment();
        }
        assert!(!unlimited.over_limit());

        assert!(CategoryCounter::new(Some(0)).over_limit());
    }
}
