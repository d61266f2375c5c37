//! Shared epoch-seconds timestamps.
//!
//! A [`Timestamp`] is a handle: clones point at the same cell, so updating a
//! game's `last_launched` in place is visible through every other holder of
//! that timestamp.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const DEFAULT_DATESTAMP_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Default)]
pub struct Timestamp {
    secs: Arc<AtomicI64>,
}

impl Timestamp {
    pub fn new(secs: i64) -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(secs)),
        }
    }

    pub fn now() -> Self {
        Self::new(chrono::Utc::now().timestamp())
    }

    pub fn value(&self) -> i64 {
        self.secs.load(Ordering::Relaxed)
    }

    /// Overwrite the stored time in place.
    pub fn update(&self, secs: i64) {
        self.secs.store(secs, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.value() != 0
    }

    /// True if both handles share one cell.
    pub fn same_cell(a: &Timestamp, b: &Timestamp) -> bool {
        Arc::ptr_eq(&a.secs, &b.secs)
    }

    /// Local-time rendering with a strftime-style `format`.
    ///
    /// Zero and values outside the representable date range render as the
    /// empty string. An invalid format string renders as `"Bad format!"`
    /// instead of panicking.
    pub fn display(&self, format: &str) -> String {
        let secs = self.value();
        if secs == 0 {
            return String::new();
        }
        let Some(utc) = DateTime::from_timestamp(secs, 0) else {
            return String::new();
        };
        let mut out = String::new();
        match write!(out, "{}", utc.with_timezone(&Local).format(format)) {
            Ok(()) => out,
            Err(_) => "Bad format!".to_string(),
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for Timestamp {}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timestamp").field(&self.value()).finish()
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self::new(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_updates() {
        let a = Timestamp::new(100);
        let b = a.clone();
        a.update(200);
        assert_eq!(b.value(), 200);
        assert!(Timestamp::same_cell(&a, &b));
    }

    #[test]
    fn equal_values_are_equal_but_distinct_cells() {
        let a = Timestamp::new(5);
        let b = Timestamp::new(5);
        assert_eq!(a, b);
        assert!(!Timestamp::same_cell(&a, &b));
    }

    #[test]
    fn zero_displays_empty() {
        assert_eq!(Timestamp::new(0).display(DEFAULT_TIMESTAMP_FORMAT), "");
    }

    #[test]
    fn nonzero_displays_something() {
        let shown = Timestamp::new(1_700_000_000).display("%Y");
        assert!(shown == "2023" || shown == "2024", "got {shown}");
    }

    #[test]
    fn bad_format_does_not_panic() {
        assert_eq!(Timestamp::new(1_700_000_000).display("%Q"), "Bad format!");
    }

    #[test]
    fn out_of_range_renders_empty() {
        assert_eq!(Timestamp::new(i64::MAX).display(DEFAULT_TIMESTAMP_FORMAT), "");
        assert_eq!(Timestamp::new(i64::MIN).display(DEFAULT_DATESTAMP_FORMAT), "");
    }
}
