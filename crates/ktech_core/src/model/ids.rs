//! Time-derived identifiers for tasks and accounts.
//!
//! Ids are decimal epoch milliseconds. When two ids are requested within the
//! same millisecond (or the clock steps backwards) the generator bumps the
//! previous value by one, so ids stay unique and strictly increasing.

use chrono::{DateTime, TimeZone, Utc};

/// Monotonic id source seeded from the wall clock.
#[derive(Debug, Clone, Default)]
pub struct TimeIdGenerator {
    last_ms: i64,
}

impl TimeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id for the given instant.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        let next = if candidate > self.last_ms {
            candidate
        } else {
            self.last_ms.saturating_add(1)
        };
        self.last_ms = next;
        next.to_string()
    }

    /// Raises the floor so ids loaded from storage are never handed out again.
    ///
    /// Ids outside the representable timestamp range are ignored.
    pub fn observe(&mut self, existing_id: &str) {
        if let Some(at) = id_timestamp(existing_id) {
            self.last_ms = self.last_ms.max(at.timestamp_millis());
        }
    }
}

/// Recovers the creation instant encoded in a time-derived id.
///
/// Returns `None` for ids that are not epoch milliseconds (e.g. imported data).
pub fn id_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let millis = id.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::{id_timestamp, TimeIdGenerator};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ids_are_strictly_increasing_within_same_millisecond() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut ids = TimeIdGenerator::new();

        let first: i64 = ids.next_id(now).parse().unwrap();
        let second: i64 = ids.next_id(now).parse().unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn observed_ids_are_not_reissued() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let future = (now.timestamp_millis() + 10_000).to_string();
        let mut ids = TimeIdGenerator::new();
        ids.observe(&future);
        ids.observe("not-a-number");

        let next: i64 = ids.next_id(now).parse().unwrap();
        assert_eq!(next, now.timestamp_millis() + 10_001);
    }

    #[test]
    fn out_of_range_observed_ids_do_not_overflow() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut ids = TimeIdGenerator::new();
        ids.observe(&i64::MAX.to_string());

        let first: i64 = ids.next_id(now).parse().unwrap();
        let second: i64 = ids.next_id(now).parse().unwrap();
        assert_eq!(first, now.timestamp_millis());
        assert_eq!(second, first + 1);
    }

    #[test]
    fn id_timestamp_roundtrips_generated_ids() {
        let now = Utc.with_ymd_and_hms(2023, 11, 2, 8, 30, 0).unwrap();
        let id = TimeIdGenerator::new().next_id(now);
        assert_eq!(id_timestamp(&id), Some(now));
        assert_eq!(id_timestamp("abc"), None);
    }
}
