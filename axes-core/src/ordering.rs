//! Default ordering of access records: most recent `attempt_time` first.

use std::cmp::Ordering;

use crate::access::Access;

/// Comparator placing the more recent record first.
pub fn newest_first<T: Access>(a: &T, b: &T) -> Ordering {
    b.attempt_time().cmp(&a.attempt_time())
}

/// Sort records newest first. Records with equal timestamps keep their order.
pub fn sort_newest_first<T: Access>(records: &mut [T]) {
    records.sort_by(newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessLog, NewAccessLog, NewAccessRecord};
    use chrono::{Duration, TimeZone, Utc};

    fn log_at(id: i64, minutes: i64) -> AccessLog {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let access = NewAccessRecord::builder()
            .user_agent("ua")
            .http_accept("*/*")
            .path_info("/login")
            .build()
            .unwrap();
        NewAccessLog::new(access).into_log(id, base + Duration::minutes(minutes), None)
    }

    #[test]
    fn test_sort_newest_first() {
        let mut logs = vec![log_at(1, 5), log_at(2, 30), log_at(3, 0), log_at(4, 10)];
        sort_newest_first(&mut logs);

        let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
        assert!(
            logs.windows(2)
                .all(|w| w[0].attempt_time() >= w[1].attempt_time())
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_times() {
        let mut logs = vec![log_at(1, 0), log_at(2, 0), log_at(3, 1)];
        sort_newest_first(&mut logs);

        let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_empty() {
        let mut logs: Vec<AccessLog> = Vec::new();
        sort_newest_first(&mut logs);
        assert!(logs.is_empty());
    }
}
