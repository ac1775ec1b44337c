use chrono::{LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LocalTimeError {
    #[error("The local time {0} does not exist in timezone {1}")]
    Nonexistent(NaiveDateTime, Tz),
}

/// Interprets a wall clock time in the given timezone and returns the
/// corresponding UTC timestamp in millis.
///
/// When the wall clock time occurs twice (end of daylight saving time) the
/// later instant, i.e. the standard time reading, is used.
pub fn local_to_utc_millis(local: &NaiveDateTime, tz: &Tz) -> Result<i64, LocalTimeError> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
        LocalResult::Ambiguous(_, latest) => Ok(latest.timestamp_millis()),
        LocalResult::None => Err(LocalTimeError::Nonexistent(*local, *tz)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn it_converts_utc_as_identity() {
        let local = naive(2024, 1, 21, 15, 30);
        let ts = local_to_utc_millis(&local, &chrono_tz::UTC).unwrap();
        assert_eq!(ts, Utc.from_utc_datetime(&local).timestamp_millis());
    }

    #[test]
    fn it_converts_local_time_to_utc() {
        // Oslo is UTC+1 in January
        let local = naive(2024, 1, 21, 15, 30);
        let ts = local_to_utc_millis(&local, &chrono_tz::Europe::Oslo).unwrap();
        let expected = Utc
            .from_utc_datetime(&naive(2024, 1, 21, 14, 30))
            .timestamp_millis();
        assert_eq!(ts, expected);

        // New York is UTC-4 in July
        let local = naive(2024, 7, 1, 9, 0);
        let ts = local_to_utc_millis(&local, &chrono_tz::America::New_York).unwrap();
        let expected = Utc
            .from_utc_datetime(&naive(2024, 7, 1, 13, 0))
            .timestamp_millis();
        assert_eq!(ts, expected);
    }

    #[test]
    fn it_picks_standard_time_for_ambiguous_local_time() {
        // 01:30 happens twice in New York on 2024-11-03
        let local = naive(2024, 11, 3, 1, 30);
        let ts = local_to_utc_millis(&local, &chrono_tz::America::New_York).unwrap();
        let expected = Utc
            .from_utc_datetime(&naive(2024, 11, 3, 6, 30))
            .timestamp_millis();
        assert_eq!(ts, expected);
    }

    #[test]
    fn it_rejects_nonexistent_local_time() {
        // 02:30 is skipped in New York on 2024-03-10
        let local = naive(2024, 3, 10, 2, 30);
        assert!(local_to_utc_millis(&local, &chrono_tz::America::New_York).is_err());
    }
}
