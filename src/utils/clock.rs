use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Wall-clock "now" in the hostel's fixed offset. The toggle engine and the
/// sweeper must agree on this clock, so both go through here.
pub fn local_now(tz_offset_minutes: i32) -> NaiveDateTime {
    let offset =
        FixedOffset::east_opt(tz_offset_minutes * 60).expect("TZ_OFFSET_MINUTES out of range");
    Utc::now().with_timezone(&offset).naive_local()
}

/// Local midnight of the given moment; the `date` key of attendance rows.
pub fn day_of(now: NaiveDateTime) -> NaiveDate {
    now.date()
}

/// The next moment, strictly after `after`, at which the nightly sweep fires.
pub fn next_sweep(after: NaiveDateTime, hour: u32, minute: u32) -> NaiveDateTime {
    let today_fire = after
        .date()
        .and_hms_opt(hour, minute, 0)
        .expect("sweep time out of range");
    if today_fire > after {
        today_fire
    } else {
        today_fire + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        format!("{date}T{time}").parse().unwrap()
    }

    #[rstest]
    #[case(at("2025-03-10", "08:15:00"), at("2025-03-10", "23:59:00"))]
    #[case(at("2025-03-10", "23:58:59"), at("2025-03-10", "23:59:00"))]
    // At or past the fire time, the next run is tomorrow.
    #[case(at("2025-03-10", "23:59:00"), at("2025-03-11", "23:59:00"))]
    #[case(at("2025-03-31", "23:59:30"), at("2025-04-01", "23:59:00"))]
    fn next_sweep_picks_the_next_2359(#[case] after: NaiveDateTime, #[case] expected: NaiveDateTime) {
        assert_eq!(next_sweep(after, 23, 59), expected);
    }

    #[test]
    fn day_of_strips_the_time_component() {
        let now = at("2025-03-10", "18:42:11");
        assert_eq!(day_of(now), "2025-03-10".parse::<NaiveDate>().unwrap());
    }
}
