use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Stored per-day status. `Leave` is accepted as data but never produced by
/// the toggle engine or the sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "PascalCase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

/// One row per (student, calendar day). `uq_attendance_student_date`
/// guarantees the pair is unique.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: u64,
    pub student_id: u64,
    #[schema(example = "2025-03-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(rename = "checkInTime")]
    #[schema(value_type = Option<String>)]
    pub check_in: Option<NaiveDateTime>,
    #[serde(rename = "checkOutTime")]
    #[schema(value_type = Option<String>)]
    pub check_out: Option<NaiveDateTime>,
}

/// A student's attendance state for one day, derived once from the optional
/// row and then matched exhaustively. Replaces the implicit "which optional
/// fields are set" ladder with named states, so "never checked in" and
/// "checked out" cannot be confused inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// No row yet for the day.
    NoRecord,
    /// Currently in: `check_in` set, `check_out` not.
    CheckedIn(NaiveDateTime),
    /// Was in and left; the time is absent only for malformed rows that
    /// carry no check-in at all (e.g. a hand-edited Present row).
    CheckedOut(Option<NaiveDateTime>),
    /// Sweeper-created absence, untouched by any toggle.
    MarkedAbsent,
}

impl DayState {
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        match record {
            None => DayState::NoRecord,
            Some(rec) => match (rec.check_in, rec.check_out) {
                (Some(t), None) => DayState::CheckedIn(t),
                (None, _) if rec.status == AttendanceStatus::Absent => DayState::MarkedAbsent,
                (_, out) => DayState::CheckedOut(out),
            },
        }
    }
}

/// What the next toggle does in a given state. The cycle is
/// OUT -> IN -> OUT -> ..., with both NoRecord and MarkedAbsent behaving
/// as OUT: a check-in always overrides an absence marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    CheckIn,
    CheckOut,
}

impl ToggleAction {
    pub fn decide(state: DayState) -> Self {
        match state {
            DayState::CheckedIn(_) => ToggleAction::CheckOut,
            DayState::NoRecord | DayState::CheckedOut(_) | DayState::MarkedAbsent => {
                ToggleAction::CheckIn
            }
        }
    }
}

/// Presentation of a day state on the status endpoint.
/// `MarkedAbsent` is reported as "Checked Out" with a null time, which is
/// indistinguishable from NoRecord on the wire; kept as-is deliberately.
pub fn presented_status(state: DayState) -> (&'static str, Option<NaiveDateTime>) {
    match state {
        DayState::CheckedIn(t) => ("Checked In", Some(t)),
        DayState::CheckedOut(t) => ("Checked Out", t),
        DayState::NoRecord | DayState::MarkedAbsent => ("Checked Out", None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn t(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    fn record(
        status: AttendanceStatus,
        check_in: Option<NaiveDateTime>,
        check_out: Option<NaiveDateTime>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            student_id: 7,
            date: "2025-03-10".parse().unwrap(),
            status,
            check_in,
            check_out,
        }
    }

    #[test]
    fn no_row_derives_no_record() {
        assert_eq!(DayState::of(None), DayState::NoRecord);
    }

    #[rstest]
    #[case(
        record(AttendanceStatus::Present, Some(t("2025-03-10T08:00:00")), None),
        DayState::CheckedIn(t("2025-03-10T08:00:00"))
    )]
    #[case(
        record(
            AttendanceStatus::Present,
            Some(t("2025-03-10T08:00:00")),
            Some(t("2025-03-10T17:30:00"))
        ),
        DayState::CheckedOut(Some(t("2025-03-10T17:30:00")))
    )]
    #[case(record(AttendanceStatus::Absent, None, None), DayState::MarkedAbsent)]
    // A Leave row with no times is "out", not "absent".
    #[case(record(AttendanceStatus::Leave, None, None), DayState::CheckedOut(None))]
    fn day_state_derivation(#[case] rec: AttendanceRecord, #[case] expected: DayState) {
        assert_eq!(DayState::of(Some(&rec)), expected);
    }

    #[rstest]
    #[case(DayState::NoRecord, ToggleAction::CheckIn)]
    #[case(DayState::CheckedIn(t("2025-03-10T08:00:00")), ToggleAction::CheckOut)]
    #[case(DayState::CheckedOut(Some(t("2025-03-10T17:30:00"))), ToggleAction::CheckIn)]
    #[case(DayState::MarkedAbsent, ToggleAction::CheckIn)]
    fn toggle_decision(#[case] state: DayState, #[case] expected: ToggleAction) {
        assert_eq!(ToggleAction::decide(state), expected);
    }

    /// Simulate a day of toggles on one record: odd toggles end Checked In,
    /// even toggles end Checked Out, and the row count never grows past one.
    #[test]
    fn toggle_parity_over_a_day() {
        let mut rec: Option<AttendanceRecord> = None;
        for i in 1..=6u32 {
            let now = t(&format!("2025-03-10T0{i}:00:00"));
            rec = Some(
                match (ToggleAction::decide(DayState::of(rec.as_ref())), rec.take()) {
                    (ToggleAction::CheckIn, None) => {
                        record(AttendanceStatus::Present, Some(now), None)
                    }
                    (ToggleAction::CheckIn, Some(mut r)) => {
                        r.check_in = Some(now);
                        r.check_out = None;
                        r.status = AttendanceStatus::Present;
                        r
                    }
                    (ToggleAction::CheckOut, Some(mut r)) => {
                        r.check_out = Some(now);
                        r
                    }
                    (ToggleAction::CheckOut, None) => unreachable!("check-out without a record"),
                },
            );
            let state = DayState::of(rec.as_ref());
            if i % 2 == 1 {
                assert!(matches!(state, DayState::CheckedIn(_)), "toggle {i}");
            } else {
                assert!(matches!(state, DayState::CheckedOut(Some(_))), "toggle {i}");
            }
        }
    }

    #[test]
    fn check_in_overrides_a_swept_absence() {
        let mut rec = record(AttendanceStatus::Absent, None, None);
        assert_eq!(
            ToggleAction::decide(DayState::of(Some(&rec))),
            ToggleAction::CheckIn
        );
        rec.check_in = Some(t("2025-03-10T09:00:00"));
        rec.check_out = None;
        rec.status = AttendanceStatus::Present;
        assert_eq!(
            DayState::of(Some(&rec)),
            DayState::CheckedIn(t("2025-03-10T09:00:00"))
        );
    }

    #[rstest]
    #[case(DayState::NoRecord, "Checked Out", None)]
    #[case(DayState::CheckedIn(t("2025-03-10T08:00:00")), "Checked In", Some(t("2025-03-10T08:00:00")))]
    #[case(DayState::CheckedOut(Some(t("2025-03-10T17:30:00"))), "Checked Out", Some(t("2025-03-10T17:30:00")))]
    // Swept absence presents exactly like "no record at all".
    #[case(DayState::MarkedAbsent, "Checked Out", None)]
    fn status_projection(
        #[case] state: DayState,
        #[case] status: &str,
        #[case] time: Option<NaiveDateTime>,
    ) {
        assert_eq!(presented_status(state), (status, time));
    }
}
