use crate::config::Config;
use crate::utils::clock;
use anyhow::Context;
use chrono::NaiveDate;
use futures_util::TryStreamExt;
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::is_unique_violation;
use crate::model::attendance::AttendanceStatus;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub marked_absent: u64,
    pub already_recorded: u64,
    pub failed: u64,
}

/// Backfill an `Absent` row for every student with no attendance record on
/// `day`. Idempotent: the unique (student_id, date) key turns repeat runs
/// into no-ops. Per-student failures are counted and logged, not fatal;
/// only a roster fetch failure aborts the run.
pub async fn run_nightly_sweep(pool: &MySqlPool, day: NaiveDate) -> anyhow::Result<SweepSummary> {
    let mut roster = sqlx::query_scalar::<_, u64>("SELECT id FROM students").fetch(pool);

    let mut summary = SweepSummary::default();

    loop {
        let student_id = match roster.try_next().await {
            Ok(Some(id)) => id,
            Ok(None) => break,
            Err(e) => return Err(e).context("Failed to fetch student roster"),
        };

        let result = sqlx::query(
            "INSERT INTO attendance (student_id, date, status) VALUES (?, ?, ?)",
        )
        .bind(student_id)
        .bind(day)
        .bind(AttendanceStatus::Absent)
        .execute(pool)
        .await;

        match result {
            Ok(_) => summary.marked_absent += 1,
            // The student already has a row for the day, manual or swept.
            Err(e) if is_unique_violation(&e) => summary.already_recorded += 1,
            Err(e) => {
                warn!(error = %e, student_id, %day, "Failed to mark student absent");
                summary.failed += 1;
            }
        }
    }

    info!(
        %day,
        marked_absent = summary.marked_absent,
        already_recorded = summary.already_recorded,
        failed = summary.failed,
        "Nightly absence sweep complete"
    );

    Ok(summary)
}

/// Timer loop driving the sweep at the configured local time (23:59 by
/// default). Spawned once from `main`; the sweep itself takes the target
/// day as a parameter so it stays independently callable.
pub async fn schedule_nightly_sweep(pool: MySqlPool, config: Config) {
    loop {
        let now = clock::local_now(config.tz_offset_minutes);
        let fire_at = clock::next_sweep(now, config.sweep_hour, config.sweep_minute);
        let wait = (fire_at - now)
            .to_std()
            .unwrap_or(Duration::from_secs(0));

        info!(%fire_at, "Next absence sweep scheduled");
        actix_web::rt::time::sleep(wait).await;

        // Sweep the day that is ending at the moment the timer fires.
        let day = clock::day_of(fire_at);
        if let Err(e) = run_nightly_sweep(&pool, day).await {
            error!(error = %e, %day, "Nightly absence sweep aborted");
        }
    }
}
