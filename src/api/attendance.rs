use crate::{
    config::Config,
    error::{ApiError, is_unique_violation},
    model::attendance::{
        AttendanceRecord, AttendanceStatus, DayState, ToggleAction, presented_status,
    },
    sweeper,
    utils::clock,
};
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    #[schema(example = 42)]
    pub student_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    #[schema(example = "Checked In", value_type = String)]
    pub new_status: &'static str,
    #[schema(value_type = Option<String>)]
    pub last_action_time: Option<NaiveDateTime>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    #[schema(example = "Checked Out", value_type = String)]
    pub status: &'static str,
    #[schema(value_type = Option<String>)]
    pub last_action_time: Option<NaiveDateTime>,
}

async fn fetch_for_day(
    pool: &MySqlPool,
    student_id: u64,
    day: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, date, status, check_in, check_out
         FROM attendance WHERE student_id = ? AND date = ?",
    )
    .bind(student_id)
    .bind(day)
    .fetch_optional(pool)
    .await
}

/// One read-then-branch pass of the toggle. Returns `None` when a concurrent
/// toggle won the first-insert race, in which case the caller re-reads once.
async fn toggle_once(
    pool: &MySqlPool,
    student_id: u64,
    day: NaiveDate,
    now: NaiveDateTime,
) -> Result<Option<ToggleResponse>, ApiError> {
    let record = fetch_for_day(pool, student_id, day).await?;
    let state = DayState::of(record.as_ref());

    let reply = match ToggleAction::decide(state) {
        ToggleAction::CheckIn => {
            match record {
                // First action of the day: atomic insert-if-absent via the
                // unique (student_id, date) key.
                None => {
                    let result = sqlx::query(
                        "INSERT INTO attendance (student_id, date, status, check_in)
                         VALUES (?, ?, ?, ?)",
                    )
                    .bind(student_id)
                    .bind(day)
                    .bind(AttendanceStatus::Present)
                    .bind(now)
                    .execute(pool)
                    .await;

                    match result {
                        Ok(_) => {}
                        Err(e) if is_unique_violation(&e) => {
                            // Someone else created today's row between our
                            // read and insert; retry the read-then-branch.
                            return Ok(None);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                // Checking back in (after a check-out, or over a swept
                // absence): reopen the day and force Present.
                Some(rec) => {
                    debug!(student_id, record_id = rec.id, prior_status = %rec.status, "Re-checking in");
                    sqlx::query(
                        "UPDATE attendance
                         SET check_in = ?, check_out = NULL, status = ?
                         WHERE id = ?",
                    )
                    .bind(now)
                    .bind(AttendanceStatus::Present)
                    .bind(rec.id)
                    .execute(pool)
                    .await?;
                }
            }
            ToggleResponse {
                success: true,
                new_status: "Checked In",
                last_action_time: Some(now),
            }
        }
        ToggleAction::CheckOut => {
            let rec = record.expect("CheckOut is only decided for an existing record");
            sqlx::query("UPDATE attendance SET check_out = ? WHERE id = ?")
                .bind(now)
                .bind(rec.id)
                .execute(pool)
                .await?;
            ToggleResponse {
                success: true,
                new_status: "Checked Out",
                last_action_time: Some(now),
            }
        }
    };

    Ok(Some(reply))
}

/// Check In / Check Out button
#[utoipa::path(
    post,
    path = "/api/attendance/toggle",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Attendance toggled", body = ToggleResponse),
        (status = 400, description = "Missing studentId", body = Object, example = json!({
            "success": false, "message": "Student ID is required."
        })),
        (status = 409, description = "Lost the create race twice"),
        (status = 500, description = "Storage error")
    ),
    tag = "Attendance"
)]
pub async fn toggle_attendance(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ToggleRequest>,
) -> Result<HttpResponse, ApiError> {
    let student_id = match payload.student_id {
        Some(id) if id > 0 => id,
        _ => return Err(ApiError::invalid("Student ID is required.")),
    };

    let now = clock::local_now(config.tz_offset_minutes);
    let day = clock::day_of(now);

    // The insert race resolves after a single re-read; anything beyond that
    // means the storage layer is misbehaving.
    for _ in 0..2 {
        if let Some(reply) = toggle_once(pool.get_ref(), student_id, day, now).await? {
            info!(student_id, status = reply.new_status, "Attendance toggled");
            return Ok(HttpResponse::Ok().json(reply));
        }
        warn!(student_id, "Lost attendance create race, re-reading");
    }

    Err(ApiError::conflict(
        "Attendance record changed concurrently, please retry.",
    ))
}

/// Current check-in state for the dashboard card
#[utoipa::path(
    get,
    path = "/api/attendance/status/{student_id}",
    params(("student_id", Path, description = "Student ID")),
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 500, description = "Storage error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_status(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let student_id = path.into_inner();
    let day = clock::day_of(clock::local_now(config.tz_offset_minutes));

    let record = fetch_for_day(pool.get_ref(), student_id, day).await?;
    // An unknown student simply has no record: a valid steady state,
    // reported as Checked Out rather than 404.
    let (status, last_action_time) = presented_status(DayState::of(record.as_ref()));

    Ok(HttpResponse::Ok().json(StatusResponse {
        success: true,
        status,
        last_action_time,
    }))
}

/// Manual trigger for the nightly absence sweep
#[utoipa::path(
    post,
    path = "/api/attendance/sweep",
    responses(
        (status = 200, description = "Sweep completed", body = Object, example = json!({
            "success": true, "markedAbsent": 12, "alreadyRecorded": 30, "failed": 0
        })),
        (status = 500, description = "Roster fetch failed")
    ),
    tag = "Attendance"
)]
pub async fn run_sweep(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let day = clock::day_of(clock::local_now(config.tz_offset_minutes));
    let summary = sweeper::run_nightly_sweep(pool.get_ref(), day).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "markedAbsent": summary.marked_absent,
        "alreadyRecorded": summary.already_recorded,
        "failed": summary.failed,
    })))
}
