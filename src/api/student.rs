use crate::{
    error::{ApiError, is_unique_violation},
    model::{attendance::AttendanceRecord, block::Block, room::Room, student::Student},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[schema(example = 1)]
    pub room_id: Option<u64>,
    #[schema(example = "Asha Verma")]
    pub name: Option<String>,
    pub course: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Pending")]
    pub fee_status: Option<String>,
    pub payment_method: Option<String>,
    #[schema(example = "2025-01-15", format = "date", value_type = Option<String>)]
    pub joining_date: Option<NaiveDate>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentProfileResponse {
    pub success: bool,
    pub student: Student,
    pub room: Room,
    pub block: Block,
    pub roommates: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
}

/// Add a student to a room
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Object, example = json!({
            "success": true, "message": "Student added successfully!"
        })),
        (status = 400, description = "Missing fields, full room, or taken username"),
        (status = 404, description = "Room not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Students"
)]
pub async fn create_student(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateStudent>,
) -> Result<HttpResponse, ApiError> {
    let (room_id, name, username, password) = match (
        payload.room_id,
        payload.name.as_deref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    ) {
        (Some(room_id), Some(name), Some(username), Some(password))
            if !name.trim().is_empty()
                && !username.trim().is_empty()
                && !password.is_empty() =>
        {
            (room_id, name.trim(), username.trim(), password)
        }
        _ => {
            return Err(ApiError::invalid(
                "Room, Name, Username, and Password are required.",
            ));
        }
    };

    let capacity =
        sqlx::query_scalar::<_, u32>("SELECT capacity FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::not_found("Room not found."))?;

    let occupied =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE room_id = ?")
            .bind(room_id)
            .fetch_one(pool.get_ref())
            .await?;
    if occupied >= capacity as i64 {
        return Err(ApiError::invalid("This room is already full."));
    }

    // No pre-check on the username; the unique key decides.
    let result = sqlx::query(
        "INSERT INTO students
         (room_id, name, course, department, year, email, phone,
          fee_status, payment_method, joining_date, username, password)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(room_id)
    .bind(name)
    .bind(&payload.course)
    .bind(&payload.department)
    .bind(&payload.year)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.fee_status.as_deref().unwrap_or("Pending"))
    .bind(&payload.payment_method)
    .bind(payload.joining_date)
    .bind(username)
    .bind(password)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            info!(student_id = res.last_insert_id(), room_id, "Student created");
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Student added successfully!",
            })))
        }
        Err(e) if is_unique_violation(&e) => Err(ApiError::invalid(
            "This username is already taken. Please choose another.",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Full profile: student, room, block, roommates, and the last 30
/// attendance records
#[utoipa::path(
    get,
    path = "/api/student/{id}",
    params(("id", Path, description = "Student ID")),
    responses(
        (status = 200, description = "Profile bundle", body = StudentProfileResponse),
        (status = 404, description = "Student, room, or block missing"),
        (status = 500, description = "Storage error")
    ),
    tag = "Students"
)]
pub async fn student_profile(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let student_id = path.into_inner();

    let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = ?")
        .bind(student_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found."))?;

    let room = sqlx::query_as::<_, Room>(
        "SELECT id, room_number, floor, capacity, block_id FROM rooms WHERE id = ?",
    )
    .bind(student.room_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Room not found for student."))?;

    let block = sqlx::query_as::<_, Block>(
        "SELECT id, block_name, block_key, block_theme, created_at FROM blocks WHERE id = ?",
    )
    .bind(room.block_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Block not found for room."))?;

    let roommates =
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE room_id = ? AND id != ?")
            .bind(room.id)
            .bind(student_id)
            .fetch_all(pool.get_ref())
            .await?;

    let attendance = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, date, status, check_in, check_out
         FROM attendance WHERE student_id = ?
         ORDER BY date DESC LIMIT 30",
    )
    .bind(student_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(StudentProfileResponse {
        success: true,
        student,
        room,
        block,
        roommates,
        attendance,
    }))
}

/// Remove a student
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id", Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student removed"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Students"
)]
pub async fn delete_student(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let student_id = path.into_inner();

    let affected = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(student_id)
        .execute(pool.get_ref())
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Student not found."));
    }

    info!(student_id, "Student removed");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Student removed successfully!",
    })))
}
