use crate::{error::ApiError, model::activity::ClubActivity};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivity {
    #[schema(example = "Inter-hostel chess night")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "Indoor")]
    pub activity_type: Option<String>,
    #[schema(example = "2025-03-21", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Pre-uploaded image path; upload mechanics live outside this service.
    pub image_url: Option<String>,
}

/// All club activities, newest first
#[utoipa::path(
    get,
    path = "/api/activities",
    responses(
        (status = 200, description = "Activity list"),
        (status = 500, description = "Storage error")
    ),
    tag = "Activities"
)]
pub async fn list_activities(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let activities = sqlx::query_as::<_, ClubActivity>(
        "SELECT id, title, activity_type, date, description, image_url, created_at
         FROM club_activities ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "activities": activities,
    })))
}

/// Add a club activity
#[utoipa::path(
    post,
    path = "/api/activities",
    request_body = CreateActivity,
    responses(
        (status = 201, description = "Activity created"),
        (status = 400, description = "Missing title, type, or date"),
        (status = 500, description = "Storage error")
    ),
    tag = "Activities"
)]
pub async fn create_activity(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateActivity>,
) -> Result<HttpResponse, ApiError> {
    let (title, activity_type, date) = match (
        payload.title.as_deref(),
        payload.activity_type.as_deref(),
        payload.date,
    ) {
        (Some(title), Some(activity_type), Some(date))
            if !title.trim().is_empty() && !activity_type.trim().is_empty() =>
        {
            (title.trim(), activity_type.trim(), date)
        }
        _ => return Err(ApiError::invalid("Title, Type, and Date are required")),
    };

    let activity_id = sqlx::query(
        "INSERT INTO club_activities (title, activity_type, date, description, image_url)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(activity_type)
    .bind(date)
    .bind(&payload.description)
    .bind(&payload.image_url)
    .execute(pool.get_ref())
    .await?
    .last_insert_id();

    let activity = sqlx::query_as::<_, ClubActivity>(
        "SELECT id, title, activity_type, date, description, image_url, created_at
         FROM club_activities WHERE id = ?",
    )
    .bind(activity_id)
    .fetch_one(pool.get_ref())
    .await?;

    info!(activity_id, "Club activity created");
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Activity added successfully!",
        "activity": activity,
    })))
}

/// Delete a club activity
#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    params(("id", Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Activity deleted"),
        (status = 404, description = "Activity not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Activities"
)]
pub async fn delete_activity(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let activity_id = path.into_inner();

    let affected = sqlx::query("DELETE FROM club_activities WHERE id = ?")
        .bind(activity_id)
        .execute(pool.get_ref())
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(ApiError::not_found("Activity not found."));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Activity deleted successfully!",
    })))
}
