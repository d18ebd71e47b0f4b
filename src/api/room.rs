use crate::{error::ApiError, model::room::Room};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    #[schema(example = "101")]
    pub room_number: String,
    #[schema(example = "1st")]
    pub floor: String,
    #[schema(example = 4)]
    pub capacity: u32,
    #[schema(example = "BLK-A")]
    pub block_key: String,
}

/// Add a room to a block, addressed by the block's unique key
#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created", body = Object, example = json!({
            "success": true, "message": "Room added successfully!"
        })),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Block not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Rooms"
)]
pub async fn create_room(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRoom>,
) -> Result<HttpResponse, ApiError> {
    if payload.room_number.trim().is_empty()
        || payload.floor.trim().is_empty()
        || payload.capacity == 0
        || payload.block_key.trim().is_empty()
    {
        return Err(ApiError::invalid("Missing required fields."));
    }

    let block_id = sqlx::query_scalar::<_, u64>("SELECT id FROM blocks WHERE block_key = ?")
        .bind(payload.block_key.trim())
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Block not found."))?;

    let room_id = sqlx::query(
        "INSERT INTO rooms (room_number, floor, capacity, block_id) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.room_number.trim())
    .bind(payload.floor.trim())
    .bind(payload.capacity)
    .bind(block_id)
    .execute(pool.get_ref())
    .await?
    .last_insert_id();

    let room = sqlx::query_as::<_, Room>(
        "SELECT id, room_number, floor, capacity, block_id FROM rooms WHERE id = ?",
    )
    .bind(room_id)
    .fetch_one(pool.get_ref())
    .await?;

    info!(room_id, block_id, "Room created");
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Room added successfully!",
        "room": room,
    })))
}

/// Delete a room and every student assigned to it
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    params(("id", Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room and its students deleted"),
        (status = 404, description = "Room not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Rooms"
)]
pub async fn delete_room(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let room_id = path.into_inner();

    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?)")
        .bind(room_id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(ApiError::not_found("Room not found."));
    }

    let students = sqlx::query("DELETE FROM students WHERE room_id = ?")
        .bind(room_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(room_id, students, "Room cascade deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Room and associated students deleted successfully!",
    })))
}
