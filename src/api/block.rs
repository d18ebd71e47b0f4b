use crate::{
    error::{ApiError, is_unique_violation},
    model::{block::Block, room::Room, student::Student},
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlock {
    #[schema(example = "A Block")]
    pub block_name: String,
    #[schema(example = "BLK-A")]
    pub unique_key: String,
    #[schema(example = "#1e90ff")]
    pub theme_color: String,
}

#[derive(Serialize, ToSchema)]
pub struct RoomWithStudents {
    #[serde(flatten)]
    pub room: Room,
    pub students: Vec<Student>,
}

#[derive(Serialize, ToSchema)]
pub struct BlockWithRooms {
    #[serde(flatten)]
    pub block: Block,
    pub rooms: Vec<RoomWithStudents>,
}

#[derive(Serialize, ToSchema)]
pub struct BlockListResponse {
    pub success: bool,
    pub blocks: Vec<BlockWithRooms>,
}

/// All blocks with their rooms and each room's students, newest block first
#[utoipa::path(
    get,
    path = "/api/blocks",
    responses(
        (status = 200, description = "Every block, fully expanded", body = BlockListResponse),
        (status = 500, description = "Storage error")
    ),
    tag = "Blocks"
)]
pub async fn list_blocks(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let blocks = sqlx::query_as::<_, Block>(
        "SELECT id, block_name, block_key, block_theme, created_at
         FROM blocks ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let rooms = sqlx::query_as::<_, Room>(
        "SELECT id, room_number, floor, capacity, block_id FROM rooms",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let students = sqlx::query_as::<_, Student>("SELECT * FROM students")
        .fetch_all(pool.get_ref())
        .await?;

    // Assemble the nested shape the dashboard renders.
    let mut students_by_room: HashMap<u64, Vec<Student>> = HashMap::new();
    for student in students {
        students_by_room.entry(student.room_id).or_default().push(student);
    }

    let mut rooms_by_block: HashMap<u64, Vec<RoomWithStudents>> = HashMap::new();
    for room in rooms {
        let students = students_by_room.remove(&room.id).unwrap_or_default();
        rooms_by_block
            .entry(room.block_id)
            .or_default()
            .push(RoomWithStudents { room, students });
    }

    let blocks = blocks
        .into_iter()
        .map(|block| {
            let rooms = rooms_by_block.remove(&block.id).unwrap_or_default();
            BlockWithRooms { block, rooms }
        })
        .collect();

    Ok(HttpResponse::Ok().json(BlockListResponse {
        success: true,
        blocks,
    }))
}

/// Add a new block
#[utoipa::path(
    post,
    path = "/api/blocks",
    request_body = CreateBlock,
    responses(
        (status = 201, description = "Block created", body = Object, example = json!({
            "success": true, "message": "Block added successfully!"
        })),
        (status = 400, description = "Missing fields or duplicate block key"),
        (status = 500, description = "Storage error")
    ),
    tag = "Blocks"
)]
pub async fn create_block(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateBlock>,
) -> Result<HttpResponse, ApiError> {
    if payload.block_name.trim().is_empty()
        || payload.unique_key.trim().is_empty()
        || payload.theme_color.trim().is_empty()
    {
        return Err(ApiError::invalid("All fields are required"));
    }

    let result = sqlx::query(
        "INSERT INTO blocks (block_name, block_key, block_theme) VALUES (?, ?, ?)",
    )
    .bind(payload.block_name.trim())
    .bind(payload.unique_key.trim())
    .bind(payload.theme_color.trim())
    .execute(pool.get_ref())
    .await;

    let block_id = match result {
        Ok(res) => res.last_insert_id(),
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::invalid("Block key already exists!"));
        }
        Err(e) => return Err(e.into()),
    };

    let block = sqlx::query_as::<_, Block>(
        "SELECT id, block_name, block_key, block_theme, created_at FROM blocks WHERE id = ?",
    )
    .bind(block_id)
    .fetch_one(pool.get_ref())
    .await?;

    info!(block_id, key = %block.block_key, "Block created");
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Block added successfully!",
        "block": block,
    })))
}

/// Delete a block, its rooms, and every student in those rooms
#[utoipa::path(
    delete,
    path = "/api/blocks/{id}",
    params(("id", Path, description = "Block ID")),
    responses(
        (status = 200, description = "Cascade delete complete"),
        (status = 404, description = "Block not found"),
        (status = 500, description = "Storage error")
    ),
    tag = "Blocks"
)]
pub async fn delete_block(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let block_id = path.into_inner();

    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM blocks WHERE id = ?)")
        .bind(block_id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(ApiError::not_found("Block not found."));
    }

    // Children first: students of the block's rooms, then the rooms,
    // then the block itself.
    let students = sqlx::query(
        "DELETE FROM students WHERE room_id IN (SELECT id FROM rooms WHERE block_id = ?)",
    )
    .bind(block_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let rooms = sqlx::query("DELETE FROM rooms WHERE block_id = ?")
        .bind(block_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM blocks WHERE id = ?")
        .bind(block_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.map_err(|e| {
        error!(error = %e, block_id, "Failed to commit block cascade delete");
        ApiError::from(e)
    })?;

    info!(block_id, rooms, students, "Block cascade deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Block, rooms, and students deleted successfully!",
    })))
}
