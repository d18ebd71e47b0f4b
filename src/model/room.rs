use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u64,
    pub room_number: String,
    pub floor: String,
    pub capacity: u32,
    pub block_id: u64,
}
