use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: u64,
    pub block_name: String,
    pub block_key: String,
    pub block_theme: String,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}
