use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubActivity {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[schema(example = "2025-03-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}
