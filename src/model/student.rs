use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    #[schema(example = "2025-01-15", format = "date", value_type = Option<String>)]
    pub joining_date: Option<NaiveDate>,
    pub fee_status: String,
    pub payment_method: Option<String>,
    pub room_id: u64,
    pub username: String,
    // Stored plaintext; never echo it in responses.
    #[serde(skip_serializing)]
    pub password: String,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}
