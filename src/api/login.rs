use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// "admin" or "student"
    #[schema(example = "student")]
    pub role: String,
}

/// Role-gated login for the admin and student dashboards.
/// Credential storage and comparison stay plaintext, as inherited.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "message": "Login successful", "redirect": "/student.html", "studentId": 7
        })),
        (status = 400, description = "Invalid role selected"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Storage error")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    match payload.role.as_str() {
        "admin" => {
            let found = sqlx::query_scalar::<_, u64>(
                "SELECT id FROM users WHERE username = ? AND password = ?",
            )
            .bind(&payload.username)
            .bind(&payload.password)
            .fetch_optional(pool.get_ref())
            .await?;

            match found {
                Some(_) => Ok(HttpResponse::Ok().json(json!({
                    "message": "Login successful",
                    "redirect": "/admin.html",
                }))),
                None => {
                    warn!(username = %payload.username, "Rejected admin login");
                    Ok(HttpResponse::Unauthorized().json(json!({
                        "message": "Invalid Admin credentials",
                    })))
                }
            }
        }
        "student" => {
            let found = sqlx::query_scalar::<_, u64>(
                "SELECT id FROM students WHERE username = ? AND password = ?",
            )
            .bind(&payload.username)
            .bind(&payload.password)
            .fetch_optional(pool.get_ref())
            .await?;

            match found {
                Some(student_id) => Ok(HttpResponse::Ok().json(json!({
                    "message": "Login successful",
                    "redirect": "/student.html",
                    "studentId": student_id,
                }))),
                None => {
                    warn!(username = %payload.username, "Rejected student login");
                    Ok(HttpResponse::Unauthorized().json(json!({
                        "message": "Invalid Student credentials",
                    })))
                }
            }
        }
        _ => Ok(HttpResponse::BadRequest().json(json!({
            "message": "Invalid role selected",
        }))),
    }
}

/// Seed the default admin account on boot when none exists.
pub async fn ensure_default_admin(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'admin')")
            .fetch_one(pool)
            .await?;

    if !exists {
        sqlx::query("INSERT INTO users (username, password, role) VALUES ('admin', 'admin123', 'admin')")
            .execute(pool)
            .await?;
        info!("Default admin created: admin / admin123");
    }

    Ok(())
}
