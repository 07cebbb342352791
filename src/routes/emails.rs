//! Email listing endpoint.

use rocket::{get, serde::json::Json};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::analyzer::Category;
use crate::db::MailGuardDb;
use crate::error::ApiError;
use crate::models::{Email, PaginatedResponse};
use crate::routes::params::EmailListParams;

/// List stored emails, newest received first, with optional category
/// filtering and pagination.
#[openapi(tag = "Emails")]
#[get("/emails?<params..>")]
pub async fn list_emails(
    mut db: Connection<MailGuardDb>,
    params: Option<EmailListParams>,
) -> Result<Json<PaginatedResponse<Email>>, ApiError> {
    let params = params.unwrap_or_default();
    let page = params.page();
    let size = params.size();
    let offset = params.offset();

    let category = params.category_filter();
    if let Some(name) = category.as_deref() {
        if Category::from_name(name).is_none() {
            return Err(ApiError::BadRequest(format!(
                "unknown category '{name}'; expected one of safe, suspicious, spam, phishing, unknown"
            )));
        }
    }

    let (total, emails) = match category {
        Some(category) => {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE category = $1")
                .bind(&category)
                .fetch_one(&mut **db)
                .await?;

            let emails = sqlx::query_as::<_, Email>(
                r#"
                SELECT id, title, content, from_email, to_email, received_time,
                       category, category_id, confidence_score, level,
                       suspicious_indicators, created_at
                FROM emails
                WHERE category = $1
                ORDER BY received_time DESC, id DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(&category)
            .bind(size)
            .bind(offset)
            .fetch_all(&mut **db)
            .await?;

            (total, emails)
        }
        None => {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails")
                .fetch_one(&mut **db)
                .await?;

            let emails = sqlx::query_as::<_, Email>(
                r#"
                SELECT id, title, content, from_email, to_email, received_time,
                       category, category_id, confidence_score, level,
                       suspicious_indicators, created_at
                FROM emails
                ORDER BY received_time DESC, id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(size)
            .bind(offset)
            .fetch_all(&mut **db)
            .await?;

            (total, emails)
        }
    };

    Ok(Json(PaginatedResponse::new(emails, page, size, total)))
}
