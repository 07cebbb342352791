//! Analysis endpoints: single-email classification and transactional batch
//! re-analysis of records still pending classification.

use rocket::serde::json::Json;
use rocket::{State, post};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalysisResult, EmailAnalyzer};
use crate::error::ApiError;
use crate::models::DataResponse;

/// Request payload for single-email analysis. Absent fields contribute no
/// signal and are treated as empty strings.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AnalyzeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub sender: Option<String>,
}

/// Classify one email without touching the store.
///
/// Total over any string-shaped input; this endpoint has no failure mode of
/// its own.
#[openapi(tag = "Analysis")]
#[post("/emails/analyze", data = "<request>")]
pub fn analyze_email(request: Json<AnalyzeRequest>) -> Json<DataResponse<AnalysisResult>> {
    let request = request.into_inner();
    let analysis = EmailAnalyzer::new().analyze(
        request.title.as_deref().unwrap_or(""),
        request.content.as_deref().unwrap_or(""),
        request.sender.as_deref().unwrap_or(""),
    );

    Json(DataResponse { data: analysis })
}

/// Outcome of a batch re-analysis run.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchAnalyzeResponse {
    /// Number of records that were classified and rewritten.
    pub processed_count: i64,
    pub message: String,
}

/// Re-analyze stored emails still in category `unknown`, oldest first,
/// optionally capped by `limit`.
///
/// All per-record updates run on one transaction committed at the end, so a
/// failure anywhere rolls back the whole batch and no record is ever left
/// with a partially updated verdict.
#[openapi(tag = "Analysis")]
#[post("/emails/analyze-batch?<limit>")]
pub async fn analyze_batch(
    pool: &State<sqlx::PgPool>,
    limit: Option<i64>,
) -> Result<Json<BatchAnalyzeResponse>, ApiError> {
    if let Some(limit) = limit {
        if limit < 1 {
            return Err(ApiError::BadRequest(format!(
                "limit must be positive, got {limit}"
            )));
        }
    }

    let mut tx = pool.begin().await?;

    // LIMIT NULL means no cap in Postgres.
    let pending: Vec<(i32, String, String, String)> = sqlx::query_as(
        r#"
        SELECT id, title, content, from_email
        FROM emails
        WHERE category = 'unknown'
        ORDER BY id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *tx)
    .await?;

    let analyzer = EmailAnalyzer::new();
    let mut processed: i64 = 0;

    for (id, title, content, from_email) in pending {
        let analysis = analyzer.analyze(&title, &content, &from_email);

        // All five verdict fields are rewritten together.
        sqlx::query(
            r#"
            UPDATE emails
            SET category = $1, category_id = $2, confidence_score = $3,
                level = $4, suspicious_indicators = $5
            WHERE id = $6
            "#,
        )
        .bind(analysis.category.as_str())
        .bind(analysis.category_id)
        .bind(analysis.confidence_score)
        .bind(analysis.level.as_str())
        .bind(&analysis.suspicious_indicators)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        processed += 1;
    }

    tx.commit().await?;

    log::info!("batch analysis classified {} emails", processed);

    Ok(Json(BatchAnalyzeResponse {
        processed_count: processed,
        message: format!("Analyzed {processed} emails"),
    }))
}
