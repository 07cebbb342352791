use chrono::{DateTime, NaiveDate, Utc};
use rocket_db_pools::sqlx::FromRow;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

// ===== Stored Email Records =====

/// One stored email record together with its latest classification verdict.
///
/// The five analysis columns (`category` through `suspicious_indicators`) are
/// only ever written together from a single `AnalysisResult`, so a row is
/// never observed with a fresh category and a stale score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct Email {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub from_email: String,
    pub to_email: String,
    pub received_time: DateTime<Utc>,
    pub category: String,
    pub category_id: i32,
    pub confidence_score: f64,
    pub level: String,
    pub suspicious_indicators: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// ===== Response Envelopes =====

/// Plain data wrapper used by non-paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total matching rows, ignoring pagination.
    pub total: i64,
    /// One-based page index that was served.
    pub page: i64,
    /// Page size that was served.
    pub size: i64,
    /// Whether another page exists after this one.
    pub has_next: bool,
}

/// Envelope for paginated list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, size: i64, total: i64) -> Self {
        PaginatedResponse {
            data,
            pagination: PaginationMeta {
                total,
                page,
                size,
                has_next: page * size < total,
            },
        }
    }
}

// ===== Statistics Payloads =====

/// Count and share of one category in the stored corpus.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct CategoryCount {
    pub count: i64,
    /// Percentage of the total, rounded to one decimal; 0 when the store is
    /// empty.
    pub percentage: f64,
}

/// Per-category breakdown of every stored email.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct CategoryBreakdown {
    pub safe: CategoryCount,
    pub suspicious: CategoryCount,
    pub spam: CategoryCount,
    pub phishing: CategoryCount,
    pub unknown: CategoryCount,
}

/// One calendar day of the recent-trend series.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub safe: i64,
    pub suspicious: i64,
    pub spam: i64,
    pub phishing: i64,
    pub unknown: i64,
}

impl TrendPoint {
    pub fn empty(date: NaiveDate) -> Self {
        TrendPoint {
            date,
            safe: 0,
            suspicious: 0,
            spam: 0,
            phishing: 0,
            unknown: 0,
        }
    }
}

/// Aggregate statistics response: totals, per-category shares and the
/// seven-day received trend (date ascending).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total: i64,
    pub categories: CategoryBreakdown,
    pub recent_trend: Vec<TrendPoint>,
}
