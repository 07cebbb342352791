//! Aggregate statistics over already-classified emails.
//!
//! Pure reporting: counts and percentages per category plus a seven-day
//! received trend. The analyzer is never invoked here.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rocket::get;
use rocket::serde::json::Json;
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::analyzer::Category;
use crate::db::MailGuardDb;
use crate::error::ApiError;
use crate::models::{CategoryBreakdown, CategoryCount, EmailStats, TrendPoint};

/// Totals, per-category breakdown and the last seven days of received
/// emails bucketed by calendar day and category.
#[openapi(tag = "Stats")]
#[get("/emails/stats")]
pub async fn get_email_stats(
    mut db: Connection<MailGuardDb>,
) -> Result<Json<EmailStats>, ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails")
        .fetch_one(&mut **db)
        .await?;

    let counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT category, COUNT(*) FROM emails GROUP BY category")
            .fetch_all(&mut **db)
            .await?;
    let categories = build_breakdown(&counts, total);

    let window_start = Utc::now() - Duration::days(7);
    let recent: Vec<(DateTime<Utc>, String)> = sqlx::query_as(
        "SELECT received_time, category FROM emails WHERE received_time >= $1 ORDER BY received_time",
    )
    .bind(window_start)
    .fetch_all(&mut **db)
    .await?;
    let recent_trend = build_trend(&recent);

    Ok(Json(EmailStats {
        total,
        categories,
        recent_trend,
    }))
}

fn share(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

fn build_breakdown(counts: &[(String, i64)], total: i64) -> CategoryBreakdown {
    let count_for = |category: Category| -> i64 {
        counts
            .iter()
            .find(|(name, _)| name == category.as_str())
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    let cell = |category: Category| CategoryCount {
        count: count_for(category),
        percentage: share(count_for(category), total),
    };

    CategoryBreakdown {
        safe: cell(Category::Safe),
        suspicious: cell(Category::Suspicious),
        spam: cell(Category::Spam),
        phishing: cell(Category::Phishing),
        unknown: cell(Category::Unknown),
    }
}

/// Bucket (received_time, category) rows into one point per calendar day,
/// date ascending. Days without traffic are omitted. Rows with a category
/// name outside the fixed set count as `unknown`.
fn build_trend(rows: &[(DateTime<Utc>, String)]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();

    for (received, category) in rows {
        let date = received.date_naive();
        let point = days.entry(date).or_insert_with(|| TrendPoint::empty(date));
        match Category::from_name(category).unwrap_or(Category::Unknown) {
            Category::Safe => point.safe += 1,
            Category::Suspicious => point.suspicious += 1,
            Category::Spam => point.spam += 1,
            Category::Phishing => point.phishing += 1,
            Category::Unknown => point.unknown += 1,
        }
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn breakdown_percentages_cover_the_total() {
        let counts = vec![
            ("safe".to_string(), 6),
            ("phishing".to_string(), 3),
            ("unknown".to_string(), 1),
        ];
        let breakdown = build_breakdown(&counts, 10);
        assert_eq!(breakdown.safe.count, 6);
        assert!((breakdown.safe.percentage - 60.0).abs() < f64::EPSILON);
        assert!((breakdown.phishing.percentage - 30.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.spam.count, 0);
        assert!((breakdown.unknown.percentage - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn breakdown_of_empty_store_is_all_zero() {
        let breakdown = build_breakdown(&[], 0);
        assert_eq!(breakdown.safe.count, 0);
        assert!(breakdown.safe.percentage.abs() < f64::EPSILON);
        assert!(breakdown.phishing.percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn trend_buckets_by_day_in_ascending_order() {
        let rows = vec![
            (at(2026, 8, 28, 9), "phishing".to_string()),
            (at(2026, 8, 26, 14), "safe".to_string()),
            (at(2026, 8, 26, 16), "safe".to_string()),
            (at(2026, 8, 26, 17), "spam".to_string()),
            (at(2026, 8, 27, 8), "mystery".to_string()),
        ];
        let trend = build_trend(&rows);

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        assert_eq!(trend[0].safe, 2);
        assert_eq!(trend[0].spam, 1);
        assert_eq!(trend[1].unknown, 1, "unrecognized names count as unknown");
        assert_eq!(trend[2].phishing, 1);
    }

    #[test]
    fn trend_of_no_rows_is_empty() {
        assert!(build_trend(&[]).is_empty());
    }
}
