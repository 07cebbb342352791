use chrono::{Duration, Utc};
use mailguard_server::models::EmailStats;
use mailguard_server::routes::stats::get_email_stats;
use mailguard_server::test_support::{
    TestDatabase, TestDatabaseError, TestFixtures, TestRocketBuilder,
};
use rocket::http::Status;
use rocket::routes;

#[tokio::test]
async fn stats_report_breakdown_and_recent_trend() {
    let test_db = match TestDatabase::new().await {
        Ok(db) => db,
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping stats integration test: container runtime unavailable: {err}");
            return;
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    };

    let pool = test_db.pool_clone();
    let client = TestRocketBuilder::new()
        .with_database_url(test_db.url())
        .mount_api_routes(routes![get_email_stats])
        .async_client()
        .await;

    // Empty store: zero total, zero percentages, no trend.
    let response = client.get("/api/v1/emails/stats").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let payload: EmailStats = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.total, 0);
    assert!(payload.categories.safe.percentage.abs() < f64::EPSILON);
    assert!(payload.recent_trend.is_empty());

    let fixtures = TestFixtures::new(&pool);
    let now = Utc::now();

    fixtures
        .insert_email("standup notes", "actions below", "pm@corp.example.com", "safe", now)
        .await
        .expect("failed to insert email");
    fixtures
        .insert_email("release recap", "shipped!", "eng@corp.example.com", "safe", now)
        .await
        .expect("failed to insert email");
    fixtures
        .insert_email(
            "Verify your account",
            "click here",
            "alerts@login-help.example",
            "phishing",
            now - Duration::days(1),
        )
        .await
        .expect("failed to insert email");
    // Outside the seven-day window: counted in totals, absent from the trend.
    fixtures
        .insert_email(
            "ancient mystery",
            "",
            "archive@corp.example.com",
            "unknown",
            now - Duration::days(30),
        )
        .await
        .expect("failed to insert email");

    let response = client.get("/api/v1/emails/stats").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let payload: EmailStats = response
        .into_json()
        .await
        .expect("payload should deserialize");

    assert_eq!(payload.total, 4);
    assert_eq!(payload.categories.safe.count, 2);
    assert!((payload.categories.safe.percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(payload.categories.phishing.count, 1);
    assert!((payload.categories.phishing.percentage - 25.0).abs() < f64::EPSILON);
    assert_eq!(payload.categories.unknown.count, 1);
    assert_eq!(payload.categories.spam.count, 0);

    let percentage_sum = payload.categories.safe.percentage
        + payload.categories.suspicious.percentage
        + payload.categories.spam.percentage
        + payload.categories.phishing.percentage
        + payload.categories.unknown.percentage;
    assert!((percentage_sum - 100.0).abs() < 0.5);

    // Two days of traffic inside the window, date ascending.
    assert_eq!(payload.recent_trend.len(), 2);
    assert!(payload.recent_trend[0].date < payload.recent_trend[1].date);
    assert_eq!(payload.recent_trend[0].phishing, 1);
    assert_eq!(payload.recent_trend[1].safe, 2);

    drop(client);
    test_db.close().await.expect("failed to drop test database");
}
