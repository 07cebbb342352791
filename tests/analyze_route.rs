use chrono::Utc;
use mailguard_server::analyzer::{AnalysisResult, Category};
use mailguard_server::models::DataResponse;
use mailguard_server::routes::analyze::{BatchAnalyzeResponse, analyze_batch, analyze_email};
use mailguard_server::test_support::{
    TestDatabase, TestDatabaseError, TestFixtures, TestRocketBuilder,
};
use rocket::http::{ContentType, Status};
use rocket::routes;
use rocket_db_pools::sqlx;
use rocket_db_pools::sqlx::postgres::PgPoolOptions;

#[test]
fn analyze_endpoint_classifies_phishing() {
    let client = TestRocketBuilder::new()
        .mount_api_routes(routes![analyze_email])
        .blocking_client();

    let response = client
        .post("/api/v1/emails/analyze")
        .header(ContentType::JSON)
        .body(
            r#"{"title":"Your account will be suspended, click here to verify",
                "content":"We detected unusual activity. Reset your password now.",
                "sender":"security@account-services.example"}"#,
        )
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: DataResponse<AnalysisResult> =
        response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data.category, Category::Phishing);
    assert_eq!(payload.data.category_id, 3);
    assert!(payload.data.confidence_score > 0.0);
    assert!(!payload.data.suspicious_indicators.is_empty());
}

#[test]
fn analyze_endpoint_treats_absent_fields_as_empty() {
    let client = TestRocketBuilder::new()
        .mount_api_routes(routes![analyze_email])
        .blocking_client();

    let response = client
        .post("/api/v1/emails/analyze")
        .header(ContentType::JSON)
        .body("{}")
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let payload: DataResponse<AnalysisResult> =
        response.into_json().expect("valid JSON payload");
    assert_eq!(payload.data.category, Category::Safe);
    assert!(payload.data.suspicious_indicators.is_empty());
}

#[tokio::test]
async fn batch_endpoint_rejects_non_positive_limit() {
    // The limit is validated before any database work; a lazy pool never
    // has to connect.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unreachable")
        .expect("lazy pool");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool)
        .mount_api_routes(routes![analyze_batch])
        .async_client()
        .await;

    let response = client
        .post("/api/v1/emails/analyze-batch?limit=0")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn batch_endpoint_classifies_pending_records() {
    let test_db = match TestDatabase::new().await {
        Ok(db) => db,
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping batch integration test: container runtime unavailable: {err}");
            return;
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    };

    let pool = test_db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    let now = Utc::now();

    for i in 0..3 {
        fixtures
            .insert_email(
                &format!("Verify your account #{i}"),
                "Unusual activity detected, click here to verify your account.",
                "alerts@login-help.example",
                "unknown",
                now,
            )
            .await
            .expect("failed to insert email");
    }
    fixtures
        .insert_email(
            "team offsite",
            "calendar invite attached",
            "hr@corp.example.com",
            "safe",
            now,
        )
        .await
        .expect("failed to insert email");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(routes![analyze_batch])
        .async_client()
        .await;

    // Capped run only consumes `limit` pending records.
    let response = client
        .post("/api/v1/emails/analyze-batch?limit=2")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let payload: BatchAnalyzeResponse = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.processed_count, 2);

    let pending: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE category = 'unknown'")
            .fetch_one(&pool)
            .await
            .expect("count pending");
    assert_eq!(pending, 1);

    // Uncapped run drains the rest.
    let response = client.post("/api/v1/emails/analyze-batch").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let payload: BatchAnalyzeResponse = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(payload.processed_count, 1);

    let pending: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE category = 'unknown'")
            .fetch_one(&pool)
            .await
            .expect("count pending");
    assert_eq!(pending, 0);

    // Verdict fields were rewritten together and stay mutually consistent.
    let rows: Vec<(String, i32, f64)> =
        sqlx::query_as("SELECT category, category_id, confidence_score FROM emails")
            .fetch_all(&pool)
            .await
            .expect("fetch verdicts");
    assert_eq!(rows.len(), 4);
    for (category, category_id, confidence_score) in rows {
        let parsed = Category::from_name(&category).expect("stored category is valid");
        assert_eq!(parsed.id(), category_id);
        assert!((0.0..=1.0).contains(&confidence_score));
    }

    drop(client);
    test_db.close().await.expect("failed to drop test database");
}

#[tokio::test]
async fn batch_failure_rolls_back_every_record() {
    let test_db = match TestDatabase::new().await {
        Ok(db) => db,
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping batch rollback test: container runtime unavailable: {err}");
            return;
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    };

    let pool = test_db.pool_clone();
    let fixtures = TestFixtures::new(&pool);
    let now = Utc::now();

    // Lowest id classifies safe, the next one phishing.
    fixtures
        .insert_email("lunch?", "usual place at noon", "friend@corp.example.com", "unknown", now)
        .await
        .expect("failed to insert email");
    fixtures
        .insert_email(
            "Your account will be suspended, click here to verify",
            "Unusual activity detected.",
            "alerts@login-help.example",
            "unknown",
            now,
        )
        .await
        .expect("failed to insert email");

    // Both pending rows satisfy this, but the phishing verdict will not, so
    // the batch fails after the first record was already rewritten.
    sqlx::query("ALTER TABLE emails ADD CONSTRAINT emails_category_guard CHECK (category <> 'phishing')")
        .execute(&pool)
        .await
        .expect("add constraint");

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .mount_api_routes(routes![analyze_batch])
        .async_client()
        .await;

    let response = client.post("/api/v1/emails/analyze-batch").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);

    // Rollback restored every row, including the one whose update succeeded
    // before the failure: no partially written verdicts survive.
    let rows: Vec<(String, f64, String, Vec<String>)> = sqlx::query_as(
        "SELECT category, confidence_score, level, suspicious_indicators FROM emails",
    )
    .fetch_all(&pool)
    .await
    .expect("fetch rows");
    assert_eq!(rows.len(), 2);
    for (category, confidence_score, level, suspicious_indicators) in rows {
        assert_eq!(category, "unknown");
        assert!(confidence_score.abs() < f64::EPSILON);
        assert_eq!(level, "low");
        assert!(suspicious_indicators.is_empty());
    }

    drop(response);
    drop(client);
    test_db.close().await.expect("failed to drop test database");
}
