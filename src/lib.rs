#[macro_use]
extern crate rocket;

pub mod analyzer;
pub mod db;
pub mod error;
pub mod models;
pub mod request_logger;
pub mod routes;

use crate::db::MailGuardDb;
use crate::request_logger::RequestLogger;
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use rocket_okapi::{
    openapi_get_routes,
    rapidoc::{GeneralConfig, HideShowConfig, RapiDocConfig, make_rapidoc},
    settings::UrlObject,
    swagger_ui::{SwaggerUIConfig, make_swagger_ui},
};
use std::sync::Once;

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

/// Build the Rocket application: CORS, request logging, database pool,
/// migrations on ignite, and the API plus documentation mounts.
pub fn rocket() -> Rocket<Build> {
    init_logger();

    // Configure CORS
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Post]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allow_credentials(true)
        .to_cors()
        .expect("Error creating CORS");

    rocket::build()
        .attach(RequestLogger)
        .attach(MailGuardDb::init())
        .attach(cors)
        // Run database migrations on startup
        .attach(AdHoc::try_on_ignite("Run Migrations", |rocket| async move {
            match MailGuardDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    match db::run_migrations(&pool).await {
                        Ok(_) => {
                            log::info!("database migrations successful");
                            Ok(rocket)
                        }
                        Err(e) => {
                            log::error!("database migrations failed: {}", e);
                            Err(rocket)
                        }
                    }
                }
                None => {
                    log::error!("database pool not available for migrations");
                    Err(rocket)
                }
            }
        }))
        // Clone and manage the pool for write paths that need transactions
        .attach(AdHoc::try_on_ignite("Manage DB Pool", |rocket| async move {
            match MailGuardDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    Ok(rocket.manage(pool))
                }
                None => Err(rocket),
            }
        }))
        .mount(
            "/api/v1",
            openapi_get_routes![
                // Health routes
                routes::health::health_check,
                // Email routes
                routes::emails::list_emails,
                // Stats routes
                routes::stats::get_email_stats,
                // Analysis routes
                routes::analyze::analyze_email,
                routes::analyze::analyze_batch,
            ],
        )
        .mount(
            "/api/docs/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../../v1/openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/docs/rapidoc/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("MailGuard API", "../../v1/openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use chrono::{DateTime, Utc};
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket, Route};
    use rocket_db_pools::Database;
    use rocket_db_pools::sqlx::{self, PgPool};

    use crate::analyzer::Category;
    use crate::db::MailGuardDb;

    pub use database::{TestDatabase, TestDatabaseError};

    /// Convenience helpers for seeding email rows in tests.
    pub struct TestFixtures<'a> {
        pool: &'a PgPool,
    }

    impl<'a> TestFixtures<'a> {
        /// Create a fixture helper bound to the provided pool.
        pub fn new(pool: &'a PgPool) -> Self {
            Self { pool }
        }

        /// Insert an email row with the given stored category, returning the
        /// new row id. The category id is derived through the one fixed
        /// mapping; unrecognized names land as `unknown`.
        pub async fn insert_email(
            &self,
            title: &str,
            content: &str,
            from_email: &str,
            category: &str,
            received_time: DateTime<Utc>,
        ) -> Result<i32, sqlx::Error> {
            let category_id = Category::from_name(category)
                .unwrap_or(Category::Unknown)
                .id();

            sqlx::query_scalar(
                r#"
                INSERT INTO emails
                    (title, content, from_email, to_email, received_time, category, category_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(title)
            .bind(content)
            .bind(from_email)
            .bind("security-team@corp.example.com")
            .bind(received_time)
            .bind(category)
            .bind(category_id)
            .fetch_one(self.pool)
            .await
        }
    }

    pub mod database {
        use rocket_db_pools::sqlx::postgres::PgPoolOptions;
        use rocket_db_pools::sqlx::{self, PgPool};
        use testcontainers_modules::postgres::Postgres;
        use testcontainers_modules::testcontainers::{
            ContainerAsync, core::error::TestcontainersError, runners::AsyncRunner,
        };
        use thiserror::Error;

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("database error: {0}")]
            Sqlx(#[from] sqlx::Error),
            #[error("migration error: {0}")]
            Migration(#[from] sqlx::migrate::MigrateError),
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
        }

        /// Ephemeral database for integration tests: one disposable Postgres
        /// container per instance, migrations applied.
        pub struct TestDatabase {
            pool: Option<PgPool>,
            url: String,
            container: Option<ContainerAsync<Postgres>>,
        }

        impl TestDatabase {
            /// Launch a fresh Postgres container and migrate it.
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let container = Postgres::default().start().await?;

                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&url)
                    .await?;

                crate::db::MIGRATOR.run(&pool).await?;

                Ok(Self {
                    pool: Some(pool),
                    url,
                    container: Some(container),
                })
            }

            /// Pooled connection handle for use in tests and Rocket state.
            pub fn pool(&self) -> &PgPool {
                self.pool.as_ref().expect("test database pool is available")
            }

            /// Convenience method returning a clone of the pooled handle.
            pub fn pool_clone(&self) -> PgPool {
                self.pool().clone()
            }

            /// Connection string for wiring the Rocket database fairing.
            pub fn url(&self) -> &str {
                &self.url
            }

            /// Close pool connections and stop the container.
            pub async fn close(mut self) -> Result<(), TestDatabaseError> {
                if let Some(pool) = self.pool.take() {
                    pool.close().await;
                }
                if let Some(container) = self.container.take() {
                    container.stop().await?;
                }
                Ok(())
            }
        }
    }

    /// Builder for constructing Rocket instances tailored for integration
    /// tests.
    #[derive(Default)]
    pub struct TestRocketBuilder {
        figment: Figment,
        mounts: Vec<(String, Vec<Route>)>,
        pg_pool: Option<PgPool>,
        attach_db: bool,
    }

    impl TestRocketBuilder {
        /// Start a builder with sensible defaults: random port, logging
        /// disabled.
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                mounts: Vec::new(),
                pg_pool: None,
                attach_db: false,
            }
        }

        /// Mount routes under `/api/v1`.
        pub fn mount_api_routes(mut self, routes: Vec<Route>) -> Self {
            self.mounts.push(("/api/v1".to_string(), routes));
            self
        }

        /// Manage a `PgPool` for routes that take the pool from state.
        pub fn manage_pg_pool(mut self, pool: PgPool) -> Self {
            self.pg_pool = Some(pool);
            self
        }

        /// Point the `mailguard_db` fairing at the given database, for
        /// routes that use `Connection<MailGuardDb>`.
        pub fn with_database_url(mut self, url: &str) -> Self {
            self.figment = self.figment.merge(("databases.mailguard_db.url", url));
            self.attach_db = true;
            self
        }

        /// Finish building the Rocket instance.
        pub fn build(self) -> Rocket<Build> {
            let mut rocket = rocket::custom(self.figment);

            if self.attach_db {
                rocket = rocket.attach(MailGuardDb::init());
            }

            for (base, routes) in self.mounts {
                rocket = rocket.mount(base, routes);
            }

            if let Some(pool) = self.pg_pool {
                rocket = rocket.manage(pool);
            }

            rocket
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}
