use rocket_db_pools::{Database, sqlx};

/// Primary connection pool, configured under `databases.mailguard_db`.
#[derive(Database)]
#[database("mailguard_db")]
pub struct MailGuardDb(sqlx::PgPool);

/// Embedded schema migrations, applied on ignite and by the test harness.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Bring the schema up to date.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
