pub mod queries;

use std::str::FromStr;

use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Error;

pub use queries::categories::Category;
pub use queries::questions::Question;

pub async fn establish_connection(url: &str, create_if_missing: bool) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(create_if_missing);
    SqlitePool::connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::queries::questions::create_question;
    use super::run_migrations;

    // every connection to `sqlite::memory:` opens a fresh database, so the pool is pinned to one
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    /// Inserts `(question, answer, category, difficulty)` rows and returns their ids.
    pub async fn seed(pool: &SqlitePool, rows: &[(&str, &str, i64, i64)]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(rows.len());
        for (question, answer, category, difficulty) in rows {
            ids.push(
                create_question(pool, question, answer, *category, *difficulty)
                    .await
                    .unwrap(),
            );
        }
        ids
    }

    pub async fn seed_numbered(pool: &SqlitePool, count: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(count);
        for n in 0..count {
            let category = (n % 6) as i64 + 1;
            ids.push(
                create_question(pool, &format!("Question {n}?"), "answer", category, 1)
                    .await
                    .unwrap(),
            );
        }
        ids
    }
}
