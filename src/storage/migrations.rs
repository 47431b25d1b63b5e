use sqlx::{Executor, SqlitePool};

/// Applies every migration that is not yet recorded in `_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "create_books", CREATE_BOOKS).await?;

    Ok(())
}

const CREATE_BOOKS: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    isbn TEXT PRIMARY KEY,
    amazon_url TEXT NOT NULL,
    author TEXT NOT NULL,
    language TEXT NOT NULL,
    pages INTEGER NOT NULL,
    publisher TEXT NOT NULL,
    title TEXT NOT NULL,
    year INTEGER NOT NULL
)
"#;

async fn create_migrations_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(pool, sql))]
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    sql: &str,
) -> Result<(), sqlx::Error> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(sql).execute(&mut *tx).await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Migration applied");

    Ok(())
}
