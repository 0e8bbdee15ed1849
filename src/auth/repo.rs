use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// User record in the database. The hash never leaves this layer; clients
/// only ever see `PublicUser`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, cpf, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Duplicate probe used by registration: either identity being taken
    /// blocks the signup.
    pub async fn find_by_email_or_cpf(
        db: &SqlitePool,
        email: &str,
        cpf: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, cpf, password_hash, created_at
            FROM users
            WHERE email = ? OR cpf = ?
            "#,
        )
        .bind(email)
        .bind(cpf)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, cpf, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        cpf: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, cpf, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, cpf, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(cpf)
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }
}
