use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;

// The narrow store surface the resolver depends on: exact-match lookups on
// the unique identity keys, inserts per enrollment path, and the linking
// update. Inserts return `sqlx::Result` so callers can translate unique
// constraint violations; the constraints are the real duplicate guard under
// concurrent requests.
impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash,
                   google_id, wallet_address, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash,
                   google_id, wallet_address, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash,
                   google_id, wallet_address, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_google_id(db: &PgPool, google_id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash,
                   google_id, wallet_address, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE google_id = $1
            "#,
        )
        .bind(google_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Lookup by wallet address; the caller passes the normalized
    /// (lower-cased) form.
    pub async fn find_by_wallet(db: &PgPool, wallet_address: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, password_hash,
                   google_id, wallet_address, is_active, is_verified, created_at, updated_at
            FROM users
            WHERE wallet_address = $1
            "#,
        )
        .bind(wallet_address)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create_with_password(
        db: &PgPool,
        email: &str,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, first_name, last_name, password_hash,
                      google_id, wallet_address, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn create_from_google(
        db: &PgPool,
        email: &str,
        google_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        is_verified: bool,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, google_id, first_name, last_name, is_verified)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, first_name, last_name, password_hash,
                      google_id, wallet_address, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(google_id)
        .bind(first_name)
        .bind(last_name)
        .bind(is_verified)
        .fetch_one(db)
        .await
    }

    /// Wallet users hold the key, so they count as verified from creation.
    pub async fn create_from_wallet(
        db: &PgPool,
        wallet_address: &str,
        email: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (wallet_address, email, is_verified)
            VALUES ($1, $2, TRUE)
            RETURNING id, email, username, first_name, last_name, password_hash,
                      google_id, wallet_address, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(wallet_address)
        .bind(email)
        .fetch_one(db)
        .await
    }

    /// Link a Google identity and refresh provider-supplied profile fields in
    /// one statement. An existing google_id is kept; names only change when
    /// the provider sent a non-empty value; is_verified can only move to
    /// true, never back. The password hash is untouched, so password login
    /// keeps working after linking.
    pub async fn apply_google_profile(
        db: &PgPool,
        id: Uuid,
        google_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        provider_verified: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET google_id = COALESCE(google_id, $2),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                is_verified = is_verified OR $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, password_hash,
                      google_id, wallet_address, is_active, is_verified, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(google_id)
        .bind(first_name)
        .bind(last_name)
        .bind(provider_verified)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
