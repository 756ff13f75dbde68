// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use career_backend::config::Config;
use career_backend::models::user::AppRole;
use career_backend::routes;
use career_backend::services::guidance::GeminiClient;
use career_backend::state::AppState;
use career_backend::store::PgCredentialStore;
use career_backend::utils::hash::hash_password;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    if let Err(e) = seed_admin_user(&pool, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; guidance requests will fail");
    }

    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        users: Arc::new(PgCredentialStore::new(pool.clone())),
        guidance: Arc::new(GeminiClient::from_config(&config)?),
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Ensures the configured bootstrap account exists and holds the admin role.
///
/// An existing account with that email is promoted; its password is left alone.
async fn seed_admin_user(pool: &PgPool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?;

    let user_id = match existing {
        Some(id) => id,
        None => {
            tracing::info!("Seeding admin user: {}", email);
            let hashed_password = hash_password(password)?;

            let id = sqlx::query_scalar::<_, Uuid>(
                "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING id",
            )
            .bind(&email)
            .bind(hashed_password)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO profiles (id, email, full_name) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(&email)
                .bind("Administrator")
                .execute(&mut *tx)
                .await?;

            id
        }
    };

    for role in [AppRole::User, AppRole::Admin] {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT (user_id, role) DO NOTHING",
        )
        .bind(user_id)
        .bind(role)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("Admin role ensured for {}", email);

    Ok(())
}
