use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{SalesRepository, UserRepository},
    services::{AuthService, ReportingService},
};

const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub port: u16,
    pub auth_service: AuthService,
    pub reporting_service: ReportingService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a number, got '{raw}'"))?,
            Err(_) => DEFAULT_PORT,
        };

        // The pool size caps how many reporting queries run in parallel;
        // excess requests queue on acquire instead of failing.
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("database connection established");

        let sales_repo = SalesRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let reporting_service = ReportingService::new(sales_repo);
        let auth_service = AuthService::new(user_repo, jwt_secret);

        Ok(Self {
            db_pool,
            port,
            auth_service,
            reporting_service,
        })
    }
}
