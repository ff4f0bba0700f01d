use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // If configuration or the database is unavailable there is nothing to
    // serve; fail loudly at startup.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database migrations applied");

    // Public reporting routes. The dashboard calls these without a token;
    // the auth guard below only protects the account routes.
    let sales_routes = Router::new()
        .route("/all-data", get(handlers::sales::all_data))
        .route("/sellers", get(handlers::sales::sellers))
        .route("/seller-categories", get(handlers::sales::seller_categories))
        .route("/categories", get(handlers::sales::categories))
        .route("/article-names", get(handlers::sales::article_names))
        .route("/most-sold-items", get(handlers::sales::most_sold_items))
        .route(
            "/most-sold-items-by-price",
            get(handlers::sales::most_sold_items_by_price),
        )
        .route("/total-sales", get(handlers::sales::total_sales))
        .route("/total-quantity", get(handlers::sales::total_quantity))
        .route("/avg-article-price", get(handlers::sales::avg_article_price))
        .route("/avg-order-value", get(handlers::sales::avg_order_value))
        .route("/order-count", get(handlers::sales::order_count))
        .route("/daily-sales", get(handlers::sales::daily_sales))
        .route("/monthly-sales", get(handlers::sales::monthly_sales))
        .route("/hourly-sales", get(handlers::sales::hourly_sales))
        .route(
            "/category-total-price",
            get(handlers::sales::category_total_price),
        )
        .route(
            "/seller-categories-total",
            get(handlers::sales::seller_categories_total),
        )
        .route(
            "/comparison-daily-sales",
            get(handlers::sales::comparison_daily_sales),
        );

    // /auth/me sits behind the guard; login and register stay public.
    let account_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(account_routes);

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/sales", sales_routes)
        .nest("/auth", auth_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state.clone());

    let addr = format!("0.0.0.0:{}", app_state.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("server listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
