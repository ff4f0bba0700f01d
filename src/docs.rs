use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Sales reporting ---
        handlers::sales::all_data,
        handlers::sales::sellers,
        handlers::sales::seller_categories,
        handlers::sales::categories,
        handlers::sales::article_names,
        handlers::sales::most_sold_items,
        handlers::sales::most_sold_items_by_price,
        handlers::sales::total_sales,
        handlers::sales::total_quantity,
        handlers::sales::avg_article_price,
        handlers::sales::avg_order_value,
        handlers::sales::order_count,
        handlers::sales::daily_sales,
        handlers::sales::monthly_sales,
        handlers::sales::hourly_sales,
        handlers::sales::category_total_price,
        handlers::sales::seller_categories_total,
        handlers::sales::comparison_daily_sales,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::sales::SaleRecord,
            models::sales::MostSoldItem,
            models::sales::MostSoldItemByPrice,
            models::sales::TotalSales,
            models::sales::TotalQuantity,
            models::sales::AvgArticlePrice,
            models::sales::OrderCount,
            models::sales::AvgOrderValueEntry,
            models::sales::DailySalesEntry,
            models::sales::MonthlySalesEntry,
            models::sales::HourlySalesEntry,
            models::sales::CategoryTotal,
            models::sales::SellerCategoryTotal,
            models::sales::ComparisonDailySales,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Sales", description = "Filtered reporting over the sales table"),
        (name = "Auth", description = "Login and registration")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
