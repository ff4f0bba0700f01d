use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    db::filter::{DateRange, FilterSet, Predicate},
    models::sales::{
        AvgArticlePrice, AvgOrderValueEntry, CategoryTotal, ComparisonDailySales, DailySalesEntry,
        HourlySalesEntry, MonthlySalesEntry, MostSoldItem, MostSoldItemByPrice, OrderCount,
        SaleRecord, SalesQuery, SellerCategoryTotal, TotalQuantity, TotalSales,
    },
};

// GET /sales/all-data
#[utoipa::path(
    get,
    path = "/sales/all-data",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Filtered line items, newest first", body = Vec<SaleRecord>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn all_data(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;
    let (limit, offset) = params.pagination()?;

    let rows = app_state
        .reporting_service
        .all_data(&range, &filter, limit, offset)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

// GET /sales/sellers
#[utoipa::path(
    get,
    path = "/sales/sellers",
    tag = "Sales",
    responses(
        (status = 200, description = "Every seller name on record", body = Vec<String>),
        (status = 500, description = "Query failed")
    )
)]
pub async fn sellers(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sellers = app_state.reporting_service.sellers().await?;
    Ok((StatusCode::OK, Json(sellers)))
}

// GET /sales/seller-categories
#[utoipa::path(
    get,
    path = "/sales/seller-categories",
    tag = "Sales",
    responses(
        (status = 200, description = "Every seller category on record", body = Vec<String>),
        (status = 500, description = "Query failed")
    )
)]
pub async fn seller_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.reporting_service.seller_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

// GET /sales/categories
#[utoipa::path(
    get,
    path = "/sales/categories",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Item categories matching the optional context", body = Vec<String>),
        (status = 400, description = "Invalid date or hours parameter"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn categories(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::optional(&params)?;
    let mut filter = FilterSet::from_params(&params)?;
    // Narrowing a lookup by its own column would be circular.
    filter.categories = Predicate::NoConstraint;

    let categories = app_state
        .reporting_service
        .categories(range.as_ref(), &filter)
        .await?;
    Ok((StatusCode::OK, Json(categories)))
}

// GET /sales/article-names
#[utoipa::path(
    get,
    path = "/sales/article-names",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Article names matching the optional context", body = Vec<String>),
        (status = 400, description = "Invalid date or hours parameter"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn article_names(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::optional(&params)?;
    let mut filter = FilterSet::from_params(&params)?;
    filter.article_names = Predicate::NoConstraint;

    let names = app_state
        .reporting_service
        .article_names(range.as_ref(), &filter)
        .await?;
    Ok((StatusCode::OK, Json(names)))
}

// GET /sales/most-sold-items
#[utoipa::path(
    get,
    path = "/sales/most-sold-items",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Top 10 articles by quantity", body = Vec<MostSoldItem>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn most_sold_items(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let items = app_state
        .reporting_service
        .most_sold_items(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /sales/most-sold-items-by-price
#[utoipa::path(
    get,
    path = "/sales/most-sold-items-by-price",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Top 10 articles by revenue", body = Vec<MostSoldItemByPrice>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn most_sold_items_by_price(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let items = app_state
        .reporting_service
        .most_sold_items_by_price(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(items)))
}

// GET /sales/total-sales
#[utoipa::path(
    get,
    path = "/sales/total-sales",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue over the filtered set", body = TotalSales),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn total_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let total = app_state
        .reporting_service
        .total_sales(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(TotalSales { total_sales: total })))
}

// GET /sales/total-quantity
#[utoipa::path(
    get,
    path = "/sales/total-quantity",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Units sold over the filtered set", body = TotalQuantity),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn total_quantity(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let total = app_state
        .reporting_service
        .total_quantity(&range, &filter)
        .await?;
    Ok((
        StatusCode::OK,
        Json(TotalQuantity {
            total_quantity: total,
        }),
    ))
}

// GET /sales/avg-article-price
#[utoipa::path(
    get,
    path = "/sales/avg-article-price",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Weighted average unit price, 0 when nothing sold", body = AvgArticlePrice),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn avg_article_price(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let avg = app_state
        .reporting_service
        .avg_article_price(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(AvgArticlePrice { avg_price: avg })))
}

// GET /sales/avg-order-value
#[utoipa::path(
    get,
    path = "/sales/avg-order-value",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Average receipt value per day", body = Vec<AvgOrderValueEntry>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn avg_order_value(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let entries = app_state
        .reporting_service
        .avg_order_value(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /sales/order-count
#[utoipa::path(
    get,
    path = "/sales/order-count",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Distinct receipts in the filtered set", body = OrderCount),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn order_count(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let count = app_state
        .reporting_service
        .order_count(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(OrderCount { order_count: count })))
}

// GET /sales/daily-sales
#[utoipa::path(
    get,
    path = "/sales/daily-sales",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue per DD/MM bucket", body = Vec<DailySalesEntry>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn daily_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let entries = app_state
        .reporting_service
        .daily_sales(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /sales/monthly-sales
#[utoipa::path(
    get,
    path = "/sales/monthly-sales",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue per calendar month", body = Vec<MonthlySalesEntry>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn monthly_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let entries = app_state
        .reporting_service
        .monthly_sales(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /sales/hourly-sales
#[utoipa::path(
    get,
    path = "/sales/hourly-sales",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue per hour of day", body = Vec<HourlySalesEntry>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn hourly_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let entries = app_state
        .reporting_service
        .hourly_sales(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /sales/category-total-price
#[utoipa::path(
    get,
    path = "/sales/category-total-price",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue per item category, highest first", body = Vec<CategoryTotal>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn category_total_price(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let totals = app_state
        .reporting_service
        .category_total_price(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(totals)))
}

// GET /sales/seller-categories-total
#[utoipa::path(
    get,
    path = "/sales/seller-categories-total",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Revenue per seller category, highest first", body = Vec<SellerCategoryTotal>),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn seller_categories_total(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let totals = app_state
        .reporting_service
        .seller_categories_total(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(totals)))
}

// GET /sales/comparison-daily-sales
#[utoipa::path(
    get,
    path = "/sales/comparison-daily-sales",
    tag = "Sales",
    params(SalesQuery),
    responses(
        (status = 200, description = "Daily sales for the range and the same range last year", body = ComparisonDailySales),
        (status = 400, description = "Missing or invalid date range"),
        (status = 500, description = "Query failed")
    )
)]
pub async fn comparison_daily_sales(
    State(app_state): State<AppState>,
    Query(params): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = DateRange::required(&params)?;
    let filter = FilterSet::from_params(&params)?;

    let comparison = app_state
        .reporting_service
        .comparison_daily_sales(&range, &filter)
        .await?;
    Ok((StatusCode::OK, Json(comparison)))
}
