use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

/// Query-string parameters shared by every `/sales/*` endpoint. All list
/// filters are comma-separated strings; which ones an endpoint honors is
/// decided in the handler.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    /// Range start, YYYY-MM-DD (UTC start of day).
    pub start_date: Option<String>,
    /// Range end, YYYY-MM-DD (UTC end of day, inclusive).
    pub end_date: Option<String>,
    /// Comma-separated seller names.
    pub sellers: Option<String>,
    /// Comma-separated seller categories (e.g. Bar,Restaurant,Delivery).
    pub seller_categories: Option<String>,
    /// Comma-separated article names.
    pub article_names: Option<String>,
    /// Comma-separated item categories.
    pub categories: Option<String>,
    /// Comma-separated hours of day (0-23).
    pub hours: Option<String>,
    /// Page size for /sales/all-data, default 50.
    pub limit: Option<i64>,
    /// Page offset for /sales/all-data, default 0.
    pub offset: Option<i64>,
}

impl SalesQuery {
    /// LIMIT/OFFSET with the documented defaults, bound after all filters.
    /// Negative values are rejected up front instead of reaching the driver.
    pub fn pagination(&self) -> Result<(i64, i64), AppError> {
        let limit = self.limit.unwrap_or(50);
        let offset = self.offset.unwrap_or(0);
        if limit < 0 || offset < 0 {
            return Err(AppError::InvalidPagination(format!(
                "limit={limit}, offset={offset}"
            )));
        }
        Ok((limit, offset))
    }
}

/// One line item of the `sales` table, serialized with the original POS
/// export column names the dashboard frontend expects.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SaleRecord {
    #[serde(rename = "Order_ID")]
    #[sqlx(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Seller")]
    #[sqlx(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Article_Name")]
    #[sqlx(rename = "Article_Name")]
    pub article_name: String,
    #[serde(rename = "Category")]
    #[sqlx(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    #[sqlx(rename = "Quantity")]
    pub quantity: Decimal,
    #[serde(rename = "Article_Price")]
    #[sqlx(rename = "Article_Price")]
    pub article_price: Decimal,
    #[serde(rename = "Total_Article_Price")]
    #[sqlx(rename = "Total_Article_Price")]
    pub total_article_price: Decimal,
    #[serde(rename = "Datetime")]
    #[sqlx(rename = "Datetime")]
    pub datetime: DateTime<Utc>,
    // NULL for sellers missing from the importer's category mapping.
    #[serde(rename = "Seller Category")]
    #[sqlx(rename = "Seller Category")]
    pub seller_category: Option<String>,
}

/// Row of /sales/most-sold-items: quantity ranking per article.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MostSoldItem {
    #[serde(rename = "Article_Name")]
    #[sqlx(rename = "Article_Name")]
    pub article_name: String,
    pub total_quantity: Option<Decimal>,
}

/// Row of /sales/most-sold-items-by-price: revenue ranking per article.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MostSoldItemByPrice {
    #[serde(rename = "Article_Name")]
    #[sqlx(rename = "Article_Name")]
    pub article_name: String,
    pub total_price: Option<Decimal>,
    pub total_quantity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TotalSales {
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TotalQuantity {
    pub total_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvgArticlePrice {
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderCount {
    pub order_count: i64,
}

/// One day of /sales/avg-order-value: receipts are totaled per `Order_ID`
/// first, then averaged within the day.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AvgOrderValueEntry {
    pub order_date: DateTime<Utc>,
    pub avg_order_value: Option<Decimal>,
}

/// One DD/MM bucket of /sales/daily-sales. Buckets are keyed by the formatted
/// day/month string, so the same calendar day of different years sums into
/// one bucket; the year-over-year chart relies on that.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailySalesEntry {
    pub date: String,
    pub total: Option<Decimal>,
}

/// One YYYY-MM bucket of /sales/monthly-sales.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MonthlySalesEntry {
    pub month: String,
    pub total: Option<Decimal>,
}

/// One hour-of-day bucket of /sales/hourly-sales.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HourlySalesEntry {
    pub hour: i32,
    pub total_sales: Option<Decimal>,
}

/// Row of /sales/category-total-price.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CategoryTotal {
    #[serde(rename = "Category")]
    #[sqlx(rename = "Category")]
    pub category: String,
    pub total_price: Option<Decimal>,
}

/// Row of /sales/seller-categories-total.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SellerCategoryTotal {
    #[serde(rename = "Seller Category")]
    #[sqlx(rename = "Seller Category")]
    pub seller_category: Option<String>,
    pub total_sales: Option<Decimal>,
}

/// Response of /sales/comparison-daily-sales: the same filter set evaluated
/// over the requested range and over the range shifted back one year.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDailySales {
    pub this_year: Vec<DailySalesEntry>,
    pub last_year: Vec<DailySalesEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn pagination_defaults_to_first_fifty_rows() {
        assert_eq!(SalesQuery::default().pagination().unwrap(), (50, 0));

        let paged = SalesQuery {
            limit: Some(200),
            offset: Some(400),
            ..Default::default()
        };
        assert_eq!(paged.pagination().unwrap(), (200, 400));
    }

    #[test]
    fn negative_pagination_is_rejected_before_the_query() {
        let negative_limit = SalesQuery {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(matches!(
            negative_limit.pagination().unwrap_err(),
            AppError::InvalidPagination(_)
        ));

        let negative_offset = SalesQuery {
            offset: Some(-10),
            ..Default::default()
        };
        assert!(matches!(
            negative_offset.pagination().unwrap_err(),
            AppError::InvalidPagination(_)
        ));
    }

    #[test]
    fn query_params_deserialize_from_camel_case() {
        let query: SalesQuery = serde_urlencoded_roundtrip(
            "startDate=2024-01-01&endDate=2024-01-31&sellerCategories=Bar&limit=10",
        );
        assert_eq!(query.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(query.end_date.as_deref(), Some("2024-01-31"));
        assert_eq!(query.seller_categories.as_deref(), Some("Bar"));
        assert_eq!(query.limit, Some(10));
        assert!(query.sellers.is_none());
    }

    // axum's Query extractor goes through serde, same as this.
    fn serde_urlencoded_roundtrip(qs: &str) -> SalesQuery {
        serde_json::from_value(
            qs.split('&')
                .map(|pair| {
                    let (k, v) = pair.split_once('=').unwrap();
                    (
                        k.to_string(),
                        if k == "limit" || k == "offset" {
                            json!(v.parse::<i64>().unwrap())
                        } else {
                            json!(v)
                        },
                    )
                })
                .collect::<serde_json::Map<_, _>>()
                .into(),
        )
        .unwrap()
    }

    #[test]
    fn wire_format_keeps_original_column_names() {
        let row = MostSoldItem {
            article_name: "Margherita".into(),
            total_quantity: Some(Decimal::new(5, 0)),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["Article_Name"], "Margherita");
        assert_eq!(value["total_quantity"], json!(5.0));
    }

    #[test]
    fn daily_sales_entry_matches_chart_contract() {
        let entry = DailySalesEntry {
            date: "05/01".into(),
            total: Some(Decimal::new(30, 0)),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({ "date": "05/01", "total": 30.0 }));
    }

    #[test]
    fn avg_order_value_entry_keeps_query_aliases() {
        let entry = AvgOrderValueEntry {
            order_date: chrono::Utc
                .with_ymd_and_hms(2024, 1, 5, 0, 0, 0)
                .unwrap(),
            avg_order_value: Some(Decimal::new(125, 1)),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["avg_order_value"], json!(12.5));
        assert!(value["order_date"].as_str().unwrap().starts_with("2024-01-05"));
    }

    #[test]
    fn comparison_response_uses_camel_case_keys() {
        let response = ComparisonDailySales {
            this_year: vec![],
            last_year: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("thisYear").is_some());
        assert!(value.get("lastYear").is_some());
    }
}
