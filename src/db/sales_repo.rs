use rust_decimal::Decimal;
use sqlx::{postgres::PgArguments, Arguments, PgPool};

use crate::{
    common::error::AppError,
    db::filter::{DateRange, FilterSet},
    models::sales::{
        AvgOrderValueEntry, CategoryTotal, DailySalesEntry, HourlySalesEntry, MonthlySalesEntry,
        MostSoldItem, MostSoldItemByPrice, SaleRecord, SellerCategoryTotal,
    },
};

/// Read-only access to the `sales` table. Every method composes the shared
/// filter clause with one aggregation shape; [`filter_arguments`] binds in
/// the exact order the clause numbered the placeholders.
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Raw filtered rows, newest first, paginated.
    pub async fn all_data(
        &self,
        range: &DateRange,
        filter: &FilterSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SaleRecord>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT "Order_ID", "Seller", "Article_Name", "Category", "Quantity",
                      "Article_Price", "Total_Article_Price", "Datetime", "Seller Category"
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               ORDER BY "Datetime" DESC
               LIMIT ${} OFFSET ${}"#,
            clause.sql,
            clause.next_index,
            clause.next_index + 1,
        );

        let mut args = filter_arguments(Some(range), filter)?;
        args.add(limit).map_err(bind_error)?;
        args.add(offset).map_err(bind_error)?;

        let rows = sqlx::query_as_with::<_, SaleRecord, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Distinct seller names, unfiltered.
    pub async fn sellers(&self) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT "Seller" FROM sales ORDER BY "Seller""#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Distinct seller categories, unfiltered. NULLs (sellers outside the
    /// importer's mapping) are dropped rather than surfaced as a null option.
    pub async fn seller_categories(&self) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query_scalar::<_, Option<String>>(
            r#"SELECT DISTINCT "Seller Category" FROM sales ORDER BY "Seller Category""#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().flatten().collect())
    }

    /// Distinct item categories under the optional range and filters.
    pub async fn categories(
        &self,
        range: Option<&DateRange>,
        filter: &FilterSet,
    ) -> Result<Vec<String>, AppError> {
        let clause = filter.where_clause(range.is_some());
        let sql = format!(
            r#"SELECT DISTINCT "Category" FROM sales{} ORDER BY "Category""#,
            clause.sql
        );

        let args = filter_arguments(range, filter)?;
        let rows = sqlx::query_scalar_with::<_, String, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Distinct article names under the optional range and filters.
    pub async fn article_names(
        &self,
        range: Option<&DateRange>,
        filter: &FilterSet,
    ) -> Result<Vec<String>, AppError> {
        let clause = filter.where_clause(range.is_some());
        let sql = format!(
            r#"SELECT DISTINCT "Article_Name" FROM sales{} ORDER BY "Article_Name""#,
            clause.sql
        );

        let args = filter_arguments(range, filter)?;
        let rows = sqlx::query_scalar_with::<_, String, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Top 10 articles by summed quantity.
    pub async fn most_sold_items(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MostSoldItem>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT "Article_Name", SUM("Quantity") AS total_quantity
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY "Article_Name"
               ORDER BY total_quantity DESC
               LIMIT 10"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, MostSoldItem, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Top 10 articles by summed revenue (quantity included for the tooltip).
    pub async fn most_sold_items_by_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MostSoldItemByPrice>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT "Article_Name",
                      SUM("Total_Article_Price") AS total_price,
                      SUM("Quantity") AS total_quantity
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY "Article_Name"
               ORDER BY total_price DESC
               LIMIT 10"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, MostSoldItemByPrice, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue over the filtered set; zero rows yield zero, not NULL.
    pub async fn total_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT COALESCE(SUM("Total_Article_Price"), 0) AS total_sales
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let total = sqlx::query_scalar_with::<_, Decimal, _>(&sql, args)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Units sold over the filtered set.
    pub async fn total_quantity(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT COALESCE(SUM("Quantity"), 0) AS total_quantity
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let total = sqlx::query_scalar_with::<_, Decimal, _>(&sql, args)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Weighted average unit price. NULLIF guards the zero-quantity case and
    /// the outer COALESCE turns it into 0 instead of NULL.
    pub async fn avg_article_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT COALESCE(SUM("Total_Article_Price") / NULLIF(SUM("Quantity"), 0), 0) AS avg_price
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let avg = sqlx::query_scalar_with::<_, Decimal, _>(&sql, args)
            .fetch_one(&self.pool)
            .await?;
        Ok(avg)
    }

    /// Average receipt value per day. Line items are totaled per `Order_ID`
    /// inside each day first, then the per-order totals are averaged.
    pub async fn avg_order_value(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<AvgOrderValueEntry>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT order_date, AVG(order_total) AS avg_order_value
               FROM (
                   SELECT "Order_ID",
                          DATE_TRUNC('day', "Datetime") AS order_date,
                          SUM("Total_Article_Price") AS order_total
                   FROM sales
                   WHERE "Datetime" BETWEEN $1 AND $2{}
                   GROUP BY "Order_ID", DATE_TRUNC('day', "Datetime")
               ) AS orders
               GROUP BY order_date
               ORDER BY order_date"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, AvgOrderValueEntry, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Distinct receipts in the filtered set.
    pub async fn order_count(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<i64, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT COUNT(DISTINCT "Order_ID") AS order_count
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, args)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Revenue bucketed by DD/MM. Buckets are ordered by their earliest
    /// timestamp so the chart reads chronologically within the range.
    pub async fn daily_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<DailySalesEntry>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT to_char("Datetime", 'DD/MM') AS date,
                      SUM("Total_Article_Price") AS total
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY to_char("Datetime", 'DD/MM')
               ORDER BY MIN("Datetime") ASC"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, DailySalesEntry, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue bucketed by calendar month.
    pub async fn monthly_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MonthlySalesEntry>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT to_char("Datetime", 'YYYY-MM') AS month,
                      SUM("Total_Article_Price") AS total
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY month
               ORDER BY month ASC"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, MonthlySalesEntry, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue bucketed by hour of day.
    pub async fn hourly_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<HourlySalesEntry>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT EXTRACT(HOUR FROM "Datetime")::int AS hour,
                      SUM("Total_Article_Price") AS total_sales
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY hour
               ORDER BY hour"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, HourlySalesEntry, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue per item category, highest first.
    pub async fn category_total_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<CategoryTotal>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT "Category", SUM("Total_Article_Price") AS total_price
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY "Category"
               ORDER BY total_price DESC"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, CategoryTotal, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue per seller category, highest first.
    pub async fn seller_categories_total(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<SellerCategoryTotal>, AppError> {
        let clause = filter.and_clause(3);
        let sql = format!(
            r#"SELECT "Seller Category", SUM("Total_Article_Price") AS total_sales
               FROM sales
               WHERE "Datetime" BETWEEN $1 AND $2{}
               GROUP BY "Seller Category"
               ORDER BY total_sales DESC"#,
            clause.sql
        );

        let args = filter_arguments(Some(range), filter)?;
        let rows = sqlx::query_as_with::<_, SellerCategoryTotal, _>(&sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

// Binds in the same order the filter clause numbered the placeholders:
// dates first when present, then the text arrays in render order, then the
// hour list. Trailing parameters (LIMIT/OFFSET) are the caller's to add.
fn filter_arguments(
    range: Option<&DateRange>,
    filter: &FilterSet,
) -> Result<PgArguments, AppError> {
    let mut args = PgArguments::default();
    if let Some(range) = range {
        args.add(range.start).map_err(bind_error)?;
        args.add(range.end).map_err(bind_error)?;
    }
    for values in filter.active_arrays() {
        args.add(values).map_err(bind_error)?;
    }
    if let Some(hours) = filter.hours() {
        args.add(hours).map_err(bind_error)?;
    }
    Ok(args)
}

fn bind_error(e: sqlx::error::BoxDynError) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("failed to bind query parameter: {e}"))
}
