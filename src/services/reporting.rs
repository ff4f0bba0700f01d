use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{
        filter::{DateRange, FilterSet},
        SalesRepository,
    },
    models::sales::{
        AvgOrderValueEntry, CategoryTotal, ComparisonDailySales, DailySalesEntry,
        HourlySalesEntry, MonthlySalesEntry, MostSoldItem, MostSoldItemByPrice, SaleRecord,
        SellerCategoryTotal,
    },
};

/// The reporting questions the dashboard asks, one method per endpoint.
/// Mostly thin delegation to the repository; the comparison chart is the one
/// real composition here.
#[derive(Clone)]
pub struct ReportingService {
    repo: SalesRepository,
}

impl ReportingService {
    pub fn new(repo: SalesRepository) -> Self {
        Self { repo }
    }

    pub async fn all_data(
        &self,
        range: &DateRange,
        filter: &FilterSet,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SaleRecord>, AppError> {
        self.repo.all_data(range, filter, limit, offset).await
    }

    pub async fn sellers(&self) -> Result<Vec<String>, AppError> {
        self.repo.sellers().await
    }

    pub async fn seller_categories(&self) -> Result<Vec<String>, AppError> {
        self.repo.seller_categories().await
    }

    pub async fn categories(
        &self,
        range: Option<&DateRange>,
        filter: &FilterSet,
    ) -> Result<Vec<String>, AppError> {
        self.repo.categories(range, filter).await
    }

    pub async fn article_names(
        &self,
        range: Option<&DateRange>,
        filter: &FilterSet,
    ) -> Result<Vec<String>, AppError> {
        self.repo.article_names(range, filter).await
    }

    pub async fn most_sold_items(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MostSoldItem>, AppError> {
        self.repo.most_sold_items(range, filter).await
    }

    pub async fn most_sold_items_by_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MostSoldItemByPrice>, AppError> {
        self.repo.most_sold_items_by_price(range, filter).await
    }

    pub async fn total_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        self.repo.total_sales(range, filter).await
    }

    pub async fn total_quantity(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        self.repo.total_quantity(range, filter).await
    }

    pub async fn avg_article_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Decimal, AppError> {
        self.repo.avg_article_price(range, filter).await
    }

    pub async fn avg_order_value(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<AvgOrderValueEntry>, AppError> {
        self.repo.avg_order_value(range, filter).await
    }

    pub async fn order_count(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<i64, AppError> {
        self.repo.order_count(range, filter).await
    }

    pub async fn daily_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<DailySalesEntry>, AppError> {
        self.repo.daily_sales(range, filter).await
    }

    pub async fn monthly_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<MonthlySalesEntry>, AppError> {
        self.repo.monthly_sales(range, filter).await
    }

    pub async fn hourly_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<HourlySalesEntry>, AppError> {
        self.repo.hourly_sales(range, filter).await
    }

    pub async fn category_total_price(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<CategoryTotal>, AppError> {
        self.repo.category_total_price(range, filter).await
    }

    pub async fn seller_categories_total(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<Vec<SellerCategoryTotal>, AppError> {
        self.repo.seller_categories_total(range, filter).await
    }

    /// Daily sales for the requested range and for the same range one year
    /// earlier, fetched concurrently. The shared DD/MM bucketing keys make
    /// the two series line up on the chart's x-axis.
    pub async fn comparison_daily_sales(
        &self,
        range: &DateRange,
        filter: &FilterSet,
    ) -> Result<ComparisonDailySales, AppError> {
        let last_year_range = range.previous_year();
        let (this_year, last_year) = tokio::try_join!(
            self.repo.daily_sales(range, filter),
            self.repo.daily_sales(&last_year_range, filter),
        )?;
        Ok(ComparisonDailySales {
            this_year,
            last_year,
        })
    }
}
