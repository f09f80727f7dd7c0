//! Sales forecasting.
//!
//! Sales records are summed per calendar day and an ordinary least squares line
//! `sales = intercept + slope * ordinal(date)` is fitted, where the ordinal counts days
//! from the common era. The line is then evaluated for the days after the latest sale.
//!
//! Forecasting never fails the caller: database errors are logged and produce an empty
//! [`Forecast`].

use crate::{
    entities::{SalesRecord, sales_record},
    errors::Result,
};
use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect};
use serde::Serialize;
use std::collections::BTreeMap;

/// Predicted daily sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    /// Forecast days, consecutive, starting the day after the latest sale
    pub dates: Vec<NaiveDate>,
    /// Predicted units sold on each day, rounded to two decimals
    pub sales: Vec<f64>,
}

impl Forecast {
    /// True when there was no data to forecast from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Fitted regression line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Value of the line at x = 0
    pub intercept: f64,
    /// Change per unit of x
    pub slope: f64,
}

impl LinearFit {
    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Ordinary least squares fit of `y` on `x`.
///
/// Returns `None` for no points. When every x is identical the slope is zero and the
/// line passes through the mean of y.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_linear(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (dx.mul_add(dx, sxx), dx.mul_add(y - mean_y, sxy))
    });

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    Some(LinearFit {
        intercept: slope.mul_add(-mean_x, mean_y),
        slope,
    })
}

/// Sums sales per calendar day.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn daily_totals<I>(records: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    let mut totals = BTreeMap::new();
    for (date, sales) in records {
        *totals.entry(date).or_insert(0.0) += sales as f64;
    }
    totals
}

fn ordinal(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Forecasts `days` days past the latest date in `totals`.
#[must_use]
pub fn forecast_from_daily(totals: &BTreeMap<NaiveDate, f64>, days: u32) -> Forecast {
    let Some(&last_date) = totals.keys().next_back() else {
        return Forecast::default();
    };

    let points: Vec<(f64, f64)> = totals
        .iter()
        .map(|(date, sales)| (ordinal(*date), *sales))
        .collect();
    let Some(fit) = fit_linear(&points) else {
        return Forecast::default();
    };

    let mut forecast = Forecast::default();
    for offset in 1..=u64::from(days) {
        let Some(date) = last_date.checked_add_days(Days::new(offset)) else {
            break;
        };
        forecast.dates.push(date);
        forecast.sales.push(round2(fit.predict(ordinal(date))));
    }
    forecast
}

async fn load_daily_totals(db: &DatabaseConnection) -> Result<BTreeMap<NaiveDate, f64>> {
    let records: Vec<(NaiveDate, i64)> = SalesRecord::find()
        .select_only()
        .column(sales_record::Column::Date)
        .column(sales_record::Column::Sales)
        .into_tuple::<(NaiveDate, i64)>()
        .all(db)
        .await?;
    Ok(daily_totals(records))
}

/// Forecasts daily sales for the next `days` days from the recorded sales.
///
/// Returns an empty forecast when there are no sales or the records can't be read.
pub async fn forecast_sales(db: &DatabaseConnection, days: u32) -> Forecast {
    match load_daily_totals(db).await {
        Ok(totals) => forecast_from_daily(&totals, days),
        Err(e) => {
            tracing::error!(error = %e, "Prediction error");
            Forecast::default()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_fit_linear_exact_line() {
        let fit = fit_linear(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_linear_degenerate_inputs() {
        assert!(fit_linear(&[]).is_none());

        let single = fit_linear(&[(5.0, 12.0)]).unwrap();
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.predict(100.0), 12.0);
    }

    #[test]
    fn test_daily_totals_groups_by_date() {
        let totals = daily_totals([(day(2), 3), (day(1), 4), (day(2), 5)]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&day(1)], 4.0);
        assert_eq!(totals[&day(2)], 8.0);
    }

    #[test]
    fn test_forecast_extrapolates_trend() {
        let totals = daily_totals([(day(1), 10), (day(2), 20), (day(3), 30)]);
        let forecast = forecast_from_daily(&totals, 3);

        assert_eq!(forecast.dates, vec![day(4), day(5), day(6)]);
        assert_eq!(forecast.sales, vec![40.0, 50.0, 60.0]);
    }

    #[test]
    fn test_forecast_handles_gaps_between_dates() {
        // Day 2 has no sales at all; the fit is over calendar ordinals, not row positions
        let totals = daily_totals([(day(1), 1), (day(3), 3)]);
        let forecast = forecast_from_daily(&totals, 1);
        assert_eq!(forecast.dates, vec![day(4)]);
        assert_eq!(forecast.sales, vec![4.0]);
    }

    #[test]
    fn test_forecast_rounds_to_two_decimals() {
        let totals = daily_totals([(day(1), 1), (day(2), 1), (day(3), 2)]);
        let forecast = forecast_from_daily(&totals, 1);
        // slope 0.5, intercept through mean 4/3 at day 2 -> day 4 = 2.333...
        assert_eq!(forecast.sales, vec![2.33]);
    }

    #[test]
    fn test_forecast_single_day_is_flat() {
        let totals = daily_totals([(day(9), 6)]);
        let forecast = forecast_from_daily(&totals, 2);
        assert_eq!(forecast.dates, vec![day(10), day(11)]);
        assert_eq!(forecast.sales, vec![6.0, 6.0]);
    }

    #[test]
    fn test_forecast_empty() {
        let forecast = forecast_from_daily(&BTreeMap::new(), 7);
        assert!(forecast.is_empty());
        assert!(forecast.sales.is_empty());
    }

    #[tokio::test]
    async fn test_forecast_sales_from_database() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Tea").await?;
        record_test_sale(&db, product.id, day(1), 2).await?;
        record_test_sale(&db, product.id, day(2), 4).await?;

        let forecast = forecast_sales(&db, 1).await;
        assert_eq!(forecast.dates, vec![day(3)]);
        assert_eq!(forecast.sales, vec![6.0]);

        Ok(())
    }

    #[tokio::test]
    async fn test_forecast_sales_swallows_errors() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("boom".to_string())])
            .into_connection();

        let forecast = forecast_sales(&db, 7).await;
        assert!(forecast.is_empty());
    }
}
