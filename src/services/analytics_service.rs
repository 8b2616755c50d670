//! Analytics service
//!
//! Read-only rollups over the fleet: dashboard counters, per-vehicle
//! finance metrics, the expense ledger and the legacy KPI block. Plain
//! queries, no state transitions.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::analytics::{
    DashboardMetrics, VehicleFinanceMetrics, VehicleFinanceRow, VehicleKpis,
};
use crate::models::finance::Expense;
use crate::utils::errors::AppResult;

pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let active_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM vehicles WHERE status = 'on_trip'",
        )
        .fetch_one(&self.pool);

        let in_shop_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM vehicles WHERE status = 'in_shop'",
        )
        .fetch_one(&self.pool);

        let operational_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM vehicles WHERE status <> 'retired'",
        )
        .fetch_one(&self.pool);

        let pending_cargo_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM trips WHERE status = 'draft' AND cargo_weight_kg > 0",
        )
        .fetch_one(&self.pool);

        let (active_fleet, maintenance_alerts, operational_fleet, pending_cargo) =
            futures::future::try_join4(active_fut, in_shop_fut, operational_fut, pending_cargo_fut)
                .await?;

        Ok(DashboardMetrics {
            active_fleet,
            maintenance_alerts,
            utilization_rate: utilization_rate(active_fleet, operational_fleet),
            pending_cargo,
        })
    }

    pub async fn finance_metrics(&self) -> AppResult<Vec<VehicleFinanceMetrics>> {
        let rows = sqlx::query_as::<_, VehicleFinanceRow>(
            r#"
            WITH fuel AS (
                SELECT fl.vehicle_id,
                       coalesce(sum(fl.liters), 0) AS liters,
                       coalesce(sum(fl.cost), 0) AS fuel_cost
                FROM fuel_logs fl
                GROUP BY fl.vehicle_id
            ),
            maintenance AS (
                SELECT ml.vehicle_id,
                       coalesce(sum(ml.cost), 0) AS maintenance_cost
                FROM maintenance_logs ml
                GROUP BY ml.vehicle_id
            ),
            distance AS (
                SELECT t.vehicle_id,
                       coalesce(sum(t.distance_km), 0) AS distance_km,
                       coalesce(sum(t.revenue), 0) AS revenue
                FROM trips t
                WHERE t.status = 'completed'
                GROUP BY t.vehicle_id
            )
            SELECT v.id AS vehicle_id,
                   v.plate,
                   v.name,
                   v.model,
                   v.acquisition_cost,
                   coalesce(f.liters, 0) AS liters,
                   coalesce(f.fuel_cost, 0) AS fuel_cost,
                   coalesce(m.maintenance_cost, 0) AS maintenance_cost,
                   coalesce(d.distance_km, 0) AS distance_km,
                   coalesce(d.revenue, 0) AS revenue
            FROM vehicles v
            LEFT JOIN fuel f ON f.vehicle_id = v.id
            LEFT JOIN maintenance m ON m.vehicle_id = v.id
            LEFT JOIN distance d ON d.vehicle_id = v.id
            ORDER BY v.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(finance_rollup).collect())
    }

    pub async fn list_expenses(&self) -> AppResult<(Vec<Expense>, Decimal)> {
        let items_fut =
            sqlx::query_as::<_, Expense>("SELECT * FROM expenses ORDER BY date DESC")
                .fetch_all(&self.pool);

        let total_fut = sqlx::query_scalar::<_, Decimal>(
            "SELECT coalesce(sum(amount), 0) FROM expenses",
        )
        .fetch_one(&self.pool);

        let (items, total) = futures::future::try_join(items_fut, total_fut).await?;

        Ok((items, total))
    }

    pub async fn vehicle_kpis(&self) -> AppResult<VehicleKpis> {
        let total_fut =
            sqlx::query_scalar::<_, i64>("SELECT count(*) FROM vehicles").fetch_one(&self.pool);

        let on_trip_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM vehicles WHERE status = 'on_trip'",
        )
        .fetch_one(&self.pool);

        let in_shop_fut = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM vehicles WHERE status = 'in_shop'",
        )
        .fetch_one(&self.pool);

        let odometer_fut = sqlx::query_scalar::<_, Decimal>(
            "SELECT coalesce(avg(odometer_km), 0) FROM vehicles",
        )
        .fetch_one(&self.pool);

        let (total_vehicles, active, in_shop, average) =
            futures::future::try_join4(total_fut, on_trip_fut, in_shop_fut, odometer_fut).await?;

        Ok(VehicleKpis {
            total_vehicles,
            in_shop,
            active,
            average_mileage: average.round().to_i64().unwrap_or(0),
        })
    }
}

fn utilization_rate(active: i64, operational: i64) -> f64 {
    if operational == 0 {
        return 0.0;
    }
    let rate = active as f64 / operational as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

fn finance_rollup(row: VehicleFinanceRow) -> VehicleFinanceMetrics {
    let total_operational_cost = row.fuel_cost + row.maintenance_cost;

    let fuel_efficiency_km_per_l = if row.liters > Decimal::ZERO {
        row.liters
            .to_f64()
            .map(|liters| round4(row.distance_km as f64 / liters))
    } else {
        None
    };

    let roi = match row.acquisition_cost {
        Some(acquisition) if acquisition > Decimal::ZERO => {
            let margin = row.revenue - total_operational_cost;
            match (margin.to_f64(), acquisition.to_f64()) {
                (Some(margin), Some(acquisition)) => Some(round4(margin / acquisition)),
                _ => None,
            }
        }
        _ => None,
    };

    let roi_meta = if roi.is_none() {
        "ROI unavailable until acquisition_cost is provided".to_string()
    } else {
        "ROI computed as (Revenue - (Maintenance + Fuel)) / AcquisitionCost".to_string()
    };

    VehicleFinanceMetrics {
        vehicle_id: row.vehicle_id,
        plate: row.plate,
        name: row.name,
        model: row.model,
        distance_km: row.distance_km,
        liters: row.liters,
        fuel_cost: row.fuel_cost,
        maintenance_cost: row.maintenance_cost,
        total_operational_cost,
        fuel_efficiency_km_per_l,
        revenue: row.revenue,
        acquisition_cost: row.acquisition_cost,
        roi,
        roi_meta,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        acquisition: Option<Decimal>,
        liters: Decimal,
        fuel_cost: Decimal,
        maintenance_cost: Decimal,
        distance_km: i64,
        revenue: Decimal,
    ) -> VehicleFinanceRow {
        VehicleFinanceRow {
            vehicle_id: "veh-001".to_string(),
            plate: "FF-1024".to_string(),
            name: "Van".to_string(),
            model: "05".to_string(),
            acquisition_cost: acquisition,
            liters,
            fuel_cost,
            maintenance_cost,
            distance_km,
            revenue,
        }
    }

    #[test]
    fn utilization_handles_empty_fleet() {
        assert_eq!(utilization_rate(0, 0), 0.0);
        assert_eq!(utilization_rate(1, 4), 25.0);
    }

    #[test]
    fn rollup_computes_efficiency_and_roi() {
        let metrics = finance_rollup(row(
            Some(Decimal::from(45000)),
            Decimal::from(30),
            Decimal::from(45),
            Decimal::from(55),
            150,
            Decimal::from(1000),
        ));

        assert_eq!(metrics.total_operational_cost, Decimal::from(100));
        assert_eq!(metrics.fuel_efficiency_km_per_l, Some(5.0));
        assert_eq!(metrics.roi, Some(0.02));
    }

    #[test]
    fn rollup_without_acquisition_cost_has_no_roi() {
        let metrics = finance_rollup(row(
            None,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            0,
            Decimal::ZERO,
        ));

        assert_eq!(metrics.roi, None);
        assert_eq!(metrics.fuel_efficiency_km_per_l, None);
        assert!(metrics.roi_meta.contains("unavailable"));
    }
}
