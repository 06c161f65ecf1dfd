// src/services/analytics_service.rs

use std::future::Future;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AnalyticsRepository,
    models::analytics::{
        AbcClass, AbcEntry, InventoryAnalytics, ProductStockValue, PurchasingAnalytics,
        SalesAnalytics,
    },
};

const CLASS_A_LIMIT: Decimal = dec!(80);
const CLASS_B_LIMIT: Decimal = dec!(95);

/// Roda uma seção do relatório; em erro, registra e devolve o padrão da seção.
async fn section<T, F>(name: &'static str, fut: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, AppError>>,
{
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(section = name, error = %e, "seção do relatório indisponível, usando padrão");
            T::default()
        }
    }
}

/// Curva ABC pelo valor em estoque: A até 80% acumulado, B até 95%, o resto C.
/// Espera a lista em ordem decrescente de valor.
pub fn classify_abc(values: Vec<ProductStockValue>) -> Vec<AbcEntry> {
    let total: Decimal = values.iter().map(|v| v.stock_value).sum();
    let mut cumulative = Decimal::ZERO;

    values
        .into_iter()
        .map(|item| {
            cumulative += item.stock_value;
            let share = if total.is_zero() {
                Decimal::ONE_HUNDRED
            } else {
                (cumulative * Decimal::ONE_HUNDRED / total).round_dp(2)
            };

            let class = if total.is_zero() {
                AbcClass::C
            } else if share <= CLASS_A_LIMIT {
                AbcClass::A
            } else if share <= CLASS_B_LIMIT {
                AbcClass::B
            } else {
                AbcClass::C
            };

            AbcEntry {
                product_id: item.product_id,
                product_name: item.product_name,
                stock_value: item.stock_value,
                cumulative_share: share,
                class,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository) -> Self {
        Self { repo }
    }

    pub async fn purchasing(&self, organization_id: Uuid) -> PurchasingAnalytics {
        let repo = &self.repo;
        let (orders_by_status, open_order_value, spend_by_supplier, monthly_spend, pending_suggestions) = tokio::join!(
            section("orders_by_status", repo.purchase_orders_by_status(organization_id)),
            section("open_order_value", repo.open_order_value(organization_id)),
            section("spend_by_supplier", repo.top_suppliers_by_spend(organization_id)),
            section("monthly_spend", repo.monthly_spend(organization_id)),
            section("pending_suggestions", repo.pending_suggestions(organization_id)),
        );

        PurchasingAnalytics {
            orders_by_status,
            open_order_value,
            spend_by_supplier,
            monthly_spend,
            pending_suggestions,
        }
    }

    pub async fn sales(&self, organization_id: Uuid) -> SalesAnalytics {
        let repo = &self.repo;
        let (total_revenue, orders_by_status, monthly_revenue, top_customers) = tokio::join!(
            section("total_revenue", repo.total_revenue(organization_id)),
            section("orders_by_status", repo.sales_orders_by_status(organization_id)),
            section("monthly_revenue", repo.monthly_revenue(organization_id)),
            section("top_customers", repo.top_customers(organization_id)),
        );

        SalesAnalytics {
            total_revenue,
            orders_by_status,
            monthly_revenue,
            top_customers,
        }
    }

    pub async fn inventory(&self, organization_id: Uuid) -> InventoryAnalytics {
        let repo = &self.repo;
        let (values, low_stock_items, daily_movements) = tokio::join!(
            section("stock_value", repo.product_stock_values(organization_id)),
            section("low_stock_items", repo.low_stock_items(organization_id)),
            section("daily_movements", repo.daily_movements(organization_id)),
        );

        let stock_value = values.iter().map(|v| v.stock_value).sum();

        InventoryAnalytics {
            stock_value,
            low_stock_items,
            abc_classification: classify_abc(values),
            daily_movements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: Decimal) -> ProductStockValue {
        ProductStockValue {
            product_id: Uuid::new_v4(),
            product_name: format!("item {}", value),
            stock_value: value,
        }
    }

    #[test]
    fn classifies_by_cumulative_share() {
        let entries = classify_abc(vec![
            item(dec!(700)),
            item(dec!(100)),
            item(dec!(100)),
            item(dec!(50)),
            item(dec!(50)),
        ]);

        let classes: Vec<_> = entries.iter().map(|e| e.class).collect();
        assert_eq!(
            classes,
            vec![AbcClass::A, AbcClass::A, AbcClass::B, AbcClass::B, AbcClass::C]
        );
        assert_eq!(entries[0].cumulative_share, dec!(70));
        assert_eq!(entries[4].cumulative_share, dec!(100));
    }

    #[test]
    fn empty_stock_has_no_entries() {
        assert!(classify_abc(vec![]).is_empty());
    }

    #[test]
    fn zero_value_stock_is_class_c() {
        let entries = classify_abc(vec![item(Decimal::ZERO)]);
        assert_eq!(entries[0].class, AbcClass::C);
    }

    #[tokio::test]
    async fn failed_section_falls_back_to_default() {
        let failed: Vec<u32> = section("broken", async {
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
        })
        .await;
        assert!(failed.is_empty());

        let ok: Decimal = section("ok", async { Ok(dec!(42)) }).await;
        assert_eq!(ok, dec!(42));
    }
}
