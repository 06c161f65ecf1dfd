// src/services/reorder_service.rs

use std::collections::{HashMap, HashSet};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{SettingsRepository, StockRepository},
    models::{
        procurement::{
            CandidateShortage, ConsumptionRate, CreateReorderRuleRequest, ReorderPriority,
            ReorderRule, StockPosition, UpdateReorderRuleRequest,
        },
        tenancy::RequestContext,
    },
};

#[derive(Debug, Default)]
pub struct EvaluationOutcome {
    pub candidates: Vec<CandidateShortage>,
    /// Regras globais que não puderam ser avaliadas (organização sem depósito ativo)
    pub skipped: usize,
}

/// Dias até zerar o disponível no ritmo de consumo atual.
/// `None` sem histórico de consumo; 0 quando já não há saldo.
pub fn days_of_stock_remaining(available: Decimal, average_daily: Option<Decimal>) -> Option<i32> {
    let rate = average_daily.filter(|rate| *rate > Decimal::ZERO)?;
    if available <= Decimal::ZERO {
        return Some(0);
    }

    let days = available
        .checked_div(rate)
        .map(|d| d.floor())
        .and_then(|d| d.to_i32())
        .unwrap_or(i32::MAX);

    Some(days)
}

/// Escala para `critical` quando o estoque acaba dentro do limite.
pub fn effective_priority(
    rule_priority: ReorderPriority,
    days_remaining: Option<i32>,
    critical_days_threshold: i32,
) -> ReorderPriority {
    match days_remaining {
        Some(days) if days <= critical_days_threshold => ReorderPriority::Critical,
        _ => rule_priority,
    }
}

/// Cruza regras ativas com saldos e consumo. Sem efeitos colaterais.
///
/// Regra com depósito vale só para ele e vence a regra global do mesmo produto.
/// Regra global vale para todo depósito com registro de saldo do produto; produto
/// sem nenhum saldo é avaliado (estoque 0) no `fallback_warehouse`.
pub fn evaluate(
    rules: &[ReorderRule],
    positions: &[StockPosition],
    consumption: &[ConsumptionRate],
    fallback_warehouse: Option<Uuid>,
    critical_days_threshold: i32,
) -> EvaluationOutcome {
    let available: HashMap<(Uuid, Uuid), Decimal> = positions
        .iter()
        .map(|p| ((p.product_id, p.warehouse_id), p.available()))
        .collect();

    let mut stocked_warehouses: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for position in positions {
        stocked_warehouses
            .entry(position.product_id)
            .or_default()
            .push(position.warehouse_id);
    }

    let rates: HashMap<(Uuid, Uuid), Decimal> = consumption
        .iter()
        .map(|c| ((c.product_id, c.warehouse_id), c.average_daily))
        .collect();

    let overridden: HashSet<(Uuid, Uuid)> = rules
        .iter()
        .filter(|r| r.is_active)
        .filter_map(|r| r.warehouse_id.map(|w| (r.product_id, w)))
        .collect();

    let mut outcome = EvaluationOutcome::default();

    for rule in rules.iter().filter(|r| r.is_active) {
        let targets: Vec<Uuid> = match rule.warehouse_id {
            Some(warehouse_id) => vec![warehouse_id],
            None => match stocked_warehouses.get(&rule.product_id) {
                Some(warehouses) => warehouses
                    .iter()
                    .copied()
                    .filter(|w| !overridden.contains(&(rule.product_id, *w)))
                    .collect(),
                None => match fallback_warehouse {
                    Some(w) if !overridden.contains(&(rule.product_id, w)) => vec![w],
                    Some(_) => Vec::new(),
                    None => {
                        tracing::warn!(
                            rule_id = %rule.id,
                            product_id = %rule.product_id,
                            "regra global sem depósito ativo para avaliar, ignorada"
                        );
                        outcome.skipped += 1;
                        Vec::new()
                    }
                },
            },
        };

        for warehouse_id in targets {
            let key = (rule.product_id, warehouse_id);
            let current_stock = available.get(&key).copied().unwrap_or(Decimal::ZERO);

            if current_stock > rule.reorder_point {
                continue;
            }

            let days = days_of_stock_remaining(current_stock, rates.get(&key).copied());

            outcome.candidates.push(CandidateShortage {
                reorder_rule_id: rule.id,
                product_id: rule.product_id,
                warehouse_id,
                current_stock,
                reorder_quantity: rule.reorder_quantity,
                days_of_stock_remaining: days,
                priority: effective_priority(rule.priority, days, critical_days_threshold),
            });
        }
    }

    outcome
}

#[derive(Clone)]
pub struct ReorderService {
    pool: PgPool,
    stock_repo: StockRepository,
    settings_repo: SettingsRepository,
}

impl ReorderService {
    pub fn new(pool: PgPool, stock_repo: StockRepository, settings_repo: SettingsRepository) -> Self {
        Self { pool, stock_repo, settings_repo }
    }

    /// Lê regras, saldos e consumo num mesmo snapshot e devolve as faltas.
    pub async fn find_shortages(&self, ctx: &RequestContext) -> Result<EvaluationOutcome, AppError> {
        let org = ctx.organization_id;

        // REPEATABLE READ: todas as leituras enxergam o mesmo estado
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let settings = self.settings_repo.get_settings(&mut *tx, org).await?;
        let rules = self.stock_repo.list_active_rules(&mut *tx, org).await?;
        let positions = self.stock_repo.stock_positions(&mut *tx, org).await?;
        let consumption = self
            .stock_repo
            .consumption_rates(&mut *tx, org, settings.consumption_window_days)
            .await?;
        let fallback = self.stock_repo.default_warehouse(&mut *tx, org).await?;

        tx.commit().await?;

        Ok(evaluate(
            &rules,
            &positions,
            &consumption,
            fallback,
            settings.critical_days_threshold,
        ))
    }

    pub async fn list_rules(
        &self,
        ctx: &RequestContext,
        product_id: Option<Uuid>,
    ) -> Result<Vec<ReorderRule>, AppError> {
        self.stock_repo.list_rules(ctx.organization_id, product_id).await
    }

    pub async fn create_rule(
        &self,
        ctx: &RequestContext,
        input: CreateReorderRuleRequest,
    ) -> Result<ReorderRule, AppError> {
        input.validate()?;

        let org = ctx.organization_id;
        if !self.stock_repo.product_exists(org, input.product_id).await? {
            return Err(AppError::ProductNotFound);
        }
        if let Some(warehouse_id) = input.warehouse_id {
            if !self.stock_repo.warehouse_exists(org, warehouse_id).await? {
                return Err(AppError::WarehouseNotFound);
            }
        }

        let rule = self
            .stock_repo
            .create_rule(
                org,
                input.product_id,
                input.warehouse_id,
                input.reorder_point,
                input.reorder_quantity,
                input.lead_time_days,
                input.priority,
                ctx.user_id,
            )
            .await?;

        tracing::info!(rule_id = %rule.id, product_id = %rule.product_id, "regra de reposição criada");
        Ok(rule)
    }

    pub async fn update_rule(
        &self,
        ctx: &RequestContext,
        rule_id: Uuid,
        input: UpdateReorderRuleRequest,
    ) -> Result<ReorderRule, AppError> {
        input.validate()?;

        self.stock_repo
            .update_rule(
                ctx.organization_id,
                rule_id,
                input.reorder_point,
                input.reorder_quantity,
                input.lead_time_days,
                input.priority,
                input.is_active,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn rule(product_id: Uuid, warehouse_id: Option<Uuid>, point: Decimal) -> ReorderRule {
        ReorderRule {
            id: Uuid::new_v4(),
            organization_id: Uuid::nil(),
            product_id,
            warehouse_id,
            reorder_point: point,
            reorder_quantity: dec!(50),
            lead_time_days: 7,
            priority: ReorderPriority::Normal,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn position(product_id: Uuid, warehouse_id: Uuid, on_hand: Decimal) -> StockPosition {
        StockPosition {
            product_id,
            warehouse_id,
            quantity_on_hand: on_hand,
            quantity_reserved: Decimal::ZERO,
        }
    }

    #[test]
    fn flags_stock_at_or_below_reorder_point() {
        let (product, warehouse) = (Uuid::new_v4(), Uuid::new_v4());
        let rules = [rule(product, Some(warehouse), dec!(10))];

        let below = evaluate(&rules, &[position(product, warehouse, dec!(5))], &[], None, 3);
        assert_eq!(below.candidates.len(), 1);
        assert_eq!(below.candidates[0].current_stock, dec!(5));
        assert_eq!(below.candidates[0].reorder_quantity, dec!(50));
        assert_eq!(below.candidates[0].days_of_stock_remaining, None);

        let equal = evaluate(&rules, &[position(product, warehouse, dec!(10))], &[], None, 3);
        assert_eq!(equal.candidates.len(), 1);

        let above = evaluate(&rules, &[position(product, warehouse, dec!(11))], &[], None, 3);
        assert!(above.candidates.is_empty());
    }

    #[test]
    fn reserved_stock_is_not_available() {
        let (product, warehouse) = (Uuid::new_v4(), Uuid::new_v4());
        let mut stock = position(product, warehouse, dec!(20));
        stock.quantity_reserved = dec!(15);

        let outcome = evaluate(&[rule(product, Some(warehouse), dec!(10))], &[stock], &[], None, 3);
        assert_eq!(outcome.candidates[0].current_stock, dec!(5));
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let (product, warehouse) = (Uuid::new_v4(), Uuid::new_v4());
        let mut inactive = rule(product, Some(warehouse), dec!(10));
        inactive.is_active = false;

        let outcome = evaluate(&[inactive], &[position(product, warehouse, dec!(0))], &[], None, 3);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn global_rule_expands_to_stocked_warehouses_unless_overridden() {
        let product = Uuid::new_v4();
        let (w1, w2) = (Uuid::new_v4(), Uuid::new_v4());
        let rules = [
            rule(product, None, dec!(10)),
            // w2 tem regra própria com ponto de pedido menor
            rule(product, Some(w2), dec!(1)),
        ];
        let positions = [position(product, w1, dec!(4)), position(product, w2, dec!(4))];

        let outcome = evaluate(&rules, &positions, &[], None, 3);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].warehouse_id, w1);
    }

    #[test]
    fn global_rule_without_stock_uses_fallback_warehouse() {
        let (product, fallback) = (Uuid::new_v4(), Uuid::new_v4());
        let rules = [rule(product, None, dec!(10))];

        let outcome = evaluate(&rules, &[], &[], Some(fallback), 3);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].warehouse_id, fallback);
        assert_eq!(outcome.candidates[0].current_stock, Decimal::ZERO);

        let skipped = evaluate(&rules, &[], &[], None, 3);
        assert!(skipped.candidates.is_empty());
        assert_eq!(skipped.skipped, 1);
    }

    #[test]
    fn days_remaining_uses_average_consumption() {
        assert_eq!(days_of_stock_remaining(dec!(5), None), None);
        assert_eq!(days_of_stock_remaining(dec!(5), Some(Decimal::ZERO)), None);
        assert_eq!(days_of_stock_remaining(dec!(5), Some(dec!(2))), Some(2));
        assert_eq!(days_of_stock_remaining(dec!(0), Some(dec!(2))), Some(0));
        assert_eq!(days_of_stock_remaining(dec!(-3), Some(dec!(2))), Some(0));
    }

    #[test]
    fn escalates_to_critical_within_threshold() {
        assert_eq!(
            effective_priority(ReorderPriority::Low, Some(3), 3),
            ReorderPriority::Critical
        );
        assert_eq!(
            effective_priority(ReorderPriority::Low, Some(4), 3),
            ReorderPriority::Low
        );
        assert_eq!(
            effective_priority(ReorderPriority::High, None, 3),
            ReorderPriority::High
        );
    }

    #[test]
    fn candidate_priority_reflects_consumption() {
        let (product, warehouse) = (Uuid::new_v4(), Uuid::new_v4());
        let rates = [ConsumptionRate {
            product_id: product,
            warehouse_id: warehouse,
            average_daily: dec!(2.5),
        }];

        let outcome = evaluate(
            &[rule(product, Some(warehouse), dec!(10))],
            &[position(product, warehouse, dec!(5))],
            &rates,
            None,
            3,
        );
        assert_eq!(outcome.candidates[0].days_of_stock_remaining, Some(2));
        assert_eq!(outcome.candidates[0].priority, ReorderPriority::Critical);
    }
}
