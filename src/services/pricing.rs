// src/services/pricing.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{common::error::AppError, models::procurement::PRICE_LIMIT};

// Valores de uma linha de pedido, já arredondados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Duas casas, metade para longe do zero (0.005 -> 0.01).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// Valores monetários precisam caber em NUMERIC(14,2)
fn storable(value: Option<Decimal>) -> Result<Decimal, AppError> {
    match value {
        Some(v) if v.abs() < PRICE_LIMIT => Ok(v),
        _ => Err(AppError::AmountOutOfRange),
    }
}

/// `tax_rate` em percentual (18 = 18%).
pub fn line_amounts(
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
) -> Result<LineAmounts, AppError> {
    let subtotal = storable(quantity.checked_mul(unit_price).map(round_money))?;
    let tax = storable(
        subtotal
            .checked_mul(tax_rate)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(round_money),
    )?;
    let total = storable(subtotal.checked_add(tax))?;

    Ok(LineAmounts { subtotal, tax, total })
}

// Totais do cabeçalho = soma das linhas já arredondadas
pub fn order_totals<'a>(
    lines: impl IntoIterator<Item = &'a LineAmounts>,
) -> Result<OrderTotals, AppError> {
    lines.into_iter().try_fold(OrderTotals::default(), |acc, line| {
        Ok(OrderTotals {
            subtotal: storable(acc.subtotal.checked_add(line.subtotal))?,
            tax_amount: storable(acc.tax_amount.checked_add(line.tax))?,
            total_amount: storable(acc.total_amount.checked_add(line.total))?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn computes_line_with_default_tax() {
        let line = line_amounts(dec!(10), dec!(100), dec!(18)).unwrap();
        assert_eq!(line.subtotal, dec!(1000.00));
        assert_eq!(line.tax, dec!(180.00));
        assert_eq!(line.total, dec!(1180.00));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn rounds_subtotal_and_tax_separately() {
        // 3 x 3.335 = 10.005 -> 10.01; 10.01 x 18% = 1.8018 -> 1.80
        let line = line_amounts(dec!(3), dec!(3.335), dec!(18)).unwrap();
        assert_eq!(line.subtotal, dec!(10.01));
        assert_eq!(line.tax, dec!(1.80));
        assert_eq!(line.total, dec!(11.81));
    }

    #[test]
    fn zero_price_yields_zero_totals() {
        let line = line_amounts(dec!(50), Decimal::ZERO, dec!(18)).unwrap();
        assert_eq!(line.total, Decimal::ZERO);
    }

    #[test]
    fn header_totals_sum_rounded_lines() {
        let lines = [
            line_amounts(dec!(10), dec!(100), dec!(18)).unwrap(),
            line_amounts(dec!(3), dec!(3.335), dec!(18)).unwrap(),
        ];
        let totals = order_totals(&lines).unwrap();
        assert_eq!(totals.subtotal, dec!(1010.01));
        assert_eq!(totals.tax_amount, dec!(181.80));
        assert_eq!(totals.total_amount, dec!(1191.81));
        assert_eq!(totals.total_amount, totals.subtotal + totals.tax_amount);
    }

    #[test]
    fn overflowing_line_is_an_error_not_a_panic() {
        let err = line_amounts(dec!(1e15), dec!(1e15), dec!(18)).unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
    }

    #[test]
    fn line_total_must_fit_the_money_column() {
        // 9999999999 x 999 passa de 12 dígitos inteiros
        let err = line_amounts(dec!(9999999999), dec!(999), dec!(0)).unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));

        // Subtotal cabe, mas o imposto empurra o total para fora
        let err = line_amounts(dec!(1), dec!(999999999999), dec!(18)).unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
    }

    #[test]
    fn header_sum_is_checked_too() {
        let big = line_amounts(dec!(1), dec!(600000000000), dec!(0)).unwrap();
        let err = order_totals(&[big, big]).unwrap_err();
        assert!(matches!(err, AppError::AmountOutOfRange));
    }
}
