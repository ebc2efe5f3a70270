//! Money calculation using rust_decimal
//!
//! Prices are stored as `f64`; every sum goes through `Decimal` and is rounded
//! half away from zero to two places before it is stored again.

use rust_decimal::prelude::*;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OrderLine;

const DECIMAL_PLACES: u32 = 2;

/// Maximum quantity per order line
pub const MAX_QUANTITY: i32 = 9999;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub fn require_finite(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("{field} must be a finite number, got {value}"),
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> AppResult<()> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidQuantity,
            format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
        )
        .with_detail("quantity", quantity));
    }
    Ok(())
}

/// unit_price * quantity
pub fn line_total(unit_price: f64, quantity: i32) -> Decimal {
    round(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Sum of the line totals
pub fn order_total(lines: &[OrderLine]) -> Decimal {
    round(lines.iter().map(|l| to_decimal(l.line_total)).sum())
}
