//! Purchase receiving math: weighted-average unit cost and invoice totals.

use thiserror::Error;
use uuid::Uuid;

use crate::{error::AppError, money::div_round_half_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockPosition {
    pub stock: i32,
    pub cost_cent: i64,
}

impl StockPosition {
    /// Blend a receipt into the position:
    /// `round((stock * cost + qty * unit_cost) / (stock + qty))`.
    pub fn receive(self, qty: i32, unit_cost_cent: i64) -> Result<StockPosition, CostingError> {
        let stock = self.stock.checked_add(qty).ok_or(CostingError::Overflow)?;
        let value = i64::from(self.stock)
            .checked_mul(self.cost_cent)
            .zip(i64::from(qty).checked_mul(unit_cost_cent))
            .and_then(|(held, received)| held.checked_add(received))
            .ok_or(CostingError::Overflow)?;
        Ok(StockPosition {
            stock,
            cost_cent: div_round_half_up(value, i64::from(stock)),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReceiptLine {
    pub variant_id: Uuid,
    pub qty: i32,
    pub unit_cost_cent: i64,
    pub iva_unit_cent: i64,
}

impl ReceiptLine {
    pub fn validate(&self) -> Result<(), CostingError> {
        if self.qty <= 0 {
            return Err(CostingError::InvalidQuantity(self.variant_id));
        }
        if self.unit_cost_cent <= 0 {
            return Err(CostingError::InvalidUnitCost(self.variant_id));
        }
        if self.iva_unit_cent < 0 {
            return Err(CostingError::InvalidIva(self.variant_id));
        }
        self.subtotal_cent()?;
        self.iva_cent()?;
        Ok(())
    }

    pub fn subtotal_cent(&self) -> Result<i64, CostingError> {
        self.unit_cost_cent
            .checked_mul(i64::from(self.qty))
            .ok_or(CostingError::LineOverflow(self.variant_id))
    }

    pub fn iva_cent(&self) -> Result<i64, CostingError> {
        self.iva_unit_cent
            .checked_mul(i64::from(self.qty))
            .ok_or(CostingError::LineOverflow(self.variant_id))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CostingError {
    #[error("at least one purchase item is required")]
    Empty,
    #[error("quantity must be greater than 0 for variant {0}")]
    InvalidQuantity(Uuid),
    #[error("unit cost must be greater than 0 for variant {0}")]
    InvalidUnitCost(Uuid),
    #[error("iva must not be negative for variant {0}")]
    InvalidIva(Uuid),
    #[error("line amounts for variant {0} are out of range")]
    LineOverflow(Uuid),
    #[error("received quantity or cost is out of range")]
    Overflow,
    #[error("invoice total is out of range")]
    TotalOverflow,
}

impl From<CostingError> for AppError {
    fn from(err: CostingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal_cent: i64,
    pub iva_cent: i64,
    pub retefuente_cent: i64,
}

impl InvoiceTotals {
    pub fn add(&mut self, line: &ReceiptLine) -> Result<(), CostingError> {
        self.subtotal_cent = self
            .subtotal_cent
            .checked_add(line.subtotal_cent()?)
            .ok_or(CostingError::TotalOverflow)?;
        self.iva_cent = self
            .iva_cent
            .checked_add(line.iva_cent()?)
            .ok_or(CostingError::TotalOverflow)?;
        Ok(())
    }

    pub fn total_cent(&self) -> Result<i64, CostingError> {
        self.subtotal_cent
            .checked_add(self.iva_cent)
            .and_then(|gross| gross.checked_sub(self.retefuente_cent))
            .ok_or(CostingError::TotalOverflow)
    }
}

/// Reject the whole invoice before any write if one line is malformed.
pub fn validate_receipt(lines: &[ReceiptLine]) -> Result<(), CostingError> {
    if lines.is_empty() {
        return Err(CostingError::Empty);
    }
    lines.iter().try_for_each(ReceiptLine::validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_receipt_sets_cost_then_blends() {
        let empty = StockPosition { stock: 0, cost_cent: 0 };
        let after_first = empty.receive(10, 500).unwrap();
        assert_eq!(after_first, StockPosition { stock: 10, cost_cent: 500 });

        let after_second = after_first.receive(10, 700).unwrap();
        assert_eq!(after_second, StockPosition { stock: 20, cost_cent: 600 });
    }

    #[test]
    fn blended_cost_is_rounded_half_up() {
        // (3 * 100 + 1 * 101) / 4 = 100.25 -> 100
        let p = StockPosition { stock: 3, cost_cent: 100 }.receive(1, 101).unwrap();
        assert_eq!(p.cost_cent, 100);
        // (1 * 100 + 1 * 101) / 2 = 100.5 -> 101
        let p = StockPosition { stock: 1, cost_cent: 100 }.receive(1, 101).unwrap();
        assert_eq!(p.cost_cent, 101);
    }

    #[test]
    fn repeated_variant_in_one_invoice_blends_sequentially() {
        let start = StockPosition { stock: 5, cost_cent: 1_000 };
        let p = start
            .receive(5, 2_000)
            .and_then(|p| p.receive(10, 3_000))
            .unwrap();
        // after first: 10 @ 1500, after second: (15000 + 30000) / 20 = 2250
        assert_eq!(p, StockPosition { stock: 20, cost_cent: 2_250 });
    }

    #[test]
    fn invoice_totals_accumulate_iva_per_unit() {
        let id = Uuid::new_v4();
        let lines = [
            ReceiptLine { variant_id: id, qty: 10, unit_cost_cent: 500, iva_unit_cent: 95 },
            ReceiptLine { variant_id: id, qty: 2, unit_cost_cent: 1_000, iva_unit_cent: 0 },
        ];
        let mut totals = InvoiceTotals::default();
        for line in &lines {
            totals.add(line).unwrap();
        }

        assert_eq!(totals.subtotal_cent, 7_000);
        assert_eq!(totals.iva_cent, 950);
        assert_eq!(totals.total_cent(), Ok(7_950));
    }

    #[test]
    fn oversized_receipts_are_rejected_not_wrapped() {
        let held = StockPosition { stock: 5, cost_cent: 1 };
        assert_eq!(held.receive(i32::MAX, 1), Err(CostingError::Overflow));

        let pricey = StockPosition { stock: 2, cost_cent: i64::MAX / 2 };
        assert_eq!(pricey.receive(1, i64::MAX / 2), Err(CostingError::Overflow));

        let id = Uuid::new_v4();
        let huge = ReceiptLine { variant_id: id, qty: 3, unit_cost_cent: i64::MAX / 2, iva_unit_cent: 0 };
        assert_eq!(validate_receipt(&[huge]), Err(CostingError::LineOverflow(id)));
        assert!(matches!(AppError::from(CostingError::Overflow), AppError::BadRequest(_)));

        let big = ReceiptLine { variant_id: id, qty: 1, unit_cost_cent: i64::MAX - 1, iva_unit_cent: 0 };
        let mut totals = InvoiceTotals::default();
        totals.add(&big).unwrap();
        assert_eq!(totals.add(&big), Err(CostingError::TotalOverflow));
    }

    #[test]
    fn malformed_lines_fail_validation() {
        let id = Uuid::new_v4();
        assert_eq!(validate_receipt(&[]), Err(CostingError::Empty));

        let zero_qty = ReceiptLine { variant_id: id, qty: 0, unit_cost_cent: 1, iva_unit_cent: 0 };
        assert_eq!(validate_receipt(&[zero_qty]), Err(CostingError::InvalidQuantity(id)));

        let free = ReceiptLine { variant_id: id, qty: 1, unit_cost_cent: 0, iva_unit_cent: 0 };
        assert_eq!(validate_receipt(&[free]), Err(CostingError::InvalidUnitCost(id)));

        let neg_iva = ReceiptLine { variant_id: id, qty: 1, unit_cost_cent: 1, iva_unit_cent: -1 };
        assert_eq!(validate_receipt(&[neg_iva]), Err(CostingError::InvalidIva(id)));
    }
}
