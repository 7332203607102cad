//! Checkout pricing.
//!
//! Pure computation of order totals from requested cart lines and the
//! variants loaded (and locked) by the checkout transaction. Nothing here
//! touches the database, so every rule of the quote is unit-testable.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, money::percent_of};

pub const DEFAULT_TAX_PERCENT: Decimal = Decimal::from_parts(19, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct PricingSettings {
    pub tax_percent: Decimal,
    pub shipping_fixed_cent: i64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            tax_percent: DEFAULT_TAX_PERCENT,
            shipping_fixed_cent: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CartLine {
    pub variant_id: Uuid,
    pub qty: i32,
}

#[derive(Debug, Clone)]
pub struct SaleVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price_cent: i64,
    pub cost_cent: i64,
    pub stock: i32,
    pub active: bool,
    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub name_snapshot: String,
    pub color_snapshot: Option<String>,
    pub size_snapshot: Option<String>,
    pub cost_snapshot_cent: i64,
    pub qty: i32,
    pub unit_price_cent: i64,
    pub line_total_cent: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal_cent: i64,
    pub discount_cent: i64,
    pub tax_cent: i64,
    pub shipping_cent: i64,
    pub total_cent: i64,
}

#[derive(Debug, Clone)]
pub struct Quote {
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("at least one item is required")]
    EmptyCart,
    #[error("variant {0} does not exist")]
    UnknownVariant(Uuid),
    #[error("invalid quantity {qty} for variant {variant_id}")]
    InvalidQuantity { variant_id: Uuid, qty: i32 },
    #[error("insufficient stock for variant {variant_id}: requested {requested}, available {available}")]
    InsufficientStock {
        variant_id: Uuid,
        requested: i64,
        available: i32,
    },
    #[error("variant {0} is not available for sale")]
    Inactive(Uuid),
    #[error("line amount for variant {0} is out of range")]
    LineOverflow(Uuid),
    #[error("order total is out of range")]
    TotalOverflow,
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::EmptyCart
            | PricingError::InvalidQuantity { .. }
            | PricingError::LineOverflow(_)
            | PricingError::TotalOverflow => AppError::BadRequest(err.to_string()),
            PricingError::UnknownVariant(_)
            | PricingError::InsufficientStock { .. }
            | PricingError::Inactive(_) => AppError::Conflict(err.to_string()),
        }
    }
}

/// Price a cart. Lines are checked in input order and the first failing
/// line aborts the quote. Stock is checked against the cumulative quantity
/// requested for a variant, so repeating a variant cannot oversell it.
pub fn quote(
    lines: &[CartLine],
    variants: &HashMap<Uuid, SaleVariant>,
    settings: &PricingSettings,
) -> Result<Quote, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    let mut requested: HashMap<Uuid, i64> = HashMap::new();
    let mut subtotal_cent: i64 = 0;
    let mut discount_cent: i64 = 0;
    let mut priced = Vec::with_capacity(lines.len());

    for line in lines {
        let variant = variants
            .get(&line.variant_id)
            .ok_or(PricingError::UnknownVariant(line.variant_id))?;
        if line.qty <= 0 {
            return Err(PricingError::InvalidQuantity {
                variant_id: line.variant_id,
                qty: line.qty,
            });
        }
        if !variant.active {
            return Err(PricingError::Inactive(variant.id));
        }
        let wanted = requested.entry(variant.id).or_default();
        *wanted += i64::from(line.qty);
        if i64::from(variant.stock) < *wanted {
            return Err(PricingError::InsufficientStock {
                variant_id: variant.id,
                requested: *wanted,
                available: variant.stock,
            });
        }

        let pct = variant.discount_percent.unwrap_or(Decimal::ZERO);
        let qty = i64::from(line.qty);
        let overflow = PricingError::LineOverflow(variant.id);
        let base = variant.price_cent.checked_mul(qty).ok_or(overflow.clone())?;
        subtotal_cent = subtotal_cent
            .checked_add(base)
            .ok_or(PricingError::TotalOverflow)?;
        discount_cent = discount_cent
            .checked_add(percent_of(base, pct))
            .ok_or(PricingError::TotalOverflow)?;

        let unit_discount = percent_of(variant.price_cent, pct);
        let line_unit = variant.price_cent - unit_discount;
        let line_total_cent = line_unit.checked_mul(qty).ok_or(overflow)?;
        priced.push(PricedLine {
            variant_id: variant.id,
            product_id: variant.product_id,
            name_snapshot: variant.product_name.clone(),
            color_snapshot: variant.color.clone(),
            size_snapshot: variant.size.clone(),
            cost_snapshot_cent: variant.cost_cent,
            qty: line.qty,
            unit_price_cent: variant.price_cent,
            line_total_cent,
        });
    }

    let taxable_cent = (subtotal_cent - discount_cent).max(0);
    let tax_cent = percent_of(taxable_cent, settings.tax_percent);
    let shipping_cent = settings.shipping_fixed_cent;
    let totals = OrderTotals {
        subtotal_cent,
        discount_cent,
        tax_cent,
        shipping_cent,
        total_cent: taxable_cent
            .checked_add(tax_cent)
            .and_then(|t| t.checked_add(shipping_cent))
            .ok_or(PricingError::TotalOverflow)?,
    };

    Ok(Quote {
        lines: priced,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(price_cent: i64, stock: i32, discount: Option<Decimal>) -> SaleVariant {
        SaleVariant {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Balon".into(),
            color: Some("Rojo".into()),
            size: None,
            price_cent,
            cost_cent: 1_200_000,
            stock,
            active: true,
            discount_percent: discount,
        }
    }

    fn catalog(variants: &[&SaleVariant]) -> HashMap<Uuid, SaleVariant> {
        variants.iter().map(|v| (v.id, (*v).clone())).collect()
    }

    fn settings() -> PricingSettings {
        PricingSettings {
            tax_percent: Decimal::new(19, 0),
            shipping_fixed_cent: 8_000,
        }
    }

    #[test]
    fn totals_follow_subtotal_discount_tax_shipping() {
        let plain = variant(2_000_000, 15, None);
        let discounted = variant(3_500_000, 10, Some(Decimal::new(10, 0)));
        let lines = [
            CartLine { variant_id: plain.id, qty: 2 },
            CartLine { variant_id: discounted.id, qty: 1 },
        ];

        let quote = quote(&lines, &catalog(&[&plain, &discounted]), &settings()).unwrap();
        let t = quote.totals;
        assert_eq!(t.subtotal_cent, 7_500_000);
        assert_eq!(t.discount_cent, 350_000);
        assert_eq!(t.tax_cent, 1_358_500);
        assert_eq!(t.shipping_cent, 8_000);
        assert_eq!(
            t.total_cent,
            (t.subtotal_cent - t.discount_cent).max(0) + t.tax_cent + t.shipping_cent
        );

        assert_eq!(quote.lines[1].unit_price_cent, 3_500_000);
        assert_eq!(quote.lines[1].line_total_cent, 3_150_000);
        assert_eq!(quote.lines[0].cost_snapshot_cent, 1_200_000);
    }

    #[test]
    fn rounding_is_per_line_and_per_aggregate() {
        // 15% of 333 = 49.95 -> 50 per unit, line base 999 -> 149.85 -> 150
        let v = variant(333, 10, Some(Decimal::new(15, 0)));
        let lines = [CartLine { variant_id: v.id, qty: 3 }];
        let quote = quote(&lines, &catalog(&[&v]), &PricingSettings::default()).unwrap();

        assert_eq!(quote.totals.discount_cent, 150);
        assert_eq!(quote.lines[0].line_total_cent, (333 - 50) * 3);
        // 19% of 849 = 161.31 -> 161
        assert_eq!(quote.totals.tax_cent, 161);
    }

    #[test]
    fn exact_stock_is_accepted_and_one_more_is_rejected() {
        let v = variant(1_000, 3, None);
        let map = catalog(&[&v]);
        assert!(quote(&[CartLine { variant_id: v.id, qty: 3 }], &map, &settings()).is_ok());

        let err = quote(&[CartLine { variant_id: v.id, qty: 4 }], &map, &settings()).unwrap_err();
        assert!(matches!(err, PricingError::InsufficientStock { requested: 4, available: 3, .. }));
    }

    #[test]
    fn repeated_variant_counts_against_stock_once() {
        let v = variant(1_000, 3, None);
        let lines = [
            CartLine { variant_id: v.id, qty: 2 },
            CartLine { variant_id: v.id, qty: 2 },
        ];
        let err = quote(&lines, &catalog(&[&v]), &settings()).unwrap_err();
        assert!(matches!(err, PricingError::InsufficientStock { requested: 4, .. }));
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let v = variant(1_000, 3, None);
        let map = catalog(&[&v]);

        assert_eq!(quote(&[], &map, &settings()).unwrap_err(), PricingError::EmptyCart);

        let unknown = Uuid::new_v4();
        assert_eq!(
            quote(&[CartLine { variant_id: unknown, qty: 1 }], &map, &settings()).unwrap_err(),
            PricingError::UnknownVariant(unknown)
        );

        let zero = quote(&[CartLine { variant_id: v.id, qty: 0 }], &map, &settings()).unwrap_err();
        assert!(matches!(zero, PricingError::InvalidQuantity { qty: 0, .. }));

        let mut inactive = v.clone();
        inactive.active = false;
        let err = quote(
            &[CartLine { variant_id: v.id, qty: 1 }],
            &catalog(&[&inactive]),
            &settings(),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::Inactive(v.id));
    }

    #[test]
    fn out_of_range_amounts_are_rejected() {
        let v = variant(i64::MAX / 2, 10, None);
        let map = catalog(&[&v]);
        let err = quote(&[CartLine { variant_id: v.id, qty: 3 }], &map, &settings()).unwrap_err();
        assert_eq!(err, PricingError::LineOverflow(v.id));
        assert!(matches!(AppError::from(err), AppError::BadRequest(_)));

        // each line fits, their sum does not
        let lines = [
            CartLine { variant_id: v.id, qty: 1 },
            CartLine { variant_id: v.id, qty: 1 },
            CartLine { variant_id: v.id, qty: 1 },
        ];
        assert_eq!(quote(&lines, &map, &settings()).unwrap_err(), PricingError::TotalOverflow);
    }

    #[test]
    fn errors_map_to_validation_or_conflict() {
        assert!(matches!(AppError::from(PricingError::EmptyCart), AppError::BadRequest(_)));
        assert!(matches!(
            AppError::from(PricingError::UnknownVariant(Uuid::nil())),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn default_settings_use_nineteen_percent_and_free_shipping() {
        let d = PricingSettings::default();
        assert_eq!(d.tax_percent, Decimal::new(19, 0));
        assert_eq!(d.shipping_fixed_cent, 0);
    }
}
