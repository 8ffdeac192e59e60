use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Largest quantity of one product a cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: i32,
    pub product_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
}

impl CartView {
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    pub fn total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::zero(), |acc, l| acc + l.line_total())
    }
}

pub fn check_line_quantity(quantity: i32) -> Result<i32, DomainError> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::InvalidInput(format!(
            "quantity must not exceed {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(quantity)
}

/// Quantity of a line after adding `added` to what is already there.
pub fn merged_quantity(current: i32, added: i32) -> Result<i32, DomainError> {
    let merged = current.checked_add(added).unwrap_or(i32::MAX);
    check_line_quantity(merged)
}

/// Collapse `(product_id, quantity)` pairs so each product appears once,
/// ordered by product id. Non-positive quantities are dropped.
pub fn merge_lines<I>(lines: I) -> Vec<(i32, i32)>
where
    I: IntoIterator<Item = (i32, i32)>,
{
    let mut merged: BTreeMap<i32, i32> = BTreeMap::new();
    for (product_id, quantity) in lines {
        if quantity <= 0 {
            continue;
        }
        *merged.entry(product_id).or_insert(0) += quantity;
    }
    merged.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(product_id: i32, price: &str, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            product_name: format!("product {product_id}"),
            unit_price: BigDecimal::from_str(price).unwrap(),
            quantity,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn merged_quantity_is_capped() {
        assert_eq!(merged_quantity(3, 2).unwrap(), 5);
        assert_eq!(
            merged_quantity(MAX_LINE_QUANTITY - 1, 1).unwrap(),
            MAX_LINE_QUANTITY
        );
        assert!(matches!(
            merged_quantity(MAX_LINE_QUANTITY, 1),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(merged_quantity(i32::MAX, i32::MAX).is_err());
    }

    #[test]
    fn merge_lines_sums_duplicates() {
        let merged = merge_lines(vec![(7, 1), (3, 2), (7, 4)]);
        assert_eq!(merged, vec![(3, 2), (7, 5)]);
    }

    #[test]
    fn merge_lines_drops_non_positive_quantities() {
        let merged = merge_lines(vec![(1, 0), (2, -3), (3, 1)]);
        assert_eq!(merged, vec![(3, 1)]);
    }

    #[test]
    fn merge_lines_of_nothing_is_empty() {
        assert!(merge_lines(Vec::new()).is_empty());
    }

    #[test]
    fn cart_totals() {
        let cart = CartView {
            id: 1,
            user_id: 1,
            created_at: Utc::now(),
            lines: vec![line(1, "9.99", 2), line(2, "0.50", 3)],
        };
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), BigDecimal::from_str("21.48").unwrap());
    }

    #[test]
    fn empty_cart_total_is_zero() {
        let cart = CartView {
            id: 1,
            user_id: 1,
            created_at: Utc::now(),
            lines: vec![],
        };
        assert_eq!(cart.item_count(), 0);
        assert!(cart.total().is_zero());
    }
}
