use bigdecimal::{BigDecimal, RoundingMode, Signed, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub brand_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A product joined with its category and brand.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub product: Product,
    pub category: Category,
    pub brand: Brand,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i32,
    pub brand_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_path: Option<String>,
}

/// Partial product update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub stock: Option<i32>,
    pub image_path: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.brand_id.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_path.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub search: Option<String>,
}

/// Largest price the `NUMERIC(10, 2)` column holds.
pub const MAX_PRICE: &str = "99999999.99";
const PRICE_DIGITS: u64 = 10;
const PRICE_SCALE: i64 = 2;

/// Prices are stored with two decimal places; anything finer is rounded half-up.
///
/// The magnitude is checked from the digit count and exponent before rounding,
/// so inputs like `1e2000000` are refused without being expanded.
pub fn normalize_price(price: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if price.is_negative() {
        return Err(DomainError::InvalidInput(
            "price must not be negative".to_string(),
        ));
    }
    let too_large = || DomainError::InvalidInput(format!("price must not exceed {}", MAX_PRICE));

    let (_, scale) = price.as_bigint_and_exponent();
    let integer_digits = (price.digits() as i64).saturating_sub(scale);
    if integer_digits > PRICE_DIGITS as i64 - PRICE_SCALE {
        return Err(too_large());
    }
    if integer_digits < -PRICE_SCALE {
        // below 0.001, rounds to zero
        return Ok(BigDecimal::zero().with_scale(PRICE_SCALE));
    }

    let rounded = price.with_scale_round(PRICE_SCALE, RoundingMode::HalfUp);
    if rounded.digits() > PRICE_DIGITS {
        return Err(too_large());
    }
    Ok(rounded)
}

pub fn validate_stock(stock: i32) -> Result<i32, DomainError> {
    if stock < 0 {
        return Err(DomainError::InvalidInput(
            "stock must not be negative".to_string(),
        ));
    }
    Ok(stock)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn normalize_price_rounds_half_up_to_cents() {
        let price = BigDecimal::from_str("19.995").unwrap();
        assert_eq!(normalize_price(&price).unwrap().to_string(), "20.00");
    }

    #[test]
    fn normalize_price_pads_whole_numbers() {
        let price = BigDecimal::from(5);
        assert_eq!(normalize_price(&price).unwrap().to_string(), "5.00");
    }

    #[test]
    fn normalize_price_rejects_negative() {
        let price = BigDecimal::from_str("-0.01").unwrap();
        assert!(matches!(
            normalize_price(&price),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn normalize_price_accepts_the_column_maximum() {
        let price = BigDecimal::from_str(MAX_PRICE).unwrap();
        assert_eq!(normalize_price(&price).unwrap().to_string(), MAX_PRICE);
    }

    #[test]
    fn normalize_price_rejects_what_the_column_cannot_hold() {
        for raw in ["123456789", "100000000.00", "99999999.995"] {
            let price = BigDecimal::from_str(raw).unwrap();
            assert!(
                matches!(normalize_price(&price), Err(DomainError::InvalidInput(m)) if m.contains(MAX_PRICE)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn normalize_price_rejects_huge_exponents_without_expanding() {
        let price = BigDecimal::from_str("1e2000000").unwrap();
        assert!(matches!(
            normalize_price(&price),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn normalize_price_rounds_tiny_values_to_zero() {
        let price = BigDecimal::from_str("1e-2000000").unwrap();
        assert_eq!(normalize_price(&price).unwrap().to_string(), "0.00");
        let price = BigDecimal::from_str("0.005").unwrap();
        assert_eq!(normalize_price(&price).unwrap().to_string(), "0.01");
    }

    #[test]
    fn validate_stock_rejects_negative() {
        assert!(validate_stock(-1).is_err());
        assert_eq!(validate_stock(0).unwrap(), 0);
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(ProductChanges::default().is_empty());
        let changes = ProductChanges {
            stock: Some(3),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
