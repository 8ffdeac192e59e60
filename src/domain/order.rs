use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Only pending lines move; completed and canceled are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Canceled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderLineView {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// The order lines written by one checkout.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub user_id: i32,
    pub lines: Vec<OrderLineView>,
    pub created_at: DateTime<Utc>,
}

impl Checkout {
    pub fn total(&self) -> BigDecimal {
        order_total(&self.lines)
    }
}

pub fn order_total(lines: &[OrderLineView]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::zero(), |acc, l| acc + l.line_total())
}

#[derive(Debug, Clone)]
pub struct OrderQuery {
    /// Restrict to one user's lines; `None` lists everyone's.
    pub user_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub page: i64,
    pub limit: i64,
}

impl OrderQuery {
    /// Rows to skip before the requested page.
    pub fn offset(&self) -> Result<i64, DomainError> {
        self.page
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.limit))
            .ok_or_else(|| DomainError::InvalidInput("Page is out of range".to_string()))
    }
}

/// One page of order lines; `page` and `limit` are the values actually served.
#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderLineView>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
