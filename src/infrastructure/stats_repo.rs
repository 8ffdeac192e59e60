use bigdecimal::{BigDecimal, Zero};
use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Numeric};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::OrderStatus;
use crate::domain::ports::{Stats, StatsRepository};
use crate::schema::{brands, carts, categories, order_lines, products, users};

pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl StatsRepository for DieselStatsRepository {
    fn stats(&self) -> Result<Stats, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let revenue = order_lines::table
                .filter(order_lines::status.eq(OrderStatus::Completed.as_str()))
                .select(sql::<Nullable<Numeric>>(
                    "SUM(order_lines.unit_price * order_lines.quantity)",
                ))
                .get_result::<Option<BigDecimal>>(conn)?
                .unwrap_or_else(BigDecimal::zero);

            Ok(Stats {
                products: products::table.select(count_star()).get_result(conn)?,
                categories: categories::table.select(count_star()).get_result(conn)?,
                brands: brands::table.select(count_star()).get_result(conn)?,
                users: users::table.select(count_star()).get_result(conn)?,
                carts: carts::table.select(count_star()).get_result(conn)?,
                order_lines: order_lines::table.select(count_star()).get_result(conn)?,
                pending_order_lines: order_lines::table
                    .filter(order_lines::status.eq(OrderStatus::Pending.as_str()))
                    .select(count_star())
                    .get_result(conn)?,
                revenue,
            })
        })
    }
}
