use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::merge_lines;
use crate::domain::errors::DomainError;
use crate::domain::order::{Checkout, ListResult, OrderLineView, OrderQuery, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_items, order_lines, products};

use super::cart_repo::{cart_for, cart_items_of};
use super::models::{NewOrderLineRow, OrderLineRow, ProductRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn line_view((row, product_name): (OrderLineRow, String)) -> Result<OrderLineView, DomainError> {
    Ok(OrderLineView {
        status: row.status.parse()?,
        id: row.id,
        user_id: row.user_id,
        product_id: row.product_id,
        product_name,
        quantity: row.quantity,
        unit_price: row.unit_price,
        ordered_at: row.ordered_at,
    })
}

impl OrderRepository for DieselOrderRepository {
    fn checkout(&self, user_id: i32) -> Result<Checkout, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Collect the cart, one entry per product
            let cart = cart_for(conn, user_id)?;
            let wanted = merge_lines(
                cart_items_of(conn, cart.id)?
                    .into_iter()
                    .map(|(item, _)| (item.product_id, item.quantity)),
            );
            if wanted.is_empty() {
                return Err(DomainError::InvalidInput("Cart is empty".to_string()));
            }

            // 2. Lock the products in id order so concurrent checkouts queue up
            let ids: Vec<i32> = wanted.iter().map(|(id, _)| *id).collect();
            let locked: HashMap<i32, ProductRow> = products::table
                .select(ProductRow::as_select())
                .filter(products::id.eq_any(&ids))
                .order(products::id.asc())
                .for_update()
                .load::<ProductRow>(conn)?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

            // 3. Check stock, decrement it and snapshot the price
            let ordered_at = Utc::now();
            let mut new_lines = Vec::with_capacity(wanted.len());
            let mut names = HashMap::with_capacity(wanted.len());
            for &(product_id, quantity) in &wanted {
                let product = locked
                    .get(&product_id)
                    .ok_or(DomainError::NotFound("Product"))?;
                if product.stock < quantity {
                    return Err(DomainError::InvalidInput(format!(
                        "Insufficient stock for '{}': {} requested, {} available",
                        product.name, quantity, product.stock
                    )));
                }

                diesel::update(products::table.find(product_id))
                    .set(products::stock.eq(products::stock - quantity))
                    .execute(conn)?;

                new_lines.push(NewOrderLineRow {
                    user_id,
                    product_id,
                    quantity,
                    unit_price: product.price.clone(),
                    status: OrderStatus::Pending.as_str().to_string(),
                    ordered_at,
                });
                names.insert(product_id, product.name.clone());
            }

            // 4. Write the order lines
            let rows = diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .returning(OrderLineRow::as_returning())
                .get_results::<OrderLineRow>(conn)?;

            // 5. Empty the cart
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                .execute(conn)?;

            let lines = rows
                .into_iter()
                .map(|row| {
                    let name = names.get(&row.product_id).cloned().unwrap_or_default();
                    line_view((row, name))
                })
                .collect::<Result<Vec<_>, _>>()?;

            log::info!(
                "user {} checked out {} order line(s)",
                user_id,
                lines.len()
            );

            Ok(Checkout {
                user_id,
                lines,
                created_at: ordered_at,
            })
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        order_lines::table
            .inner_join(products::table)
            .filter(order_lines::id.eq(id))
            .select((OrderLineRow::as_select(), products::name))
            .first::<(OrderLineRow, String)>(&mut conn)
            .optional()?
            .map(line_view)
            .transpose()
    }

    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = query.offset()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count = order_lines::table
                .select(diesel::dsl::count_star())
                .into_boxed();
            let mut rows = order_lines::table
                .inner_join(products::table)
                .select((OrderLineRow::as_select(), products::name))
                .into_boxed();

            if let Some(user_id) = query.user_id {
                count = count.filter(order_lines::user_id.eq(user_id));
                rows = rows.filter(order_lines::user_id.eq(user_id));
            }
            if let Some(status) = query.status {
                count = count.filter(order_lines::status.eq(status.as_str()));
                rows = rows.filter(order_lines::status.eq(status.as_str()));
            }

            let total: i64 = count.get_result(conn)?;
            let items = rows
                .order((order_lines::ordered_at.desc(), order_lines::id.desc()))
                .limit(query.limit)
                .offset(offset)
                .load::<(OrderLineRow, String)>(conn)?
                .into_iter()
                .map(line_view)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListResult {
                items,
                total,
                page: query.page,
                limit: query.limit,
            })
        })
    }

    fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<OrderLineView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = order_lines::table
                .find(id)
                .select(order_lines::status)
                .for_update()
                .first::<String>(conn)
                .optional()?;
            let Some(current) = current else {
                return Ok(None);
            };

            let current: OrderStatus = current.parse()?;
            if !current.can_transition_to(status) {
                return Err(DomainError::InvalidInput(format!(
                    "Cannot change order status from {} to {}",
                    current, status
                )));
            }

            diesel::update(order_lines::table.find(id))
                .set(order_lines::status.eq(status.as_str()))
                .execute(conn)?;

            let updated = order_lines::table
                .inner_join(products::table)
                .filter(order_lines::id.eq(id))
                .select((OrderLineRow::as_select(), products::name))
                .first::<(OrderLineRow, String)>(conn)?;

            log::info!("order line {} moved from {} to {}", id, current, status);

            line_view(updated).map(Some)
        })
    }
}
