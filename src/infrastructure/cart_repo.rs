use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::cart::{merged_quantity, CartLine, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, carts, products};

use super::models::{CartItemRow, CartRow, NewCartItemRow, NewCartRow, ProductRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn cart_line((item, product): (CartItemRow, ProductRow)) -> CartLine {
    CartLine {
        product_id: product.id,
        product_name: product.name,
        unit_price: product.price,
        quantity: item.quantity,
        updated_at: item.updated_at,
    }
}

/// Fetch the user's cart, creating it on first use, and lock its row until the
/// surrounding transaction ends. Every cart mutation and checkout goes through
/// here, so they run one at a time per cart.
pub(crate) fn cart_for(conn: &mut PgConnection, user_id: i32) -> Result<CartRow, DomainError> {
    diesel::insert_into(carts::table)
        .values(&NewCartRow { user_id })
        .on_conflict(carts::user_id)
        .do_nothing()
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                DomainError::NotFound("User")
            }
            other => other.into(),
        })?;

    Ok(carts::table
        .filter(carts::user_id.eq(user_id))
        .select(CartRow::as_select())
        .for_update()
        .first::<CartRow>(conn)?)
}

pub(crate) fn cart_items_of(
    conn: &mut PgConnection,
    cart_id: i32,
) -> Result<Vec<(CartItemRow, ProductRow)>, DomainError> {
    Ok(cart_items::table
        .inner_join(products::table)
        .filter(cart_items::cart_id.eq(cart_id))
        .select((CartItemRow::as_select(), ProductRow::as_select()))
        .order(cart_items::id.asc())
        .load(conn)?)
}

fn view(conn: &mut PgConnection, cart: CartRow) -> Result<CartView, DomainError> {
    let lines = cart_items_of(conn, cart.id)?
        .into_iter()
        .map(cart_line)
        .collect();
    Ok(CartView {
        id: cart.id,
        user_id: cart.user_id,
        created_at: cart.created_at,
        lines,
    })
}

impl CartRepository for DieselCartRepository {
    fn get_or_create(&self, user_id: i32) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = cart_for(conn, user_id)?;
            view(conn, cart)
        })
    }

    fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let exists = products::table
                .find(product_id)
                .select(products::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();
            if !exists {
                return Err(DomainError::NotFound("Product"));
            }

            let cart = cart_for(conn, user_id)?;
            let now = Utc::now();

            let current = cart_items::table
                .filter(cart_items::cart_id.eq(cart.id))
                .filter(cart_items::product_id.eq(product_id))
                .select(cart_items::quantity)
                .first::<i32>(conn)
                .optional()?
                .unwrap_or(0);
            merged_quantity(current, quantity)?;

            // Adding a product already in the cart merges the quantities.
            diesel::insert_into(cart_items::table)
                .values(&NewCartItemRow {
                    cart_id: cart.id,
                    product_id,
                    quantity,
                    updated_at: now,
                })
                .on_conflict((cart_items::cart_id, cart_items::product_id))
                .do_update()
                .set((
                    cart_items::quantity.eq(cart_items::quantity + excluded(cart_items::quantity)),
                    cart_items::updated_at.eq(now),
                ))
                .execute(conn)?;

            view(conn, cart)
        })
    }

    fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        if quantity <= 0 {
            return self.remove_item(user_id, product_id);
        }

        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = cart_for(conn, user_id)?;
            let updated = diesel::update(
                cart_items::table
                    .filter(cart_items::cart_id.eq(cart.id))
                    .filter(cart_items::product_id.eq(product_id)),
            )
            .set((
                cart_items::quantity.eq(quantity),
                cart_items::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound("Cart item"));
            }
            view(conn, cart)
        })
    }

    fn remove_item(&self, user_id: i32, product_id: i32) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = cart_for(conn, user_id)?;
            let deleted = diesel::delete(
                cart_items::table
                    .filter(cart_items::cart_id.eq(cart.id))
                    .filter(cart_items::product_id.eq(product_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::NotFound("Cart item"));
            }
            view(conn, cart)
        })
    }

    fn clear(&self, user_id: i32) -> Result<CartView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let cart = cart_for(conn, user_id)?;
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                .execute(conn)?;
            view(conn, cart)
        })
    }

    fn list_all(&self) -> Result<Vec<CartView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let carts: Vec<CartRow> = carts::table
                .select(CartRow::as_select())
                .order(carts::id.asc())
                .load(conn)?;

            let items: Vec<(CartItemRow, ProductRow)> = cart_items::table
                .inner_join(products::table)
                .select((CartItemRow::as_select(), ProductRow::as_select()))
                .order(cart_items::id.asc())
                .load(conn)?;

            let mut by_cart: HashMap<i32, Vec<CartLine>> = HashMap::new();
            for (item, product) in items {
                by_cart
                    .entry(item.cart_id)
                    .or_default()
                    .push(cart_line((item, product)));
            }

            Ok(carts
                .into_iter()
                .map(|cart| CartView {
                    lines: by_cart.remove(&cart.id).unwrap_or_default(),
                    id: cart.id,
                    user_id: cart.user_id,
                    created_at: cart.created_at,
                })
                .collect())
        })
    }
}
