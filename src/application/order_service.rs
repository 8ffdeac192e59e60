use crate::auth::AuthUser;
use crate::domain::errors::DomainError;
use crate::domain::order::{Checkout, ListResult, OrderLineView, OrderQuery, OrderStatus};
use crate::domain::ports::OrderRepository;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn checkout(&self, user_id: i32) -> Result<Checkout, DomainError> {
        self.repo.checkout(user_id)
    }

    /// Admins see every line; anyone else only their own. `page` is at least 1
    /// and `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn list_for(
        &self,
        caller: AuthUser,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let query = OrderQuery {
            user_id: if caller.is_admin() {
                None
            } else {
                Some(caller.user_id)
            },
            status,
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        };
        query.offset()?;
        self.repo.list(&query)
    }

    pub fn get_for(&self, caller: AuthUser, id: i32) -> Result<OrderLineView, DomainError> {
        let line = self
            .repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Order line"))?;
        if line.user_id != caller.user_id && !caller.is_admin() {
            return Err(DomainError::Forbidden(
                "Not allowed to view this order".to_string(),
            ));
        }
        Ok(line)
    }

    pub fn update_status(&self, id: i32, status: OrderStatus) -> Result<OrderLineView, DomainError> {
        self.repo
            .update_status(id, status)?
            .ok_or(DomainError::NotFound("Order line"))
    }
}
