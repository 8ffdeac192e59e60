use crate::domain::cart::{check_line_quantity, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get(&self, user_id: i32) -> Result<CartView, DomainError> {
        self.repo.get_or_create(user_id)
    }

    pub fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<CartView, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        check_line_quantity(quantity)?;
        self.repo.add_item(user_id, product_id, quantity)
    }

    /// A quantity of zero removes the line.
    pub fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        if quantity < 0 {
            return Err(DomainError::InvalidInput(
                "quantity must not be negative".to_string(),
            ));
        }
        check_line_quantity(quantity)?;
        self.repo.set_quantity(user_id, product_id, quantity)
    }

    pub fn remove(&self, user_id: i32, product_id: i32) -> Result<CartView, DomainError> {
        self.repo.remove_item(user_id, product_id)
    }

    pub fn clear(&self, user_id: i32) -> Result<CartView, DomainError> {
        self.repo.clear(user_id)
    }

    pub fn list_all(&self) -> Result<Vec<CartView>, DomainError> {
        self.repo.list_all()
    }
}
