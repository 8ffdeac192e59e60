use bigdecimal::BigDecimal;

use super::cart::CartView;
use super::catalogue::{Brand, Category, NewProduct, Product, ProductChanges, ProductDetails, ProductFilter};
use super::errors::DomainError;
use super::order::{Checkout, ListResult, OrderLineView, OrderQuery, OrderStatus};
use super::user::{NewUser, Role, User};

pub trait UserRepository: Send + Sync + 'static {
    /// Fails with `Conflict` when the email is taken.
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    fn set_role(&self, id: i32, role: Role) -> Result<User, DomainError>;
    fn list(&self) -> Result<Vec<User>, DomainError>;
}

pub trait CatalogueRepository: Send + Sync + 'static {
    fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    fn create_category(&self, name: &str) -> Result<Category, DomainError>;
    fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, DomainError>;
    fn find_category(&self, id: i32) -> Result<Option<Category>, DomainError>;
    /// Returns `false` when no row had that id.
    fn delete_category(&self, id: i32) -> Result<bool, DomainError>;

    fn list_brands(&self) -> Result<Vec<Brand>, DomainError>;
    fn create_brand(&self, name: &str) -> Result<Brand, DomainError>;
    fn rename_brand(&self, id: i32, name: &str) -> Result<Option<Brand>, DomainError>;
    fn find_brand(&self, id: i32) -> Result<Option<Brand>, DomainError>;
    fn delete_brand(&self, id: i32) -> Result<bool, DomainError>;

    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductDetails>, DomainError>;
    fn find_product(&self, id: i32) -> Result<Option<ProductDetails>, DomainError>;
    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn update_product(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError>;
    fn delete_product(&self, id: i32) -> Result<bool, DomainError>;
}

/// Cart operations are keyed by the owning user; the cart is created on demand.
pub trait CartRepository: Send + Sync + 'static {
    fn get_or_create(&self, user_id: i32) -> Result<CartView, DomainError>;
    fn add_item(&self, user_id: i32, product_id: i32, quantity: i32)
        -> Result<CartView, DomainError>;
    /// Fails with `NotFound` when the product is not in the cart.
    fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError>;
    fn remove_item(&self, user_id: i32, product_id: i32) -> Result<CartView, DomainError>;
    fn clear(&self, user_id: i32) -> Result<CartView, DomainError>;
    fn list_all(&self) -> Result<Vec<CartView>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Turns the user's cart into pending order lines in one transaction.
    fn checkout(&self, user_id: i32) -> Result<Checkout, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderLineView>, DomainError>;
    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError>;
    fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<OrderLineView>, DomainError>;
}

#[derive(Debug, Clone)]
pub struct Stats {
    pub products: i64,
    pub categories: i64,
    pub brands: i64,
    pub users: i64,
    pub carts: i64,
    pub order_lines: i64,
    pub pending_order_lines: i64,
    pub revenue: BigDecimal,
}

pub trait StatsRepository: Send + Sync + 'static {
    fn stats(&self) -> Result<Stats, DomainError>;
}
