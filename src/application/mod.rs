pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalogue_service;
pub mod order_service;

#[cfg(test)]
pub(crate) mod fakes;

pub use admin_service::AdminService;
pub use auth_service::{AuthService, Session};
pub use cart_service::CartService;
pub use catalogue_service::CatalogueService;
pub use order_service::OrderService;
