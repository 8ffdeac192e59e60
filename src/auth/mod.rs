pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::{AdminUser, AuthUser};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};
