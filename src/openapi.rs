use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::me,
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::brands::list_brands,
        handlers::brands::create_brand,
        handlers::brands::update_brand,
        handlers::brands::delete_brand,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::uploads::upload_image,
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::set_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::orders::checkout,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_status,
        handlers::admin::list_users,
        handlers::admin::list_carts,
        handlers::admin::stats,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login and the current user"),
        (name = "catalogue", description = "Categories, brands and products"),
        (name = "uploads", description = "Product image uploads"),
        (name = "cart", description = "The caller's shopping cart"),
        (name = "orders", description = "Checkout and order lines"),
        (name = "admin", description = "Back-office views"),
        (name = "service", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/orders/{id}/status"));
        assert!(doc.paths.paths.contains_key("/upload-image"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
