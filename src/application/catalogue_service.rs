use bigdecimal::BigDecimal;

use crate::domain::catalogue::{
    normalize_price, validate_stock, Brand, Category, NewProduct, Product, ProductChanges,
    ProductDetails, ProductFilter,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogueRepository;

const MAX_LABEL_LEN: usize = 50;
const MAX_PRODUCT_NAME_LEN: usize = 100;

fn trimmed_name(kind: &str, name: &str, max_len: usize) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(format!("{kind} name must not be empty")));
    }
    if name.chars().count() > max_len {
        return Err(DomainError::InvalidInput(format!(
            "{kind} name must be at most {max_len} characters"
        )));
    }
    Ok(name.to_string())
}

fn label(kind: &str, name: &str) -> Result<String, DomainError> {
    trimmed_name(kind, name, MAX_LABEL_LEN)
}

fn product_name(name: &str) -> Result<String, DomainError> {
    trimmed_name("Product", name, MAX_PRODUCT_NAME_LEN)
}

/// Fields accepted when creating a product, before normalisation.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: i32,
    pub brand_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_path: Option<String>,
}

pub struct CatalogueService<R> {
    repo: R,
}

impl<R: CatalogueRepository> CatalogueService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list_categories()
    }

    pub fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let category = self.repo.create_category(&label("Category", name)?)?;
        log::info!("created category {} '{}'", category.id, category.name);
        Ok(category)
    }

    /// Without a new name the current row is returned unchanged.
    pub fn update_category(&self, id: i32, name: Option<&str>) -> Result<Category, DomainError> {
        let updated = match name {
            Some(name) => self.repo.rename_category(id, &label("Category", name)?)?,
            None => self.repo.find_category(id)?,
        };
        updated.ok_or(DomainError::NotFound("Category"))
    }

    pub fn delete_category(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete_category(id)? {
            return Err(DomainError::NotFound("Category"));
        }
        log::info!("deleted category {}", id);
        Ok(())
    }

    pub fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        self.repo.list_brands()
    }

    pub fn create_brand(&self, name: &str) -> Result<Brand, DomainError> {
        let brand = self.repo.create_brand(&label("Brand", name)?)?;
        log::info!("created brand {} '{}'", brand.id, brand.name);
        Ok(brand)
    }

    pub fn update_brand(&self, id: i32, name: Option<&str>) -> Result<Brand, DomainError> {
        let updated = match name {
            Some(name) => self.repo.rename_brand(id, &label("Brand", name)?)?,
            None => self.repo.find_brand(id)?,
        };
        updated.ok_or(DomainError::NotFound("Brand"))
    }

    pub fn delete_brand(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete_brand(id)? {
            return Err(DomainError::NotFound("Brand"));
        }
        log::info!("deleted brand {}", id);
        Ok(())
    }

    pub fn list_products(&self, filter: ProductFilter) -> Result<Vec<ProductDetails>, DomainError> {
        let filter = ProductFilter {
            search: filter
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ..filter
        };
        self.repo.list_products(&filter)
    }

    pub fn get_product(&self, id: i32) -> Result<ProductDetails, DomainError> {
        self.repo
            .find_product(id)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let product = self.repo.create_product(NewProduct {
            category_id: input.category_id,
            brand_id: input.brand_id,
            name: product_name(&input.name)?,
            description: input.description,
            price: normalize_price(&input.price)?,
            stock: validate_stock(input.stock)?,
            image_path: input.image_path,
        })?;
        log::info!("created product {} '{}'", product.id, product.name);
        Ok(product)
    }

    pub fn update_product(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError> {
        let changes = ProductChanges {
            name: changes.name.as_deref().map(product_name).transpose()?,
            price: changes.price.as_ref().map(normalize_price).transpose()?,
            stock: changes.stock.map(validate_stock).transpose()?,
            ..changes
        };
        self.repo
            .update_product(id, changes)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete_product(id)? {
            return Err(DomainError::NotFound("Product"));
        }
        log::info!("deleted product {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::application::fakes::InMemoryCatalogue;

    fn input(price: &str, stock: i32) -> ProductInput {
        ProductInput {
            category_id: 1,
            brand_id: 1,
            name: "  Headphones ".to_string(),
            description: None,
            price: BigDecimal::from_str(price).unwrap(),
            stock,
            image_path: None,
        }
    }

    #[test]
    fn category_names_are_trimmed_and_bounded() {
        let service = CatalogueService::new(InMemoryCatalogue::default());

        assert_eq!(service.create_category("  Audio ").unwrap().name, "Audio");
        assert!(matches!(
            service.create_category("   "),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(service.create_brand(&"x".repeat(51)).is_err());
        assert!(service.create_brand(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn update_without_name_returns_current_row() {
        let service = CatalogueService::new(InMemoryCatalogue::default());
        let brand = service.create_brand("Acme").unwrap();

        assert_eq!(service.update_brand(brand.id, None).unwrap(), brand);
        assert_eq!(
            service.update_brand(brand.id, Some("Globex")).unwrap().name,
            "Globex"
        );
        assert!(matches!(
            service.update_brand(999, None),
            Err(DomainError::NotFound("Brand"))
        ));
    }

    #[test]
    fn deleting_a_missing_category_is_not_found() {
        let service = CatalogueService::new(InMemoryCatalogue::default());
        assert!(matches!(
            service.delete_category(7),
            Err(DomainError::NotFound("Category"))
        ));
    }

    #[test]
    fn create_product_normalises_price_and_name() {
        let service = CatalogueService::new(InMemoryCatalogue::default());

        let product = service.create_product(input("19.995", 3)).unwrap();

        assert_eq!(product.name, "Headphones");
        assert_eq!(product.price.to_string(), "20.00");
    }

    #[test]
    fn create_product_rejects_negative_price_or_stock() {
        let service = CatalogueService::new(InMemoryCatalogue::default());

        assert!(matches!(
            service.create_product(input("-1", 3)),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            service.create_product(input("1", -3)),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn blank_product_names_are_rejected() {
        let service = CatalogueService::new(InMemoryCatalogue::default());
        let blank = ProductInput {
            name: "   ".to_string(),
            ..input("5", 1)
        };
        assert!(matches!(
            service.create_product(blank),
            Err(DomainError::InvalidInput(_))
        ));

        let product = service.create_product(input("5", 1)).unwrap();
        assert!(matches!(
            service.update_product(
                product.id,
                ProductChanges {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            ),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_prices_are_rejected() {
        let service = CatalogueService::new(InMemoryCatalogue::default());

        assert!(matches!(
            service.create_product(input("100000000", 1)),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn update_product_rounds_price_and_reports_missing() {
        let service = CatalogueService::new(InMemoryCatalogue::default());
        let product = service.create_product(input("5", 1)).unwrap();

        let updated = service
            .update_product(
                product.id,
                ProductChanges {
                    price: Some(BigDecimal::from_str("7.125").unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price.to_string(), "7.13");

        assert!(matches!(
            service.update_product(999, ProductChanges::default()),
            Err(DomainError::NotFound("Product"))
        ));
    }
}
