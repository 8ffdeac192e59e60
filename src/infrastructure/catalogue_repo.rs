use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalogue::{
    Brand, Category, NewProduct, Product, ProductChanges, ProductDetails, ProductFilter,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogueRepository;
use crate::schema::{brands, categories, products};

use super::foreign_key_as;
use super::models::{
    BrandRow, CategoryRow, NewBrandRow, NewCategoryRow, NewProductRow, ProductChangesRow, ProductRow,
};

pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn details((product, category, brand): (ProductRow, CategoryRow, BrandRow)) -> ProductDetails {
    ProductDetails {
        product: product.into(),
        category: category.into(),
        brand: brand.into(),
    }
}

/// `ILIKE` pattern matching `search` literally anywhere in the value.
/// Backslash is the default escape character in Postgres patterns.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl CatalogueRepository for DieselCatalogueRepository {
    // ── Categories ───────────────────────────────────────────────────────────

    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = categories::table
            .select(CategoryRow::as_select())
            .order(categories::id.asc())
            .load::<CategoryRow>(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(categories::table)
            .values(&NewCategoryRow { name })
            .returning(CategoryRow::as_returning())
            .get_result::<CategoryRow>(&mut conn)?;
        Ok(row.into())
    }

    fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(categories::table.find(id))
            .set(categories::name.eq(name))
            .returning(CategoryRow::as_returning())
            .get_result::<CategoryRow>(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }

    fn find_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first::<CategoryRow>(&mut conn)
            .optional()?;
        Ok(row.map(Category::from))
    }

    fn delete_category(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(categories::table.find(id))
            .execute(&mut conn)
            .map_err(foreign_key_as("Category still has products"))?;
        Ok(deleted > 0)
    }

    // ── Brands ───────────────────────────────────────────────────────────────

    fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = brands::table
            .select(BrandRow::as_select())
            .order(brands::id.asc())
            .load::<BrandRow>(&mut conn)?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    fn create_brand(&self, name: &str) -> Result<Brand, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(brands::table)
            .values(&NewBrandRow { name })
            .returning(BrandRow::as_returning())
            .get_result::<BrandRow>(&mut conn)?;
        Ok(row.into())
    }

    fn rename_brand(&self, id: i32, name: &str) -> Result<Option<Brand>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(brands::table.find(id))
            .set(brands::name.eq(name))
            .returning(BrandRow::as_returning())
            .get_result::<BrandRow>(&mut conn)
            .optional()?;
        Ok(row.map(Brand::from))
    }

    fn find_brand(&self, id: i32) -> Result<Option<Brand>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = brands::table
            .find(id)
            .select(BrandRow::as_select())
            .first::<BrandRow>(&mut conn)
            .optional()?;
        Ok(row.map(Brand::from))
    }

    fn delete_brand(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(brands::table.find(id))
            .execute(&mut conn)
            .map_err(foreign_key_as("Brand still has products"))?;
        Ok(deleted > 0)
    }

    // ── Products ─────────────────────────────────────────────────────────────

    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductDetails>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table
            .inner_join(categories::table)
            .inner_join(brands::table)
            .select((
                ProductRow::as_select(),
                CategoryRow::as_select(),
                BrandRow::as_select(),
            ))
            .order(products::id.asc())
            .into_boxed();

        if let Some(category_id) = filter.category_id {
            query = query.filter(products::category_id.eq(category_id));
        }
        if let Some(brand_id) = filter.brand_id {
            query = query.filter(products::brand_id.eq(brand_id));
        }
        if let Some(search) = filter.search.as_deref() {
            query = query.filter(products::name.ilike(contains_pattern(search)));
        }

        let rows = query.load::<(ProductRow, CategoryRow, BrandRow)>(&mut conn)?;
        Ok(rows.into_iter().map(details).collect())
    }

    fn find_product(&self, id: i32) -> Result<Option<ProductDetails>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .inner_join(categories::table)
            .inner_join(brands::table)
            .filter(products::id.eq(id))
            .select((
                ProductRow::as_select(),
                CategoryRow::as_select(),
                BrandRow::as_select(),
            ))
            .first::<(ProductRow, CategoryRow, BrandRow)>(&mut conn)
            .optional()?;
        Ok(row.map(details))
    }

    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                category_id: product.category_id,
                brand_id: product.brand_id,
                name: product.name,
                description: product.description,
                price: product.price,
                stock: product.stock,
                image_path: product.image_path,
            })
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .map_err(foreign_key_as("Unknown category or brand"))?;
        Ok(row.into())
    }

    fn update_product(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        // Diesel refuses an UPDATE with an empty SET clause.
        if changes.is_empty() {
            let row = products::table
                .find(id)
                .select(ProductRow::as_select())
                .first::<ProductRow>(&mut conn)
                .optional()?;
            return Ok(row.map(Product::from));
        }

        let row = diesel::update(products::table.find(id))
            .set(&ProductChangesRow {
                category_id: changes.category_id,
                brand_id: changes.brand_id,
                name: changes.name,
                description: changes.description,
                price: changes.price,
                stock: changes.stock,
                image_path: changes.image_path,
            })
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .optional()
            .map_err(foreign_key_as("Unknown category or brand"))?;
        Ok(row.map(Product::from))
    }

    fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(products::table.find(id))
            .execute(&mut conn)
            .map_err(foreign_key_as("Product has been ordered and cannot be deleted"))?;
        Ok(deleted > 0)
    }
}
