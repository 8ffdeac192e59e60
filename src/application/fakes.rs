//! In-memory port implementations for service tests.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Mutex;

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::cart::{merged_quantity, CartLine, CartView};
use crate::domain::catalogue::{
    Brand, Category, NewProduct, Product, ProductChanges, ProductDetails, ProductFilter,
};
use crate::domain::errors::DomainError;
use crate::domain::order::{Checkout, ListResult, OrderLineView, OrderQuery, OrderStatus};
use crate::domain::ports::{CartRepository, CatalogueRepository, OrderRepository, UserRepository};
use crate::domain::user::{NewUser, Role, User};

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl UserRepository for InMemoryUsers {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already used".to_string()));
        }
        let user = User {
            id: users.len() as i32 + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    fn set_role(&self, id: i32, role: Role) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::NotFound("User"))?;
        user.role = role;
        Ok(user.clone())
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryCatalogue {
    categories: Mutex<Vec<Category>>,
    brands: Mutex<Vec<Brand>>,
    products: Mutex<Vec<Product>>,
}

impl CatalogueRepository for InMemoryCatalogue {
    fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.lock().unwrap().clone())
    }

    fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let mut rows = self.categories.lock().unwrap();
        let row = Category {
            id: rows.len() as i32 + 1,
            name: name.to_string(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, DomainError> {
        let mut rows = self.categories.lock().unwrap();
        Ok(rows.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.clone()
        }))
    }

    fn find_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    fn delete_category(&self, id: i32) -> Result<bool, DomainError> {
        let mut rows = self.categories.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }

    fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        Ok(self.brands.lock().unwrap().clone())
    }

    fn create_brand(&self, name: &str) -> Result<Brand, DomainError> {
        let mut rows = self.brands.lock().unwrap();
        let row = Brand {
            id: rows.len() as i32 + 1,
            name: name.to_string(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    fn rename_brand(&self, id: i32, name: &str) -> Result<Option<Brand>, DomainError> {
        let mut rows = self.brands.lock().unwrap();
        Ok(rows.iter_mut().find(|b| b.id == id).map(|b| {
            b.name = name.to_string();
            b.clone()
        }))
    }

    fn find_brand(&self, id: i32) -> Result<Option<Brand>, DomainError> {
        Ok(self
            .brands
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    fn delete_brand(&self, id: i32) -> Result<bool, DomainError> {
        let mut rows = self.brands.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() < before)
    }

    fn list_products(&self, _filter: &ProductFilter) -> Result<Vec<ProductDetails>, DomainError> {
        Ok(Vec::new())
    }

    fn find_product(&self, _id: i32) -> Result<Option<ProductDetails>, DomainError> {
        Ok(None)
    }

    fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut rows = self.products.lock().unwrap();
        let row = Product {
            id: rows.len() as i32 + 1,
            category_id: product.category_id,
            brand_id: product.brand_id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_path: product.image_path,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    fn update_product(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let mut rows = self.products.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(price) = changes.price {
            row.price = price;
        }
        if let Some(stock) = changes.stock {
            row.stock = stock;
        }
        Ok(Some(row.clone()))
    }

    fn delete_product(&self, id: i32) -> Result<bool, DomainError> {
        let mut rows = self.products.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

/// Carts keyed by user id; each cart keeps `product_id -> quantity`.
pub struct InMemoryCarts {
    prices: BTreeMap<i32, BigDecimal>,
    carts: Mutex<BTreeMap<i32, BTreeMap<i32, i32>>>,
}

impl InMemoryCarts {
    pub fn with_products(products: &[(i32, &str)]) -> Self {
        Self {
            prices: products
                .iter()
                .map(|(id, price)| (*id, BigDecimal::from_str(price).unwrap()))
                .collect(),
            carts: Mutex::new(BTreeMap::new()),
        }
    }

    fn view(&self, user_id: i32, items: &BTreeMap<i32, i32>) -> CartView {
        CartView {
            id: user_id,
            user_id,
            created_at: Utc::now(),
            lines: items
                .iter()
                .map(|(product_id, quantity)| CartLine {
                    product_id: *product_id,
                    product_name: format!("product {product_id}"),
                    unit_price: self.prices[product_id].clone(),
                    quantity: *quantity,
                    updated_at: Utc::now(),
                })
                .collect(),
        }
    }

    fn with_cart<T>(
        &self,
        user_id: i32,
        f: impl FnOnce(&mut BTreeMap<i32, i32>) -> Result<T, DomainError>,
    ) -> Result<CartView, DomainError> {
        let mut carts = self.carts.lock().unwrap();
        let items = carts.entry(user_id).or_default();
        f(items)?;
        Ok(self.view(user_id, items))
    }
}

impl CartRepository for InMemoryCarts {
    fn get_or_create(&self, user_id: i32) -> Result<CartView, DomainError> {
        self.with_cart(user_id, |_| Ok(()))
    }

    fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        if !self.prices.contains_key(&product_id) {
            return Err(DomainError::NotFound("Product"));
        }
        self.with_cart(user_id, |items| {
            let line = items.entry(product_id).or_insert(0);
            *line = merged_quantity(*line, quantity)?;
            Ok(())
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
        self.with_cart(user_id, |items| {
            let line = items
                .get_mut(&product_id)
                .ok_or(DomainError::NotFound("Cart item"))?;
            *line = quantity;
            Ok(())
        })
    }

    fn remove_item(&self, user_id: i32, product_id: i32) -> Result<CartView, DomainError> {
        self.with_cart(user_id, |items| {
            items
                .remove(&product_id)
                .ok_or(DomainError::NotFound("Cart item"))
        })
    }

    fn clear(&self, user_id: i32) -> Result<CartView, DomainError> {
        self.with_cart(user_id, |items| {
            items.clear();
            Ok(())
        })
    }

    fn list_all(&self) -> Result<Vec<CartView>, DomainError> {
        let carts = self.carts.lock().unwrap();
        Ok(carts
            .iter()
            .map(|(user_id, items)| self.view(*user_id, items))
            .collect())
    }
}

/// Order lines numbered from 1, one per entry of the owning user ids.
pub struct InMemoryOrders {
    lines: Mutex<Vec<OrderLineView>>,
}

impl InMemoryOrders {
    pub fn with_lines(owners: &[i32]) -> Self {
        let lines = owners
            .iter()
            .enumerate()
            .map(|(i, user_id)| OrderLineView {
                id: i as i32 + 1,
                user_id: *user_id,
                product_id: 1,
                product_name: "Headphones".to_string(),
                quantity: 1,
                unit_price: BigDecimal::from(10),
                status: OrderStatus::Pending,
                ordered_at: Utc::now(),
            })
            .collect();
        Self {
            lines: Mutex::new(lines),
        }
    }
}

impl OrderRepository for InMemoryOrders {
    fn checkout(&self, _user_id: i32) -> Result<Checkout, DomainError> {
        Err(DomainError::InvalidInput("Cart is empty".to_string()))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderLineView>, DomainError> {
        Ok(self.lines.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    fn list(&self, query: &OrderQuery) -> Result<ListResult, DomainError> {
        let lines = self.lines.lock().unwrap();
        let matching: Vec<OrderLineView> = lines
            .iter()
            .filter(|l| query.user_id.map_or(true, |u| l.user_id == u))
            .filter(|l| query.status.map_or(true, |s| l.status == s))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(query.offset()? as usize)
            .take(query.limit as usize)
            .collect();
        Ok(ListResult {
            items,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<Option<OrderLineView>, DomainError> {
        let mut lines = self.lines.lock().unwrap();
        let Some(line) = lines.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if !line.status.can_transition_to(status) {
            return Err(DomainError::InvalidInput(format!(
                "Cannot change order status from {} to {}",
                line.status, status
            )));
        }
        line.status = status;
        Ok(Some(line.clone()))
    }
}
