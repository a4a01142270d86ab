use super::cart::{CartRemoval, CartSnapshot};
use super::errors::DomainError;
use super::order::{OrderRecord, PlacedOrder};
use super::product::{Connector, NewProduct, Page, Product, ProductChanges, ProductFilter};
use super::review::{ReviewInput, ReviewView};
use super::user::{Identity, Role, UserCredentials};

pub trait ProductRepository: Send + Sync + 'static {
    fn list(&self, filter: &ProductFilter, page: i64, limit: i64)
        -> Result<Page<Product>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError>;
    fn delete(&self, id: i32) -> Result<(), DomainError>;
    fn list_connectors(&self) -> Result<Vec<Connector>, DomainError>;
    fn create_connector(&self, name: &str) -> Result<Connector, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    fn snapshot(&self, user_id: i32) -> Result<CartSnapshot, DomainError>;
    /// Returns the line's quantity after the increment.
    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<i32, DomainError>;
    fn remove_one(&self, user_id: i32, product_id: i32) -> Result<CartRemoval, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Converts the user's cart into orders in one transaction. `Ok(None)`
    /// means the cart was empty when the transaction read it.
    fn place_order(&self, user_id: i32) -> Result<Option<PlacedOrder>, DomainError>;
    fn history(&self, user_id: i32) -> Result<Vec<PlacedOrder>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<Page<OrderRecord>, DomainError>;
}

pub trait ReviewRepository: Send + Sync + 'static {
    fn upsert(
        &self,
        user_id: i32,
        product_id: i32,
        review: ReviewInput,
    ) -> Result<ReviewView, DomainError>;
    fn list_for_product(&self, product_id: i32) -> Result<Vec<ReviewView>, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, email: &str, password_hash: &str, role: Role)
        -> Result<Identity, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Identity>, DomainError>;
}
