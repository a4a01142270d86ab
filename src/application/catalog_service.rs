use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, ReviewRepository};
use crate::domain::product::{
    Connector, NewProduct, Page, Product, ProductChanges, ProductDetail, ProductFilter,
};
use crate::domain::review::{ReviewInput, ReviewView};
use crate::domain::user::Identity;

/// Catalog browsing, reviews and the admin product panel.
pub struct CatalogService<P, R> {
    products: P,
    reviews: R,
}

impl<P: ProductRepository, R: ReviewRepository> CatalogService<P, R> {
    pub fn new(products: P, reviews: R) -> Self {
        Self { products, reviews }
    }

    pub fn list_products(
        &self,
        filter: &ProductFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Product>, DomainError> {
        self.products.list(filter, page, limit)
    }

    pub fn get_product(&self, id: i32) -> Result<ProductDetail, DomainError> {
        let product = self
            .products
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Product {id}")))?;
        let reviews = self.reviews.list_for_product(id)?;
        Ok(ProductDetail::new(product, reviews))
    }

    pub fn list_connectors(&self) -> Result<Vec<Connector>, DomainError> {
        self.products.list_connectors()
    }

    pub fn list_reviews(&self, product_id: i32) -> Result<Vec<ReviewView>, DomainError> {
        if self.products.find_by_id(product_id)?.is_none() {
            return Err(DomainError::not_found(format!("Product {product_id}")));
        }
        self.reviews.list_for_product(product_id)
    }

    pub fn submit_review(
        &self,
        identity: &Identity,
        product_id: i32,
        review: ReviewInput,
    ) -> Result<ReviewView, DomainError> {
        review.validate()?;
        self.reviews.upsert(identity.user_id, product_id, review)
    }

    // ── Admin ────────────────────────────────────────────────────────────────

    pub fn create_product(
        &self,
        actor: &Identity,
        product: NewProduct,
    ) -> Result<Product, DomainError> {
        actor.require_admin()?;
        product.validate()?;
        let created = self.products.create(product)?;
        log::info!("Product {} created by user {}", created.id, actor.user_id);
        Ok(created)
    }

    pub fn update_product(
        &self,
        actor: &Identity,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Product, DomainError> {
        actor.require_admin()?;
        if changes.is_empty() {
            return Err(DomainError::invalid("no fields to update"));
        }
        changes.validate()?;
        self.products.update(id, changes)
    }

    pub fn delete_product(&self, actor: &Identity, id: i32) -> Result<(), DomainError> {
        actor.require_admin()?;
        self.products.delete(id)?;
        log::info!("Product {} deleted by user {}", id, actor.user_id);
        Ok(())
    }

    pub fn create_connector(&self, actor: &Identity, name: &str) -> Result<Connector, DomainError> {
        actor.require_admin()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("connector name must not be empty"));
        }
        self.products.create_connector(name)
    }
}
