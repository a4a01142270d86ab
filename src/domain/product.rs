use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::review::ReviewView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Minor currency units.
    pub price: i32,
    pub stock: i32,
    pub standard: String,
    pub length_cm: i32,
    pub color: String,
    pub connector_id: Option<i32>,
    pub connector_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    pub reviews: Vec<ReviewView>,
    pub average_rating: Option<f64>,
}

impl ProductDetail {
    pub fn new(product: Product, reviews: Vec<ReviewView>) -> Self {
        let average_rating = if reviews.is_empty() {
            None
        } else {
            let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
            Some(sum as f64 / reviews.len() as f64)
        };
        Self {
            product,
            reviews,
            average_rating,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub stock: i32,
    pub standard: String,
    pub length_cm: i32,
    pub color: String,
    pub connector_id: Option<i32>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("product name must not be empty"));
        }
        check_non_negative("price", self.price)?;
        check_non_negative("stock", self.stock)?;
        check_non_negative("length_cm", self.length_cm)
    }
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub stock: Option<i32>,
    pub standard: Option<String>,
    pub length_cm: Option<i32>,
    pub color: Option<String>,
    pub connector_id: Option<Option<i32>>,
}

impl ProductChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(DomainError::invalid("product name must not be empty"));
        }
        if let Some(price) = self.price {
            check_non_negative("price", price)?;
        }
        if let Some(stock) = self.stock {
            check_non_negative("stock", stock)?;
        }
        if let Some(length_cm) = self.length_cm {
            check_non_negative("length_cm", length_cm)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.standard.is_none()
            && self.length_cm.is_none()
            && self.color.is_none()
            && self.connector_id.is_none()
    }
}

fn check_non_negative(field: &str, value: i32) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::invalid(format!("{field} must be >= 0")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub standard: Option<String>,
    pub color: Option<String>,
    pub connector_id: Option<i32>,
    pub in_stock_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
