use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::order::OrderRecord;
use crate::domain::product::{Connector, Product};
use crate::domain::review::ReviewView;
use crate::schema::{cart_lines, connectors, orders, products, reviews, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub stock: i32,
    pub standard: String,
    pub length_cm: i32,
    pub color: String,
    pub connector_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_product(self, connector_name: Option<String>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            standard: self.standard,
            length_cm: self.length_cm,
            color: self.color,
            connector_id: self.connector_id,
            connector_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: i32,
    pub stock: i32,
    pub standard: &'a str,
    pub length_cm: i32,
    pub color: &'a str,
    pub connector_id: Option<i32>,
}

/// `None` fields are skipped; `connector_id: Some(None)` clears the column.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub stock: Option<i32>,
    pub standard: Option<String>,
    pub length_cm: Option<i32>,
    pub color: Option<String>,
    pub connector_id: Option<Option<i32>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = connectors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConnectorRow {
    pub id: i32,
    pub name: String,
}

impl From<ConnectorRow> for Connector {
    fn from(row: ConnectorRow) -> Self {
        Connector {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = connectors)]
pub struct NewConnectorRow<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cart_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i32,
    pub placed_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_record(self, product_name: String, user_email: String) -> OrderRecord {
        OrderRecord {
            id: self.id,
            checkout_id: self.checkout_id,
            user_id: self.user_id,
            user_email,
            product_id: self.product_id,
            product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            placed_at: self.placed_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i32,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewView {
    fn from(row: ReviewRow) -> Self {
        ReviewView {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            rating: row.rating,
            comment: row.comment,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReviewRow<'a> {
    pub user_id: i32,
    pub product_id: i32,
    pub rating: i32,
    pub comment: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}
