use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{Connector, NewProduct, Page, Product, ProductChanges, ProductFilter};
use crate::schema::{connectors, products};

use super::models::{ConnectorRow, NewConnectorRow, NewProductRow, ProductChangeset, ProductRow};

/// `ILIKE` pattern matching `search` literally anywhere in the name.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered(filter: &ProductFilter) -> products::BoxedQuery<'static, Pg> {
    let mut query = products::table.into_boxed();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(products::name.ilike(contains_pattern(search)));
    }
    if let Some(standard) = &filter.standard {
        query = query.filter(products::standard.eq(standard.clone()));
    }
    if let Some(color) = &filter.color {
        query = query.filter(products::color.eq(color.clone()));
    }
    if let Some(connector_id) = filter.connector_id {
        query = query.filter(products::connector_id.eq(connector_id));
    }
    if filter.in_stock_only {
        query = query.filter(products::stock.gt(0));
    }
    query
}

fn find_product(conn: &mut PgConnection, id: i32) -> Result<Option<Product>, DomainError> {
    let row = products::table
        .left_join(connectors::table)
        .filter(products::id.eq(id))
        .select((ProductRow::as_select(), connectors::name.nullable()))
        .first::<(ProductRow, Option<String>)>(conn)
        .optional()?;
    Ok(row.map(|(product, connector)| product.into_product(connector)))
}

/// Connector foreign keys only fail when the referenced connector is missing.
fn connector_violation(e: diesel::result::Error, connector_id: Option<i32>) -> DomainError {
    match connector_id {
        Some(id) if super::is_foreign_key_violation(&e) => {
            DomainError::not_found(format!("Connector {id}"))
        }
        _ => e.into(),
    }
}

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn list(
        &self,
        filter: &ProductFilter,
        page: i64,
        limit: i64,
    ) -> Result<Page<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let (limit, offset) = super::page_bounds(page, limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(filter).count().get_result(conn)?;

            let rows = filtered(filter)
                .select(ProductRow::as_select())
                .order((products::created_at.desc(), products::id.desc()))
                .limit(limit)
                .offset(offset)
                .load::<ProductRow>(conn)?;

            let mut connector_ids: Vec<i32> = rows.iter().filter_map(|r| r.connector_id).collect();
            connector_ids.sort_unstable();
            connector_ids.dedup();
            let names: HashMap<i32, String> = connectors::table
                .filter(connectors::id.eq_any(connector_ids))
                .select(ConnectorRow::as_select())
                .load::<ConnectorRow>(conn)?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();

            Ok(Page {
                items: rows
                    .into_iter()
                    .map(|row| {
                        let connector = row.connector_id.and_then(|id| names.get(&id).cloned());
                        row.into_product(connector)
                    })
                    .collect(),
                total,
            })
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        find_product(&mut conn, id)
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let id = diesel::insert_into(products::table)
            .values(&NewProductRow {
                name: &product.name,
                description: &product.description,
                price: product.price,
                stock: product.stock,
                standard: &product.standard,
                length_cm: product.length_cm,
                color: &product.color,
                connector_id: product.connector_id,
            })
            .returning(products::id)
            .get_result::<i32>(&mut conn)
            .map_err(|e| connector_violation(e, product.connector_id))?;

        find_product(&mut conn, id)?
            .ok_or_else(|| DomainError::Internal(format!("product {id} vanished after insert")))
    }

    fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let connector_id = changes.connector_id.flatten();
        let changeset = ProductChangeset {
            name: changes.name,
            description: changes.description,
            price: changes.price,
            stock: changes.stock,
            standard: changes.standard,
            length_cm: changes.length_cm,
            color: changes.color,
            connector_id: changes.connector_id,
            updated_at: Utc::now(),
        };

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(products::table.find(id))
                .set(&changeset)
                .execute(conn)
                .map_err(|e| connector_violation(e, connector_id))?;
            if updated == 0 {
                return Err(DomainError::not_found(format!("Product {id}")));
            }
            find_product(conn, id)?
                .ok_or_else(|| DomainError::not_found(format!("Product {id}")))
        })
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(products::table.find(id))
            .execute(&mut conn)
            .map_err(|e| {
                if super::is_foreign_key_violation(&e) {
                    DomainError::Conflict(format!(
                        "product {id} is referenced by carts, orders or reviews"
                    ))
                } else {
                    e.into()
                }
            })?;
        if deleted == 0 {
            return Err(DomainError::not_found(format!("Product {id}")));
        }
        Ok(())
    }

    fn list_connectors(&self) -> Result<Vec<Connector>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = connectors::table
            .order(connectors::name.asc())
            .select(ConnectorRow::as_select())
            .load::<ConnectorRow>(&mut conn)?;
        Ok(rows.into_iter().map(Connector::from).collect())
    }

    fn create_connector(&self, name: &str) -> Result<Connector, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(connectors::table)
            .values(&NewConnectorRow { name })
            .returning(ConnectorRow::as_returning())
            .get_result::<ConnectorRow>(&mut conn)
            .map(Connector::from)
            .map_err(|e| {
                if super::is_unique_violation(&e) {
                    DomainError::Conflict(format!("connector '{name}' already exists"))
                } else {
                    e.into()
                }
            })
    }
}
