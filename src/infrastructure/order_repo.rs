use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{group_by_checkout, OrderLineView, OrderRecord, PlacedOrder};
use crate::domain::ports::OrderRepository;
use crate::domain::product::Page;
use crate::schema::{cart_lines, orders, products, users};

use super::cart_repo::load_cart_items;
use super::models::{NewOrderRow, OrderRow};

/// Decrements stock only if enough is left, returning the product's current
/// price. Zero matched rows means the stock is exhausted (or the product is
/// gone) and the caller's transaction must roll back.
pub(crate) fn decrement_stock(
    conn: &mut PgConnection,
    product_id: i32,
    quantity: i32,
) -> Result<i32, DomainError> {
    let price = diesel::update(
        products::table.filter(products::id.eq(product_id).and(products::stock.ge(quantity))),
    )
    .set(products::stock.eq(products::stock - quantity))
    .returning(products::price)
    .get_result::<i32>(conn)
    .optional()?;

    if let Some(price) = price {
        return Ok(price);
    }

    let available = products::table
        .find(product_id)
        .select(products::stock)
        .first::<i32>(conn)
        .optional()?;
    match available {
        Some(available) => Err(DomainError::StockExhausted {
            product_id,
            requested: quantity,
            available,
        }),
        None => Err(DomainError::not_found(format!("Product {product_id}"))),
    }
}

/// Runs the whole cart-to-order conversion on `conn`. Must be called inside a
/// transaction; any error leaves the transaction to be rolled back.
pub(crate) fn place_order_in(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Option<PlacedOrder>, DomainError> {
    // Lock this user's cart lines so a concurrent add or checkout for the same
    // user waits for us instead of being cleared unseen.
    cart_lines::table
        .filter(cart_lines::user_id.eq(user_id))
        .select(cart_lines::product_id)
        .for_update()
        .load::<i32>(conn)?;

    let items = load_cart_items(conn, user_id)?;
    if items.is_empty() {
        return Ok(None);
    }

    let checkout_id = Uuid::new_v4();
    let placed_at = Utc::now();
    let mut lines = Vec::with_capacity(items.len());

    // Items are in product id order, so concurrent checkouts lock product rows
    // in the same order.
    for item in &items {
        let unit_price = decrement_stock(conn, item.product_id, item.quantity)?;

        let id = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                checkout_id,
                user_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price,
                placed_at,
            })
            .returning(orders::id)
            .get_result::<i32>(conn)?;

        lines.push(OrderLineView {
            id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price,
        });
    }

    let purchased: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    diesel::delete(
        cart_lines::table
            .filter(cart_lines::user_id.eq(user_id))
            .filter(cart_lines::product_id.eq_any(purchased)),
    )
    .execute(conn)?;

    Ok(Some(PlacedOrder::new(checkout_id, user_id, placed_at, lines)))
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place_order(&self, user_id: i32) -> Result<Option<PlacedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| place_order_in(conn, user_id))
    }

    fn history(&self, user_id: i32) -> Result<Vec<PlacedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .inner_join(products::table)
            .inner_join(users::table)
            .filter(orders::user_id.eq(user_id))
            .order((
                orders::placed_at.desc(),
                orders::checkout_id.asc(),
                orders::id.asc(),
            ))
            .select((OrderRow::as_select(), products::name, users::email))
            .load::<(OrderRow, String, String)>(&mut conn)?;

        let records = rows
            .into_iter()
            .map(|(order, product_name, email)| order.into_record(product_name, email))
            .collect();
        Ok(group_by_checkout(records))
    }

    fn list(&self, page: i64, limit: i64) -> Result<Page<OrderRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let (limit, offset) = super::page_bounds(page, limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .inner_join(products::table)
                .inner_join(users::table)
                .order((orders::placed_at.desc(), orders::id.asc()))
                .limit(limit)
                .offset(offset)
                .select((OrderRow::as_select(), products::name, users::email))
                .load::<(OrderRow, String, String)>(conn)?;

            Ok(Page {
                items: rows
                    .into_iter()
                    .map(|(order, product_name, email)| order.into_record(product_name, email))
                    .collect(),
                total,
            })
        })
    }
}
