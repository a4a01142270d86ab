use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    /// Price captured at purchase time.
    pub unit_price: i32,
}

impl OrderLineView {
    pub fn line_price(&self) -> i64 {
        i64::from(self.quantity) * i64::from(self.unit_price)
    }
}

/// All order rows written by a single checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
    pub total_price: i64,
}

impl PlacedOrder {
    pub fn new(
        checkout_id: Uuid,
        user_id: i32,
        placed_at: DateTime<Utc>,
        lines: Vec<OrderLineView>,
    ) -> Self {
        let total_price = lines.iter().map(OrderLineView::line_price).sum();
        Self {
            checkout_id,
            user_id,
            placed_at,
            lines,
            total_price,
        }
    }
}

/// A single order row for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: i32,
    pub checkout_id: Uuid,
    pub user_id: i32,
    pub user_email: String,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i32,
    pub placed_at: DateTime<Utc>,
}

/// Outcome of an order placement attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderOutcome {
    Placed(PlacedOrder),
    EmptyCart,
}

/// Groups order rows into checkouts. Rows of one checkout must be adjacent,
/// which holds when they are sorted by `placed_at` then `checkout_id`.
pub fn group_by_checkout(rows: Vec<OrderRecord>) -> Vec<PlacedOrder> {
    let mut groups: Vec<(Uuid, i32, DateTime<Utc>, Vec<OrderLineView>)> = Vec::new();
    for row in rows {
        let line = OrderLineView {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        };
        match groups.last_mut() {
            Some((checkout_id, _, _, lines)) if *checkout_id == row.checkout_id => lines.push(line),
            _ => groups.push((row.checkout_id, row.user_id, row.placed_at, vec![line])),
        }
    }
    groups
        .into_iter()
        .map(|(checkout_id, user_id, placed_at, lines)| {
            PlacedOrder::new(checkout_id, user_id, placed_at, lines)
        })
        .collect()
}
