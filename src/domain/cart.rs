/// Upper bound on a single cart line, enforced by `cart_lines` too.
pub const MAX_LINE_QUANTITY: i32 = 1000;

/// One cart line joined with the product's current row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i32,
    pub stock: i32,
}

impl CartItem {
    pub fn line_price(&self) -> i64 {
        i64::from(self.quantity) * i64::from(self.unit_price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockProblem {
    pub product_id: i32,
    pub product_name: String,
    pub requested: i32,
    pub available: i32,
}

/// Point-in-time view of a cart. Stock problems are advisory only: the
/// conditional decrement during order placement is what prevents overselling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub stock_problems: Vec<StockProblem>,
    pub total_price: i64,
}

impl CartSnapshot {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let stock_problems = items
            .iter()
            .filter(|i| i.quantity > i.stock)
            .map(|i| StockProblem {
                product_id: i.product_id,
                product_name: i.product_name.clone(),
                requested: i.quantity,
                available: i.stock,
            })
            .collect();
        let total_price = items.iter().map(CartItem::line_price).sum();
        Self {
            items,
            stock_problems,
            total_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_stock_problems(&self) -> bool {
        !self.stock_problems.is_empty()
    }
}

/// Result of checkout initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPreview {
    EmptyCart,
    StockProblems(CartSnapshot),
    Ready(CartSnapshot),
}

/// Outcome of removing one unit of a product from a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRemoval {
    Decremented { remaining: i32 },
    Deleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i32, quantity: i32, unit_price: i32, stock: i32) -> CartItem {
        CartItem {
            product_id,
            product_name: format!("cable-{product_id}"),
            quantity,
            unit_price,
            stock,
        }
    }

    #[test]
    fn empty_snapshot_has_zero_total() {
        let snapshot = CartSnapshot::from_items(vec![]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_price, 0);
        assert!(!snapshot.has_stock_problems());
    }

    #[test]
    fn total_is_sum_of_line_prices() {
        let snapshot = CartSnapshot::from_items(vec![item(1, 2, 499, 10), item(2, 3, 1000, 3)]);
        assert_eq!(snapshot.total_price, 2 * 499 + 3 * 1000);
        assert!(!snapshot.has_stock_problems());
    }

    #[test]
    fn quantity_above_stock_is_reported() {
        let snapshot = CartSnapshot::from_items(vec![item(1, 2, 100, 1), item(2, 1, 100, 1)]);
        assert_eq!(
            snapshot.stock_problems,
            vec![StockProblem {
                product_id: 1,
                product_name: "cable-1".to_string(),
                requested: 2,
                available: 1,
            }]
        );
    }

    #[test]
    fn line_price_does_not_overflow_i32() {
        let line = item(1, 100_000, 100_000, 100_000);
        assert_eq!(line.line_price(), 10_000_000_000);
    }
}
