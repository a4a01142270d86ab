use crate::domain::errors::DomainError;
use crate::domain::order::{OrderRecord, PlaceOrderOutcome, PlacedOrder};
use crate::domain::ports::{CartRepository, OrderRepository};
use crate::domain::product::Page;
use crate::domain::user::Identity;

pub struct OrderService<C, O> {
    carts: C,
    orders: O,
}

impl<C: CartRepository, O: OrderRepository> OrderService<C, O> {
    pub fn new(carts: C, orders: O) -> Self {
        Self { carts, orders }
    }

    /// Turns the caller's cart into orders. An empty cart is detected before
    /// any transaction is opened. Stock problems visible in the snapshot are
    /// not checked here; the repository's conditional decrement decides.
    pub fn place_order(&self, identity: &Identity) -> Result<PlaceOrderOutcome, DomainError> {
        if self.carts.snapshot(identity.user_id)?.is_empty() {
            log::info!("Checkout by user {} skipped: cart is empty", identity.user_id);
            return Ok(PlaceOrderOutcome::EmptyCart);
        }

        match self.orders.place_order(identity.user_id) {
            Ok(Some(order)) => {
                log::info!(
                    "Order placed: checkout={} user={} lines={} total={}",
                    order.checkout_id,
                    identity.user_id,
                    order.lines.len(),
                    order.total_price
                );
                Ok(PlaceOrderOutcome::Placed(order))
            }
            Ok(None) => Ok(PlaceOrderOutcome::EmptyCart),
            Err(e @ DomainError::StockExhausted { .. }) => {
                log::warn!("Checkout by user {} rejected: {}", identity.user_id, e);
                Err(e)
            }
            Err(e) => {
                log::error!("Checkout by user {} failed: {}", identity.user_id, e);
                Err(e)
            }
        }
    }

    pub fn order_history(&self, identity: &Identity) -> Result<Vec<PlacedOrder>, DomainError> {
        self.orders.history(identity.user_id)
    }

    pub fn list_orders(
        &self,
        actor: &Identity,
        page: i64,
        limit: i64,
    ) -> Result<Page<OrderRecord>, DomainError> {
        actor.require_admin()?;
        self.orders.list(page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::OrderService;
    use crate::application::fakes::{
        admin, calls, customer, store_with_product, FakeCartRepository, FakeOrderRepository,
    };
    use crate::domain::errors::DomainError;
    use crate::domain::order::PlaceOrderOutcome;

    #[test]
    fn empty_cart_never_reaches_the_repository() {
        let store = store_with_product(1, 100, 5);
        let orders = FakeOrderRepository::new(store.clone());
        let counter = orders.place_calls.clone();
        let service = OrderService::new(FakeCartRepository(store), orders);

        let outcome = service.place_order(&customer(1)).expect("should not fail");

        assert_eq!(outcome, PlaceOrderOutcome::EmptyCart);
        assert_eq!(calls(&counter), 0);
    }

    #[test]
    fn second_buyer_fails_after_first_drains_stock() {
        let store = store_with_product(1, 250, 2);
        {
            let mut s = store.lock().expect("poisoned");
            s.carts.insert((10, 1), 2);
            s.carts.insert((20, 1), 1);
        }
        let service = OrderService::new(
            FakeCartRepository(store.clone()),
            FakeOrderRepository::new(store.clone()),
        );

        match service.place_order(&customer(10)).expect("first checkout") {
            PlaceOrderOutcome::Placed(order) => assert_eq!(order.total_price, 500),
            other => panic!("expected an order, got {other:?}"),
        }

        let err = service.place_order(&customer(20)).expect_err("second checkout");
        assert_eq!(
            err,
            DomainError::StockExhausted {
                product_id: 1,
                requested: 1,
                available: 0
            }
        );
        let s = store.lock().expect("poisoned");
        assert_eq!(s.products[&1].2, 0);
        assert_eq!(s.carts.get(&(20, 1)), Some(&1));
    }

    #[test]
    fn snapshot_stock_problems_do_not_short_circuit_the_transaction() {
        let store = store_with_product(1, 100, 0);
        store.lock().expect("poisoned").carts.insert((1, 1), 1);
        let orders = FakeOrderRepository::new(store.clone());
        let counter = orders.place_calls.clone();
        let service = OrderService::new(FakeCartRepository(store), orders);

        assert!(matches!(
            service.place_order(&customer(1)),
            Err(DomainError::StockExhausted { .. })
        ));
        assert_eq!(calls(&counter), 1);
    }

    #[test]
    fn listing_all_orders_requires_admin() {
        let store = store_with_product(1, 100, 1);
        let service = OrderService::new(
            FakeCartRepository(store.clone()),
            FakeOrderRepository::new(store),
        );

        assert!(matches!(
            service.list_orders(&customer(1), 1, 20),
            Err(DomainError::Forbidden(_))
        ));
        assert!(service.list_orders(&admin(2), 1, 20).is_ok());
    }
}
