use crate::domain::cart::{CartRemoval, CartSnapshot, CheckoutPreview, MAX_LINE_QUANTITY};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::domain::user::Identity;

pub struct CartService<C> {
    carts: C,
}

impl<C: CartRepository> CartService<C> {
    pub fn new(carts: C) -> Self {
        Self { carts }
    }

    pub fn view_cart(&self, identity: &Identity) -> Result<CartSnapshot, DomainError> {
        self.carts.snapshot(identity.user_id)
    }

    pub fn add_to_cart(
        &self,
        identity: &Identity,
        product_id: i32,
        quantity: i32,
    ) -> Result<i32, DomainError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(DomainError::invalid(format!(
                "quantity must be between 1 and {MAX_LINE_QUANTITY}"
            )));
        }
        self.carts.add(identity.user_id, product_id, quantity)
    }

    pub fn remove_from_cart(
        &self,
        identity: &Identity,
        product_id: i32,
    ) -> Result<CartRemoval, DomainError> {
        self.carts.remove_one(identity.user_id, product_id)
    }

    /// Read-only checkout step: takes a fresh snapshot and classifies it.
    pub fn checkout_preview(&self, identity: &Identity) -> Result<CheckoutPreview, DomainError> {
        let snapshot = self.carts.snapshot(identity.user_id)?;
        Ok(if snapshot.is_empty() {
            CheckoutPreview::EmptyCart
        } else if snapshot.has_stock_problems() {
            CheckoutPreview::StockProblems(snapshot)
        } else {
            CheckoutPreview::Ready(snapshot)
        })
    }
}
