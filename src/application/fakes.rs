//! In-memory port implementations for service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::{CartItem, CartRemoval, CartSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineView, OrderRecord, PlacedOrder};
use crate::domain::ports::{
    CartRepository, OrderRepository, ProductRepository, ReviewRepository, UserRepository,
};
use crate::domain::product::{Connector, NewProduct, Page, Product, ProductChanges, ProductFilter};
use crate::domain::review::{ReviewInput, ReviewView};
use crate::domain::user::{Identity, Role, UserCredentials};

/// Products and carts shared between the fake cart and order repositories.
#[derive(Default)]
pub struct Store {
    pub products: BTreeMap<i32, (String, i32, i32)>,
    pub carts: BTreeMap<(i32, i32), i32>,
    pub orders: Vec<OrderRecord>,
}

pub type SharedStore = Arc<Mutex<Store>>;

pub fn store_with_product(id: i32, price: i32, stock: i32) -> SharedStore {
    let mut store = Store::default();
    store
        .products
        .insert(id, (format!("cable-{id}"), price, stock));
    Arc::new(Mutex::new(store))
}

pub struct FakeCartRepository(pub SharedStore);

impl CartRepository for FakeCartRepository {
    fn snapshot(&self, user_id: i32) -> Result<CartSnapshot, DomainError> {
        let store = self.0.lock().expect("store poisoned");
        let items = store
            .carts
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((_, pid), qty)| {
                let (name, price, stock) = store.products[pid].clone();
                CartItem {
                    product_id: *pid,
                    product_name: name,
                    quantity: *qty,
                    unit_price: price,
                    stock,
                }
            })
            .collect();
        Ok(CartSnapshot::from_items(items))
    }

    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<i32, DomainError> {
        let mut store = self.0.lock().expect("store poisoned");
        if !store.products.contains_key(&product_id) {
            return Err(DomainError::not_found(format!("Product {product_id}")));
        }
        let line = store.carts.entry((user_id, product_id)).or_insert(0);
        *line += quantity;
        Ok(*line)
    }

    fn remove_one(&self, user_id: i32, product_id: i32) -> Result<CartRemoval, DomainError> {
        let mut store = self.0.lock().expect("store poisoned");
        let key = (user_id, product_id);
        match store.carts.get(&key).copied() {
            None => Err(DomainError::not_found("Cart line")),
            Some(1) => {
                store.carts.remove(&key);
                Ok(CartRemoval::Deleted)
            }
            Some(q) => {
                store.carts.insert(key, q - 1);
                Ok(CartRemoval::Decremented { remaining: q - 1 })
            }
        }
    }
}

/// Applies the same all-or-nothing rules as the Diesel repository by working
/// on a copy of the store and swapping it in only on success.
pub struct FakeOrderRepository {
    pub store: SharedStore,
    pub place_calls: Arc<AtomicUsize>,
}

impl FakeOrderRepository {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            place_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

impl OrderRepository for FakeOrderRepository {
    fn place_order(&self, user_id: i32) -> Result<Option<PlacedOrder>, DomainError> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.store.lock().expect("store poisoned");

        let lines: Vec<(i32, i32)> = store
            .carts
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((_, pid), qty)| (*pid, *qty))
            .collect();
        if lines.is_empty() {
            return Ok(None);
        }

        let mut products = store.products.clone();
        let checkout_id = Uuid::new_v4();
        let placed_at = Utc::now();
        let mut views = Vec::new();
        for (i, (pid, qty)) in lines.iter().enumerate() {
            let (name, price, stock) = products
                .get_mut(pid)
                .ok_or_else(|| DomainError::not_found(format!("Product {pid}")))?;
            if *stock < *qty {
                return Err(DomainError::StockExhausted {
                    product_id: *pid,
                    requested: *qty,
                    available: *stock,
                });
            }
            *stock -= qty;
            views.push(OrderLineView {
                id: i as i32 + 1,
                product_id: *pid,
                product_name: name.clone(),
                quantity: *qty,
                unit_price: *price,
            });
        }

        store.products = products;
        store.carts.retain(|(uid, _), _| *uid != user_id);
        Ok(Some(PlacedOrder::new(checkout_id, user_id, placed_at, views)))
    }

    fn history(&self, user_id: i32) -> Result<Vec<PlacedOrder>, DomainError> {
        let store = self.store.lock().expect("store poisoned");
        let rows = store
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        Ok(crate::domain::order::group_by_checkout(rows))
    }

    fn list(&self, _page: i64, _limit: i64) -> Result<Page<OrderRecord>, DomainError> {
        let store = self.store.lock().expect("store poisoned");
        Ok(Page {
            items: store.orders.clone(),
            total: store.orders.len() as i64,
        })
    }
}

#[derive(Default)]
pub struct FakeProductRepository {
    pub products: Mutex<HashMap<i32, Product>>,
}

impl ProductRepository for FakeProductRepository {
    fn list(
        &self,
        _filter: &ProductFilter,
        _page: i64,
        _limit: i64,
    ) -> Result<Page<Product>, DomainError> {
        let products = self.products.lock().expect("poisoned");
        Ok(Page {
            items: products.values().cloned().collect(),
            total: products.len() as i64,
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.products.lock().expect("poisoned").get(&id).cloned())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = self.products.lock().expect("poisoned");
        let id = products.len() as i32 + 1;
        let now = Utc::now();
        let created = Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            standard: product.standard,
            length_cm: product.length_cm,
            color: product.color,
            connector_id: product.connector_id,
            connector_name: None,
            created_at: now,
            updated_at: now,
        };
        products.insert(id, created.clone());
        Ok(created)
    }

    fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError> {
        let mut products = self.products.lock().expect("poisoned");
        let product = products
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("Product {id}")))?;
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        Ok(product.clone())
    }

    fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.products
            .lock()
            .expect("poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("Product {id}")))
    }

    fn list_connectors(&self) -> Result<Vec<Connector>, DomainError> {
        Ok(vec![])
    }

    fn create_connector(&self, name: &str) -> Result<Connector, DomainError> {
        Ok(Connector {
            id: 1,
            name: name.to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeReviewRepository {
    pub reviews: Mutex<HashMap<(i32, i32), ReviewView>>,
}

impl ReviewRepository for FakeReviewRepository {
    fn upsert(
        &self,
        user_id: i32,
        product_id: i32,
        review: ReviewInput,
    ) -> Result<ReviewView, DomainError> {
        let mut reviews = self.reviews.lock().expect("poisoned");
        let id = reviews.len() as i32 + 1;
        let view = ReviewView {
            id,
            user_id,
            product_id,
            rating: review.rating,
            comment: review.comment,
            updated_at: Utc::now(),
        };
        reviews.insert((user_id, product_id), view.clone());
        Ok(view)
    }

    fn list_for_product(&self, product_id: i32) -> Result<Vec<ReviewView>, DomainError> {
        Ok(self
            .reviews
            .lock()
            .expect("poisoned")
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    pub users: Mutex<Vec<UserCredentials>>,
}

impl UserRepository for FakeUserRepository {
    fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Identity, DomainError> {
        let mut users = self.users.lock().expect("poisoned");
        if users.iter().any(|u| u.identity.email == email) {
            return Err(DomainError::Conflict(format!("email '{email}' is already registered")));
        }
        let identity = Identity {
            user_id: users.len() as i32 + 1,
            role,
            email: email.to_string(),
        };
        users.push(UserCredentials {
            identity: identity.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(identity)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("poisoned")
            .iter()
            .find(|u| u.identity.email == email)
            .cloned())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Identity>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("poisoned")
            .iter()
            .find(|u| u.identity.user_id == id)
            .map(|u| u.identity.clone()))
    }
}

pub fn customer(user_id: i32) -> Identity {
    Identity {
        user_id,
        role: Role::Customer,
        email: format!("user{user_id}@example.com"),
    }
}

pub fn admin(user_id: i32) -> Identity {
    Identity {
        user_id,
        role: Role::Admin,
        email: format!("admin{user_id}@example.com"),
    }
}
