use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::cart::{CartItem, CartRemoval, CartSnapshot, MAX_LINE_QUANTITY};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_lines, products};

use super::models::{CartLineRow, ProductRow};

/// Reads the user's cart lines joined with their products, ordered by
/// product id. Takes no locks.
pub(crate) fn load_cart_items(
    conn: &mut PgConnection,
    user_id: i32,
) -> Result<Vec<CartItem>, DomainError> {
    let rows = cart_lines::table
        .inner_join(products::table)
        .filter(cart_lines::user_id.eq(user_id))
        .order(cart_lines::product_id.asc())
        .select((CartLineRow::as_select(), ProductRow::as_select()))
        .load::<(CartLineRow, ProductRow)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(line, product)| CartItem {
            product_id: line.product_id,
            product_name: product.name,
            quantity: line.quantity,
            unit_price: product.price,
            stock: product.stock,
        })
        .collect())
}

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn snapshot(&self, user_id: i32) -> Result<CartSnapshot, DomainError> {
        let mut conn = self.pool.get()?;
        let items = load_cart_items(&mut conn, user_id)?;
        Ok(CartSnapshot::from_items(items))
    }

    fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(cart_lines::table)
            .values(&CartLineRow {
                user_id,
                product_id,
                quantity,
            })
            .on_conflict((cart_lines::user_id, cart_lines::product_id))
            .do_update()
            .set(cart_lines::quantity.eq(cart_lines::quantity + excluded(cart_lines::quantity)))
            .returning(cart_lines::quantity)
            .get_result::<i32>(&mut conn)
            .map_err(|e| {
                if super::is_foreign_key_violation(&e) {
                    DomainError::not_found(format!("Product {product_id}"))
                } else if super::is_check_violation(&e) {
                    DomainError::invalid(format!(
                        "a cart line may hold at most {MAX_LINE_QUANTITY} units"
                    ))
                } else {
                    e.into()
                }
            })
    }

    fn remove_one(&self, user_id: i32, product_id: i32) -> Result<CartRemoval, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let quantity = cart_lines::table
                .find((user_id, product_id))
                .select(cart_lines::quantity)
                .for_update()
                .first::<i32>(conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found(format!("Cart line for product {product_id}")))?;

            if quantity > 1 {
                diesel::update(cart_lines::table.find((user_id, product_id)))
                    .set(cart_lines::quantity.eq(cart_lines::quantity - 1))
                    .execute(conn)?;
                Ok(CartRemoval::Decremented {
                    remaining: quantity - 1,
                })
            } else {
                diesel::delete(cart_lines::table.find((user_id, product_id))).execute(conn)?;
                Ok(CartRemoval::Deleted)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DieselCartRepository;
    use crate::domain::cart::{CartRemoval, MAX_LINE_QUANTITY};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::CartRepository;
    use crate::infrastructure::test_support::{
        cart_quantity, insert_product, insert_user, put_in_cart, setup_db,
    };

    #[tokio::test]
    async fn add_creates_then_increments_line() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let user = insert_user(&pool, "cart@example.com");
        let product = insert_product(&pool, "USB-A to Micro-B", 499, 10);

        assert_eq!(repo.add(user, product, 2).expect("add failed"), 2);
        assert_eq!(repo.add(user, product, 3).expect("add failed"), 5);
        assert_eq!(cart_quantity(&pool, user, product), Some(5));
    }

    #[tokio::test]
    async fn add_beyond_line_limit_is_rejected_and_keeps_line() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let user = insert_user(&pool, "cart@example.com");
        let product = insert_product(&pool, "USB-C 0.5m", 399, 10);

        assert_eq!(
            repo.add(user, product, MAX_LINE_QUANTITY).expect("add failed"),
            MAX_LINE_QUANTITY
        );
        let err = repo.add(user, product, 1).expect_err("line is full");
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(cart_quantity(&pool, user, product), Some(MAX_LINE_QUANTITY));
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let user = insert_user(&pool, "cart@example.com");

        let err = repo.add(user, 9999, 1).expect_err("should fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_decrements_until_last_unit_then_deletes() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let user = insert_user(&pool, "cart@example.com");
        let product = insert_product(&pool, "USB-C to Lightning", 1999, 10);
        put_in_cart(&pool, user, product, 2);

        assert_eq!(
            repo.remove_one(user, product).expect("remove failed"),
            CartRemoval::Decremented { remaining: 1 }
        );
        assert_eq!(cart_quantity(&pool, user, product), Some(1));

        assert_eq!(
            repo.remove_one(user, product).expect("remove failed"),
            CartRemoval::Deleted
        );
        assert_eq!(cart_quantity(&pool, user, product), None);

        let err = repo.remove_one(user, product).expect_err("line is gone");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn snapshot_reports_stock_problems_and_total() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let user = insert_user(&pool, "cart@example.com");
        let plenty = insert_product(&pool, "USB-C 1m", 1000, 10);
        let scarce = insert_product(&pool, "USB-C 2m", 1500, 1);
        put_in_cart(&pool, user, plenty, 2);
        put_in_cart(&pool, user, scarce, 3);

        let snapshot = repo.snapshot(user).expect("snapshot failed");

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.total_price, 2 * 1000 + 3 * 1500);
        assert_eq!(snapshot.stock_problems.len(), 1);
        assert_eq!(snapshot.stock_problems[0].product_id, scarce);
        assert_eq!(snapshot.stock_problems[0].available, 1);
    }

    #[tokio::test]
    async fn carts_are_partitioned_by_user() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool.clone());
        let alice = insert_user(&pool, "alice@example.com");
        let bob = insert_user(&pool, "bob@example.com");
        let product = insert_product(&pool, "USB-C 1m", 1000, 10);
        put_in_cart(&pool, alice, product, 1);

        assert!(repo.snapshot(bob).expect("snapshot failed").is_empty());
        assert_eq!(repo.snapshot(alice).expect("snapshot failed").items.len(), 1);
    }
}
