pub mod admin;
pub mod cart;
pub mod checkout;
pub mod identity;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub const MAX_PAGE_SIZE: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// Clamps query pagination to page >= 1 and 1 <= limit <= [`MAX_PAGE_SIZE`].
fn normalize_page(page: i64, limit: i64) -> (i64, i64) {
    (page.max(1), limit.clamp(1, MAX_PAGE_SIZE))
}
