use crate::application::{CartService, CatalogService, OrderService, UserService};
use crate::db::DbPool;
use crate::infrastructure::{
    DieselCartRepository, DieselOrderRepository, DieselProductRepository, DieselReviewRepository,
    DieselUserRepository,
};

pub type Catalog = CatalogService<DieselProductRepository, DieselReviewRepository>;
pub type Carts = CartService<DieselCartRepository>;
pub type Orders = OrderService<DieselCartRepository, DieselOrderRepository>;
pub type Users = UserService<DieselUserRepository>;

/// Services shared by every worker, wired to the Diesel repositories.
pub struct AppState {
    pub catalog: Catalog,
    pub carts: Carts,
    pub orders: Orders,
    pub users: Users,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            catalog: CatalogService::new(
                DieselProductRepository::new(pool.clone()),
                DieselReviewRepository::new(pool.clone()),
            ),
            carts: CartService::new(DieselCartRepository::new(pool.clone())),
            orders: OrderService::new(
                DieselCartRepository::new(pool.clone()),
                DieselOrderRepository::new(pool.clone()),
            ),
            users: UserService::new(DieselUserRepository::new(pool)),
        }
    }
}
