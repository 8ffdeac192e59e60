use crate::application::{AdminService, AuthService, CartService, CatalogueService, OrderService};
use crate::auth::{PasswordHasher, TokenService};
use crate::config::Settings;
use crate::db::DbPool;
use crate::infrastructure::{
    DieselCartRepository, DieselCatalogueRepository, DieselOrderRepository, DieselStatsRepository,
    DieselUserRepository,
};
use crate::uploads::UploadStore;

/// Services shared by every worker, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub auth: AuthService<DieselUserRepository>,
    pub catalogue: CatalogueService<DieselCatalogueRepository>,
    pub carts: CartService<DieselCartRepository>,
    pub orders: OrderService<DieselOrderRepository>,
    pub admin: AdminService<DieselUserRepository, DieselStatsRepository>,
    pub tokens: TokenService,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(pool: DbPool, settings: &Settings) -> Self {
        let tokens = TokenService::new(&settings.jwt_secret, settings.access_token_minutes);

        Self {
            auth: AuthService::new(
                DieselUserRepository::new(pool.clone()),
                PasswordHasher::new(settings.bcrypt_cost),
                tokens.clone(),
            ),
            catalogue: CatalogueService::new(DieselCatalogueRepository::new(pool.clone())),
            carts: CartService::new(DieselCartRepository::new(pool.clone())),
            orders: OrderService::new(DieselOrderRepository::new(pool.clone())),
            admin: AdminService::new(
                DieselUserRepository::new(pool.clone()),
                DieselStatsRepository::new(pool),
            ),
            tokens,
            uploads: UploadStore::new(&settings.upload_dir, settings.max_upload_bytes),
        }
    }
}
