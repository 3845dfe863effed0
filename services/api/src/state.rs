use sea_orm::DatabaseConnection;

use ladle_core::shortlink::ShortLinkCodec;

use crate::config::ApiConfig;
use crate::infra::db::{
    DbFavoriteRepository, DbIngredientRepository, DbRecipeRepository, DbShoppingCartRepository,
    DbSubscriptionRepository, DbTagRepository, DbUserRepository,
};
use crate::infra::images::FsImageStore;
use crate::infra::password::Argon2Password;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub codec: ShortLinkCodec,
    pub public_base_url: String,
    images: FsImageStore,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ApiConfig) -> Self {
        Self {
            db,
            codec: ShortLinkCodec::default_config(),
            public_base_url: config.public_base_url.clone(),
            images: FsImageStore::new(&config.media_root),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn favorite_repo(&self) -> DbFavoriteRepository {
        DbFavoriteRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbShoppingCartRepository {
        DbShoppingCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn subscription_repo(&self) -> DbSubscriptionRepository {
        DbSubscriptionRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> FsImageStore {
        self.images.clone()
    }

    pub fn password(&self) -> Argon2Password {
        Argon2Password
    }
}
