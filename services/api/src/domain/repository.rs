#![allow(async_fn_in_trait)]

use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::{
    Ingredient, NewUser, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, ShoppingListItem, Tag,
    User,
};
use crate::error::ApiServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiServiceError>;
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>, ApiServiceError>;
    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<(), ApiServiceError>;
    /// Replace the avatar path; `None` clears it.
    async fn set_avatar(&self, id: i64, path: Option<&str>) -> Result<(), ApiServiceError>;
}

/// Repository for tag reference data (read-only here, admin-managed).
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, ApiServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, ApiServiceError>;
}

/// Repository for ingredient reference data (read-only here).
pub trait IngredientRepository: Send + Sync {
    /// List ingredients, optionally filtered by case-insensitive name prefix.
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Ingredient>, ApiServiceError>;
}

/// Repository for the recipe aggregate (scalar row + tag links +
/// ingredient join rows).
pub trait RecipeRepository: Send + Sync {
    /// Create the recipe and its join rows in one transaction.
    /// Returns the new recipe id.
    async fn create(&self, author_id: i64, draft: &RecipeDraft) -> Result<i64, ApiServiceError>;

    /// Replace scalar fields, the tag set and the ingredient join rows
    /// (clear-then-reinsert) in one transaction.
    async fn update(&self, recipe_id: i64, draft: &RecipeDraft) -> Result<(), ApiServiceError>;

    /// Delete a recipe. Join rows cascade. Returns `true` if a row was deleted.
    async fn delete(&self, recipe_id: i64) -> Result<bool, ApiServiceError>;

    async fn find_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>, ApiServiceError>;

    /// Fully joined view with viewer-relative membership flags.
    async fn details(
        &self,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> Result<Option<RecipeDetails>, ApiServiceError>;

    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Paginated<RecipeDetails>, ApiServiceError>;

    /// An author's recipes, newest first, optionally capped.
    async fn list_by_author(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError>;

    async fn count_by_author(&self, author_id: i64) -> Result<u64, ApiServiceError>;
}

/// Membership set over (user, recipe) pairs — favorites and shopping
/// carts share this contract.
pub trait MembershipRepository: Send + Sync {
    /// Insert a row. Returns `false` when the pair already exists
    /// (including a lost race resolved by the uniqueness constraint).
    async fn add(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError>;

    /// Delete a row. Returns `true` if a row was deleted.
    async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError>;

    async fn contains(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError>;
}

/// Aggregation source for the shopping-list export.
pub trait ShoppingListSource: Send + Sync {
    /// Sum ingredient amounts over every recipe in the user's cart,
    /// grouped by (name, unit), ordered by name ascending.
    async fn aggregate(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, ApiServiceError>;
}

/// Repository for the user ↔ author follow graph.
pub trait SubscriptionRepository: Send + Sync {
    /// Insert an edge. Returns `false` when it already exists.
    async fn follow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError>;

    /// Delete an edge. Returns `true` if a row was deleted.
    async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError>;

    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError>;

    /// Authors the user follows, ordered by username.
    async fn list_authors(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Paginated<User>, ApiServiceError>;
}

/// Port for storing uploaded images on the media backend.
pub trait ImageStore: Send + Sync {
    /// Persist `data` under `dir` with the given extension; returns the
    /// media-relative path.
    async fn store(&self, dir: &str, ext: &str, data: &[u8]) -> Result<String, ApiServiceError>;

    /// Best-effort removal of a previously stored file.
    async fn remove(&self, path: &str) -> Result<(), ApiServiceError>;
}

/// Port for password hashing and verification.
pub trait PasswordPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, ApiServiceError>;
    fn verify(&self, password: &str, password_hash: &str) -> bool;
}
