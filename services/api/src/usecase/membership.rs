use crate::domain::repository::{MembershipRepository, RecipeRepository};
use crate::domain::types::Recipe;
use crate::error::ApiServiceError;

// ── AddFavorite ──────────────────────────────────────────────────────────────

pub struct AddFavoriteUseCase<M: MembershipRepository, R: RecipeRepository> {
    pub memberships: M,
    pub recipes: R,
}

impl<M: MembershipRepository, R: RecipeRepository> AddFavoriteUseCase<M, R> {
    pub async fn execute(&self, user_id: i64, recipe_id: i64) -> Result<Recipe, ApiServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        let added = self.memberships.add(user_id, recipe_id).await?;
        if !added {
            return Err(ApiServiceError::AlreadyFavorited);
        }
        Ok(recipe)
    }
}

// ── RemoveFavorite ───────────────────────────────────────────────────────────

pub struct RemoveFavoriteUseCase<M: MembershipRepository, R: RecipeRepository> {
    pub memberships: M,
    pub recipes: R,
}

impl<M: MembershipRepository, R: RecipeRepository> RemoveFavoriteUseCase<M, R> {
    pub async fn execute(&self, user_id: i64, recipe_id: i64) -> Result<(), ApiServiceError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(ApiServiceError::RecipeNotFound);
        }
        let removed = self.memberships.remove(user_id, recipe_id).await?;
        if !removed {
            return Err(ApiServiceError::NotFavorited);
        }
        Ok(())
    }
}

// ── AddToShoppingCart ────────────────────────────────────────────────────────

pub struct AddToShoppingCartUseCase<M: MembershipRepository, R: RecipeRepository> {
    pub memberships: M,
    pub recipes: R,
}

impl<M: MembershipRepository, R: RecipeRepository> AddToShoppingCartUseCase<M, R> {
    pub async fn execute(&self, user_id: i64, recipe_id: i64) -> Result<Recipe, ApiServiceError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        let added = self.memberships.add(user_id, recipe_id).await?;
        if !added {
            return Err(ApiServiceError::AlreadyInShoppingCart);
        }
        Ok(recipe)
    }
}

// ── RemoveFromShoppingCart ───────────────────────────────────────────────────

pub struct RemoveFromShoppingCartUseCase<M: MembershipRepository, R: RecipeRepository> {
    pub memberships: M,
    pub recipes: R,
}

impl<M: MembershipRepository, R: RecipeRepository> RemoveFromShoppingCartUseCase<M, R> {
    pub async fn execute(&self, user_id: i64, recipe_id: i64) -> Result<(), ApiServiceError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(ApiServiceError::RecipeNotFound);
        }
        let removed = self.memberships.remove(user_id, recipe_id).await?;
        if !removed {
            return Err(ApiServiceError::NotInShoppingCart);
        }
        Ok(())
    }
}
