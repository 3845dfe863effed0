use crate::domain::repository::{IngredientRepository, TagRepository};
use crate::domain::types::{Ingredient, Tag};
use crate::error::ApiServiceError;

// ── GetTags ──────────────────────────────────────────────────────────────────

pub struct GetTagsUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> GetTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiServiceError> {
        self.repo.list().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> GetTagUseCase<R> {
    pub async fn execute(&self, tag_id: i64) -> Result<Tag, ApiServiceError> {
        self.repo
            .find_by_id(tag_id)
            .await?
            .ok_or(ApiServiceError::TagNotFound)
    }
}

// ── GetIngredients ───────────────────────────────────────────────────────────

pub struct GetIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientsUseCase<R> {
    pub async fn execute(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, ApiServiceError> {
        self.repo.list(name_prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, ingredient_id: i64) -> Result<Ingredient, ApiServiceError> {
        self.repo
            .find_by_id(ingredient_id)
            .await?
            .ok_or(ApiServiceError::IngredientNotFound)
    }
}
