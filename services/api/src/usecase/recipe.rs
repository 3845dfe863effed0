use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{ImageStore, RecipeRepository};
use crate::domain::types::{ImagePayload, RecipeDetails, RecipeDraft, RecipeFilter};
use crate::error::ApiServiceError;

const RECIPE_IMAGE_DIR: &str = "recipes/images";

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeInput {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: ImagePayload,
    pub ingredients: Vec<(i64, i32)>,
    pub tags: Vec<i64>,
}

pub struct CreateRecipeUseCase<R: RecipeRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: RecipeRepository, I: ImageStore> CreateRecipeUseCase<R, I> {
    pub async fn execute(
        &self,
        author_id: i64,
        input: CreateRecipeInput,
    ) -> Result<RecipeDetails, ApiServiceError> {
        let mut draft = RecipeDraft {
            name: input.name,
            text: input.text,
            image: String::new(),
            cooking_time: input.cooking_time,
            ingredients: input.ingredients,
            tags: input.tags,
        };
        // Validate before touching the media store so rejected requests
        // leave no orphan files behind.
        draft.validate()?;
        draft.image = self
            .images
            .store(RECIPE_IMAGE_DIR, input.image.ext, &input.image.data)
            .await?;

        let recipe_id = self.repo.create(author_id, &draft).await?;
        self.repo
            .details(recipe_id, Some(author_id))
            .await?
            .ok_or_else(|| {
                ApiServiceError::Internal(anyhow::anyhow!("created recipe vanished"))
            })
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeInput {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// `None` keeps the stored image.
    pub image: Option<ImagePayload>,
    pub ingredients: Vec<(i64, i32)>,
    pub tags: Vec<i64>,
}

pub struct UpdateRecipeUseCase<R: RecipeRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: RecipeRepository, I: ImageStore> UpdateRecipeUseCase<R, I> {
    pub async fn execute(
        &self,
        actor_id: i64,
        is_admin: bool,
        recipe_id: i64,
        input: UpdateRecipeInput,
    ) -> Result<RecipeDetails, ApiServiceError> {
        let existing = self
            .repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        if existing.author_id != actor_id && !is_admin {
            return Err(ApiServiceError::Forbidden);
        }

        let mut draft = RecipeDraft {
            name: input.name,
            text: input.text,
            image: existing.image.clone(),
            cooking_time: input.cooking_time,
            ingredients: input.ingredients,
            tags: input.tags,
        };
        draft.validate()?;
        if let Some(image) = input.image {
            draft.image = self
                .images
                .store(RECIPE_IMAGE_DIR, image.ext, &image.data)
                .await?;
            self.images.remove(&existing.image).await?;
        }

        self.repo.update(recipe_id, &draft).await?;
        self.repo
            .details(recipe_id, Some(actor_id))
            .await?
            .ok_or_else(|| {
                ApiServiceError::Internal(anyhow::anyhow!("updated recipe vanished"))
            })
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: RecipeRepository, I: ImageStore> DeleteRecipeUseCase<R, I> {
    pub async fn execute(
        &self,
        actor_id: i64,
        is_admin: bool,
        recipe_id: i64,
    ) -> Result<(), ApiServiceError> {
        let existing = self
            .repo
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)?;
        if existing.author_id != actor_id && !is_admin {
            return Err(ApiServiceError::Forbidden);
        }
        let deleted = self.repo.delete(recipe_id).await?;
        if !deleted {
            return Err(ApiServiceError::RecipeNotFound);
        }
        self.images.remove(&existing.image).await?;
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(
        &self,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> Result<RecipeDetails, ApiServiceError> {
        self.repo
            .details(recipe_id, viewer)
            .await?
            .ok_or(ApiServiceError::RecipeNotFound)
    }
}

// ── GetRecipes ───────────────────────────────────────────────────────────────

pub struct GetRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipesUseCase<R> {
    pub async fn execute(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Paginated<RecipeDetails>, ApiServiceError> {
        self.repo.list(filter, viewer, page).await
    }
}
