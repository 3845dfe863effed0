use ladle_core::shortlink::ShortLinkCodec;

use crate::domain::repository::RecipeRepository;
use crate::error::ApiServiceError;

// ── GetShortLink ─────────────────────────────────────────────────────────────

pub struct GetShortLinkUseCase<R: RecipeRepository> {
    pub repo: R,
    pub codec: ShortLinkCodec,
    pub public_base_url: String,
}

impl<R: RecipeRepository> GetShortLinkUseCase<R> {
    pub async fn execute(&self, recipe_id: i64) -> Result<String, ApiServiceError> {
        if self.repo.find_by_id(recipe_id).await?.is_none() {
            return Err(ApiServiceError::RecipeNotFound);
        }
        // Ids are positive (bigserial); a negative id cannot come from the db.
        let id = u64::try_from(recipe_id).map_err(|_| ApiServiceError::RecipeNotFound)?;
        let token = self.codec.encode(id);
        Ok(format!("{}/s/{token}/", self.public_base_url))
    }
}

// ── ResolveShortLink ─────────────────────────────────────────────────────────

pub struct ResolveShortLinkUseCase<R: RecipeRepository> {
    pub repo: R,
    pub codec: ShortLinkCodec,
}

impl<R: RecipeRepository> ResolveShortLinkUseCase<R> {
    pub async fn execute(&self, token: &str) -> Result<i64, ApiServiceError> {
        let id = self
            .codec
            .decode(token)
            .and_then(|id| i64::try_from(id).ok())
            .ok_or(ApiServiceError::RecipeNotFound)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ApiServiceError::RecipeNotFound);
        }
        Ok(id)
    }
}
