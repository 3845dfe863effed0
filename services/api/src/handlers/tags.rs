use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::domain::types::Tag;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::catalog::{GetTagUseCase, GetTagsUseCase};

#[derive(Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn get_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, ApiServiceError> {
    let uc = GetTagsUseCase {
        repo: state.tag_repo(),
    };
    let tags = uc.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
) -> Result<Json<TagResponse>, ApiServiceError> {
    let uc = GetTagUseCase {
        repo: state.tag_repo(),
    };
    let tag = uc.execute(tag_id).await?;
    Ok(Json(tag.into()))
}
