use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::shortlink::ResolveShortLinkUseCase;

// ── GET /s/{token} ───────────────────────────────────────────────────────────

pub async fn resolve_short_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Redirect, ApiServiceError> {
    let uc = ResolveShortLinkUseCase {
        repo: state.recipe_repo(),
        codec: state.codec.clone(),
    };
    let recipe_id = uc.execute(&token).await?;
    Ok(Redirect::to(&format!("/recipes/{recipe_id}/")))
}
