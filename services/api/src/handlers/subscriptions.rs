use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use ladle_core::identity::Identity;
use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::AuthorWithRecipes;
use crate::error::ApiServiceError;
use crate::handlers::PageResponse;
use crate::handlers::recipes::ShortRecipeResponse;
use crate::handlers::users::UserResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    FollowAuthorUseCase, GetSubscriptionsUseCase, UnfollowAuthorUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    fn new(entry: AuthorWithRecipes, base_url: &str) -> Self {
        Self {
            // The caller follows this author by construction.
            author: UserResponse::new(entry.author, true, base_url),
            recipes: entry
                .recipes
                .into_iter()
                .map(|r| ShortRecipeResponse::new(r, base_url))
                .collect(),
            recipes_count: entry.recipes_count,
        }
    }
}

#[derive(Deserialize, Default)]
struct SubscriptionQuery {
    recipes_limit: Option<u64>,
    #[serde(flatten)]
    page: PageRequest,
}

fn parse_query(raw: Option<&str>) -> Result<SubscriptionQuery, ApiServiceError> {
    raw.map(serde_qs::from_str)
        .transpose()
        .map_err(|e| ApiServiceError::Validation(format!("query: {e}")))
        .map(Option::unwrap_or_default)
}

// ── POST /users/{id}/subscribe ───────────────────────────────────────────────

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
    RawQuery(raw_query): RawQuery,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiServiceError> {
    let query = parse_query(raw_query.as_deref())?;
    let uc = FollowAuthorUseCase {
        subscriptions: state.subscription_repo(),
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    };
    let entry = uc
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(
            entry,
            state.public_base_url.as_str(),
        )),
    ))
}

// ── DELETE /users/{id}/subscribe ─────────────────────────────────────────────

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = UnfollowAuthorUseCase {
        subscriptions: state.subscription_repo(),
        users: state.user_repo(),
    };
    uc.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/subscriptions ─────────────────────────────────────────────────

pub async fn get_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<PageResponse<SubscriptionResponse>>, ApiServiceError> {
    let query = parse_query(raw_query.as_deref())?;
    let page = query.page.clamped();
    let uc = GetSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let entries = uc
        .execute(identity.user_id, query.recipes_limit, page)
        .await?;
    let base = state.public_base_url.as_str();
    let extra = query
        .recipes_limit
        .map(|l| format!("&recipes_limit={l}"))
        .unwrap_or_default();
    let data = Paginated {
        count: entries.count,
        items: entries
            .items
            .into_iter()
            .map(|e| SubscriptionResponse::new(e, base))
            .collect(),
    };
    Ok(Json(PageResponse::new(
        base,
        "/users/subscriptions",
        &extra,
        page,
        data,
    )))
}
