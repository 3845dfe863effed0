use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use ladle_core::identity::{Identity, MaybeIdentity};
use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::{Recipe, RecipeDetails, RecipeFilter};
use crate::error::ApiServiceError;
use crate::handlers::{PageResponse, media_url};
use crate::handlers::tags::TagResponse;
use crate::handlers::users::UserResponse;
use crate::infra::images::parse_data_uri;
use crate::state::AppState;
use crate::usecase::membership::{
    AddFavoriteUseCase, AddToShoppingCartUseCase, RemoveFavoriteUseCase,
    RemoveFromShoppingCartUseCase,
};
use crate::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase,
    GetRecipesUseCase, UpdateRecipeInput, UpdateRecipeUseCase,
};
use crate::usecase::shopping_list::DownloadShoppingListUseCase;
use crate::usecase::shortlink::GetShortLinkUseCase;

// ── Response types ───────────────────────────────────────────────────────────

/// Compact recipe view used by the membership toggles and author
/// recipe lists.
#[derive(Serialize)]
pub struct ShortRecipeResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl ShortRecipeResponse {
    pub fn new(recipe: Recipe, base_url: &str) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: media_url(base_url, &recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize)]
pub struct IngredientAmountResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientAmountResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeResponse {
    pub fn new(details: RecipeDetails, base_url: &str) -> Self {
        Self {
            id: details.recipe.id,
            tags: details.tags.into_iter().map(TagResponse::from).collect(),
            // The author block carries no viewer-relative subscription
            // state in recipe payloads.
            author: UserResponse::new(details.author, false, base_url),
            ingredients: details
                .ingredients
                .into_iter()
                .map(|i| IngredientAmountResponse {
                    id: i.id,
                    name: i.name,
                    measurement_unit: i.measurement_unit,
                    amount: i.amount,
                })
                .collect(),
            is_favorited: details.is_favorited,
            is_in_shopping_cart: details.is_in_shopping_cart,
            name: details.recipe.name,
            image: media_url(base_url, &details.recipe.image),
            text: details.recipe.text,
            cooking_time: details.recipe.cooking_time,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientRef {
    pub id: i64,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub ingredients: Vec<IngredientRef>,
    pub tags: Vec<i64>,
}

#[derive(Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientRef>,
    pub tags: Vec<i64>,
}

// ── List query ───────────────────────────────────────────────────────────────

/// Parsed `GET /recipes` query. `tags` repeats (`?tags=a&tags=b`), so
/// this is decoded by hand instead of through serde_qs.
#[derive(Debug, Default, PartialEq)]
pub struct RecipeListQuery {
    pub page: PageRequest,
    pub filter: RecipeFilter,
}

pub fn parse_recipe_query(raw: Option<&str>) -> RecipeListQuery {
    let mut query = RecipeListQuery::default();
    let Some(raw) = raw else {
        return query;
    };
    for pair in raw.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "page" => {
                if let Ok(page) = value.parse() {
                    query.page.page = page;
                }
            }
            "limit" => {
                if let Ok(limit) = value.parse() {
                    query.page.limit = limit;
                }
            }
            "tags" if !value.is_empty() => query.filter.tag_slugs.push(value.to_owned()),
            "author" => query.filter.author_id = value.parse().ok(),
            "is_favorited" => query.filter.is_favorited = matches!(value, "1" | "true"),
            "is_in_shopping_cart" => {
                query.filter.is_in_shopping_cart = matches!(value, "1" | "true");
            }
            _ => {}
        }
    }
    query.page = query.page.clamped();
    query
}

/// Non-paging query params, re-encoded for the envelope links.
fn filter_query(filter: &RecipeFilter) -> String {
    let mut extra = String::new();
    for slug in &filter.tag_slugs {
        extra.push_str(&format!("&tags={slug}"));
    }
    if let Some(author_id) = filter.author_id {
        extra.push_str(&format!("&author={author_id}"));
    }
    if filter.is_favorited {
        extra.push_str("&is_favorited=1");
    }
    if filter.is_in_shopping_cart {
        extra.push_str("&is_in_shopping_cart=1");
    }
    extra
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

pub async fn get_recipes(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<PageResponse<RecipeResponse>>, ApiServiceError> {
    let RecipeListQuery { page, filter } = parse_recipe_query(raw_query.as_deref());
    let uc = GetRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let recipes = uc.execute(&filter, identity.user_id(), page).await?;
    let base = state.public_base_url.as_str();
    let data = Paginated {
        count: recipes.count,
        items: recipes
            .items
            .into_iter()
            .map(|d| RecipeResponse::new(d, base))
            .collect(),
    };
    Ok(Json(PageResponse::new(
        base,
        "/recipes",
        &filter_query(&filter),
        page,
        data,
    )))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiServiceError> {
    let uc = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let details = uc.execute(recipe_id, identity.user_id()).await?;
    Ok(Json(RecipeResponse::new(
        details,
        state.public_base_url.as_str(),
    )))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiServiceError> {
    let image = parse_data_uri(&body.image)?;
    let uc = CreateRecipeUseCase {
        repo: state.recipe_repo(),
        images: state.image_store(),
    };
    let details = uc
        .execute(
            identity.user_id,
            CreateRecipeInput {
                name: body.name,
                text: body.text,
                cooking_time: body.cooking_time,
                image,
                ingredients: body.ingredients.iter().map(|i| (i.id, i.amount)).collect(),
                tags: body.tags,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::new(
            details,
            state.public_base_url.as_str(),
        )),
    ))
}

// ── PUT/PATCH /recipes/{id} ──────────────────────────────────────────────────

pub async fn update_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiServiceError> {
    let image = body.image.as_deref().map(parse_data_uri).transpose()?;
    let uc = UpdateRecipeUseCase {
        repo: state.recipe_repo(),
        images: state.image_store(),
    };
    let details = uc
        .execute(
            identity.user_id,
            identity.is_admin(),
            recipe_id,
            UpdateRecipeInput {
                name: body.name,
                text: body.text,
                cooking_time: body.cooking_time,
                image,
                ingredients: body.ingredients.iter().map(|i| (i.id, i.amount)).collect(),
                tags: body.tags,
            },
        )
        .await?;
    Ok(Json(RecipeResponse::new(
        details,
        state.public_base_url.as_str(),
    )))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
        images: state.image_store(),
    };
    uc.execute(identity.user_id, identity.is_admin(), recipe_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST/DELETE /recipes/{id}/favorite ───────────────────────────────────────

pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiServiceError> {
    let uc = AddFavoriteUseCase {
        memberships: state.favorite_repo(),
        recipes: state.recipe_repo(),
    };
    let recipe = uc.execute(identity.user_id, recipe_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeResponse::new(
            recipe,
            state.public_base_url.as_str(),
        )),
    ))
}

pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = RemoveFavoriteUseCase {
        memberships: state.favorite_repo(),
        recipes: state.recipe_repo(),
    };
    uc.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST/DELETE /recipes/{id}/shopping_cart ──────────────────────────────────

pub async fn add_to_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiServiceError> {
    let uc = AddToShoppingCartUseCase {
        memberships: state.cart_repo(),
        recipes: state.recipe_repo(),
    };
    let recipe = uc.execute(identity.user_id, recipe_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeResponse::new(
            recipe,
            state.public_base_url.as_str(),
        )),
    ))
}

pub async fn remove_from_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = RemoveFromShoppingCartUseCase {
        memberships: state.cart_repo(),
        recipes: state.recipe_repo(),
    };
    uc.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Response, ApiServiceError> {
    let uc = DownloadShoppingListUseCase {
        source: state.cart_repo(),
    };
    let text = uc.execute(identity.user_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_cart.txt\"",
            ),
        ],
        text,
    )
        .into_response())
}

// ── GET /recipes/{id}/get-link ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

pub async fn get_short_link(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<ShortLinkResponse>, ApiServiceError> {
    let uc = GetShortLinkUseCase {
        repo: state.recipe_repo(),
        codec: state.codec.clone(),
        public_base_url: state.public_base_url.clone(),
    };
    let short_link = uc.execute(recipe_id).await?;
    Ok(Json(ShortLinkResponse { short_link }))
}
