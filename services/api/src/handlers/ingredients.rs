use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::Ingredient;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::catalog::{GetIngredientUseCase, GetIngredientsUseCase};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct IngredientListQuery {
    pub name: Option<String>,
}

// ── GET /ingredients ─────────────────────────────────────────────────────────

pub async fn get_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientResponse>>, ApiServiceError> {
    let uc = GetIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredients = uc.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

// ── GET /ingredients/{id} ────────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i64>,
) -> Result<Json<IngredientResponse>, ApiServiceError> {
    let uc = GetIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = uc.execute(ingredient_id).await?;
    Ok(Json(ingredient.into()))
}
