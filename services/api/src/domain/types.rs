use chrono::{DateTime, Utc};

use crate::error::ApiServiceError;

/// Registered user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registration payload with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Recipe tag reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Ingredient reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Recipe scalar fields as stored.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// An ingredient line of a recipe, joined with its reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Fully joined recipe view: scalar fields plus tags, ingredient lines,
/// author profile and the viewer-relative membership flags.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Write payload for the recipe aggregate: scalar fields plus the exact
/// tag set and (ingredient, amount) pairs to end up with.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub ingredients: Vec<(i64, i32)>,
    pub tags: Vec<i64>,
}

/// Decoded inline image upload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub ext: &'static str,
    pub data: Vec<u8>,
}

/// Recipe list filter; the membership flags only apply for
/// authenticated viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_slugs: Vec<String>,
    pub author_id: Option<i64>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// One aggregated shopping-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// A followed author together with their (possibly capped) recipes and
/// total recipe count.
#[derive(Debug, Clone)]
pub struct AuthorWithRecipes {
    pub author: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: u64,
}

/// Validate a username: 1-150 chars of ASCII alphanumerics or `@ . + - _`.
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.len() > 150 {
        return false;
    }
    if username == "me" {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Validate a tag slug: 1-32 chars of ASCII alphanumerics, hyphen or underscore.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 32 {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl RecipeDraft {
    /// Request-level validation of the recipe aggregate: non-empty
    /// pairwise-distinct ingredient and tag lists, amounts ≥ 1,
    /// cooking time ≥ 1, non-empty scalar fields.
    pub fn validate(&self) -> Result<(), ApiServiceError> {
        if self.name.trim().is_empty() {
            return Err(ApiServiceError::Validation(
                "name: this field is required".into(),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(ApiServiceError::Validation(
                "text: this field is required".into(),
            ));
        }
        if self.cooking_time < 1 {
            return Err(ApiServiceError::Validation(
                "cooking_time: must be at least 1".into(),
            ));
        }
        if self.ingredients.is_empty() {
            return Err(ApiServiceError::Validation(
                "ingredients: at least one ingredient is required".into(),
            ));
        }
        if self.tags.is_empty() {
            return Err(ApiServiceError::Validation(
                "tags: at least one tag is required".into(),
            ));
        }
        let mut seen_ingredients = std::collections::HashSet::new();
        for &(ingredient_id, amount) in &self.ingredients {
            if amount < 1 {
                return Err(ApiServiceError::Validation(
                    "ingredients: amounts must be at least 1".into(),
                ));
            }
            if !seen_ingredients.insert(ingredient_id) {
                return Err(ApiServiceError::Validation(
                    "ingredients: must not repeat".into(),
                ));
            }
        }
        let mut seen_tags = std::collections::HashSet::new();
        for &tag_id in &self.tags {
            if !seen_tags.insert(tag_id) {
                return Err(ApiServiceError::Validation("tags: must not repeat".into()));
            }
        }
        Ok(())
    }
}
