use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Recipe service domain error variants.
///
/// Conflicts on membership sets (duplicate favorite/cart/subscription)
/// and redundant removals are client errors and report as 400, not 409.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("recipe is already in favorites")]
    AlreadyFavorited,
    #[error("recipe is already in the shopping cart")]
    AlreadyInShoppingCart,
    #[error("already subscribed to this author")]
    AlreadySubscribed,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("recipe is not in favorites")]
    NotFavorited,
    #[error("recipe is not in the shopping cart")]
    NotInShoppingCart,
    #[error("not subscribed to this author")]
    NotSubscribed,
    #[error("email is already registered")]
    EmailTaken,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("current password is incorrect")]
    WrongPassword,
    #[error("invalid image payload")]
    InvalidImage,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyInShoppingCart => "ALREADY_IN_SHOPPING_CART",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::NotFavorited => "NOT_FAVORITED",
            Self::NotInShoppingCart => "NOT_IN_SHOPPING_CART",
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<sea_orm::DbErr> for ApiServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Internal(anyhow::Error::new(e))
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_)
            | Self::AlreadyFavorited
            | Self::AlreadyInShoppingCart
            | Self::AlreadySubscribed
            | Self::SelfSubscription
            | Self::NotFavorited
            | Self::NotInShoppingCart
            | Self::NotSubscribed
            | Self::EmailTaken
            | Self::UsernameTaken
            | Self::WrongPassword
            | Self::InvalidImage => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s get a log line. TraceLayer already records
        // method/uri/status for every request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
