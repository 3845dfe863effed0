use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use ladle_core::health::{healthz, readyz};
use ladle_core::middleware::request_id_layer;

use crate::handlers::{
    ingredients::{get_ingredient, get_ingredients},
    recipes::{
        add_favorite, add_to_shopping_cart, create_recipe, delete_recipe,
        download_shopping_cart, get_recipe, get_recipes, get_short_link, remove_favorite,
        remove_from_shopping_cart, update_recipe,
    },
    shortlink::resolve_short_link,
    subscriptions::{get_subscriptions, subscribe, unsubscribe},
    tags::{get_tag, get_tags},
    users::{
        delete_avatar, get_avatar, get_me, get_user, get_users, register_user, set_avatar,
        set_password,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Tags, ingredients
        .route("/tags", get(get_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(get_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(get_recipes))
        .route("/recipes", post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}", put(update_recipe))
        .route("/recipes/{id}", patch(update_recipe))
        .route("/recipes/{id}", delete(delete_recipe))
        .route("/recipes/{id}/favorite", post(add_favorite))
        .route("/recipes/{id}/favorite", delete(remove_favorite))
        .route("/recipes/{id}/shopping_cart", post(add_to_shopping_cart))
        .route(
            "/recipes/{id}/shopping_cart",
            delete(remove_from_shopping_cart),
        )
        .route("/recipes/{id}/get-link", get(get_short_link))
        // Short links
        .route("/s/{token}", get(resolve_short_link))
        .route("/s/{token}/", get(resolve_short_link))
        // Users
        .route("/users", post(register_user))
        .route("/users", get(get_users))
        .route("/users/me", get(get_me))
        .route("/users/me/avatar", get(get_avatar))
        .route("/users/me/avatar", put(set_avatar))
        .route("/users/me/avatar", delete(delete_avatar))
        .route("/users/set_password", post(set_password))
        .route("/users/subscriptions", get(get_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe))
        .route("/users/{id}/subscribe", delete(unsubscribe))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
