use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use ladle_core::identity::{Identity, MaybeIdentity};
use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::User;
use crate::error::ApiServiceError;
use crate::handlers::{PageResponse, media_url};
use crate::infra::images::parse_data_uri;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteAvatarUseCase, GetUserProfileUseCase, GetUsersUseCase, RegisterUserInput,
    RegisterUserUseCase, SetAvatarUseCase, SetPasswordUseCase, UserProfile,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool, base_url: &str) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar.as_deref().map(|p| media_url(base_url, p)),
        }
    }
}

impl From<(UserProfile, &str)> for UserResponse {
    fn from((profile, base_url): (UserProfile, &str)) -> Self {
        Self::new(profile.user, profile.is_subscribed, base_url)
    }
}

#[derive(Serialize)]
pub struct RegisteredUserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUserResponse>), ApiServiceError> {
    let uc = RegisterUserUseCase {
        repo: state.user_repo(),
        password: state.password(),
    };
    let user = uc
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn get_users(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<UserResponse>>, ApiServiceError> {
    let page = page.clamped();
    let uc = GetUsersUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let profiles = uc.execute(identity.user_id(), page).await?;
    let base = state.public_base_url.as_str();
    let data = Paginated {
        count: profiles.count,
        items: profiles
            .items
            .into_iter()
            .map(|p| UserResponse::from((p, base)))
            .collect(),
    };
    Ok(Json(PageResponse::new(base, "/users", "", page, data)))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let uc = GetUserProfileUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let profile = uc.execute(identity.user_id, Some(identity.user_id)).await?;
    Ok(Json(UserResponse::from((
        profile,
        state.public_base_url.as_str(),
    ))))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let uc = GetUserProfileUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let profile = uc.execute(user_id, identity.user_id()).await?;
    Ok(Json(UserResponse::from((
        profile,
        state.public_base_url.as_str(),
    ))))
}

// ── POST /users/set_password ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub new_password: String,
    pub current_password: String,
}

pub async fn set_password(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SetPasswordRequest>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = SetPasswordUseCase {
        repo: state.user_repo(),
        password: state.password(),
    };
    uc.execute(identity.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET/PUT/DELETE /users/me/avatar ──────────────────────────────────────────

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

pub async fn get_avatar(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<AvatarResponse>, ApiServiceError> {
    let uc = GetUserProfileUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let profile = uc.execute(identity.user_id, None).await?;
    Ok(Json(AvatarResponse {
        avatar: profile
            .user
            .avatar
            .as_deref()
            .map(|p| media_url(&state.public_base_url, p)),
    }))
}

#[derive(Deserialize)]
pub struct SetAvatarRequest {
    pub avatar: String,
}

pub async fn set_avatar(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SetAvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiServiceError> {
    let image = parse_data_uri(&body.avatar)?;
    let uc = SetAvatarUseCase {
        repo: state.user_repo(),
        images: state.image_store(),
    };
    let path = uc.execute(identity.user_id, image).await?;
    Ok(Json(AvatarResponse {
        avatar: Some(media_url(&state.public_base_url, &path)),
    }))
}

pub async fn delete_avatar(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiServiceError> {
    let uc = DeleteAvatarUseCase {
        repo: state.user_repo(),
        images: state.image_store(),
    };
    uc.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
