use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{ImageStore, PasswordPort, SubscriptionRepository, UserRepository};
use crate::domain::types::{ImagePayload, NewUser, User, validate_username};
use crate::error::ApiServiceError;

const AVATAR_DIR: &str = "users/avatars";

fn validate_password(password: &str) -> Result<(), ApiServiceError> {
    if password.len() < 8 {
        return Err(ApiServiceError::Validation(
            "password: must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiServiceError> {
    let well_formed = email.len() <= 254
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(ApiServiceError::Validation(
            "email: enter a valid email address".into(),
        ));
    }
    Ok(())
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub struct RegisterUserUseCase<U: UserRepository, P: PasswordPort> {
    pub repo: U,
    pub password: P,
}

impl<U: UserRepository, P: PasswordPort> RegisterUserUseCase<U, P> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiServiceError> {
        validate_email(&input.email)?;
        if !validate_username(&input.username) {
            return Err(ApiServiceError::Validation(
                "username: 1-150 letters, digits or @.+-_ and not a reserved word".into(),
            ));
        }
        if input.first_name.trim().is_empty() || input.first_name.len() > 150 {
            return Err(ApiServiceError::Validation(
                "first_name: this field is required".into(),
            ));
        }
        if input.last_name.trim().is_empty() || input.last_name.len() > 150 {
            return Err(ApiServiceError::Validation(
                "last_name: this field is required".into(),
            ));
        }
        validate_password(&input.password)?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ApiServiceError::EmailTaken);
        }
        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(ApiServiceError::UsernameTaken);
        }

        let password_hash = self.password.hash(&input.password)?;
        self.repo
            .create(&NewUser {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password_hash,
            })
            .await
    }
}

// ── GetUserProfile ───────────────────────────────────────────────────────────

pub struct UserProfile {
    pub user: User,
    pub is_subscribed: bool,
}

pub struct GetUserProfileUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> GetUserProfileUseCase<U, S> {
    pub async fn execute(
        &self,
        user_id: i64,
        viewer: Option<i64>,
    ) -> Result<UserProfile, ApiServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let is_subscribed = match viewer {
            Some(viewer_id) if viewer_id != user_id => {
                self.subscriptions.is_following(viewer_id, user_id).await?
            }
            _ => false,
        };
        Ok(UserProfile {
            user,
            is_subscribed,
        })
    }
}

// ── GetUsers ─────────────────────────────────────────────────────────────────

pub struct GetUsersUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> GetUsersUseCase<U, S> {
    pub async fn execute(
        &self,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Paginated<UserProfile>, ApiServiceError> {
        let users = self.users.list(page).await?;
        let mut items = Vec::with_capacity(users.items.len());
        for user in users.items {
            let is_subscribed = match viewer {
                Some(viewer_id) if viewer_id != user.id => {
                    self.subscriptions.is_following(viewer_id, user.id).await?
                }
                _ => false,
            };
            items.push(UserProfile {
                user,
                is_subscribed,
            });
        }
        Ok(Paginated {
            count: users.count,
            items,
        })
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordUseCase<U: UserRepository, P: PasswordPort> {
    pub repo: U,
    pub password: P,
}

impl<U: UserRepository, P: PasswordPort> SetPasswordUseCase<U, P> {
    pub async fn execute(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiServiceError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        if !self.password.verify(current_password, &user.password_hash) {
            return Err(ApiServiceError::WrongPassword);
        }
        validate_password(new_password)?;
        let hash = self.password.hash(new_password)?;
        self.repo.set_password_hash(user_id, &hash).await
    }
}

// ── SetAvatar ────────────────────────────────────────────────────────────────

pub struct SetAvatarUseCase<U: UserRepository, I: ImageStore> {
    pub repo: U,
    pub images: I,
}

impl<U: UserRepository, I: ImageStore> SetAvatarUseCase<U, I> {
    /// Store the new avatar, point the profile at it, then drop the old
    /// file. Returns the media-relative path.
    pub async fn execute(
        &self,
        user_id: i64,
        image: ImagePayload,
    ) -> Result<String, ApiServiceError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let path = self.images.store(AVATAR_DIR, image.ext, &image.data).await?;
        self.repo.set_avatar(user_id, Some(&path)).await?;
        if let Some(old) = user.avatar {
            self.images.remove(&old).await?;
        }
        Ok(path)
    }
}

// ── DeleteAvatar ─────────────────────────────────────────────────────────────

pub struct DeleteAvatarUseCase<U: UserRepository, I: ImageStore> {
    pub repo: U,
    pub images: I,
}

impl<U: UserRepository, I: ImageStore> DeleteAvatarUseCase<U, I> {
    pub async fn execute(&self, user_id: i64) -> Result<(), ApiServiceError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        self.repo.set_avatar(user_id, None).await?;
        if let Some(old) = user.avatar {
            self.images.remove(&old).await?;
        }
        Ok(())
    }
}
