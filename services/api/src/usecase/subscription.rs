use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::domain::types::AuthorWithRecipes;
use crate::error::ApiServiceError;

// ── FollowAuthor ─────────────────────────────────────────────────────────────

pub struct FollowAuthorUseCase<S, U, R>
where
    S: SubscriptionRepository,
    U: UserRepository,
    R: RecipeRepository,
{
    pub subscriptions: S,
    pub users: U,
    pub recipes: R,
}

impl<S, U, R> FollowAuthorUseCase<S, U, R>
where
    S: SubscriptionRepository,
    U: UserRepository,
    R: RecipeRepository,
{
    pub async fn execute(
        &self,
        user_id: i64,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorWithRecipes, ApiServiceError> {
        if user_id == author_id {
            return Err(ApiServiceError::SelfSubscription);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let followed = self.subscriptions.follow(user_id, author_id).await?;
        if !followed {
            return Err(ApiServiceError::AlreadySubscribed);
        }
        let recipes = self.recipes.list_by_author(author_id, recipes_limit).await?;
        let recipes_count = self.recipes.count_by_author(author_id).await?;
        Ok(AuthorWithRecipes {
            author,
            recipes,
            recipes_count,
        })
    }
}

// ── UnfollowAuthor ───────────────────────────────────────────────────────────

pub struct UnfollowAuthorUseCase<S: SubscriptionRepository, U: UserRepository> {
    pub subscriptions: S,
    pub users: U,
}

impl<S: SubscriptionRepository, U: UserRepository> UnfollowAuthorUseCase<S, U> {
    pub async fn execute(&self, user_id: i64, author_id: i64) -> Result<(), ApiServiceError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(ApiServiceError::UserNotFound);
        }
        let removed = self.subscriptions.unfollow(user_id, author_id).await?;
        if !removed {
            return Err(ApiServiceError::NotSubscribed);
        }
        Ok(())
    }
}

// ── GetSubscriptions ─────────────────────────────────────────────────────────

pub struct GetSubscriptionsUseCase<S: SubscriptionRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub recipes: R,
}

impl<S: SubscriptionRepository, R: RecipeRepository> GetSubscriptionsUseCase<S, R> {
    pub async fn execute(
        &self,
        user_id: i64,
        recipes_limit: Option<u64>,
        page: PageRequest,
    ) -> Result<Paginated<AuthorWithRecipes>, ApiServiceError> {
        let authors = self.subscriptions.list_authors(user_id, page).await?;
        let mut items = Vec::with_capacity(authors.items.len());
        for author in authors.items {
            let recipes = self.recipes.list_by_author(author.id, recipes_limit).await?;
            let recipes_count = self.recipes.count_by_author(author.id).await?;
            items.push(AuthorWithRecipes {
                author,
                recipes,
                recipes_count,
            });
        }
        Ok(Paginated {
            count: authors.count,
            items,
        })
    }
}
