use ladle_api::error::ApiServiceError;
use ladle_api::usecase::subscription::{
    FollowAuthorUseCase, GetSubscriptionsUseCase, UnfollowAuthorUseCase,
};
use ladle_domain::pagination::PageRequest;

use crate::helpers::{MockRecipeRepo, MockSubscriptionRepo, MockUserRepo, test_recipe, test_user};

#[tokio::test]
async fn should_follow_author_with_capped_recipes_and_full_count() {
    let uc = FollowAuthorUseCase {
        subscriptions: MockSubscriptionRepo::empty(),
        users: MockUserRepo::new(vec![test_user(2)]),
        recipes: MockRecipeRepo::new(vec![
            test_recipe(1, 2),
            test_recipe(2, 2),
            test_recipe(3, 2),
        ]),
    };

    let entry = uc.execute(1, 2, Some(2)).await.unwrap();
    assert_eq!(entry.author.id, 2);
    assert_eq!(entry.recipes.len(), 2);
    assert_eq!(entry.recipes_count, 3);
}

#[tokio::test]
async fn should_reject_self_follow() {
    let uc = FollowAuthorUseCase {
        subscriptions: MockSubscriptionRepo::empty(),
        users: MockUserRepo::new(vec![test_user(1)]),
        recipes: MockRecipeRepo::empty(),
    };
    let result = uc.execute(1, 1, None).await;
    assert!(
        matches!(result, Err(ApiServiceError::SelfSubscription)),
        "expected SelfSubscription, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_duplicate_follow() {
    let uc = FollowAuthorUseCase {
        subscriptions: MockSubscriptionRepo::new(vec![(1, 2)], vec![test_user(2)]),
        users: MockUserRepo::new(vec![test_user(2)]),
        recipes: MockRecipeRepo::empty(),
    };
    let result = uc.execute(1, 2, None).await;
    assert!(matches!(result, Err(ApiServiceError::AlreadySubscribed)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_author() {
    let uc = FollowAuthorUseCase {
        subscriptions: MockSubscriptionRepo::empty(),
        users: MockUserRepo::empty(),
        recipes: MockRecipeRepo::empty(),
    };
    let result = uc.execute(1, 404, None).await;
    assert!(matches!(result, Err(ApiServiceError::UserNotFound)));
}

#[tokio::test]
async fn should_unfollow_and_reject_a_second_unfollow() {
    let uc = UnfollowAuthorUseCase {
        subscriptions: MockSubscriptionRepo::new(vec![(1, 2)], vec![test_user(2)]),
        users: MockUserRepo::new(vec![test_user(2)]),
    };

    uc.execute(1, 2).await.unwrap();
    let result = uc.execute(1, 2).await;
    assert!(matches!(result, Err(ApiServiceError::NotSubscribed)));
}

#[tokio::test]
async fn should_list_followed_authors_with_their_recipes() {
    let uc = GetSubscriptionsUseCase {
        subscriptions: MockSubscriptionRepo::new(
            vec![(1, 2), (1, 3)],
            vec![test_user(2), test_user(3), test_user(4)],
        ),
        recipes: MockRecipeRepo::new(vec![
            test_recipe(1, 2),
            test_recipe(2, 2),
            test_recipe(3, 3),
        ]),
    };

    let page = uc.execute(1, Some(1), PageRequest::default()).await.unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].recipes.len(), 1, "recipes_limit applies");
    assert_eq!(page.items[0].recipes_count, 2);
}
