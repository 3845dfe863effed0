use ladle_api::domain::types::ImagePayload;
use ladle_api::error::ApiServiceError;
use ladle_api::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, UpdateRecipeInput,
    UpdateRecipeUseCase,
};

use crate::helpers::{MockImageStore, MockRecipeRepo, test_recipe};

fn image() -> ImagePayload {
    ImagePayload {
        ext: "png",
        data: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

fn create_input() -> CreateRecipeInput {
    CreateRecipeInput {
        name: "Pancakes".to_owned(),
        text: "Whisk and fry.".to_owned(),
        cooking_time: 20,
        image: image(),
        ingredients: vec![(1, 200), (2, 2)],
        tags: vec![1, 2],
    }
}

#[tokio::test]
async fn should_create_recipe_and_record_join_rows() {
    let repo = MockRecipeRepo::empty();
    let drafts = repo.drafts_handle();

    let uc = CreateRecipeUseCase {
        repo,
        images: MockImageStore::default(),
    };
    let details = uc.execute(1, create_input()).await.unwrap();

    assert_eq!(details.recipe.author_id, 1);
    let drafts = drafts.lock().unwrap();
    let draft = drafts.get(&details.recipe.id).unwrap();
    assert_eq!(draft.ingredients, vec![(1, 200), (2, 2)]);
    assert_eq!(draft.tags, vec![1, 2]);
}

#[tokio::test]
async fn should_reject_create_with_duplicate_ingredients() {
    let uc = CreateRecipeUseCase {
        repo: MockRecipeRepo::empty(),
        images: MockImageStore::default(),
    };
    let mut input = create_input();
    input.ingredients = vec![(1, 200), (1, 50)];

    let result = uc.execute(1, input).await;
    assert!(
        matches!(result, Err(ApiServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_create_with_zero_amount() {
    let uc = CreateRecipeUseCase {
        repo: MockRecipeRepo::empty(),
        images: MockImageStore::default(),
    };
    let mut input = create_input();
    input.ingredients = vec![(1, 0)];

    let result = uc.execute(1, input).await;
    assert!(matches!(result, Err(ApiServiceError::Validation(_))));
}

#[tokio::test]
async fn should_reject_create_without_tags() {
    let uc = CreateRecipeUseCase {
        repo: MockRecipeRepo::empty(),
        images: MockImageStore::default(),
    };
    let mut input = create_input();
    input.tags.clear();

    let result = uc.execute(1, input).await;
    assert!(matches!(result, Err(ApiServiceError::Validation(_))));
}

#[tokio::test]
async fn update_replaces_ingredient_rows_exactly() {
    let repo = MockRecipeRepo::new(vec![test_recipe(7, 1)]);
    let drafts = repo.drafts_handle();
    drafts.lock().unwrap().insert(
        7,
        ladle_api::domain::types::RecipeDraft {
            name: "Recipe 7".to_owned(),
            text: "Combine and cook.".to_owned(),
            image: "recipes/images/7.png".to_owned(),
            cooking_time: 30,
            ingredients: vec![(1, 100), (2, 50)],
            tags: vec![1],
        },
    );

    let uc = UpdateRecipeUseCase {
        repo,
        images: MockImageStore::default(),
    };
    uc.execute(
        1,
        false,
        7,
        UpdateRecipeInput {
            name: "Recipe 7".to_owned(),
            text: "Combine and cook.".to_owned(),
            cooking_time: 30,
            image: None,
            ingredients: vec![(3, 25)],
            tags: vec![2],
        },
    )
    .await
    .unwrap();

    let drafts = drafts.lock().unwrap();
    let draft = drafts.get(&7).unwrap();
    assert_eq!(draft.ingredients, vec![(3, 25)], "old rows must be gone");
    assert_eq!(draft.tags, vec![2]);
}

#[tokio::test]
async fn should_forbid_update_by_other_user() {
    let uc = UpdateRecipeUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(7, 1)]),
        images: MockImageStore::default(),
    };
    let result = uc
        .execute(
            2,
            false,
            7,
            UpdateRecipeInput {
                name: "Hijacked".to_owned(),
                text: "x".to_owned(),
                cooking_time: 1,
                image: None,
                ingredients: vec![(1, 1)],
                tags: vec![1],
            },
        )
        .await;
    assert!(matches!(result, Err(ApiServiceError::Forbidden)));
}

#[tokio::test]
async fn should_allow_admin_delete_of_foreign_recipe() {
    let repo = MockRecipeRepo::new(vec![test_recipe(7, 1)]);
    let recipes = repo.recipes_handle();

    let uc = DeleteRecipeUseCase {
        repo,
        images: MockImageStore::default(),
    };
    uc.execute(99, true, 7).await.unwrap();
    assert!(recipes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_delete_by_other_user() {
    let uc = DeleteRecipeUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(7, 1)]),
        images: MockImageStore::default(),
    };
    let result = uc.execute(2, false, 7).await;
    assert!(matches!(result, Err(ApiServiceError::Forbidden)));
}
