use std::collections::HashSet;

use ladle_api::usecase::shopping_list::DownloadShoppingListUseCase;

use crate::helpers::MockShoppingListSource;

#[tokio::test]
async fn should_sum_shared_ingredients_across_cart_recipes() {
    // Two recipes in user 1's cart both use sugar.
    let uc = DownloadShoppingListUseCase {
        source: MockShoppingListSource {
            cart: HashSet::from([(1, 10), (1, 11)]),
            recipe_lines: vec![
                (10, "sugar", "g", 100),
                (10, "flour", "g", 300),
                (11, "sugar", "g", 50),
            ],
        },
    };

    let text = uc.execute(1).await.unwrap();
    assert_eq!(text, "Shopping list:\n\nflour (g) - 300\nsugar (g) - 150\n");
}

#[tokio::test]
async fn should_ignore_recipes_outside_the_cart() {
    let uc = DownloadShoppingListUseCase {
        source: MockShoppingListSource {
            cart: HashSet::from([(1, 10)]),
            recipe_lines: vec![(10, "salt", "g", 5), (99, "salt", "g", 500)],
        },
    };

    let text = uc.execute(1).await.unwrap();
    assert_eq!(text, "Shopping list:\n\nsalt (g) - 5\n");
}

#[tokio::test]
async fn should_render_header_only_when_cart_is_empty() {
    let uc = DownloadShoppingListUseCase {
        source: MockShoppingListSource {
            cart: HashSet::new(),
            recipe_lines: vec![(10, "sugar", "g", 100)],
        },
    };

    let text = uc.execute(1).await.unwrap();
    assert_eq!(text, "Shopping list:\n\n");
}

#[tokio::test]
async fn lists_are_scoped_to_the_requesting_user() {
    let source = MockShoppingListSource {
        cart: HashSet::from([(1, 10), (2, 11)]),
        recipe_lines: vec![(10, "sugar", "g", 100), (11, "rice", "g", 200)],
    };
    let uc = DownloadShoppingListUseCase { source };

    assert_eq!(
        uc.execute(1).await.unwrap(),
        "Shopping list:\n\nsugar (g) - 100\n"
    );
    assert_eq!(
        uc.execute(2).await.unwrap(),
        "Shopping list:\n\nrice (g) - 200\n"
    );
}
