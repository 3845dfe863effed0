use ladle_api::error::ApiServiceError;
use ladle_api::usecase::shortlink::{GetShortLinkUseCase, ResolveShortLinkUseCase};
use ladle_core::shortlink::ShortLinkCodec;

use crate::helpers::{MockRecipeRepo, test_recipe};

#[tokio::test]
async fn link_and_resolve_round_trip() {
    let codec = ShortLinkCodec::default_config();

    let get_link = GetShortLinkUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(42, 1)]),
        codec: codec.clone(),
        public_base_url: "https://ladle.example".to_owned(),
    };
    let url = get_link.execute(42).await.unwrap();
    let token = url
        .strip_prefix("https://ladle.example/s/")
        .and_then(|t| t.strip_suffix('/'))
        .expect("link shape");

    let resolve = ResolveShortLinkUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(42, 1)]),
        codec,
    };
    assert_eq!(resolve.execute(token).await.unwrap(), 42);
}

#[tokio::test]
async fn should_not_link_missing_recipe() {
    let uc = GetShortLinkUseCase {
        repo: MockRecipeRepo::empty(),
        codec: ShortLinkCodec::default_config(),
        public_base_url: "https://ladle.example".to_owned(),
    };
    let result = uc.execute(404).await;
    assert!(matches!(result, Err(ApiServiceError::RecipeNotFound)));
}

#[tokio::test]
async fn garbage_token_is_not_found_never_a_server_error() {
    let uc = ResolveShortLinkUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(42, 1)]),
        codec: ShortLinkCodec::default_config(),
    };
    for token in ["", "!!!", "UPPER", "0oO1lI", "zzzzzzzzzzzzzzzzzzzzzzzzzzzz"] {
        let result = uc.execute(token).await;
        assert!(
            matches!(result, Err(ApiServiceError::RecipeNotFound)),
            "token {token:?} must resolve to not-found, got {result:?}"
        );
    }
}

#[tokio::test]
async fn token_for_deleted_recipe_is_not_found() {
    let codec = ShortLinkCodec::default_config();
    let token = codec.encode(9999);
    let uc = ResolveShortLinkUseCase {
        repo: MockRecipeRepo::new(vec![test_recipe(42, 1)]),
        codec,
    };
    let result = uc.execute(&token).await;
    assert!(matches!(result, Err(ApiServiceError::RecipeNotFound)));
}
