use ladle_api::domain::types::ImagePayload;
use ladle_api::error::ApiServiceError;
use ladle_api::usecase::user::{
    DeleteAvatarUseCase, GetUserProfileUseCase, RegisterUserInput, RegisterUserUseCase,
    SetAvatarUseCase, SetPasswordUseCase,
};

use crate::helpers::{FakePassword, MockImageStore, MockSubscriptionRepo, MockUserRepo, test_user};

fn register_input() -> RegisterUserInput {
    RegisterUserInput {
        email: "new@example.com".to_owned(),
        username: "newcomer".to_owned(),
        first_name: "New".to_owned(),
        last_name: "Comer".to_owned(),
        password: "long-enough-password".to_owned(),
    }
}

#[tokio::test]
async fn should_register_and_persist_user() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();

    let uc = RegisterUserUseCase {
        repo,
        password: FakePassword,
    };
    let created = uc.execute(register_input()).await.unwrap();

    assert_eq!(created.username, "newcomer");
    let users = users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].password_hash, "hash:long-enough-password");
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let mut existing = test_user(1);
    existing.email = "new@example.com".to_owned();
    let uc = RegisterUserUseCase {
        repo: MockUserRepo::new(vec![existing]),
        password: FakePassword,
    };
    let result = uc.execute(register_input()).await;
    assert!(matches!(result, Err(ApiServiceError::EmailTaken)));
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let mut existing = test_user(1);
    existing.username = "newcomer".to_owned();
    let uc = RegisterUserUseCase {
        repo: MockUserRepo::new(vec![existing]),
        password: FakePassword,
    };
    let result = uc.execute(register_input()).await;
    assert!(matches!(result, Err(ApiServiceError::UsernameTaken)));
}

#[tokio::test]
async fn should_change_password_with_correct_current() {
    let repo = MockUserRepo::new(vec![test_user(1)]);
    let users = repo.users_handle();

    let uc = SetPasswordUseCase {
        repo,
        password: FakePassword,
    };
    uc.execute(1, "correct-horse", "battery-staple").await.unwrap();
    assert_eq!(
        users.lock().unwrap()[0].password_hash,
        "hash:battery-staple"
    );
}

#[tokio::test]
async fn should_reject_wrong_current_password() {
    let uc = SetPasswordUseCase {
        repo: MockUserRepo::new(vec![test_user(1)]),
        password: FakePassword,
    };
    let result = uc.execute(1, "wrong-guess", "battery-staple").await;
    assert!(matches!(result, Err(ApiServiceError::WrongPassword)));
}

#[tokio::test]
async fn should_set_then_clear_avatar() {
    let repo = MockUserRepo::new(vec![test_user(1)]);
    let users = repo.users_handle();

    let set = SetAvatarUseCase {
        repo,
        images: MockImageStore::default(),
    };
    let path = set
        .execute(
            1,
            ImagePayload {
                ext: "png",
                data: vec![1, 2],
            },
        )
        .await
        .unwrap();
    assert_eq!(users.lock().unwrap()[0].avatar.as_deref(), Some(path.as_str()));

    let delete = DeleteAvatarUseCase {
        repo: MockUserRepo {
            users: users.clone(),
        },
        images: MockImageStore::default(),
    };
    delete.execute(1).await.unwrap();
    assert_eq!(users.lock().unwrap()[0].avatar, None);
}

#[tokio::test]
async fn profile_reports_subscription_state() {
    let uc = GetUserProfileUseCase {
        users: MockUserRepo::new(vec![test_user(2)]),
        subscriptions: MockSubscriptionRepo::new(vec![(1, 2)], vec![test_user(2)]),
    };

    assert!(uc.execute(2, Some(1)).await.unwrap().is_subscribed);
    assert!(!uc.execute(2, Some(3)).await.unwrap().is_subscribed);
    assert!(!uc.execute(2, None).await.unwrap().is_subscribed);
}
