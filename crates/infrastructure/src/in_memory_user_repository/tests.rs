use csrd_application::{UserRecord, UserRepository};
use csrd_core::{AppError, NonEmptyString};
use csrd_domain::{
    EmailAddress, LoginIdentifier, OrgUnitId, User, UserId, UserProfile, UserRole, UserStatus,
};

use super::InMemoryUserRepository;

fn record(id: &str, nni: &str, email: &str) -> UserRecord {
    let profile = UserProfile {
        nni: NonEmptyString::new(nni).unwrap_or_else(|_| unreachable!()),
        email: EmailAddress::new(email).unwrap_or_else(|_| unreachable!()),
        last_name: NonEmptyString::new("Martin").unwrap_or_else(|_| unreachable!()),
        first_name: NonEmptyString::new("Jeanne").unwrap_or_else(|_| unreachable!()),
    };
    UserRecord {
        user: User::new(
            UserId::new(id).unwrap_or_else(|_| unreachable!()),
            profile,
            UserRole::Member,
            UserStatus::Active,
        ),
        password: "secret".to_owned(),
    }
}

#[tokio::test]
async fn finds_exact_identifier_matches_only() {
    let repository = InMemoryUserRepository::with_records([
        record("1", "A123", "a@example.com"),
        record("2", "A1234", "b@example.com"),
    ]);

    let by_nni = repository
        .find_by_identifier(&LoginIdentifier::parse("A123").unwrap_or_else(|_| unreachable!()))
        .await
        .unwrap_or_else(|_| unreachable!());
    let by_email = repository
        .find_by_identifier(
            &LoginIdentifier::parse("B@example.com").unwrap_or_else(|_| unreachable!()),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(by_nni.len(), 1);
    assert_eq!(by_nni[0].user.id().as_str(), "1");
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].user.id().as_str(), "2");
}

#[tokio::test]
async fn create_rejects_duplicate_identifier() {
    let repository = InMemoryUserRepository::new();

    let first = repository.create(record("1", "A123", "a@example.com")).await;
    let second = repository.create(record("1", "B456", "b@example.com")).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_team_persists_assignment() {
    let repository = InMemoryUserRepository::with_records([record("1", "A123", "a@example.com")]);
    let user_id = UserId::new("1").unwrap_or_else(|_| unreachable!());
    let team_id = OrgUnitId::new("t1").unwrap_or_else(|_| unreachable!());

    let updated = repository
        .update_team(&user_id, &team_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    let stored = repository
        .find_by_id(&user_id)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.team(), Some(&team_id));
    assert_eq!(stored.as_ref().and_then(User::team), Some(&team_id));
}

#[tokio::test]
async fn update_team_of_unknown_user_is_not_found() {
    let repository = InMemoryUserRepository::new();

    let result = repository
        .update_team(
            &UserId::new("9").unwrap_or_else(|_| unreachable!()),
            &OrgUnitId::new("t1").unwrap_or_else(|_| unreachable!()),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
