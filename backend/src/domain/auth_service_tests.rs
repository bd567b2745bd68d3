//! Tests for the authentication service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, StoredCredentials};
use crate::domain::{DisplayName, EmailAddress, ErrorCode, HashedPassword, Role};

fn user(id: i32, role: Role) -> User {
    User::new(
        UserId::new(id),
        DisplayName::new("Noah Clements").expect("name"),
        EmailAddress::new("noahclements@gmail.com").expect("email"),
        role,
    )
}

#[fixture]
fn registration() -> Registration {
    Registration::try_from_parts("Noah Clements", "noahclements@gmail.com", "BubbaLubba1!")
        .expect("valid registration")
}

#[fixture]
fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("noahclements@gmail.com", "BubbaLubba1!")
        .expect("valid credentials")
}

fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AuthService {
    AuthService::new(Arc::new(users), Arc::new(hasher))
}

#[rstest]
#[tokio::test]
async fn register_hashes_and_persists(registration: Registration) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|new_user| {
            new_user.email.as_str() == "noahclements@gmail.com"
                && new_user.password_hash.as_str() == "hashed"
        })
        .times(1)
        .return_once(|_| Ok(user(1, Role::Admin)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password.expose() == "BubbaLubba1!")
        .times(1)
        .return_once(|_| Ok(HashedPassword::new("hashed")));

    let created = service(users, hasher)
        .register(&registration)
        .await
        .expect("registration succeeds");
    assert_eq!(created.id(), UserId::new(1));
    assert!(created.is_admin());
}

#[rstest]
#[tokio::test]
async fn register_rejects_existing_email_without_inserting(registration: Registration) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .times(1)
        .return_once(|_| {
            Ok(Some(StoredCredentials {
                user: user(1, Role::Admin),
                password_hash: HashedPassword::new("hashed"),
            }))
        });
    users.expect_create().never();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().never();

    let error = service(users, hasher)
        .register(&registration)
        .await
        .expect_err("duplicate email");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn register_maps_unique_index_race_to_conflict(registration: Registration) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(None));
    users
        .expect_create()
        .return_once(|_| Err(UserPersistenceError::duplicate_email("noahclements@gmail.com")));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(HashedPassword::new("hashed")));

    let error = service(users, hasher)
        .register(&registration)
        .await
        .expect_err("race lost");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn login_reports_unknown_email(credentials: LoginCredentials) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().never();

    let error = service(users, hasher)
        .login(&credentials)
        .await
        .expect_err("unknown email");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), UNKNOWN_EMAIL_MESSAGE);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(WRONG_PASSWORD_MESSAGE))]
#[tokio::test]
async fn login_checks_the_password(
    credentials: LoginCredentials,
    #[case] matches: bool,
    #[case] expected_error: Option<&'static str>,
) {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials_by_email().return_once(|_| {
        Ok(Some(StoredCredentials {
            user: user(1, Role::Admin),
            password_hash: HashedPassword::new("stored"),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|_, hash| hash.as_str() == "stored")
        .return_once(move |_, _| Ok(matches));

    let result = service(users, hasher).login(&credentials).await;
    match expected_error {
        None => assert_eq!(result.expect("login succeeds").id(), UserId::new(1)),
        Some(message) => {
            let error = result.expect_err("login fails");
            assert_eq!(error.code(), ErrorCode::Unauthorized);
            assert_eq!(error.message(), message);
        }
    }
}

#[rstest]
#[tokio::test]
async fn current_identity_without_session_is_anonymous() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();

    let identity = service(users, MockPasswordHasher::new())
        .current_identity(None)
        .await
        .expect("identity");
    assert_eq!(identity, Identity::Anonymous);
}

#[rstest]
#[case(Some(user(2, Role::Reader)), true)]
#[case(None, false)]
#[tokio::test]
async fn current_identity_resolves_session_user(
    #[case] stored: Option<User>,
    #[case] authenticated: bool,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .withf(|id| *id == UserId::new(2))
        .return_once(move |_| Ok(stored));

    let identity = service(users, MockPasswordHasher::new())
        .current_identity(Some(UserId::new(2)))
        .await
        .expect("identity");
    assert_eq!(identity.is_authenticated(), authenticated);
}

#[rstest]
#[tokio::test]
async fn current_identity_surfaces_outages() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let error = service(users, MockPasswordHasher::new())
        .current_identity(Some(UserId::new(2)))
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(Identity::Anonymous, Some(ErrorCode::Unauthorized))]
#[case(Identity::Authenticated(user(2, Role::Reader)), Some(ErrorCode::Forbidden))]
#[case(Identity::Authenticated(user(1, Role::Admin)), None)]
fn require_admin_gates_by_role(#[case] identity: Identity, #[case] expected: Option<ErrorCode>) {
    let outcome = require_admin(&identity).map(User::id).map_err(|error| error.code());
    match expected {
        None => assert_eq!(outcome, Ok(UserId::new(1))),
        Some(code) => assert_eq!(outcome, Err(code)),
    }
}
