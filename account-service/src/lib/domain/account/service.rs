use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::UserPatch;
use crate::account::models::UserRecordPatch;
use crate::account::ports::AccountUseCases;
use crate::account::ports::UserDirectory;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountUseCases with dependency injection.
/// Stateless across calls: every invocation is an independent request and
/// the only shared state lives behind the Directory.
pub struct AccountService<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    password_hasher: PasswordHasher,
}

impl<D> AccountService<D>
where
    D: UserDirectory,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - User record store implementation
    /// * `password_hasher` - Credential hasher, configured with the
    ///   deployment's cost factor
    pub fn new(directory: Arc<D>, password_hasher: PasswordHasher) -> Self {
        Self {
            directory,
            password_hasher,
        }
    }
}

#[async_trait]
impl<D> AccountUseCases for AccountService<D>
where
    D: UserDirectory,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError> {
        // Uniqueness check before hash+insert. The Directory's unique
        // constraint on email catches the race between two concurrent
        // registrations; its DuplicateEmail maps to the same outcome.
        if let Some(existing) = self.directory.find_by_email(&command.email).await? {
            return Err(AccountError::EmailAlreadyRegistered(
                existing.email.as_str().to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let created_user = self
            .directory
            .create_user(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, AccountError> {
        let Some(user) = self.directory.find_by_email(email).await? else {
            return Ok(None);
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, AccountError> {
        self.directory
            .find_by_email(email)
            .await?
            .ok_or(AccountError::NotFound(email.as_str().to_string()))
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, AccountError> {
        let password_hash = match patch.password {
            Some(new_password) => Some(self.password_hasher.hash(&new_password)?),
            None => None,
        };

        let record_patch = UserRecordPatch {
            username: patch.username,
            email: patch.email,
            password_hash,
        };

        self.directory
            .update_user(id, record_patch)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool, AccountError> {
        let deleted = self.directory.delete_user(id).await?;

        if deleted {
            tracing::info!(user_id = %id, "User deleted");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::account::errors::DirectoryError;
    use crate::account::models::Username;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserDirectory {}

        #[async_trait]
        impl UserDirectory for TestUserDirectory {
            async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DirectoryError>;
            async fn update_user(&self, id: &UserId, patch: UserRecordPatch) -> Result<Option<User>, DirectoryError>;
            async fn delete_user(&self, id: &UserId) -> Result<bool, DirectoryError>;
        }
    }

    fn service(directory: MockTestUserDirectory) -> AccountService<MockTestUserDirectory> {
        // Cheapest valid cost keeps the Argon2 calls fast in tests
        AccountService::new(Arc::new(directory), PasswordHasher::with_cost(1).unwrap())
    }

    fn stored_user(email: &str, password: &str) -> User {
        let hasher = PasswordHasher::with_cost(1).unwrap();
        User {
            id: UserId::new(),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hasher.hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        directory
            .expect_create_user()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId::new(),
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                })
            });

        let service = service(directory);

        let command = RegisterCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let user = service.register(command).await.unwrap();
        assert_eq!(user.username.as_str(), "testuser");
        assert_eq!(user.email.as_str(), "test@example.com");
        // Password is hashed with real Argon2, never stored in plaintext
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("test@example.com", "whatever"))));

        // Lookup short-circuits: no insert attempted
        directory.expect_create_user().times(0);

        let service = service(directory);

        let command = RegisterCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let result = service.register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::EmailAlreadyRegistered(_)
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_raced() {
        let mut directory = MockTestUserDirectory::new();

        // The lookup saw nothing, but a concurrent registration won the
        // insert: the store's constraint is the authoritative signal
        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        directory.expect_create_user().times(1).returning(|user| {
            Err(DirectoryError::DuplicateEmail(
                user.email.as_str().to_string(),
            ))
        });

        let service = service(directory);

        let command = RegisterCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let result = service.register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::EmailAlreadyRegistered(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut directory = MockTestUserDirectory::new();

        let user = stored_user("test@example.com", "right_password");
        let user_id = user.id;
        directory
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);

        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "right_password").await.unwrap();

        let authenticated = result.expect("Expected a match");
        assert_eq!(authenticated.id, user_id);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut directory = MockTestUserDirectory::new();

        let user = stored_user("test@example.com", "right_password");
        directory
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);

        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "wrong_password").await.unwrap();

        // A mismatch is a negative result, not an error
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);

        let email = EmailAddress::new("nouser@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "whatever").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_storage_error_is_not_a_mismatch() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(DirectoryError::Storage("connection reset".to_string())));

        let service = service(directory);

        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let result = service.authenticate(&email, "password").await;
        assert!(matches!(result.unwrap_err(), AccountError::Storage(_)));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut directory = MockTestUserDirectory::new();

        let user = stored_user("test@example.com", "password");
        let user_id = user.id;
        directory
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);

        let found = service.get_user(&user_id).await.unwrap();
        assert_eq!(found.id, user_id);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);

        let email = EmailAddress::new("ghost@example.com".to_string()).unwrap();
        let result = service.get_user_by_email(&email).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut directory = MockTestUserDirectory::new();

        let user_id = UserId::new();
        directory
            .expect_update_user()
            .withf(move |id, patch| {
                *id == user_id
                    && patch.username.is_none()
                    && patch.email.is_none()
                    && patch
                        .password_hash
                        .as_deref()
                        .is_some_and(|hash| hash.starts_with("$argon2"))
            })
            .times(1)
            .returning(|id, patch| {
                Ok(Some(User {
                    id: *id,
                    username: Username::new("testuser".to_string()).unwrap(),
                    email: EmailAddress::new("test@example.com".to_string()).unwrap(),
                    password_hash: patch.password_hash.unwrap(),
                    created_at: Utc::now(),
                }))
            });

        let service = service(directory);

        let patch = UserPatch {
            password: Some("new_password".to_string()),
            ..Default::default()
        };

        let updated = service.update_user(&user_id, patch).await.unwrap();
        assert!(updated.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_update_user_duplicate_email() {
        let mut directory = MockTestUserDirectory::new();

        // The store rejects the email patch: another account owns it
        directory
            .expect_update_user()
            .withf(|_, patch| patch.email.is_some())
            .times(1)
            .returning(|_, patch| {
                Err(DirectoryError::DuplicateEmail(
                    patch.email.unwrap().as_str().to_string(),
                ))
            });

        let service = service(directory);

        let patch = UserPatch {
            email: Some(EmailAddress::new("taken@example.com".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_user(&UserId::new(), patch).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::EmailAlreadyRegistered(_)
        ));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_update_user()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = service(directory);

        let patch = UserPatch {
            username: Some(Username::new("newname".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_user(&UserId::new(), patch).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user_reports_found() {
        let mut directory = MockTestUserDirectory::new();

        let user_id = UserId::new();
        directory
            .expect_delete_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(true));

        let service = service(directory);

        assert!(service.delete_user(&user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_user_reports_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_delete_user()
            .times(1)
            .returning(|_| Ok(false));

        let service = service(directory);

        // Unknown id is a boolean outcome, not an error
        assert!(!service.delete_user(&UserId::new()).await.unwrap());
    }
}
