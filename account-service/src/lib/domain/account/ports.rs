use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::DirectoryError;
use crate::account::models::EmailAddress;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::UserPatch;
use crate::account::models::UserRecordPatch;

/// Port for account use cases, the only component with business rules.
#[async_trait]
pub trait AccountUseCases: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// Looks up the email first, hashes the password, and persists via the
    /// Directory. The Directory's uniqueness constraint backs up the lookup
    /// against concurrent registrations of the same email.
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already taken
    /// * `Password` - Password hashing failed
    /// * `Storage` - Directory operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AccountError>;

    /// Verify credentials against the stored digest.
    ///
    /// # Returns
    /// `Some(user)` on a match; `None` on unknown email or password
    /// mismatch. A negative result is a normal outcome, not an error:
    /// callers must branch on it and keep it distinct from `Storage`.
    ///
    /// # Errors
    /// * `Storage` - Directory operation failed
    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, AccountError>;

    /// Retrieve an account by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Directory operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, AccountError>;

    /// Retrieve an account by email address.
    ///
    /// Used to materialize the current user from a session token's subject.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `Storage` - Directory operation failed
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, AccountError>;

    /// Apply a typed patch to an account.
    ///
    /// A present password is re-hashed before persisting; the field merge
    /// itself is delegated to the Directory.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyRegistered` - New email is already taken
    /// * `Password` - Password hashing failed
    /// * `Storage` - Directory operation failed
    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, AccountError>;

    /// Delete an account.
    ///
    /// # Returns
    /// True if a user was removed, false if the id was unknown. Either way
    /// is a normal outcome.
    ///
    /// # Errors
    /// * `Storage` - Directory operation failed
    async fn delete_user(&self, id: &UserId) -> Result<bool, AccountError>;
}

/// Durable store of user records, keyed by unique id and unique email.
///
/// External collaborator contract: implementations own id assignment and
/// the one-account-per-email invariant.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Persist a new user, assigning its id and creation timestamp.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Storage` - Store operation failed
    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `Storage` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;

    /// Retrieve a user by email address.
    ///
    /// # Errors
    /// * `Storage` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DirectoryError>;

    /// Merge the given fields into an existing record.
    ///
    /// # Returns
    /// The updated user, or `None` if the id is unknown.
    ///
    /// # Errors
    /// * `DuplicateEmail` - New email is already registered
    /// * `Storage` - Store operation failed
    async fn update_user(
        &self,
        id: &UserId,
        patch: UserRecordPatch,
    ) -> Result<Option<User>, DirectoryError>;

    /// Remove a user record.
    ///
    /// # Returns
    /// True if a record was removed, false if the id was unknown.
    ///
    /// # Errors
    /// * `Storage` - Store operation failed
    async fn delete_user(&self, id: &UserId) -> Result<bool, DirectoryError>;
}
