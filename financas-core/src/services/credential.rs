//! Credential service - user registration and login

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::PersistenceGateway;

pub const EMAIL_TAKEN: &str = "Já existe um usuário cadastrado com este email.";
pub const USER_NOT_FOUND: &str = "Usuario não encontrado para o email informado.";
pub const INVALID_PASSWORD: &str = "Senha inválida.";

/// Authentication facade used by callers that only need login and signup
pub trait AuthenticationService: Send + Sync {
    /// Look up the user by email and check the password
    fn authenticate(&self, email: &str, password: &str) -> Result<User>;

    /// Register a user whose email is not taken yet
    fn register_user(&self, user: User) -> Result<User>;

    /// Fail with a business error when the email already belongs to a user
    fn validate_email_available(&self, email: &str) -> Result<()>;
}

pub struct CredentialService {
    gateway: Arc<dyn PersistenceGateway>,
}

impl CredentialService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.gateway.find_user_by_id(id)
    }
}

impl AuthenticationService for CredentialService {
    fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .gateway
            .find_user_by_email(email)?
            .ok_or_else(|| Error::authentication(USER_NOT_FOUND))?;

        if !user.password.matches(password)? {
            return Err(Error::authentication(INVALID_PASSWORD));
        }

        Ok(user)
    }

    fn register_user(&self, user: User) -> Result<User> {
        self.validate_email_available(&user.email)?;
        self.gateway.create_user(&user)
    }

    fn validate_email_available(&self, email: &str) -> Result<()> {
        if self.gateway.exists_user_with_email(email)? {
            return Err(Error::business_rule(EMAIL_TAKEN));
        }
        Ok(())
    }
}
