use std::sync::Arc;

use tracing::info;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};
use crate::security::{hash_password, verify_password, JwtKeys};

/// How a caller identifies themselves at sign-in
#[derive(Debug, Clone)]
pub enum LoginIdentifier {
    Email(String),
    Username(String),
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtKeys>) -> Self {
        Self { users, jwt }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        age: Option<i32>,
    ) -> Result<User> {
        let username = username.trim();
        let email = normalize_email(email);

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        // The unique constraints still decide if two registrations race.
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email,
                password_hash,
                age,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Returns a signed token and the authenticated user.
    pub async fn login(&self, identifier: LoginIdentifier, password: &str) -> Result<(String, User)> {
        let user = match &identifier {
            LoginIdentifier::Email(email) => self.users.find_by_email(&normalize_email(email)).await?,
            LoginIdentifier::Username(name) => self.users.find_by_username(name.trim()).await?,
        };

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
        let user = user.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.jwt.issue(user.id, &user.username)?;
        info!(user_id = %user.id, "user signed in");
        Ok((token, user))
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.jwt.ttl().num_seconds()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Repositories;

    fn service() -> AuthService {
        let repos = Repositories::memory();
        AuthService::new(repos.users, Arc::new(JwtKeys::new("test-secret", 60)))
    }

    #[tokio::test]
    async fn test_register_then_login_by_email_and_username() {
        let auth = service();
        let user = auth
            .register("alice", "Alice@Example.com", "password123", Some(30))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "password123");

        let (token, by_email) = auth
            .login(LoginIdentifier::Email("ALICE@example.com".into()), "password123")
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert_eq!(by_email.id, user.id);

        let (_, by_name) = auth
            .login(LoginIdentifier::Username("alice".into()), "password123")
            .await
            .unwrap();
        assert_eq!(by_name.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let auth = service();
        auth.register("bob", "bob@example.com", "password123", None)
            .await
            .unwrap();

        let err = auth
            .register("bob", "bob2@example.com", "password123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = auth
            .register("bobby", "BOB@example.com", "password123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user() {
        let auth = service();
        auth.register("carol", "carol@example.com", "password123", None)
            .await
            .unwrap();

        let err = auth
            .login(LoginIdentifier::Email("carol@example.com".into()), "nope-nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = auth
            .login(LoginIdentifier::Username("nobody".into()), "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
