//! User accounts: registration, profile updates and credential checks

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn, Span};
use uuid::Uuid;

use super::{require_non_blank, ServiceError, ServiceResult};
use crate::auth::password::{self, PasswordCost};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::query::Pagination;
use crate::repository::UserRepository;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Rules shared by create and update
pub fn validate_user(user: &User) -> ServiceResult<()> {
    require_non_blank("name", &user.name)?;
    if !user.email.contains('@') {
        return Err(ServiceError::validation("email", "must be a valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cost: PasswordCost,
    span: Span,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, cost: PasswordCost, span: Span) -> Self {
        Self { repo, cost, span }
    }

    pub async fn create_user(&self, input: CreateUser) -> ServiceResult<User> {
        validate_password(&input.password)?;

        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        validate_user(&user)?;
        user.password_hash = password::hash_password(&input.password, &self.cost)?;

        let user = self.repo.create(&user).await?;
        info!(parent: &self.span, user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> ServiceResult<User> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Exact email match
    pub async fn get_user_by_email(&self, email: &str) -> ServiceResult<User> {
        self.repo
            .get_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound { resource: "user" })
    }

    pub async fn list_users(&self, filter: &UserFilter, page: &Pagination) -> ServiceResult<Vec<User>> {
        Ok(self.repo.list(filter, page).await?)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> ServiceResult<User> {
        let mut user = self.repo.get_by_id(id).await?;

        if let Some(name) = input.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = input.email {
            user.email = email.trim().to_string();
        }
        validate_user(&user)?;

        if let Some(new_password) = input.password {
            validate_password(&new_password)?;
            user.password_hash = password::hash_password(&new_password, &self.cost)?;
        }
        user.updated_at = Utc::now();

        let user = self.repo.update(&user).await?;
        info!(parent: &self.span, user_id = %user.id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        info!(parent: &self.span, user_id = %id, "User deleted");
        Ok(())
    }

    /// True only when `password` matches the user's stored hash
    pub fn check_password(&self, user: &User, password: &str) -> bool {
        password::check_password(password, &user.password_hash)
    }

    /// Resolves an email/password pair to a user
    ///
    /// Unknown email and wrong password both yield `Unauthorized`.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self.repo.get_by_email(email).await? else {
            warn!(parent: &self.span, "Login attempt for unknown email");
            return Err(ServiceError::Unauthorized);
        };

        if !self.check_password(&user, password) {
            warn!(parent: &self.span, user_id = %user.id, "Login attempt with wrong password");
            return Err(ServiceError::Unauthorized);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_validate_user() {
        assert!(validate_user(&user("Ada", "ada@example.com")).is_ok());
        assert!(matches!(
            validate_user(&user("Ada", "ada.example.com")),
            Err(ServiceError::Validation { field: "email", .. })
        ));
        assert!(matches!(
            validate_user(&user(" ", "ada@example.com")),
            Err(ServiceError::Validation { field: "name", .. })
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        // Counted in characters, not bytes
        assert!(validate_password("ééééé").is_err());
    }
}
