//! Account sign-up, sign-in, and sign-out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use huddle_backend::{AccountStatus, AuthGateway, AuthUser, UserRecord, UserStore};
use huddle_common::{AppError, AppResult};
use validator::Validate;

/// Input for creating an account.
#[derive(Debug, Validate)]
pub struct SignUpInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub fullname: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub birthdate: DateTime<Utc>,

    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,

    #[validate(length(min = 1, message = "Occupation is required"))]
    pub occupation: String,

    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthGateway>,
    users: Arc<dyn UserStore>,
    min_password_length: usize,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        users: Arc<dyn UserStore>,
        min_password_length: usize,
    ) -> Self {
        Self {
            auth,
            users,
            min_password_length,
        }
    }

    /// Create an account and its user record, then sign the new user in.
    ///
    /// Every check runs before the backend is touched, so invalid input
    /// never creates a half-registered account. The record starts with
    /// status `pending` and an empty message list.
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<AuthUser> {
        input.validate()?;
        self.check_password(&input.password)?;

        let user = self
            .auth
            .create_account(input.email.trim(), &input.password)
            .await?;

        let record = UserRecord {
            id: user.uid.clone(),
            email: user.email.clone(),
            fullname: input.fullname.trim().to_string(),
            birthdate: input.birthdate,
            contact_number: input.contact_number.trim().to_string(),
            occupation: input.occupation.trim().to_string(),
            status: AccountStatus::Pending,
            messages: Vec::new(),
            document_url: None,
            created_at: Utc::now(),
        };
        self.users.create_user(record).await?;

        tracing::info!(uid = %user.uid, "user signed up");
        Ok(user)
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        self.auth.sign_in(email, password).await
    }

    /// End the current session.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.auth.sign_out().await
    }

    fn check_password(&self, password: &str) -> AppResult<()> {
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        if password.chars().count() < self.min_password_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        Ok(())
    }
}
