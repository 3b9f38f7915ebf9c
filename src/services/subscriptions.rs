//! Newsletter subscription service

use rand::{distributions::Alphanumeric, Rng};

use crate::{
    error::{AppError, AppResult},
    models::subscription::{CreateSubscription, Subscription},
    repository::Repository,
    services::email::EmailService,
};

const TOKEN_LENGTH: usize = 32;

/// Random token for confirmation and unsubscribe links
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn already_subscribed() -> AppError {
    AppError::Conflict("Email is already subscribed".to_string())
}

#[derive(Clone)]
pub struct SubscriptionsService {
    repository: Repository,
    email: EmailService,
}

impl SubscriptionsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Register a pending subscription and send the confirmation email.
    /// A failed email is logged; the subscription is kept.
    pub async fn subscribe(&self, data: &CreateSubscription) -> AppResult<Subscription> {
        let email = data.email.trim().to_lowercase();

        if let Some(existing) = self.repository.subscriptions.get_by_email(&email).await? {
            if existing.confirmed {
                return Err(already_subscribed());
            }
        }

        // The upsert skips confirmed rows, covering a confirmation that
        // lands after the lookup above
        let token = generate_token();
        let subscription = self
            .repository
            .subscriptions
            .upsert_pending(&email, data.name.as_deref(), &data.categories, &token)
            .await?
            .ok_or_else(already_subscribed)?;

        if !self
            .email
            .send_subscription_confirmation(&subscription.email, &subscription.token)
            .await
        {
            tracing::warn!(
                "Confirmation email for subscription {} was not sent",
                subscription.id
            );
        }

        Ok(subscription)
    }

    pub async fn confirm(&self, token: &str) -> AppResult<Subscription> {
        let subscription = self
            .repository
            .subscriptions
            .confirm(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;
        tracing::info!("Subscription {} confirmed", subscription.id);
        Ok(subscription)
    }

    pub async fn unsubscribe(&self, token: &str) -> AppResult<()> {
        if !self.repository.subscriptions.delete_by_token(token).await? {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }
        Ok(())
    }
}
