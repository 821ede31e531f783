use crate::domain::{Interest, InterestEvent, InterestRequest};
use crate::observer::Subject;
use crate::service::{InterestError, InterestRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Owns interest mutations and announces each successful one.
///
/// Every create/update/delete that reaches the repository is followed by
/// exactly one [`Subject::notify`] carrying a snapshot of the stored interest.
/// Failed mutations notify nobody.
pub struct InterestService {
    repo: Arc<dyn InterestRepository>,
    subject: Option<Arc<dyn Subject>>,
}

impl InterestService {
    pub fn new(repo: Arc<dyn InterestRepository>, subject: Option<Arc<dyn Subject>>) -> Self {
        Self { repo, subject }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, request: InterestRequest) -> Result<Interest, InterestError> {
        info!("Creating interest");
        if request.app_name.trim().is_empty() {
            return Err(InterestError::Validation("app name must not be empty".into()));
        }

        if self.repo.get_by_app_name(&request.app_name).await?.is_some() {
            warn!("Interest already exists");
            return Err(InterestError::AlreadyExists(request.app_name));
        }

        let interest = Interest::new(request.app_name, request.service_ip);
        self.repo.create(interest.clone()).await?;

        self.publish(InterestEvent::created(interest.clone()));
        Ok(interest)
    }

    /// Re-points an existing interest at a new service IP.
    #[instrument(skip(self))]
    pub async fn update(&self, request: InterestRequest) -> Result<Interest, InterestError> {
        debug!("Updating interest");
        let existing = self
            .repo
            .get_by_app_name(&request.app_name)
            .await?
            .ok_or_else(|| InterestError::NotFound(request.app_name.clone()))?;

        let interest = Interest {
            service_ip: request.service_ip,
            updated_at: Utc::now(),
            ..existing
        };
        let updated = self.repo.update(interest).await?;

        self.publish(InterestEvent::updated(updated.clone()));
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_app_name(&self, app_name: &str) -> Result<Interest, InterestError> {
        debug!("Deleting interest by app name");
        let removed = self.repo.delete_by_app_name(app_name).await?;
        self.publish(InterestEvent::deleted(removed.clone()));
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_service_ip(&self, service_ip: &str) -> Result<Interest, InterestError> {
        debug!("Deleting interest by service IP");
        let removed = self.repo.delete_by_service_ip(service_ip).await?;
        self.publish(InterestEvent::deleted(removed.clone()));
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub async fn get_by_app_name(&self, app_name: &str) -> Result<Option<Interest>, InterestError> {
        debug!("Getting interest by app name");
        self.repo.get_by_app_name(app_name).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_service_ip(
        &self,
        service_ip: &str,
    ) -> Result<Option<Interest>, InterestError> {
        debug!("Getting interest by service IP");
        self.repo.get_by_service_ip(service_ip).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Interest>, InterestError> {
        debug!("Listing interests");
        self.repo.list().await
    }

    fn publish(&self, event: InterestEvent) {
        if let Some(subject) = &self.subject {
            subject.notify(event);
        }
    }
}
