use crate::domain::Interest;
use crate::service::InterestError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence of interests, keyed by app name.
///
/// Implementations enforce app-name uniqueness: `create` fails with
/// [`InterestError::AlreadyExists`] for a name that is already stored.
#[async_trait]
pub trait InterestRepository: Send + Sync {
    async fn create(&self, interest: Interest) -> Result<(), InterestError>;

    async fn get_by_app_name(&self, app_name: &str) -> Result<Option<Interest>, InterestError>;

    async fn get_by_service_ip(&self, service_ip: &str)
        -> Result<Option<Interest>, InterestError>;

    /// Replaces the stored interest with the same app name.
    async fn update(&self, interest: Interest) -> Result<Interest, InterestError>;

    /// Removes and returns the interest.
    async fn delete_by_app_name(&self, app_name: &str) -> Result<Interest, InterestError>;

    /// Removes and returns the first interest routed to `service_ip`.
    async fn delete_by_service_ip(&self, service_ip: &str) -> Result<Interest, InterestError>;

    /// All interests, ordered by app name.
    async fn list(&self) -> Result<Vec<Interest>, InterestError>;
}

/// Process-local [`InterestRepository`].
#[derive(Default)]
pub struct InMemoryInterestRepository {
    interests: RwLock<HashMap<String, Interest>>,
}

impl InMemoryInterestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository already holding `interests`.
    pub fn with_interests(interests: impl IntoIterator<Item = Interest>) -> Self {
        let interests = interests
            .into_iter()
            .map(|interest| (interest.app_name.clone(), interest))
            .collect();
        Self {
            interests: RwLock::new(interests),
        }
    }
}

#[async_trait]
impl InterestRepository for InMemoryInterestRepository {
    async fn create(&self, interest: Interest) -> Result<(), InterestError> {
        let mut interests = self.interests.write().await;
        if interests.contains_key(&interest.app_name) {
            return Err(InterestError::AlreadyExists(interest.app_name));
        }
        interests.insert(interest.app_name.clone(), interest);
        Ok(())
    }

    async fn get_by_app_name(&self, app_name: &str) -> Result<Option<Interest>, InterestError> {
        Ok(self.interests.read().await.get(app_name).cloned())
    }

    async fn get_by_service_ip(
        &self,
        service_ip: &str,
    ) -> Result<Option<Interest>, InterestError> {
        Ok(self
            .interests
            .read()
            .await
            .values()
            .filter(|interest| interest.service_ip == service_ip)
            .min_by(|a, b| a.app_name.cmp(&b.app_name))
            .cloned())
    }

    async fn update(&self, interest: Interest) -> Result<Interest, InterestError> {
        let mut interests = self.interests.write().await;
        match interests.get_mut(&interest.app_name) {
            Some(stored) => {
                *stored = interest.clone();
                Ok(interest)
            }
            None => Err(InterestError::NotFound(interest.app_name)),
        }
    }

    async fn delete_by_app_name(&self, app_name: &str) -> Result<Interest, InterestError> {
        self.interests
            .write()
            .await
            .remove(app_name)
            .ok_or_else(|| InterestError::NotFound(app_name.to_string()))
    }

    async fn delete_by_service_ip(&self, service_ip: &str) -> Result<Interest, InterestError> {
        let mut interests = self.interests.write().await;
        let app_name = interests
            .values()
            .filter(|interest| interest.service_ip == service_ip)
            .map(|interest| interest.app_name.clone())
            .min()
            .ok_or_else(|| InterestError::NotFound(service_ip.to_string()))?;
        interests
            .remove(&app_name)
            .ok_or(InterestError::NotFound(app_name))
    }

    async fn list(&self) -> Result<Vec<Interest>, InterestError> {
        let mut all: Vec<Interest> = self.interests.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.app_name.cmp(&b.app_name));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_duplicate_app_name() {
        let repo = InMemoryInterestRepository::new();
        repo.create(Interest::new("web", "10.0.0.1")).await.unwrap();

        let result = repo.create(Interest::new("web", "10.0.0.2")).await;
        assert_eq!(result, Err(InterestError::AlreadyExists("web".into())));
    }

    #[tokio::test]
    async fn test_delete_by_service_ip_returns_removed() {
        let repo = InMemoryInterestRepository::with_interests([
            Interest::new("web", "10.0.0.1"),
            Interest::new("api", "10.0.0.2"),
        ]);

        let removed = repo.delete_by_service_ip("10.0.0.2").await.unwrap();
        assert_eq!(removed.app_name, "api");
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let missing = repo.delete_by_service_ip("10.0.0.2").await;
        assert_eq!(missing, Err(InterestError::NotFound("10.0.0.2".into())));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_app_name() {
        let repo = InMemoryInterestRepository::with_interests([
            Interest::new("zeta", "10.0.0.3"),
            Interest::new("alpha", "10.0.0.1"),
        ]);

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.app_name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let repo = InMemoryInterestRepository::new();
        let result = repo.update(Interest::new("web", "10.0.0.1")).await;
        assert_eq!(result, Err(InterestError::NotFound("web".into())));
    }
}
