use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An application's registered service IP.
///
/// The `app_name` is the natural key. At most one live interest exists per
/// app name; the [`InterestRepository`](crate::service::InterestRepository)
/// enforces that, the scheduler only ever sees snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    #[serde(rename = "appname")]
    pub app_name: String,
    #[serde(rename = "serviceIp")]
    pub service_ip: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating an interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRequest {
    #[serde(rename = "appname")]
    pub app_name: String,
    #[serde(rename = "serviceIp")]
    pub service_ip: String,
}

impl Interest {
    /// Creates a new interest stamped with the current time.
    ///
    /// # Arguments
    /// * `app_name` - Unique application name (the scheduling key)
    /// * `service_ip` - The service IP routed for this application
    pub fn new(app_name: impl Into<String>, service_ip: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            app_name: app_name.into(),
            service_ip: service_ip.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl InterestRequest {
    pub fn new(app_name: impl Into<String>, service_ip: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            service_ip: service_ip.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_uses_wire_field_names() {
        let interest = Interest::new("web", "10.0.0.1");
        let json = serde_json::to_value(&interest).unwrap();

        assert_eq!(json["appname"], "web");
        assert_eq!(json["serviceIp"], "10.0.0.1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_new_interest_has_equal_timestamps() {
        let interest = Interest::new("web", "10.0.0.1");
        assert_eq!(interest.created_at, interest.updated_at);
    }
}
