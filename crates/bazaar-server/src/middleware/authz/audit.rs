//! Authorization audit logging.

use super::types::{ActionLabel, DenyReason, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Authorization audit event.
#[derive(Debug, Serialize)]
pub struct AuthzAuditEvent {
    pub timestamp: DateTime<Utc>,
    pub user_id: Uuid,
    pub role: Option<Role>,
    pub action: String,
    pub granted: bool,
    pub reason: Option<String>,
    #[serde(skip)]
    config_defect: bool,
}

impl AuthzAuditEvent {
    pub fn granted(user_id: Uuid, role: Role, action: &ActionLabel) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            role: Some(role),
            action: action.to_string(),
            granted: true,
            reason: None,
            config_defect: false,
        }
    }

    pub fn denied(user_id: Uuid, role: Option<Role>, action: &str, reason: &DenyReason) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            role,
            action: action.to_string(),
            granted: false,
            reason: Some(reason.code().to_string()),
            config_defect: reason.is_configuration_defect(),
        }
    }

    pub fn log(&self) {
        if self.granted {
            debug!(
                event = "authz_granted",
                user_id = %self.user_id,
                role = ?self.role,
                action = %self.action,
                "Authorization granted"
            );
        } else if self.config_defect {
            // A route or role the permission table does not cover.
            error!(
                event = "authz_denied",
                user_id = %self.user_id,
                role = ?self.role,
                action = %self.action,
                reason = ?self.reason,
                "Authorization denied by permission configuration defect"
            );
        } else {
            warn!(
                event = "authz_denied",
                user_id = %self.user_id,
                role = ?self.role,
                action = %self.action,
                reason = ?self.reason,
                "Authorization denied"
            );
        }
    }
}
