//! Authorization types: roles, action labels and the permission table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Action labels bound to routes.
pub mod actions {
    pub const GET_PRODUCTS: &str = "get_products";
    pub const GET_PRODUCTS_ID: &str = "get_products_id";
    pub const COUNT_PRODUCTS: &str = "count_products";
    pub const POST_PRODUCTS: &str = "post_products";
    pub const UPDATE_PRODUCTS: &str = "update_products";
    pub const DELETE_PRODUCTS: &str = "delete_products";

    pub const GET_CATEGORIES: &str = "get_categories";
    pub const GET_CATEGORIES_ID: &str = "get_categories_id";
    pub const COUNT_CATEGORIES: &str = "count_categories";
    pub const POST_CATEGORIES: &str = "post_categories";
    pub const UPDATE_CATEGORIES: &str = "update_categories";
    pub const DELETE_CATEGORIES: &str = "delete_categories";
}

static ACTION_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(_[a-z]+)*$").expect("action label pattern"));

/// Roles an identity can hold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "vendor" => Ok(Self::Vendor),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// The caller as the authorizer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

/// A well-formed, statically bound operation name such as `post_products`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionLabel(Cow<'static, str>);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed action label '{0}'")]
pub struct MalformedActionLabel(pub String);

impl ActionLabel {
    /// Parse a label bound at route registration.
    pub fn parse(label: &'static str) -> Result<Self, MalformedActionLabel> {
        Self::check(Cow::Borrowed(label))
    }

    /// Parse a label that is only known at runtime.
    pub fn parse_owned(label: impl Into<String>) -> Result<Self, MalformedActionLabel> {
        Self::check(Cow::Owned(label.into()))
    }

    fn check(label: Cow<'static, str>) -> Result<Self, MalformedActionLabel> {
        if ACTION_LABEL_RE.is_match(&label) {
            Ok(Self(label))
        } else {
            Err(MalformedActionLabel(label.into_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("Caller identity no longer exists")]
    UnknownIdentity,

    #[error("No permission found for role '{role}'")]
    NoPermissionEntry { role: Role },

    #[error("Action '{action}' not allowed for role '{role}'")]
    ActionNotPermitted { role: Role, action: String },

    #[error("Route is bound to a malformed action label '{label}'")]
    MalformedAction { label: String },
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownIdentity => "unknown_identity",
            Self::NoPermissionEntry { .. } => "no_permission_entry",
            Self::ActionNotPermitted { .. } => "action_not_permitted",
            Self::MalformedAction { .. } => "invalid_action",
        }
    }

    /// Denials caused by a gap in static configuration rather than by the caller.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::NoPermissionEntry { .. } | Self::MalformedAction { .. }
        )
    }
}

/// Outcome of a single authorization stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// One row of the permission table.
#[derive(Debug, Clone)]
pub struct PermissionEntry {
    pub role: Role,
    pub actions: Vec<&'static str>,
}

impl PermissionEntry {
    pub fn new(role: Role, actions: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            role,
            actions: actions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionTableError {
    #[error("role '{0}' has more than one permission entry")]
    DuplicateRole(Role),

    #[error("role '{role}': {source}")]
    MalformedAction {
        role: Role,
        #[source]
        source: MalformedActionLabel,
    },
}

/// Static role -> allowed-action mapping.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    entries: HashMap<Role, HashSet<ActionLabel>>,
}

static BUILTIN: Lazy<Arc<PermissionTable>> = Lazy::new(|| {
    Arc::new(
        PermissionTable::from_entries(builtin_entries())
            .expect("built-in permission table is well formed"),
    )
});

fn builtin_entries() -> Vec<PermissionEntry> {
    use actions::*;

    let browse = [
        GET_PRODUCTS,
        GET_PRODUCTS_ID,
        COUNT_PRODUCTS,
        GET_CATEGORIES,
        GET_CATEGORIES_ID,
        COUNT_CATEGORIES,
    ];
    let manage = [
        POST_PRODUCTS,
        UPDATE_PRODUCTS,
        DELETE_PRODUCTS,
        POST_CATEGORIES,
        UPDATE_CATEGORIES,
        DELETE_CATEGORIES,
    ];

    vec![
        PermissionEntry::new(Role::User, browse),
        PermissionEntry::new(Role::Vendor, browse.into_iter().chain(manage)),
    ]
}

impl PermissionTable {
    /// Build a table, rejecting duplicate roles and malformed labels.
    pub fn from_entries(
        entries: impl IntoIterator<Item = PermissionEntry>,
    ) -> Result<Self, PermissionTableError> {
        let mut table = HashMap::new();

        for entry in entries {
            let actions = entry
                .actions
                .into_iter()
                .map(ActionLabel::parse)
                .collect::<Result<HashSet<_>, _>>()
                .map_err(|source| PermissionTableError::MalformedAction {
                    role: entry.role,
                    source,
                })?;

            if table.insert(entry.role, actions).is_some() {
                return Err(PermissionTableError::DuplicateRole(entry.role));
            }
        }

        Ok(Self { entries: table })
    }

    /// The process-wide table used by the server.
    pub fn builtin() -> Arc<PermissionTable> {
        BUILTIN.clone()
    }

    /// Role-level decision; ownership is enforced later by the handler.
    pub fn decide(&self, role: Role, action: &ActionLabel) -> Decision {
        match self.entries.get(&role) {
            None => Decision::Deny(DenyReason::NoPermissionEntry { role }),
            Some(actions) if actions.contains(action) => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::ActionNotPermitted {
                role,
                action: action.to_string(),
            }),
        }
    }
}
