//! Role groups an account can belong to.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{GROUP_ADMINISTRATOR, GROUP_DOCTOR, GROUP_PATIENT};

/// Role group. Serialized by its group name, which is also the key stored
/// in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Администратор")]
    Administrator,
    #[serde(rename = "Врач")]
    Doctor,
    #[serde(rename = "Пациент")]
    Patient,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Doctor, Role::Patient];

    /// Stored group name
    pub fn group_name(self) -> &'static str {
        match self {
            Role::Administrator => GROUP_ADMINISTRATOR,
            Role::Doctor => GROUP_DOCTOR,
            Role::Patient => GROUP_PATIENT,
        }
    }

    /// Resolve a stored group name. Unknown groups carry no permissions.
    pub fn from_group_name(name: &str) -> Option<Self> {
        match name {
            GROUP_ADMINISTRATOR => Some(Role::Administrator),
            GROUP_DOCTOR => Some(Role::Doctor),
            GROUP_PATIENT => Some(Role::Patient),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.group_name())
    }
}
