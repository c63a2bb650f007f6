//! Access policy - who may do what.
//!
//! A single table keyed by (role, resource, action) decides the access level.
//! Services ask the caller's [`Principal`] to authorize an operation before
//! they touch storage; the resulting [`Scope`] narrows queries for callers
//! that may only see their own patient records.

use uuid::Uuid;

use crate::domain::Role;
use crate::errors::{AppError, AppResult};

/// Something a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Account,
    Position,
    Specialization,
    Employee,
    Schedule,
    Doctor,
    Office,
    Service,
    Patient,
    MedicalTest,
    Appointment,
    /// Self-service patient sign-up
    Registration,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Account,
        Resource::Position,
        Resource::Specialization,
        Resource::Employee,
        Resource::Schedule,
        Resource::Doctor,
        Resource::Office,
        Resource::Service,
        Resource::Patient,
        Resource::MedicalTest,
        Resource::Appointment,
        Resource::Registration,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::List,
        Action::View,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];
}

/// Access level granted for an operation. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Denied,
    /// Only records of the caller's own patient card
    Own,
    Any,
}

/// The policy table. `None` is the anonymous baseline every caller holds.
pub fn grant(role: Option<Role>, resource: Resource, action: Action) -> Access {
    use Access::{Any, Denied, Own};
    use Action::{Create, Delete, List, Update, View};

    match (role, resource, action) {
        (Some(Role::Administrator), _, _) => Any,

        (_, Resource::Registration, Create) => Any,
        (_, Resource::Service | Resource::Doctor, List | View) => Any,

        (Some(Role::Doctor), Resource::Patient, List | View) => Any,
        (Some(Role::Doctor), Resource::Appointment | Resource::MedicalTest, View | Create | Update) => {
            Any
        }

        (Some(Role::Patient), Resource::Patient, View) => Own,
        (Some(Role::Patient), Resource::Appointment | Resource::MedicalTest, View) => Own,

        (_, _, List | View | Create | Update | Delete) => Denied,
    }
}

/// Which records a granted operation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Records belonging to this patient only
    Patient(Uuid),
}

impl Scope {
    pub fn patient_id(self) -> Option<Uuid> {
        match self {
            Scope::All => None,
            Scope::Patient(id) => Some(id),
        }
    }

    /// Error for a lookup that matched nothing under this scope.
    ///
    /// A scoped caller cannot tell a foreign record from a missing one.
    pub fn miss(self) -> AppError {
        match self {
            Scope::All => AppError::NotFound,
            Scope::Patient(_) => AppError::Forbidden,
        }
    }
}

/// The caller of an operation, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    account_id: Option<Uuid>,
    roles: Vec<Role>,
    patient_id: Option<Uuid>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            account_id: None,
            roles: Vec::new(),
            patient_id: None,
        }
    }

    pub fn authenticated(account_id: Uuid, roles: Vec<Role>, patient_id: Option<Uuid>) -> Self {
        Self {
            account_id: Some(account_id),
            roles,
            patient_id,
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        self.account_id
    }

    pub fn patient_id(&self) -> Option<Uuid> {
        self.patient_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_anonymous(&self) -> bool {
        self.account_id.is_none()
    }

    /// Strongest access over the caller's roles and the anonymous baseline.
    pub fn access(&self, resource: Resource, action: Action) -> Access {
        self.roles
            .iter()
            .map(|role| grant(Some(*role), resource, action))
            .chain(std::iter::once(grant(None, resource, action)))
            .max()
            .unwrap_or(Access::Denied)
    }

    /// Check the role-level grant and resolve the record scope.
    ///
    /// `Own` access without a linked patient card is denied.
    pub fn authorize(&self, resource: Resource, action: Action) -> AppResult<Scope> {
        match self.access(resource, action) {
            Access::Any => Ok(Scope::All),
            Access::Own => self
                .patient_id
                .map(Scope::Patient)
                .ok_or(AppError::Forbidden),
            Access::Denied => {
                tracing::debug!(
                    account_id = ?self.account_id,
                    ?resource,
                    ?action,
                    "Access denied"
                );
                Err(AppError::Forbidden)
            }
        }
    }
}
