//! Roles, capabilities, and the authorization oracle.
//!
//! Every HTTP action is gated by a named [`Capability`]. Handlers never test
//! role names directly; they ask an [`Authorizer`] whether the acting user's
//! role holds the capability, so the policy stays swappable in one place.

use serde::{Deserialize, Serialize};

/// Well-known role names as stored in the `users.role` column.
pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_TRANSLATOR: &str = "translator";
pub const ROLE_ADMINISTRATOR: &str = "administrator";

/// Roles a user may assign to themselves via the role-switch endpoint.
/// `administrator` is deliberately absent: admins are seeded, never
/// self-assigned.
pub const SELF_SERVICE_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_TRANSLATOR];

/// A user's role, parsed from its stored name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Translator,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => ROLE_CUSTOMER,
            Role::Translator => ROLE_TRANSLATOR,
            Role::Administrator => ROLE_ADMINISTRATOR,
        }
    }

    pub fn parse(name: &str) -> Option<Role> {
        match name {
            ROLE_CUSTOMER => Some(Role::Customer),
            ROLE_TRANSLATOR => Some(Role::Translator),
            ROLE_ADMINISTRATOR => Some(Role::Administrator),
            _ => None,
        }
    }
}

/// One capability per guarded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    // Customer actions.
    CreateProject,
    UploadOriginalFile,
    ViewOwnProjects,
    DeleteOwnProject,
    AddProjectFeedback,
    // Translator actions.
    ViewOwnLanguages,
    UpdateOwnLanguages,
    UploadTranslatedFile,
    ViewAssignedProjects,
    // Shared file access (still ownership-checked per project).
    DownloadOriginalFile,
    DownloadTranslatedFile,
    // Administrator actions.
    ViewAllProjects,
    CloseProject,
    RespondToFeedback,
}

/// Opaque boolean oracle deciding whether a role holds a capability.
pub trait Authorizer: Send + Sync {
    fn has_permission(&self, role: Role, capability: Capability) -> bool;
}

/// Default policy: customers manage their own projects, translators their
/// languages and assignments, administrators moderate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolePolicy;

impl Authorizer for RolePolicy {
    fn has_permission(&self, role: Role, capability: Capability) -> bool {
        use Capability::*;
        match role {
            Role::Customer => matches!(
                capability,
                CreateProject
                    | UploadOriginalFile
                    | ViewOwnProjects
                    | DeleteOwnProject
                    | AddProjectFeedback
                    | DownloadOriginalFile
                    | DownloadTranslatedFile
            ),
            Role::Translator => matches!(
                capability,
                ViewOwnLanguages
                    | UpdateOwnLanguages
                    | UploadTranslatedFile
                    | ViewAssignedProjects
                    | DownloadOriginalFile
                    | DownloadTranslatedFile
            ),
            Role::Administrator => {
                matches!(capability, ViewAllProjects | CloseProject | RespondToFeedback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Customer, Role::Translator, Role::Administrator] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_customer_cannot_upload_translation() {
        let policy = RolePolicy;
        assert!(!policy.has_permission(Role::Customer, Capability::UploadTranslatedFile));
        assert!(policy.has_permission(Role::Customer, Capability::CreateProject));
    }

    #[test]
    fn test_translator_cannot_close_projects() {
        let policy = RolePolicy;
        assert!(!policy.has_permission(Role::Translator, Capability::CloseProject));
        assert!(policy.has_permission(Role::Translator, Capability::UploadTranslatedFile));
    }

    #[test]
    fn test_admin_does_not_inherit_customer_capabilities() {
        let policy = RolePolicy;
        assert!(policy.has_permission(Role::Administrator, Capability::CloseProject));
        assert!(!policy.has_permission(Role::Administrator, Capability::CreateProject));
    }

    #[test]
    fn test_both_parties_may_download() {
        let policy = RolePolicy;
        for role in [Role::Customer, Role::Translator] {
            assert!(policy.has_permission(role, Capability::DownloadOriginalFile));
            assert!(policy.has_permission(role, Capability::DownloadTranslatedFile));
        }
    }

    #[test]
    fn test_administrator_not_self_service() {
        assert!(!SELF_SERVICE_ROLES.contains(&ROLE_ADMINISTRATOR));
        assert!(SELF_SERVICE_ROLES.contains(&ROLE_CUSTOMER));
        assert!(SELF_SERVICE_ROLES.contains(&ROLE_TRANSLATOR));
    }
}
