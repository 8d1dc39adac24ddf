//! Role names and the navigation each role is offered.
//!
//! Role names must match the backend's seeded roles.

use serde::Serialize;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Parse a backend role name. Unknown names get the least privilege.
    pub fn from_name(name: &str) -> Self {
        match name {
            ROLE_SUPER_ADMIN => Self::SuperAdmin,
            ROLE_ADMIN => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Admin => ROLE_ADMIN,
            Self::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }

    /// Wizard builder and analytics.
    pub fn can_manage_wizards(&self) -> bool {
        *self >= Self::Admin
    }

    /// User administration.
    pub fn can_manage_users(&self) -> bool {
        *self == Self::SuperAdmin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub min_role: Role,
}

/// Every navigation entry, in display order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/", min_role: Role::User },
    NavItem { label: "Template Gallery", path: "/templates", min_role: Role::User },
    NavItem { label: "Wizard Builder", path: "/admin/wizard-builder", min_role: Role::Admin },
    NavItem { label: "Run Wizard", path: "/wizards", min_role: Role::User },
    NavItem { label: "My Runs", path: "/runs", min_role: Role::User },
    NavItem { label: "Store", path: "/store", min_role: Role::User },
    NavItem { label: "Analytics", path: "/admin/analytics", min_role: Role::Admin },
    NavItem { label: "Users", path: "/admin/users", min_role: Role::SuperAdmin },
];

/// Navigation entries visible to `role`.
pub fn navigation_for(role: Role) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .copied()
        .filter(|item| role >= item.min_role)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(role: Role) -> Vec<&'static str> {
        navigation_for(role).into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn user_sees_only_user_entries() {
        assert_eq!(
            labels(Role::User),
            ["Dashboard", "Template Gallery", "Run Wizard", "My Runs", "Store"]
        );
    }

    #[test]
    fn admin_adds_builder_and_analytics() {
        let items = labels(Role::Admin);
        assert!(items.contains(&"Wizard Builder"));
        assert!(items.contains(&"Analytics"));
        assert!(!items.contains(&"Users"));
    }

    #[test]
    fn super_admin_sees_everything() {
        assert_eq!(navigation_for(Role::SuperAdmin).len(), NAV_ITEMS.len());
    }

    #[test]
    fn unknown_role_name_is_user() {
        assert_eq!(Role::from_name("creator"), Role::User);
        assert_eq!(Role::from_name("super_admin"), Role::SuperAdmin);
        assert!(!Role::User.can_manage_wizards());
        assert!(Role::Admin.can_manage_wizards());
        assert!(!Role::Admin.can_manage_users());
    }
}
