//! Admin authorization for control commands.

use std::collections::HashSet;

use crate::domain::foundation::UserId;

/// Who may run admin control commands.
///
/// A user is an admin when their id is listed or they hold a role named
/// exactly `role_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    admin_ids: HashSet<UserId>,
    role_name: String,
}

impl AdminPolicy {
    pub fn new(admin_ids: impl IntoIterator<Item = UserId>, role_name: impl Into<String>) -> Self {
        Self {
            admin_ids: admin_ids.into_iter().collect(),
            role_name: role_name.into(),
        }
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn is_admin(&self, user_id: &UserId, roles: &[String]) -> bool {
        self.admin_ids.contains(user_id)
            || (!self.role_name.is_empty() && roles.iter().any(|role| role == &self.role_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn listed_id_is_admin() {
        let policy = AdminPolicy::new(vec![user("1")], "Admin");
        assert!(policy.is_admin(&user("1"), &[]));
        assert!(!policy.is_admin(&user("2"), &[]));
    }

    #[test]
    fn matching_role_is_admin() {
        let policy = AdminPolicy::new(Vec::new(), "Admin");
        assert!(policy.is_admin(&user("2"), &["Member".into(), "Admin".into()]));
        assert!(!policy.is_admin(&user("2"), &["admin".into()]));
    }

    #[test]
    fn empty_role_name_matches_nothing() {
        let policy = AdminPolicy::new(Vec::new(), "");
        assert!(!policy.is_admin(&user("2"), &["".into()]));
    }
}
