use std::collections::{HashMap, HashSet};

use crate::model::User;

/// Maps source logins to target logins and filters users that must not be
/// assigned on the target.
#[derive(Debug, Clone, Default)]
pub struct UserAliasResolver {
    aliases: HashMap<String, String>,
    skip_users: HashSet<String>,
}

impl UserAliasResolver {
    pub fn new(aliases: HashMap<String, String>, skip_users: impl IntoIterator<Item = String>) -> Self {
        Self {
            aliases,
            skip_users: skip_users.into_iter().collect(),
        }
    }

    /// Returns the target login and whether an alias was applied.
    pub fn resolve(&self, login: &str) -> (String, bool) {
        match self.aliases.get(login) {
            Some(alias) => (alias.clone(), true),
            None => (login.to_string(), false),
        }
    }

    pub fn is_skipped(&self, login: &str) -> bool {
        self.skip_users.contains(login)
    }

    pub fn target_assignees(&self, users: &[User]) -> Vec<String> {
        users
            .iter()
            .filter(|u| !self.is_skipped(&u.login))
            .map(|u| self.resolve(&u.login).0)
            .collect()
    }
}
