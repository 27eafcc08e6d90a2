use std::{collections::HashSet, time::Duration};

use crate::{
    config::MenuDefaults,
    event::{ActorId, ChannelId, RoleId},
};

/// Resolves the roles an actor holds where a menu is displayed.
#[mockall::automock]
pub trait RoleLookup: Send + Sync {
    fn roles_of(&self, actor: &ActorId, channel: &ChannelId) -> Vec<RoleId>;
}

/// What happens to the rendered artifact once a menu terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cleanup {
    #[default]
    Keep,
    ClearReactions,
    Delete,
}

/// Settings shared by every menu kind: who may interact, and for how long.
///
/// With no users and no roles configured anyone may interact.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSettings {
    pub users: HashSet<ActorId>,
    pub roles: HashSet<RoleId>,
    pub timeout: Duration,
    pub cleanup: Cleanup,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from(&MenuDefaults::default())
    }
}

impl From<&MenuDefaults> for InteractionSettings {
    fn from(defaults: &MenuDefaults) -> Self {
        Self {
            users: HashSet::new(),
            roles: HashSet::new(),
            timeout: defaults.timeout,
            cleanup: Cleanup::default(),
        }
    }
}

impl InteractionSettings {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn users<I, A>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ActorId>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleId>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.users.is_empty() && self.roles.is_empty()
    }

    /// Whether `actor` may advance a menu shown in `channel`.
    ///
    /// Roles are only looked up when a role restriction is configured and the actor
    /// is not explicitly listed.
    pub fn allows(&self, actor: &ActorId, channel: &ChannelId, lookup: &dyn RoleLookup) -> bool {
        if self.is_unrestricted() || self.users.contains(actor) {
            return true;
        }
        !self.roles.is_empty()
            && lookup
                .roles_of(actor, channel)
                .iter()
                .any(|role| self.roles.contains(role))
    }
}
