//! # Interaction Events
//!
//! Concrete event model delivered by the chat transport. Every event carries a
//! [`EventKind`] tag used by the [`WaitRegistry`](super::waiter::WaitRegistry) to
//! route it to pending waits.
//!
//! Reactions, typed messages and artifact deletions share the broader
//! [`EventKind::Interaction`] tag, so a single wait can accept every input shape for
//! the same logical step, including the removal of the artifact it is attached to.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::waiter::WaitEvent;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identity of the user acting on an artifact.
    ActorId
);
string_id!(
    /// Role held by an actor within a channel's scope.
    RoleId
);
string_id!(
    /// Where artifacts are rendered and typed input arrives.
    ChannelId
);
string_id!(
    /// Identity of a rendered artifact (a sent message), assigned by the transport.
    ArtifactId
);

/// Type tag of an [`Event`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display,
)]
pub enum EventKind {
    ReactionAdded,
    MessageReceived,
    ArtifactDeleted,
    /// Supertype of reactions, messages and artifact deletions.
    Interaction,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ReactionAdded {
        artifact: ArtifactId,
        channel: ChannelId,
        actor: ActorId,
        emoji: String,
    },
    MessageReceived {
        message: ArtifactId,
        channel: ChannelId,
        actor: ActorId,
        content: String,
    },
    ArtifactDeleted {
        artifact: ArtifactId,
        channel: ChannelId,
    },
    Shutdown,
}

impl Event {
    pub fn reaction(
        artifact: impl Into<ArtifactId>,
        channel: impl Into<ChannelId>,
        actor: impl Into<ActorId>,
        emoji: &str,
    ) -> Self {
        Event::ReactionAdded {
            artifact: artifact.into(),
            channel: channel.into(),
            actor: actor.into(),
            emoji: emoji.to_string(),
        }
    }

    pub fn message(
        message: impl Into<ArtifactId>,
        channel: impl Into<ChannelId>,
        actor: impl Into<ActorId>,
        content: &str,
    ) -> Self {
        Event::MessageReceived {
            message: message.into(),
            channel: channel.into(),
            actor: actor.into(),
            content: content.to_string(),
        }
    }

    /// The acting user, for interaction events.
    pub fn actor(&self) -> Option<&ActorId> {
        match self {
            Event::ReactionAdded { actor, .. } | Event::MessageReceived { actor, .. } => {
                Some(actor)
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> Option<&ChannelId> {
        match self {
            Event::ReactionAdded { channel, .. }
            | Event::MessageReceived { channel, .. }
            | Event::ArtifactDeleted { channel, .. } => Some(channel),
            Event::Shutdown => None,
        }
    }

    /// The reaction emoji if this is a reaction on `artifact`.
    pub fn reaction_on(&self, artifact: &ArtifactId) -> Option<&str> {
        match self {
            Event::ReactionAdded {
                artifact: target,
                emoji,
                ..
            } if target == artifact => Some(emoji.as_str()),
            _ => None,
        }
    }

    /// Whether this reports the deletion of `artifact`.
    pub fn deletes(&self, artifact: &ArtifactId) -> bool {
        matches!(self, Event::ArtifactDeleted { artifact: target, .. } if target == artifact)
    }

    /// The typed content if this is a message in `channel`.
    pub fn message_in(&self, channel: &ChannelId) -> Option<&str> {
        match self {
            Event::MessageReceived {
                channel: target,
                content,
                ..
            } if target == channel => Some(content.as_str()),
            _ => None,
        }
    }
}

impl WaitEvent for Event {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Event::ReactionAdded { .. } => EventKind::ReactionAdded,
            Event::MessageReceived { .. } => EventKind::MessageReceived,
            Event::ArtifactDeleted { .. } => EventKind::ArtifactDeleted,
            Event::Shutdown => EventKind::Shutdown,
        }
    }

    fn supertypes(&self) -> Vec<EventKind> {
        match self {
            Event::ReactionAdded { .. }
            | Event::MessageReceived { .. }
            | Event::ArtifactDeleted { .. } => vec![EventKind::Interaction],
            Event::Shutdown => Vec::new(),
        }
    }

    fn is_shutdown(&self) -> bool {
        matches!(self, Event::Shutdown)
    }
}
