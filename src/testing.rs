//! In-memory collaborators for driving menus without a transport.
//!
//! [`RecordingSink`] records every outbound request and hands out artifact ids;
//! [`StaticRoles`] answers role lookups from a fixed table.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use crate::{
    event::{ActorId, ArtifactId, ChannelId, RoleId},
    menu::{ArtifactSink, Content, Continuation, RoleLookup},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Send {
        channel: ChannelId,
        artifact: ArtifactId,
        content: Content,
    },
    Edit {
        artifact: ArtifactId,
        content: Content,
    },
    AddReactions {
        artifact: ArtifactId,
        emojis: Vec<String>,
    },
    RemoveReaction {
        artifact: ArtifactId,
        actor: ActorId,
        emoji: String,
    },
    ClearReactions {
        artifact: ArtifactId,
    },
    Delete {
        artifact: ArtifactId,
    },
}

type Deferred = Box<dyn FnOnce() + Send + 'static>;

/// An [`ArtifactSink`] that records calls instead of talking to a transport.
///
/// Continuations run immediately unless the sink was created with
/// [`RecordingSink::deferred`], in which case they wait for [`RecordingSink::release`].
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    next_id: AtomicUsize,
    defer: bool,
    pending: Mutex<Vec<Deferred>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deferred() -> Self {
        Self {
            defer: true,
            ..Default::default()
        }
    }

    /// Runs every held continuation in the order they were issued.
    pub fn release(&self) -> usize {
        let mut released = 0;
        // continuations may issue further requests, which are held again
        loop {
            let batch = std::mem::take(&mut *lock(&self.pending));
            if batch.is_empty() {
                return released;
            }
            released += batch.len();
            for continuation in batch {
                continuation();
            }
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        lock(&self.calls).clone()
    }

    /// Ids of every artifact sent so far.
    pub fn sent(&self) -> Vec<ArtifactId> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                SinkCall::Send { artifact, .. } => Some(artifact.clone()),
                _ => None,
            })
            .collect()
    }

    /// The content `artifact` shows now, after any edits.
    pub fn content_of(&self, artifact: &ArtifactId) -> Option<Content> {
        lock(&self.calls).iter().rev().find_map(|call| match call {
            SinkCall::Send {
                artifact: target,
                content,
                ..
            }
            | SinkCall::Edit {
                artifact: target,
                content,
            } if target == artifact => Some(content.clone()),
            _ => None,
        })
    }

    pub fn edits_of(&self, artifact: &ArtifactId) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, SinkCall::Edit { artifact: target, .. } if target == artifact))
            .count()
    }

    pub fn reactions_on(&self, artifact: &ArtifactId) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                SinkCall::AddReactions {
                    artifact: target,
                    emojis,
                } if target == artifact => Some(emojis.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn was_deleted(&self, artifact: &ArtifactId) -> bool {
        lock(&self.calls)
            .iter()
            .any(|call| matches!(call, SinkCall::Delete { artifact: target } if target == artifact))
    }

    fn record(&self, call: SinkCall) {
        lock(&self.calls).push(call);
    }

    fn complete(&self, continuation: Deferred) {
        if self.defer {
            lock(&self.pending).push(continuation);
        } else {
            continuation();
        }
    }
}

impl ArtifactSink for RecordingSink {
    fn send(&self, channel: &ChannelId, content: Content, then: Continuation<ArtifactId>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let artifact = ArtifactId::new(format!("artifact-{id}"));
        self.record(SinkCall::Send {
            channel: channel.clone(),
            artifact: artifact.clone(),
            content,
        });
        self.complete(Box::new(move || then(artifact)));
    }

    fn edit(&self, artifact: &ArtifactId, content: Content) {
        self.record(SinkCall::Edit {
            artifact: artifact.clone(),
            content,
        });
    }

    fn add_reactions(&self, artifact: &ArtifactId, emojis: Vec<String>, then: Continuation<()>) {
        self.record(SinkCall::AddReactions {
            artifact: artifact.clone(),
            emojis,
        });
        self.complete(Box::new(move || then(())));
    }

    fn remove_reaction(&self, artifact: &ArtifactId, actor: &ActorId, emoji: &str) {
        self.record(SinkCall::RemoveReaction {
            artifact: artifact.clone(),
            actor: actor.clone(),
            emoji: emoji.to_string(),
        });
    }

    fn clear_reactions(&self, artifact: &ArtifactId) {
        self.record(SinkCall::ClearReactions {
            artifact: artifact.clone(),
        });
    }

    fn delete(&self, artifact: &ArtifactId) {
        self.record(SinkCall::Delete {
            artifact: artifact.clone(),
        });
    }
}

/// Role table keyed by actor; the channel is ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticRoles {
    roles: HashMap<ActorId, Vec<RoleId>>,
}

impl StaticRoles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, actor: impl Into<ActorId>, role: impl Into<RoleId>) -> Self {
        self.roles.entry(actor.into()).or_default().push(role.into());
        self
    }
}

impl RoleLookup for StaticRoles {
    fn roles_of(&self, actor: &ActorId, _channel: &ChannelId) -> Vec<RoleId> {
        self.roles.get(actor).cloned().unwrap_or_default()
    }
}
