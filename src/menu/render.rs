//! Outbound boundary for rendered artifacts.
//!
//! Every call is fire-and-forget: the sink issues the request and returns at once.
//! Where a menu must know the request completed (the artifact id of a sent message,
//! or that its buttons are attached) it passes a [`Continuation`].

use crate::event::{ActorId, ArtifactId, ChannelId};

pub type Continuation<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Displayable content of one menu page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    /// Plain text shown above the body.
    pub text: Option<String>,
    pub title: Option<String>,
    pub description: String,
    pub footer: Option<String>,
    pub image: Option<String>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
            && self.title.is_none()
            && self.description.is_empty()
            && self.image.is_none()
    }
}

pub trait ArtifactSink: Send + Sync {
    /// Sends a new artifact; `then` receives its id once delivered.
    fn send(&self, channel: &ChannelId, content: Content, then: Continuation<ArtifactId>);

    fn edit(&self, artifact: &ArtifactId, content: Content);

    /// Attaches reaction buttons in order; `then` runs after the last one.
    fn add_reactions(&self, artifact: &ArtifactId, emojis: Vec<String>, then: Continuation<()>);

    /// Removes one actor's reaction so the same button can be pressed again.
    fn remove_reaction(&self, artifact: &ArtifactId, actor: &ActorId, emoji: &str);

    fn clear_reactions(&self, artifact: &ArtifactId);

    fn delete(&self, artifact: &ArtifactId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        assert!(Content::default().is_empty());
        assert!(Content {
            text: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
        assert!(!Content {
            description: "pick one".to_string(),
            ..Default::default()
        }
        .is_empty());
    }
}
