use std::sync::Arc;

use super::{
    flow::{Flow, FlowSpec, Input, Step},
    render::Content,
    settings::InteractionSettings,
    ArtifactAction, Menu, MenuContext, MenuError, MenuHandle, MenuResult, Termination,
};
use crate::event::{ArtifactId, ChannelId};

/// Reactions a single artifact can carry.
pub const MAX_BUTTONS: usize = 20;

pub type ChoiceAction = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ButtonMenuConfig {
    pub text: Option<String>,
    pub description: Option<String>,
    /// Emoji buttons, in display order.
    pub choices: Vec<String>,
    /// Receives the pressed emoji.
    pub action: Option<ChoiceAction>,
    /// Runs after the action, and on timeout or cancel.
    pub final_action: Option<ArtifactAction>,
}

impl ButtonMenuConfig {
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn on_choice(mut self, action: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn on_final(mut self, action: impl Fn(&ArtifactId) + Send + Sync + 'static) -> Self {
        self.final_action = Some(Arc::new(action));
        self
    }
}

/// A menu of arbitrary emoji buttons; the first allowed press ends it.
pub struct ButtonMenu {
    settings: InteractionSettings,
    config: ButtonMenuConfig,
    action: ChoiceAction,
}

impl ButtonMenu {
    pub fn new(settings: InteractionSettings, config: ButtonMenuConfig) -> MenuResult<Self> {
        if config.choices.is_empty() {
            return Err(MenuError::NoChoices);
        }
        if config.choices.len() > MAX_BUTTONS {
            return Err(MenuError::TooManyChoices {
                max: MAX_BUTTONS,
                got: config.choices.len(),
            });
        }
        let has_text = config.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_description = config.description.as_deref().is_some_and(|d| !d.is_empty());
        if !has_text && !has_description {
            return Err(MenuError::NoContent);
        }
        let action = config
            .action
            .clone()
            .ok_or(MenuError::MissingAction("choice"))?;
        Ok(Self {
            settings,
            config,
            action,
        })
    }
}

impl FlowSpec for ButtonMenu {
    fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    fn render(&self, _position: usize) -> Content {
        Content {
            text: self.config.text.clone(),
            description: self.config.description.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    fn buttons(&self) -> Vec<String> {
        self.config.choices.clone()
    }

    fn step(&self, _position: usize, input: Input<'_>) -> Option<Step> {
        let Input::Reaction(emoji) = input else {
            return None;
        };
        self.config
            .choices
            .iter()
            .position(|choice| choice == emoji)
            .map(|i| Step::Finish(Termination::Selected(i)))
    }

    fn finish(&self, artifact: &ArtifactId, _position: usize, termination: &Termination) {
        if let Termination::Selected(index) = termination {
            if let Some(choice) = self.config.choices.get(*index) {
                (self.action)(choice);
            }
        }
        if let Some(final_action) = &self.config.final_action {
            final_action(artifact);
        }
    }
}

impl Menu for ButtonMenu {
    fn display(self, ctx: &MenuContext, channel: &ChannelId) -> MenuHandle {
        Flow::launch(self, ctx, channel, None)
    }

    fn display_on(
        self,
        ctx: &MenuContext,
        channel: &ChannelId,
        artifact: &ArtifactId,
    ) -> MenuHandle {
        Flow::launch(self, ctx, channel, Some(artifact))
    }
}
