use std::sync::Arc;

use super::{
    flow::{Flow, FlowSpec, Input, Step},
    pager::Pager,
    render::Content,
    settings::InteractionSettings,
    ArtifactAction, IndexAction, Menu, MenuContext, MenuError, MenuHandle, MenuResult,
    Termination, CANCEL, CONFIRM, DOWN, UP,
};
use crate::event::{ArtifactId, ChannelId};

#[derive(Clone)]
pub struct SelectionDialogConfig {
    pub text: Option<String>,
    pub title: Option<String>,
    pub choices: Vec<String>,
    /// Moving past either end wraps around.
    pub loop_selections: bool,
    /// 1-based choice highlighted on display.
    pub default_selection: usize,
    pub left_marker: String,
    pub right_marker: String,
    /// Receives the 1-based confirmed choice.
    pub selection: Option<IndexAction>,
    /// Runs on cancel and on timeout.
    pub cancel: Option<ArtifactAction>,
}

impl Default for SelectionDialogConfig {
    fn default() -> Self {
        Self {
            text: None,
            title: None,
            choices: Vec::new(),
            loop_selections: false,
            default_selection: 1,
            left_marker: "▶".to_string(),
            right_marker: "◀".to_string(),
            selection: None,
            cancel: None,
        }
    }
}

impl SelectionDialogConfig {
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_selection(
        mut self,
        action: impl Fn(&ArtifactId, usize) + Send + Sync + 'static,
    ) -> Self {
        self.selection = Some(Arc::new(action));
        self
    }

    pub fn on_cancel(mut self, action: impl Fn(&ArtifactId) + Send + Sync + 'static) -> Self {
        self.cancel = Some(Arc::new(action));
        self
    }
}

/// A cursor moved over a list with 🔼/🔽 and confirmed with ✅.
///
/// The flow position is the cursor index rather than a page.
pub struct SelectionDialog {
    settings: InteractionSettings,
    config: SelectionDialogConfig,
    cursor: Pager,
    selection: IndexAction,
}

impl SelectionDialog {
    pub fn new(settings: InteractionSettings, config: SelectionDialogConfig) -> MenuResult<Self> {
        if config.choices.is_empty() {
            return Err(MenuError::NoChoices);
        }
        let selection = config
            .selection
            .clone()
            .ok_or(MenuError::MissingAction("selection"))?;
        let cursor = Pager::new(config.choices.len(), config.loop_selections, 0);
        Ok(Self {
            settings,
            config,
            cursor,
            selection,
        })
    }
}

impl FlowSpec for SelectionDialog {
    fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    fn start(&self) -> usize {
        self.config
            .default_selection
            .clamp(1, self.config.choices.len())
            - 1
    }

    fn render(&self, position: usize) -> Content {
        let description = self
            .config
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                if i == position {
                    format!(
                        "{} {} {}",
                        self.config.left_marker, choice, self.config.right_marker
                    )
                } else {
                    choice.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Content {
            text: self.config.text.clone(),
            title: self.config.title.clone(),
            description,
            ..Default::default()
        }
    }

    fn buttons(&self) -> Vec<String> {
        [UP, DOWN, CONFIRM, CANCEL].map(String::from).to_vec()
    }

    fn step(&self, position: usize, input: Input<'_>) -> Option<Step> {
        match input {
            Input::Reaction(UP) => self.cursor.previous(position).map(Step::Goto),
            Input::Reaction(DOWN) => self.cursor.next(position).map(Step::Goto),
            Input::Reaction(CONFIRM) => Some(Step::Finish(Termination::Selected(position))),
            Input::Reaction(CANCEL) => Some(Step::Finish(Termination::Cancelled)),
            _ => None,
        }
    }

    fn finish(&self, artifact: &ArtifactId, _position: usize, termination: &Termination) {
        match termination {
            Termination::Selected(index) => (self.selection)(artifact, index + 1),
            _ => {
                if let Some(cancel) = &self.config.cancel {
                    cancel(artifact);
                }
            }
        }
    }
}

impl Menu for SelectionDialog {
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
