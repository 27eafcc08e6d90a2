//! # Ordered Menu
//!
//! Up to ten labelled options shown next to number (1️⃣..🔟) or letter (🇦..🇯)
//! buttons. With typed input enabled, an allowed actor may also answer by sending
//! the number or letter as a message in the same channel.
//!
//! Both answers are accepted by one wait registered under
//! [`EventKind::Interaction`](crate::event::EventKind::Interaction); whichever arrives
//! first consumes it, so the selection action can never run twice.

use std::sync::Arc;

use super::{
    flow::{Flow, FlowSpec, Input, Step},
    render::Content,
    settings::InteractionSettings,
    ArtifactAction, IndexAction, Menu, MenuContext, MenuError, MenuHandle, MenuResult,
    Termination, CANCEL,
};
use crate::event::{ArtifactId, ChannelId};

pub const MAX_CHOICES: usize = 10;

pub const NUMBERS: [&str; MAX_CHOICES] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
    "\u{1f51f}",
];

pub const LETTERS: [&str; MAX_CHOICES] = [
    "\u{1f1e6}", "\u{1f1e7}", "\u{1f1e8}", "\u{1f1e9}", "\u{1f1ea}", "\u{1f1eb}", "\u{1f1ec}",
    "\u{1f1ed}", "\u{1f1ee}", "\u{1f1ef}",
];

#[derive(Clone)]
pub struct OrderedMenuConfig {
    pub text: Option<String>,
    pub description: Option<String>,
    pub choices: Vec<String>,
    /// Letters instead of numbers.
    pub use_letters: bool,
    pub allow_typed_input: bool,
    pub cancel_button: bool,
    /// Receives the 1-based choice.
    pub selection: Option<IndexAction>,
    /// Runs on cancel and on timeout.
    pub cancel: Option<ArtifactAction>,
}

impl Default for OrderedMenuConfig {
    fn default() -> Self {
        Self {
            text: None,
            description: None,
            choices: Vec::new(),
            use_letters: false,
            allow_typed_input: true,
            cancel_button: true,
            selection: None,
            cancel: None,
        }
    }
}

impl OrderedMenuConfig {
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

pub struct OrderedMenu {
    settings: InteractionSettings,
    config: OrderedMenuConfig,
    selection: IndexAction,
}

impl OrderedMenu {
    /// # Errors
    ///
    /// * `MenuError::NoChoices` / `MenuError::TooManyChoices` - outside 1..=10 choices
    /// * `MenuError::NoContent` - neither text nor description
    /// * `MenuError::MissingAction` - no selection action
    pub fn new(settings: InteractionSettings, config: OrderedMenuConfig) -> MenuResult<Self> {
        if config.choices.is_empty() {
            return Err(MenuError::NoChoices);
        }
        if config.choices.len() > MAX_CHOICES {
            return Err(MenuError::TooManyChoices {
                max: MAX_CHOICES,
                got: config.choices.len(),
            });
        }
        let has_text = config.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_description = config.description.as_deref().is_some_and(|d| !d.is_empty());
        if !has_text && !has_description {
            return Err(MenuError::NoContent);
        }
        let selection = config
            .selection
            .clone()
            .ok_or(MenuError::MissingAction("selection"))?;

        Ok(Self {
            settings,
            config,
            selection,
        })
    }

    fn emoji(&self, index: usize) -> &'static str {
        if self.config.use_letters {
            LETTERS[index]
        } else {
            NUMBERS[index]
        }
    }

    fn typed_choice(&self, text: &str) -> Option<usize> {
        let text = text.trim();
        let index = if self.config.use_letters {
            let mut chars = text.chars();
            let letter = chars.next()?.to_ascii_lowercase();
            if chars.next().is_some() || !letter.is_ascii_lowercase() {
                return None;
            }
            (letter as u8 - b'a') as usize
        } else {
            text.parse::<usize>().ok()?.checked_sub(1)?
        };
        (index < self.config.choices.len()).then_some(index)
    }
}

impl FlowSpec for OrderedMenu {
    fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    fn render(&self, _position: usize) -> Content {
        let description = self
            .config
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("{} {}", self.emoji(i), choice))
            .collect::<Vec<_>>()
            .join("\n");
        let description = match &self.config.description {
            Some(header) if !header.is_empty() => format!("{}\n\n{}", header, description),
            _ => description,
        };
        Content {
            text: self.config.text.clone(),
            description,
            ..Default::default()
        }
    }

    fn buttons(&self) -> Vec<String> {
        let mut buttons: Vec<String> = (0..self.config.choices.len())
            .map(|i| self.emoji(i).to_string())
            .collect();
        if self.config.cancel_button {
            buttons.push(CANCEL.to_string());
        }
        buttons
    }

    fn accepts_text(&self) -> bool {
        self.config.allow_typed_input
    }

    fn step(&self, _position: usize, input: Input<'_>) -> Option<Step> {
        match input {
            Input::Reaction(emoji) if self.config.cancel_button && emoji == CANCEL => {
                Some(Step::Finish(Termination::Cancelled))
            }
            Input::Reaction(emoji) => (0..self.config.choices.len())
                .find(|&i| self.emoji(i) == emoji)
                .map(|i| Step::Finish(Termination::Selected(i))),
            Input::Text(text) => self
                .typed_choice(text)
                .map(|i| Step::Finish(Termination::Selected(i))),
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

impl Menu for OrderedMenu {
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(choices: &[&str]) -> OrderedMenuConfig {
        OrderedMenuConfig::default()
            .choices(choices.iter().copied())
            .description("Pick a flavour")
            .on_selection(|_, _| {})
    }

    #[test]
    fn test_rejects_zero_choices() {
        let result = OrderedMenu::new(InteractionSettings::default(), config(&[]));
        assert!(matches!(result, Err(MenuError::NoChoices)));
    }

    #[test]
    fn test_rejects_more_than_ten_choices() {
        let choices: Vec<String> = (0..11).map(|i| format!("choice {i}")).collect();
        let result = OrderedMenu::new(
            InteractionSettings::default(),
            config(&[]).choices(choices),
        );
        assert!(matches!(
            result,
            Err(MenuError::TooManyChoices { max: 10, got: 11 })
        ));
    }

    #[test]
    fn test_rejects_missing_content_and_action() {
        let no_content = OrderedMenuConfig::default()
            .choices(["a"])
            .on_selection(|_, _| {});
        assert!(matches!(
            OrderedMenu::new(InteractionSettings::default(), no_content),
            Err(MenuError::NoContent)
        ));

        let no_action = OrderedMenuConfig::default()
            .choices(["a"])
            .description("d");
        assert!(matches!(
            OrderedMenu::new(InteractionSettings::default(), no_action),
            Err(MenuError::MissingAction("selection"))
        ));
    }

    #[test]
    fn test_render_lists_choices_with_buttons() {
        let menu = OrderedMenu::new(
            InteractionSettings::default(),
            config(&["vanilla", "chocolate"]),
        )
        .unwrap();

        assert_eq!(
            menu.render(0).description,
            "Pick a flavour\n\n1\u{fe0f}\u{20e3} vanilla\n2\u{fe0f}\u{20e3} chocolate"
        );
        assert_eq!(
            menu.buttons(),
            vec![NUMBERS[0].to_string(), NUMBERS[1].to_string(), CANCEL.to_string()]
        );
    }

    #[test]
    fn test_reaction_and_typed_input_select_the_same_choice() {
        let menu = OrderedMenu::new(
            InteractionSettings::default(),
            config(&["vanilla", "chocolate"]),
        )
        .unwrap();

        let expected = Some(Step::Finish(Termination::Selected(1)));
        assert_eq!(menu.step(0, Input::Reaction(NUMBERS[1])), expected);
        assert_eq!(menu.step(0, Input::Text(" 2 ")), expected);
        assert_eq!(menu.step(0, Input::Text("3")), None);
        assert_eq!(menu.step(0, Input::Text("0")), None);
        assert_eq!(menu.step(0, Input::Reaction(NUMBERS[2])), None);
        assert_eq!(
            menu.step(0, Input::Reaction(CANCEL)),
            Some(Step::Finish(Termination::Cancelled))
        );
    }

    #[test]
    fn test_letters_accept_typed_letters() {
        let mut letters = config(&["red", "green", "blue"]);
        letters.use_letters = true;
        let menu = OrderedMenu::new(InteractionSettings::default(), letters).unwrap();

        assert_eq!(
            menu.step(0, Input::Text("C")),
            Some(Step::Finish(Termination::Selected(2)))
        );
        assert_eq!(menu.step(0, Input::Text("d")), None);
        assert_eq!(menu.step(0, Input::Text("ab")), None);
        assert_eq!(
            menu.step(0, Input::Reaction(LETTERS[0])),
            Some(Step::Finish(Termination::Selected(0)))
        );
    }
}
