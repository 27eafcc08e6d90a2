//! # Paginator
//!
//! Splits a list of items across pages and lets allowed actors browse them with
//! arrow buttons, optional bulk-skip buttons, and optionally by typing a page number
//! or a left/right word.
//!
//! Pressing an arrow at either end does nothing unless `wrap_page_ends` is set. The
//! stop button, or the timeout, ends the paginator and runs its final action with the
//! page that was showing.

use std::sync::Arc;

use super::{
    flow::{Flow, FlowSpec, Input, Step},
    pager::Pager,
    render::Content,
    settings::InteractionSettings,
    IndexAction, Menu, MenuContext, MenuError, MenuHandle, MenuResult, Termination, BIG_LEFT,
    BIG_RIGHT, LEFT, RIGHT, STOP,
};
use crate::{
    config::MenuDefaults,
    event::{ArtifactId, ChannelId},
};

#[derive(Clone)]
pub struct PaginatorConfig {
    pub text: Option<String>,
    pub title: Option<String>,
    pub items: Vec<String>,
    pub items_per_page: usize,
    pub number_items: bool,
    pub show_page_numbers: bool,
    /// With a single page, render it and finish at once.
    pub wait_on_single_page: bool,
    pub wrap_page_ends: bool,
    /// Pages jumped by ⏪/⏩; 0 or 1 hides those buttons.
    pub bulk_skip: usize,
    /// Typed page numbers jump to that page.
    pub allow_text_input: bool,
    pub left_text: Option<String>,
    pub right_text: Option<String>,
    /// 1-based page on display.
    pub start_page: usize,
    /// Receives the 1-based page showing when the paginator ends.
    pub final_action: Option<IndexAction>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self::from(&MenuDefaults::default())
    }
}

impl From<&MenuDefaults> for PaginatorConfig {
    fn from(defaults: &MenuDefaults) -> Self {
        Self {
            text: None,
            title: None,
            items: Vec::new(),
            items_per_page: defaults.items_per_page,
            number_items: false,
            show_page_numbers: true,
            wait_on_single_page: false,
            wrap_page_ends: defaults.wrap_page_ends,
            bulk_skip: defaults.bulk_skip,
            allow_text_input: false,
            left_text: None,
            right_text: None,
            start_page: 1,
            final_action: None,
        }
    }
}

impl PaginatorConfig {
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_final(mut self, action: impl Fn(&ArtifactId, usize) + Send + Sync + 'static) -> Self {
        self.final_action = Some(Arc::new(action));
        self
    }
}

pub struct Paginator {
    settings: InteractionSettings,
    config: PaginatorConfig,
    pager: Pager,
}

impl Paginator {
    /// # Errors
    ///
    /// * `MenuError::NoItems` - nothing to paginate
    /// * `MenuError::InvalidItemsPerPage` - `items_per_page` is zero
    pub fn new(settings: InteractionSettings, config: PaginatorConfig) -> MenuResult<Self> {
        if config.items.is_empty() {
            return Err(MenuError::NoItems);
        }
        if config.items_per_page == 0 {
            return Err(MenuError::InvalidItemsPerPage);
        }
        let page_count = config.items.len().div_ceil(config.items_per_page);
        let pager = Pager::new(page_count, config.wrap_page_ends, config.bulk_skip);
        Ok(Self {
            settings,
            config,
            pager,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count()
    }

    fn matches_word(word: &Option<String>, text: &str) -> bool {
        word.as_deref()
            .is_some_and(|word| word.eq_ignore_ascii_case(text))
    }
}

impl FlowSpec for Paginator {
    fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    fn start(&self) -> usize {
        self.config
            .start_page
            .clamp(1, self.pager.page_count())
            - 1
    }

    fn render(&self, position: usize) -> Content {
        let per_page = self.config.items_per_page;
        let start = position * per_page;
        let description = self
            .config
            .items
            .iter()
            .enumerate()
            .skip(start)
            .take(per_page)
            .map(|(i, item)| {
                if self.config.number_items {
                    format!("`{}.` {}", i + 1, item)
                } else {
                    item.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let footer = self
            .config
            .show_page_numbers
            .then(|| format!("Page {}/{}", position + 1, self.pager.page_count()));

        Content {
            text: self.config.text.clone(),
            title: self.config.title.clone(),
            description,
            footer,
            image: None,
        }
    }

    fn buttons(&self) -> Vec<String> {
        if self.pager.page_count() == 1 {
            return vec![STOP.to_string()];
        }
        let mut buttons = Vec::new();
        if self.pager.skips() {
            buttons.push(BIG_LEFT.to_string());
        }
        buttons.extend([LEFT, STOP, RIGHT].map(String::from));
        if self.pager.skips() {
            buttons.push(BIG_RIGHT.to_string());
        }
        buttons
    }

    fn accepts_text(&self) -> bool {
        self.config.allow_text_input
            || self.config.left_text.is_some()
            || self.config.right_text.is_some()
    }

    fn waits(&self) -> bool {
        self.pager.page_count() > 1 || self.config.wait_on_single_page
    }

    fn step(&self, position: usize, input: Input<'_>) -> Option<Step> {
        let target = match input {
            Input::Reaction(STOP) => return Some(Step::Finish(Termination::Stopped)),
            Input::Reaction(LEFT) => self.pager.previous(position),
            Input::Reaction(RIGHT) => self.pager.next(position),
            Input::Reaction(BIG_LEFT) => self.pager.skip_back(position),
            Input::Reaction(BIG_RIGHT) => self.pager.skip_forward(position),
            Input::Reaction(_) => None,
            Input::Text(text) => {
                let text = text.trim();
                if Self::matches_word(&self.config.left_text, text) {
                    self.pager.previous(position)
                } else if Self::matches_word(&self.config.right_text, text) {
                    self.pager.next(position)
                } else if self.config.allow_text_input {
                    text.parse::<usize>()
                        .ok()
                        .and_then(|number| self.pager.jump(position, number))
                } else {
                    None
                }
            }
        };
        target.map(Step::Goto)
    }

    fn finish(&self, artifact: &ArtifactId, position: usize, _termination: &Termination) {
        if let Some(final_action) = &self.config.final_action {
            final_action(artifact, position + 1);
        }
    }
}

impl Menu for Paginator {
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

    fn paginator(items: usize, per_page: usize) -> Paginator {
        let config = PaginatorConfig {
            items_per_page: per_page,
            number_items: true,
            bulk_skip: 0,
            ..Default::default()
        }
        .items((1..=items).map(|i| format!("item {i}")));
        Paginator::new(InteractionSettings::default(), config).unwrap()
    }

    #[test]
    fn test_validation() {
        let settings = InteractionSettings::default();
        assert!(matches!(
            Paginator::new(settings.clone(), PaginatorConfig::default()),
            Err(MenuError::NoItems)
        ));
        let zero = PaginatorConfig {
            items_per_page: 0,
            ..Default::default()
        }
        .items(["a"]);
        assert!(matches!(
            Paginator::new(settings, zero),
            Err(MenuError::InvalidItemsPerPage)
        ));
    }

    #[test]
    fn test_render_page_slice() {
        let menu = paginator(5, 2);
        assert_eq!(menu.page_count(), 3);

        let last = menu.render(2);
        assert_eq!(last.description, "`5.` item 5");
        assert_eq!(last.footer.as_deref(), Some("Page 3/3"));
        assert_eq!(menu.render(0).description, "`1.` item 1\n`2.` item 2");
    }

    #[test]
    fn test_arrows_stop_at_ends() {
        let menu = paginator(5, 2);
        assert_eq!(menu.step(0, Input::Reaction(LEFT)), None);
        assert_eq!(menu.step(0, Input::Reaction(RIGHT)), Some(Step::Goto(1)));
        assert_eq!(menu.step(2, Input::Reaction(RIGHT)), None);
        assert_eq!(
            menu.step(1, Input::Reaction(STOP)),
            Some(Step::Finish(Termination::Stopped))
        );
        assert_eq!(menu.step(1, Input::Reaction(BIG_RIGHT)), None);
    }

    #[test]
    fn test_buttons_include_bulk_skip_when_configured() {
        let config = PaginatorConfig {
            items_per_page: 1,
            bulk_skip: 3,
            ..Default::default()
        }
        .items(["a", "b"]);
        let menu = Paginator::new(InteractionSettings::default(), config).unwrap();
        assert_eq!(
            menu.buttons(),
            vec![BIG_LEFT, LEFT, STOP, RIGHT, BIG_RIGHT]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(paginator(3, 1).buttons(), vec![LEFT, STOP, RIGHT]);
    }

    #[test]
    fn test_text_navigation() {
        let config = PaginatorConfig {
            items_per_page: 1,
            bulk_skip: 0,
            allow_text_input: true,
            left_text: Some("back".to_string()),
            right_text: Some("next".to_string()),
            ..Default::default()
        }
        .items(["a", "b", "c", "d"]);
        let menu = Paginator::new(InteractionSettings::default(), config).unwrap();

        assert!(menu.accepts_text());
        assert_eq!(menu.step(0, Input::Text("4")), Some(Step::Goto(3)));
        assert_eq!(menu.step(0, Input::Text("NEXT")), Some(Step::Goto(1)));
        assert_eq!(menu.step(0, Input::Text("back")), None);
        assert_eq!(menu.step(0, Input::Text("9")), None);
        assert_eq!(menu.step(0, Input::Text("hello")), None);
    }

    #[test]
    fn test_single_page_skips_waiting_unless_asked() {
        assert!(!paginator(2, 5).waits());
        let config = PaginatorConfig {
            wait_on_single_page: true,
            bulk_skip: 3,
            ..Default::default()
        }
        .items(["a"]);
        let menu = Paginator::new(InteractionSettings::default(), config).unwrap();
        assert!(menu.waits());
        assert_eq!(menu.buttons(), vec![STOP]);
    }

    #[test]
    fn test_start_page_is_clamped() {
        let mut config = PaginatorConfig {
            items_per_page: 1,
            ..Default::default()
        }
        .items(["a", "b"]);
        config.start_page = 7;
        let menu = Paginator::new(InteractionSettings::default(), config).unwrap();
        assert_eq!(menu.start(), 1);
    }
}
