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
pub struct SlideshowConfig {
    pub text: Option<String>,
    pub description: Option<String>,
    /// One image URL per page.
    pub urls: Vec<String>,
    pub show_page_numbers: bool,
    pub wait_on_single_page: bool,
    pub wrap_page_ends: bool,
    pub bulk_skip: usize,
    /// Receives the 1-based page showing when the slideshow ends.
    pub final_action: Option<IndexAction>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        let defaults = MenuDefaults::default();
        Self {
            text: None,
            description: None,
            urls: Vec::new(),
            show_page_numbers: true,
            wait_on_single_page: false,
            wrap_page_ends: defaults.wrap_page_ends,
            bulk_skip: defaults.bulk_skip,
            final_action: None,
        }
    }
}

impl SlideshowConfig {
    pub fn urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_final(mut self, action: impl Fn(&ArtifactId, usize) + Send + Sync + 'static) -> Self {
        self.final_action = Some(Arc::new(action));
        self
    }
}

/// Pages through images, one per page.
pub struct Slideshow {
    settings: InteractionSettings,
    config: SlideshowConfig,
    pager: Pager,
}

impl Slideshow {
    pub fn new(settings: InteractionSettings, config: SlideshowConfig) -> MenuResult<Self> {
        if config.urls.is_empty() {
            return Err(MenuError::NoItems);
        }
        let pager = Pager::new(config.urls.len(), config.wrap_page_ends, config.bulk_skip);
        Ok(Self {
            settings,
            config,
            pager,
        })
    }
}

impl FlowSpec for Slideshow {
    fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    fn render(&self, position: usize) -> Content {
        Content {
            text: self.config.text.clone(),
            description: self.config.description.clone().unwrap_or_default(),
            footer: self
                .config
                .show_page_numbers
                .then(|| format!("Image {}/{}", position + 1, self.pager.page_count())),
            image: self.config.urls.get(position).cloned(),
            ..Default::default()
        }
    }

    fn buttons(&self) -> Vec<String> {
        if self.pager.page_count() == 1 {
            return vec![STOP.to_string()];
        }
        let arrows = [LEFT, STOP, RIGHT].map(String::from);
        if self.pager.skips() {
            let mut buttons = vec![BIG_LEFT.to_string()];
            buttons.extend(arrows);
            buttons.push(BIG_RIGHT.to_string());
            buttons
        } else {
            arrows.to_vec()
        }
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
            _ => None,
        };
        target.map(Step::Goto)
    }

    fn finish(&self, artifact: &ArtifactId, position: usize, _termination: &Termination) {
        if let Some(final_action) = &self.config.final_action {
            final_action(artifact, position + 1);
        }
    }
}

impl Menu for Slideshow {
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
