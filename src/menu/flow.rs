//! Shared state machine behind every menu kind.
//!
//! A [`Flow`] renders its first page, attaches its buttons, then keeps exactly one
//! wait registered for the page currently shown. Each accepted interaction either
//! moves to another position (re-render, re-register) or terminates the flow.
//!
//! The wait is always registered under [`EventKind::Interaction`], so the deletion of
//! the flow's artifact reaches it too and cancels the flow without any cleanup.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace, warn};

use super::{
    render::Content,
    settings::{Cleanup, InteractionSettings},
    FlowState, MenuContext, MenuHandle, Termination,
};
use crate::event::{ArtifactId, ChannelId, Event, EventKind, Expiry, WaitHandle};

/// One interaction, already scoped to the flow's artifact or channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    Reaction(&'a str),
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Goto(usize),
    Finish(Termination),
}

/// The kind-specific half of a menu.
pub(crate) trait FlowSpec: Send + Sync + 'static {
    fn settings(&self) -> &InteractionSettings;

    fn start(&self) -> usize {
        0
    }

    fn render(&self, position: usize) -> Content;

    fn buttons(&self) -> Vec<String>;

    /// Typed messages in the channel count as input too.
    fn accepts_text(&self) -> bool {
        false
    }

    /// `false` renders once and finishes without waiting.
    fn waits(&self) -> bool {
        true
    }

    /// `None` rejects the input, leaving the flow where it is.
    fn step(&self, position: usize, input: Input<'_>) -> Option<Step>;

    fn finish(&self, artifact: &ArtifactId, position: usize, termination: &Termination);
}

pub(crate) struct Flow<S: FlowSpec> {
    spec: S,
    ctx: MenuContext,
    channel: ChannelId,
    artifact: OnceLock<ArtifactId>,
    state: Mutex<FlowState>,
    live: Mutex<Option<WaitHandle<EventKind>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: FlowSpec> Flow<S> {
    pub(crate) fn launch(
        spec: S,
        ctx: &MenuContext,
        channel: &ChannelId,
        existing: Option<&ArtifactId>,
    ) -> MenuHandle {
        let flow = Arc::new(Self {
            spec,
            ctx: ctx.clone(),
            channel: channel.clone(),
            artifact: OnceLock::new(),
            state: Mutex::new(FlowState::AwaitingDisplay),
            live: Mutex::new(None),
        });

        let content = flow.spec.render(flow.spec.start());
        match existing {
            Some(artifact) => {
                ctx.sink.edit(artifact, content);
                ctx.sink.clear_reactions(artifact);
                flow.clone().delivered(artifact.clone());
            }
            None => {
                let delivered = flow.clone();
                ctx.sink.send(
                    channel,
                    content,
                    Box::new(move |artifact| delivered.delivered(artifact)),
                );
            }
        }

        MenuHandle::new(flow)
    }

    fn delivered(self: Arc<Self>, artifact: ArtifactId) {
        let start = self.spec.start();
        let cancelled = {
            let state = lock(&self.state);
            let _ = self.artifact.set(artifact.clone());
            matches!(*state, FlowState::Terminated(_))
        };
        debug!(%artifact, "Menu delivered");

        if cancelled {
            self.conclude(start, &Termination::Cancelled, true);
            return;
        }
        if !self.spec.waits() {
            self.terminate(start, Termination::Stopped, true);
            return;
        }

        let buttons = self.spec.buttons();
        if buttons.is_empty() {
            self.arm(start);
        } else {
            let flow = self.clone();
            self.ctx
                .sink
                .add_reactions(&artifact, buttons, Box::new(move |()| flow.arm(start)));
        }
    }

    /// Registers the single live wait for `position`.
    fn arm(self: Arc<Self>, position: usize) {
        let Some(artifact) = self.artifact.get().cloned() else {
            return;
        };
        let mut state = lock(&self.state);
        if matches!(*state, FlowState::Terminated(_)) {
            return;
        }

        let accepts = self.clone();
        let advances = self.clone();
        let expires = self.clone();

        let registered = self.ctx.waiter.register(
            EventKind::Interaction,
            move |event| accepts.interpret(position, event).is_some(),
            move |event| advances.advance(position, event),
            Some(
                Expiry::after(self.spec.settings().timeout)
                    .then(move || expires.terminate(position, Termination::TimedOut, true)),
            ),
        );

        match registered {
            Ok(handle) => {
                *lock(&self.live) = Some(handle);
                *state = FlowState::Rendered {
                    artifact,
                    page: position,
                };
                trace!(position, "Menu waiting for interaction");
            }
            Err(e) => {
                warn!("Menu stopped, cannot wait for interactions: {}", e);
                *lock(&self.live) = None;
                *state = FlowState::Terminated(Termination::Stopped);
            }
        }
    }

    fn interpret(&self, position: usize, event: &Event) -> Option<Step> {
        let artifact = self.artifact.get()?;
        if event.deletes(artifact) {
            return Some(Step::Finish(Termination::Cancelled));
        }
        let actor = event.actor()?;
        let input = match event.reaction_on(artifact) {
            Some(emoji) => Input::Reaction(emoji),
            None if self.spec.accepts_text() => Input::Text(event.message_in(&self.channel)?),
            None => return None,
        };
        if !self
            .spec
            .settings()
            .allows(actor, &self.channel, self.ctx.roles.as_ref())
        {
            trace!(%actor, "Ignoring interaction from disallowed actor");
            return None;
        }
        self.spec.step(position, input)
    }

    fn advance(self: Arc<Self>, position: usize, event: Event) {
        match self.interpret(position, &event) {
            Some(Step::Goto(next)) => {
                if let Some(artifact) = self.artifact.get() {
                    self.ctx.sink.edit(artifact, self.spec.render(next));
                    if let Event::ReactionAdded { actor, emoji, .. } = &event {
                        self.ctx.sink.remove_reaction(artifact, actor, emoji);
                    }
                }
                self.arm(next);
            }
            Some(Step::Finish(termination)) => {
                // nothing left to clean up once the artifact is gone
                let cleanup = !self
                    .artifact
                    .get()
                    .is_some_and(|artifact| event.deletes(artifact));
                self.terminate(position, termination, cleanup)
            }
            // accepted by the predicate but rejected now; keep the step open
            None => self.arm(position),
        }
    }

    fn terminate(&self, position: usize, termination: Termination, cleanup: bool) {
        {
            let mut state = lock(&self.state);
            if matches!(*state, FlowState::Terminated(_)) {
                return;
            }
            *state = FlowState::Terminated(termination.clone());
            *lock(&self.live) = None;
        }
        self.conclude(position, &termination, cleanup);
    }

    /// Runs the terminal callbacks, then the configured cleanup if `cleanup` is set.
    fn conclude(&self, position: usize, termination: &Termination, cleanup: bool) {
        let Some(artifact) = self.artifact.get() else {
            return;
        };
        debug!(%artifact, ?termination, "Menu finished");
        self.spec.finish(artifact, position, termination);
        if !cleanup {
            return;
        }
        match self.spec.settings().cleanup {
            Cleanup::Keep => {}
            Cleanup::ClearReactions => self.ctx.sink.clear_reactions(artifact),
            Cleanup::Delete => self.ctx.sink.delete(artifact),
        }
    }
}

/// Type-erased view of a running flow, held by [`MenuHandle`].
pub(crate) trait FlowControl: Send + Sync {
    fn state(&self) -> FlowState;
    fn artifact(&self) -> Option<ArtifactId>;
    fn cancel(&self) -> bool;
}

impl<S: FlowSpec> FlowControl for Flow<S> {
    fn state(&self) -> FlowState {
        lock(&self.state).clone()
    }

    fn artifact(&self) -> Option<ArtifactId> {
        self.artifact.get().cloned()
    }

    fn cancel(&self) -> bool {
        let mut state = lock(&self.state);
        let position = match &*state {
            FlowState::AwaitingDisplay => {
                *state = FlowState::Terminated(Termination::Cancelled);
                let delivered = self.artifact.get().is_some();
                drop(state);
                // otherwise the delivery continuation concludes the flow
                if delivered {
                    self.conclude(self.spec.start(), &Termination::Cancelled, true);
                }
                return true;
            }
            FlowState::Rendered { page, .. } => *page,
            FlowState::Terminated(_) => return false,
        };

        let Some(handle) = lock(&self.live).take() else {
            return false;
        };
        // losing this removal means a match or timeout already owns the step
        if !self.ctx.waiter.cancel(&handle) {
            return false;
        }
        *state = FlowState::Terminated(Termination::Cancelled);
        drop(state);
        self.conclude(position, &Termination::Cancelled, true);
        true
    }
}
