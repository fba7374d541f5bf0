use crate::classifier_app::core::{init, transition, Effect, Event, State};
use crate::classifier_app::run_effect::RunEffect;
use crate::config::Config;
use crate::inference_pipeline::InferencePipeline;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

/// Owns the display state. Lives on the UI thread and is the only place the
/// state is ever replaced.
pub struct ClassifierApp {
    state: State,
    event_sender: Sender<Event>,
    event_receiver: Receiver<Event>,
    run_effect: RunEffect,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassifierApp {
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
        pipeline: Arc<InferencePipeline>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(
            pipeline,
            config.preview_size,
            logger.clone(),
            event_sender.clone(),
        );
        let (state, effects) = init();

        let app = Self {
            state,
            event_sender,
            event_receiver,
            run_effect,
            logger: logger.with_namespace("app"),
        };
        app.spawn_effects(effects);
        app
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    #[cfg(test)]
    pub fn sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    pub fn dispatch(&mut self, event: Event) {
        let _ = self.logger.info(&format!(
            "\nold state:\n\t{:?}\n\nevent:\n\t{:?}",
            self.state, event
        ));

        let (new_state, effects) = transition(std::mem::take(&mut self.state), event);

        let _ = self.logger.info(&format!(
            "\nnew state:\n\t{:?}\n\neffects:\n\t{:?}",
            new_state, effects
        ));

        self.state = new_state;
        self.spawn_effects(effects);
    }

    /// Applies every event the workers have posted so far without blocking.
    /// Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.event_receiver.try_recv() {
                Ok(event) => {
                    self.dispatch(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => return applied,
                // We hold a sender ourselves, so this cannot happen.
                Err(TryRecvError::Disconnected) => return applied,
            }
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect.spawn(effect);
        }
    }
}
