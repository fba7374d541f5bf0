use crate::inference_pipeline::{Diagnosis, PipelineError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Downscaled RGBA copy of the selected scan.
#[derive(Clone, PartialEq)]
pub struct Preview {
    pub width: usize,
    pub height: usize,
    pub rgba: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Preview({}x{})", self.width, self.height)
    }
}

#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Idle,
    Predicting {
        path: PathBuf,
        started: Instant,
    },
    Showing {
        path: PathBuf,
        diagnosis: Diagnosis,
    },
    Failed {
        path: PathBuf,
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct State {
    /// Bumped on every upload and reset. Worker messages carry the session
    /// they were started for and are dropped when it no longer matches.
    pub session: u64,
    pub theme: ThemeMode,
    pub preview: Option<Preview>,
    /// The preview worker for the current session has not answered yet.
    pub preview_pending: bool,
    pub phase: Phase,
}

impl State {
    pub fn is_predicting(&self) -> bool {
        matches!(self.phase, Phase::Predicting { .. })
    }

    /// A worker of the current session may still post an event, so the UI
    /// has to keep draining.
    pub fn awaiting_worker(&self) -> bool {
        self.is_predicting() || self.preview_pending
    }
}

#[derive(Debug)]
pub enum Event {
    UploadRequested(PathBuf),
    PreviewLoaded {
        session: u64,
        preview: Preview,
    },
    PreviewFailed {
        session: u64,
        #[allow(dead_code)]
        message: String,
    },
    PredictionDone {
        session: u64,
        result: Result<Diagnosis, PipelineError>,
    },
    ResetRequested,
    ThemeToggled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPreview { session: u64, path: PathBuf },
    RunInference { session: u64, path: PathBuf },
}

pub const FAILURE_MESSAGE: &str = "Prediction failed, please retry.";

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state.phase.clone(), event) {
        // One prediction at a time
        (Phase::Predicting { .. }, Event::UploadRequested(_)) => (state, vec![]),

        (_, Event::UploadRequested(path)) => {
            let session = state.session + 1;
            (
                State {
                    session,
                    preview: None,
                    preview_pending: true,
                    phase: Phase::Predicting {
                        path: path.clone(),
                        started: Instant::now(),
                    },
                    ..state
                },
                vec![
                    Effect::LoadPreview {
                        session,
                        path: path.clone(),
                    },
                    Effect::RunInference { session, path },
                ],
            )
        }

        (_, Event::PreviewLoaded { session, preview }) if session == state.session => (
            State {
                preview: Some(preview),
                preview_pending: false,
                ..state
            },
            vec![],
        ),

        (_, Event::PreviewFailed { session, .. }) if session == state.session => (
            State {
                preview_pending: false,
                ..state
            },
            vec![],
        ),

        (Phase::Predicting { path, .. }, Event::PredictionDone { session, result })
            if session == state.session =>
        {
            let phase = match result {
                Ok(diagnosis) => Phase::Showing { path, diagnosis },
                Err(error) => Phase::Failed {
                    path,
                    message: format!("{} {}", FAILURE_MESSAGE, error),
                },
            };
            (State { phase, ..state }, vec![])
        }

        (_, Event::ResetRequested) => (
            State {
                session: state.session + 1,
                preview: None,
                preview_pending: false,
                phase: Phase::Idle,
                ..state
            },
            vec![],
        ),

        (_, Event::ThemeToggled) => (
            State {
                theme: state.theme.toggled(),
                ..state
            },
            vec![],
        ),

        // Stale worker messages change nothing.
        _ => (state, vec![]),
    }
}
