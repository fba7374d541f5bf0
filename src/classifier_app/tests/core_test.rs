use crate::classifier_app::core::{
    init, transition, Effect, Event, Phase, Preview, State, ThemeMode, FAILURE_MESSAGE,
};
use crate::image_classifier::interface::ClassifierError;
use crate::inference_pipeline::{Diagnosis, PipelineError, PredictionResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn diagnosis() -> Diagnosis {
    Diagnosis {
        prediction: PredictionResult {
            class_index: 2,
            confidence: 95.0,
        },
        name: "Non Demented",
        description: "No signs of dementia.",
        elapsed: Duration::from_millis(20),
    }
}

fn preview() -> Preview {
    Preview {
        width: 2,
        height: 1,
        rgba: Arc::new(vec![0; 8]),
    }
}

fn predicting(path: &str) -> State {
    let (state, _) = transition(State::default(), Event::UploadRequested(path.into()));
    state
}

#[test]
fn test_init() {
    let (state, effects) = init();

    assert!(matches!(state.phase, Phase::Idle));
    assert_eq!(state.session, 0);
    assert_eq!(state.theme, ThemeMode::Dark);
    assert!(state.preview.is_none());
    assert!(effects.is_empty());
}

#[test]
fn test_upload_starts_prediction_and_preview() {
    let (state, effects) = transition(
        State::default(),
        Event::UploadRequested(PathBuf::from("a.png")),
    );

    assert_eq!(state.session, 1);
    match &state.phase {
        Phase::Predicting { path, .. } => assert_eq!(path, &PathBuf::from("a.png")),
        _ => panic!("Unexpected phase"),
    }
    assert_eq!(
        effects,
        vec![
            Effect::LoadPreview {
                session: 1,
                path: PathBuf::from("a.png")
            },
            Effect::RunInference {
                session: 1,
                path: PathBuf::from("a.png")
            },
        ]
    );
}

#[test]
fn test_upload_while_predicting_is_ignored() {
    let state = predicting("a.png");

    let (state, effects) = transition(state, Event::UploadRequested(PathBuf::from("b.png")));

    assert!(effects.is_empty());
    assert_eq!(state.session, 1);
    match &state.phase {
        Phase::Predicting { path, .. } => assert_eq!(path, &PathBuf::from("a.png")),
        _ => panic!("Unexpected phase"),
    }
}

#[test]
fn test_prediction_done_shows_result() {
    let state = predicting("a.png");

    let (state, effects) = transition(
        state,
        Event::PredictionDone {
            session: 1,
            result: Ok(diagnosis()),
        },
    );

    assert!(effects.is_empty());
    match &state.phase {
        Phase::Showing { path, diagnosis } => {
            assert_eq!(path, &PathBuf::from("a.png"));
            assert_eq!(diagnosis.name, "Non Demented");
        }
        _ => panic!("Unexpected phase"),
    }
}

#[test]
fn test_prediction_failure_shows_retry_message() {
    let state = predicting("a.png");

    let (state, _) = transition(
        state,
        Event::PredictionDone {
            session: 1,
            result: Err(PipelineError::Inference(ClassifierError::EmptyOutput)),
        },
    );

    match &state.phase {
        Phase::Failed { message, .. } => {
            assert!(message.starts_with(FAILURE_MESSAGE));
            assert!(message.contains("empty output"));
        }
        _ => panic!("Unexpected phase"),
    }
}

#[test]
fn test_stale_prediction_is_discarded() {
    let state = predicting("a.png");
    let (state, _) = transition(state, Event::ResetRequested);
    let (state, _) = transition(state, Event::UploadRequested(PathBuf::from("b.png")));
    assert_eq!(state.session, 3);

    let (state, _) = transition(
        state,
        Event::PredictionDone {
            session: 1,
            result: Ok(diagnosis()),
        },
    );

    match &state.phase {
        Phase::Predicting { path, .. } => assert_eq!(path, &PathBuf::from("b.png")),
        _ => panic!("Unexpected phase"),
    }
}

#[test]
fn test_preview_only_applies_to_current_session() {
    let state = predicting("a.png");

    let (state, _) = transition(
        state,
        Event::PreviewLoaded {
            session: 0,
            preview: preview(),
        },
    );
    assert!(state.preview.is_none());

    let (state, _) = transition(
        state,
        Event::PreviewLoaded {
            session: 1,
            preview: preview(),
        },
    );
    assert_eq!(state.preview, Some(preview()));
}

#[test]
fn test_preview_failure_keeps_waiting_for_prediction() {
    let state = predicting("a.png");

    let (state, effects) = transition(
        state,
        Event::PreviewFailed {
            session: 1,
            message: "bad image".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_predicting());
    assert!(!state.preview_pending);
}

#[test]
fn test_result_before_preview_keeps_ui_waiting_for_preview() {
    let state = predicting("a.png");
    assert!(state.preview_pending);

    let (state, _) = transition(
        state,
        Event::PredictionDone {
            session: 1,
            result: Ok(diagnosis()),
        },
    );

    assert!(!state.is_predicting());
    assert!(state.preview.is_none());
    assert!(state.awaiting_worker());

    let (state, _) = transition(
        state,
        Event::PreviewLoaded {
            session: 1,
            preview: preview(),
        },
    );

    assert_eq!(state.preview, Some(preview()));
    assert!(!state.awaiting_worker());
}

#[test]
fn test_stale_preview_failure_does_not_clear_pending_preview() {
    let state = predicting("a.png");
    let (state, _) = transition(state, Event::ResetRequested);
    let (state, _) = transition(state, Event::UploadRequested(PathBuf::from("b.png")));

    let (state, _) = transition(
        state,
        Event::PreviewFailed {
            session: 1,
            message: "bad image".to_string(),
        },
    );

    assert!(state.preview_pending);
}

#[test]
fn test_reset_clears_result_and_preview_but_keeps_theme() {
    let (state, _) = transition(predicting("a.png"), Event::ThemeToggled);
    let (state, _) = transition(
        state,
        Event::PreviewLoaded {
            session: 1,
            preview: preview(),
        },
    );
    let (state, _) = transition(
        state,
        Event::PredictionDone {
            session: 1,
            result: Ok(diagnosis()),
        },
    );

    let (state, effects) = transition(state, Event::ResetRequested);

    assert!(effects.is_empty());
    assert!(matches!(state.phase, Phase::Idle));
    assert!(state.preview.is_none());
    assert!(!state.awaiting_worker());
    assert_eq!(state.theme, ThemeMode::Light);
    assert_eq!(state.session, 2);
}

#[test]
fn test_theme_toggles_back_and_forth() {
    let (state, _) = transition(State::default(), Event::ThemeToggled);
    assert_eq!(state.theme, ThemeMode::Light);

    let (state, _) = transition(state, Event::ThemeToggled);
    assert_eq!(state.theme, ThemeMode::Dark);
}

#[test]
fn test_new_upload_after_result_replaces_it() {
    let (state, _) = transition(
        predicting("a.png"),
        Event::PredictionDone {
            session: 1,
            result: Ok(diagnosis()),
        },
    );

    let (state, effects) = transition(state, Event::UploadRequested(PathBuf::from("b.png")));

    assert_eq!(state.session, 2);
    assert!(state.is_predicting());
    assert_eq!(effects.len(), 2);
}
