//! Input routing and collaborator wiring through `Presentation`

mod helpers;

use helpers::*;
use slidewrap_common::events::{Phase, PresentationEvent, ShareOutcome, SoundState};
use slidewrap_player::input::{Control, InputEvent, Intent, Key, TapZone};

fn swipe(presentation: &mut TestPresentation, dx: f64, dy: f64, dt_ms: u64) -> Option<Intent> {
    let at_ms = now(presentation);
    assert_eq!(
        presentation.handle_input(InputEvent::TouchStart { x: 100.0, y: 100.0, at_ms }),
        None
    );
    presentation.handle_input(InputEvent::TouchEnd {
        x: 100.0 + dx,
        y: 100.0 + dy,
        at_ms: at_ms + dt_ms,
    })
}

#[test]
fn test_left_swipe_goes_next() {
    let mut presentation = presentation_without_clipboard();

    assert_eq!(swipe(&mut presentation, -60.0, 5.0, 300), Some(Intent::Next));
    assert_eq!(presentation.player().state().current_index(), 1);
}

#[test]
fn test_right_swipe_goes_prev() {
    let mut presentation = presentation_without_clipboard();
    presentation.apply(Intent::Next);
    presentation.advance_by(TRANSITION_MS);

    assert_eq!(swipe(&mut presentation, 80.0, -10.0, 200), Some(Intent::Prev));
    assert_eq!(presentation.player().state().current_index(), 0);
}

#[test]
fn test_small_quick_touch_is_a_tap_and_ignored() {
    let mut presentation = presentation_without_clipboard();

    assert_eq!(swipe(&mut presentation, 5.0, 3.0, 100), None);
    assert_eq!(presentation.player().state().current_index(), 0);
    assert!(!presentation.long_press_pending());
}

#[test]
fn test_mostly_vertical_drag_is_ignored() {
    let mut presentation = presentation_without_clipboard();
    assert_eq!(swipe(&mut presentation, -60.0, 90.0, 300), None);
    assert_eq!(presentation.player().state().current_index(), 0);
}

#[test]
fn test_long_press_toggles_pause() {
    let mut presentation = presentation_without_clipboard();
    presentation.advance_to(1000);

    let at_ms = now(&presentation);
    presentation.handle_input(InputEvent::TouchStart { x: 10.0, y: 10.0, at_ms });
    presentation.advance_by(499);
    assert_eq!(presentation.player().state().phase(), Phase::Playing);

    presentation.advance_by(1);
    assert_eq!(presentation.player().state().phase(), Phase::Paused);
    assert_eq!(presentation.player().state().elapsed_ms(), 1500);

    // lifting the finger afterwards does nothing more
    let at_ms = now(&presentation);
    assert_eq!(
        presentation.handle_input(InputEvent::TouchEnd { x: 10.0, y: 10.0, at_ms }),
        None
    );
    assert_eq!(presentation.player().state().phase(), Phase::Paused);
}

#[test]
fn test_short_touch_cancels_long_press() {
    let mut presentation = presentation_without_clipboard();

    let at_ms = now(&presentation);
    presentation.handle_input(InputEvent::TouchStart { x: 10.0, y: 10.0, at_ms });
    assert!(presentation.long_press_pending());
    presentation.advance_by(200);
    presentation.handle_input(InputEvent::TouchEnd { x: 12.0, y: 10.0, at_ms: at_ms + 200 });
    assert!(!presentation.long_press_pending());

    presentation.advance_by(1000);
    assert_eq!(presentation.player().state().phase(), Phase::Playing);
}

#[test]
fn test_keys_and_tap_zones() {
    let mut presentation = presentation_without_clipboard();

    presentation.handle_input(InputEvent::Key(Key::ArrowLeft));
    assert_eq!(presentation.player().state().current_index(), 0);

    presentation.handle_input(InputEvent::Tap(TapZone::Right));
    assert_eq!(presentation.player().state().current_index(), 1);
    presentation.advance_by(TRANSITION_MS);

    presentation.handle_input(InputEvent::Key(Key::Space));
    assert_eq!(presentation.player().state().phase(), Phase::Paused);
    presentation.handle_input(InputEvent::Key(Key::Space));
    assert_eq!(presentation.player().state().phase(), Phase::Playing);

    presentation.handle_input(InputEvent::Tap(TapZone::Left));
    assert_eq!(presentation.player().state().current_index(), 0);
    presentation.advance_by(TRANSITION_MS);

    presentation.handle_input(InputEvent::Key(Key::ArrowRight));
    assert_eq!(presentation.player().state().current_index(), 1);
}

#[test]
fn test_restart_control() {
    let mut presentation = presentation_without_clipboard();
    presentation.advance_to(3 * 7000 + TRANSITION_MS);
    assert_eq!(presentation.player().state().current_index(), 3);

    presentation.handle_input(InputEvent::Control(Control::Restart));
    assert_eq!(presentation.player().state().current_index(), 0);
    assert_eq!(presentation.player().state().phase(), Phase::Playing);
}

#[test]
fn test_start_control_starts_music_and_advances() {
    let mut presentation = presentation_without_clipboard();
    assert_eq!(presentation.sound_state(), SoundState::Muted);

    presentation.handle_input(InputEvent::Control(Control::Start));
    assert_eq!(presentation.sound_state(), SoundState::On);
    assert_eq!(presentation.player().renderer().sound, Some(SoundState::On));
    assert_eq!(presentation.player().state().current_index(), 1);
}

#[test]
fn test_sound_toggle() {
    let mut presentation = presentation_without_clipboard();

    presentation.apply(Intent::ToggleSound);
    assert_eq!(presentation.sound_state(), SoundState::On);
    presentation.apply(Intent::ToggleSound);
    assert_eq!(presentation.sound_state(), SoundState::Muted);
    assert_eq!(presentation.player().renderer().sound, Some(SoundState::Muted));
}

#[test]
fn test_share_copies_and_restores_label() {
    let clipboard = MemoryClipboard::default();
    let mut presentation = started_presentation(Box::new(clipboard.clone()));
    let mut events = presentation.player().events().subscribe();

    presentation.apply(Intent::Share);
    assert_eq!(clipboard.contents().as_deref(), Some("http://localhost/"));
    assert_eq!(
        presentation.player().renderer().share_label.as_deref(),
        Some("Link copied!")
    );

    let mut outcomes = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let PresentationEvent::ShareCompleted { outcome, .. } = event {
            outcomes.push(outcome);
        }
    }
    assert_eq!(outcomes, vec![ShareOutcome::Copied]);

    presentation.advance_by(1999);
    assert!(presentation.player().renderer().share_label.is_some());
    presentation.advance_by(1);
    assert_eq!(presentation.player().renderer().share_label, None);
}

#[test]
fn test_second_share_extends_label() {
    let mut presentation = started_presentation(Box::new(MemoryClipboard::default()));

    presentation.apply(Intent::Share);
    presentation.advance_by(1500);
    presentation.apply(Intent::Share);

    presentation.advance_by(500);
    assert!(presentation.player().renderer().share_label.is_some());
    presentation.advance_by(1500);
    assert_eq!(presentation.player().renderer().share_label, None);
}

#[test]
fn test_share_without_clipboard_prompts() {
    let mut presentation = presentation_without_clipboard();
    let mut events = presentation.player().events().subscribe();

    presentation.apply(Intent::Share);

    assert_eq!(presentation.player().renderer().share_label, None);
    let prompted = std::iter::from_fn(|| events.try_recv().ok()).any(|event| {
        matches!(
            event,
            PresentationEvent::ShareCompleted {
                outcome: ShareOutcome::Prompted { ref message },
                ..
            } if message == "Copy this link: http://localhost/"
        )
    });
    assert!(prompted);
}

#[test]
fn test_navigation_publishes_events() {
    let mut presentation = presentation_without_clipboard();
    let mut events = presentation.player().events().subscribe();

    presentation.apply(Intent::Next);
    presentation.advance_by(TRANSITION_MS);

    let types: Vec<&'static str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|event| event.event_type())
        .collect();
    assert_eq!(types, vec!["PhaseChanged", "SlideChanged", "PhaseChanged"]);
}

#[test]
fn test_presentation_from_config_file() {
    use slidewrap_common::TomlConfig;
    use slidewrap_player::audio::SilentSink;
    use slidewrap_player::share::NoClipboard;
    use slidewrap_player::{ManualTimers, Presentation};
    use std::io::Write;
    use std::sync::Arc;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [deck]
        slide_count = 3
        slide_duration_ms = 2000

        [[effects]]
        kind = "confetti"
        index = 1
        pieces = 40
        "#
    )
    .unwrap();
    let config = TomlConfig::load_from_file(file.path()).unwrap();

    let mut presentation = Presentation::new(
        &config,
        ManualTimers::new(),
        RecordingRenderer::default(),
        Arc::new(slidewrap_common::EventBus::default()),
        Box::new(SilentSink::new(None)),
        Box::new(NoClipboard),
    );
    presentation.start();
    presentation.advance_to(2 * 2000 + TRANSITION_MS);

    assert_eq!(presentation.player().state().current_index(), 2);
    assert_eq!(presentation.player().state().phase(), Phase::Finished);
    let confetti_slides: Vec<usize> = presentation
        .player()
        .renderer()
        .calls
        .iter()
        .filter_map(|call| match call {
            RenderCall::Effects(slide, names) if names.contains(&"confetti") => Some(*slide),
            _ => None,
        })
        .collect();
    assert_eq!(confetti_slides, vec![1]);
}
