use flute_core::chart::NoteRun;
use flute_core::config::{PlayMode, TrainerConfig};
use flute_core::gameplay::scheduler::Scheduler;
use flute_core::song_schema::{KeyboardKey, NoteDefinition, Requirement};

fn scheduler() -> Scheduler {
    // speed 150, target 340, hit window 0.15s, miss tolerance 0.15s, preview 1.5s
    Scheduler::new(TrainerConfig::default().scheduler())
}

fn note(pitch: &str, start: f64, keys: &[KeyboardKey]) -> NoteRun {
    let required: Requirement = keys.iter().copied().map(Into::into).collect();
    NoteRun::new(NoteDefinition::new(pitch, start, 1.0), required)
}

#[test]
fn test_position_is_derived_from_time_to_target() {
    let s = scheduler();

    assert_eq!(s.position_at(2.0, 2.0), 340.0);
    assert_eq!(s.position_at(2.0, 1.0), 190.0);
    assert_eq!(s.position_at(2.0, 3.0), 490.0);
    // Same inputs, same answer
    assert_eq!(s.position_at(5.5, 1.25), s.position_at(5.5, 1.25));
}

#[test]
fn test_due_window_is_symmetric() {
    let s = scheduler();

    assert!(s.is_due(1.0, 0.86));
    assert!(s.is_due(1.0, 1.0));
    assert!(s.is_due(1.0, 1.14));
    assert!(!s.is_due(1.0, 0.8));
    assert!(!s.is_due(1.0, 1.2));
}

#[test]
fn test_update_reports_due_notes_in_start_order() {
    let s = scheduler();
    let mut notes = vec![
        note("C", 1.0, &[KeyboardKey::A]),
        note("D", 1.1, &[KeyboardKey::A, KeyboardKey::S]),
        note("E", 3.0, &[KeyboardKey::A, KeyboardKey::S, KeyboardKey::D]),
    ];

    let report = s.update(&mut notes, 1.05, PlayMode::Player);

    assert_eq!(report.due, vec![0, 1]);
    assert!(report.newly_missed.is_empty());
    assert!(report.newly_played.is_empty());
    // E is 1.95s away, beyond the 1.5s preview
    assert_eq!(report.preview, None);
    assert!((notes[0].position - 347.5).abs() < 1e-9);
}

#[test]
fn test_preview_exposes_next_note_before_it_is_due() {
    let s = scheduler();
    let mut notes = vec![
        note("G", 2.0, &[KeyboardKey::A, KeyboardKey::S, KeyboardKey::D]),
        note("A", 2.5, &[KeyboardKey::A, KeyboardKey::S]),
    ];

    let report = s.update(&mut notes, 1.0, PlayMode::Player);
    assert!(report.due.is_empty());
    assert_eq!(report.preview, Some(0));

    // Once G is due, preview moves on to A
    let report = s.update(&mut notes, 1.9, PlayMode::Player);
    assert_eq!(report.due, vec![0]);
    assert_eq!(report.preview, Some(1));
}

#[test]
fn test_first_note_inside_preview_at_song_start_is_not_special() {
    let s = scheduler();
    let mut notes = vec![note("B", 0.5, &[KeyboardKey::A])];

    let report = s.update(&mut notes, 0.0, PlayMode::Player);
    assert_eq!(report.preview, Some(0));
    assert_eq!(notes[0].position, 340.0 - 75.0);
}

#[test]
fn test_note_past_tolerance_is_missed_once() {
    let s = scheduler();
    let mut notes = vec![note("E", 2.0, &[KeyboardKey::A, KeyboardKey::S, KeyboardKey::D])];

    let report = s.update(&mut notes, 2.15, PlayMode::Player);
    assert_eq!(report.due, vec![0]);
    assert!(!notes[0].missed);

    let report = s.update(&mut notes, 2.2, PlayMode::Player);
    assert_eq!(report.newly_missed, vec![0]);
    assert!(notes[0].missed);
    let frozen = notes[0].position;

    // Judged notes are frozen and never reported again
    let report = s.update(&mut notes, 5.0, PlayMode::Player);
    assert!(report.newly_missed.is_empty());
    assert_eq!(notes[0].position, frozen);
}

#[test]
fn test_hit_notes_are_not_rescheduled() {
    let s = scheduler();
    let mut notes = vec![note("C", 1.0, &[KeyboardKey::A])];
    s.update(&mut notes, 1.0, PlayMode::Player);
    notes[0].mark_hit();

    let report = s.update(&mut notes, 4.0, PlayMode::Player);
    assert!(report.newly_missed.is_empty());
    assert!(!notes[0].missed);
    assert_eq!(notes[0].position, 340.0);
}

#[test]
fn test_autoplay_marks_note_played_at_target() {
    let s = scheduler();
    let mut notes = vec![note("C", 1.0, &[KeyboardKey::A]), note("D", 2.0, &[KeyboardKey::S])];

    // 10 units early: outside the 5 unit epsilon
    let report = s.update(&mut notes, 1.0 - 10.0 / 150.0, PlayMode::AutoPlay);
    assert!(report.newly_played.is_empty());

    let report = s.update(&mut notes, 1.0 - 3.0 / 150.0, PlayMode::AutoPlay);
    assert_eq!(report.newly_played, vec![0]);
    assert!(notes[0].played);
    assert!(report.due.is_empty());

    // A dropped frame still sounds the note and never turns it into a miss
    let report = s.update(&mut notes, 2.5, PlayMode::AutoPlay);
    assert_eq!(report.newly_played, vec![1]);
    assert!(report.newly_missed.is_empty());
    assert!(!notes[1].missed);
}

#[test]
fn test_empty_requirement_plays_by_position_in_player_mode() {
    let s = scheduler();
    let mut notes = vec![note("C2", 1.0, &[]), note("B", 1.0, &[KeyboardKey::A])];

    let report = s.update(&mut notes, 1.0, PlayMode::Player);
    assert_eq!(report.newly_played, vec![0]);
    assert_eq!(report.due, vec![1]);

    let report = s.update(&mut notes, 1.5, PlayMode::Player);
    assert_eq!(report.newly_missed, vec![1]);
    assert!(!notes[0].missed);
}

#[test]
fn test_visibility_span() {
    let s = scheduler();
    assert!(s.is_visible(0.0));
    assert!(s.is_visible(449.0));
    assert!(!s.is_visible(-50.0));
    assert!(!s.is_visible(f64::NEG_INFINITY));
    assert!(!s.is_visible(450.0));
}
