//! Built-in songs and lookup tables for a C-major flute range (C4..C5).

use song_schema::{
    FluteKey::{self, *},
    InputMode,
    KeyboardKey::{self, A, D, F, G, H, J, S},
    NoteDefinition, RequirementTable, Song,
};

pub fn builtin_songs() -> Vec<Song> {
    vec![c_major_scale(), simple_melody()]
}

pub fn c_major_scale() -> Song {
    let notes = [
        ("C", 0.0, 1.0),
        ("D", 1.0, 1.0),
        ("E", 2.0, 1.0),
        ("F", 3.0, 1.0),
        ("G", 4.0, 1.0),
        ("A", 5.0, 1.0),
        ("B", 6.0, 1.0),
        ("C2", 7.0, 2.0),
        ("B", 9.0, 1.0),
        ("A", 10.0, 1.0),
        ("G", 11.0, 1.0),
        ("F", 12.0, 1.0),
        ("E", 13.0, 1.0),
        ("D", 14.0, 1.0),
        ("C", 15.0, 2.0),
    ];
    song("C Major Scale", 80.0, &notes)
}

pub fn simple_melody() -> Song {
    let notes = [
        ("G", 0.0, 1.0),
        ("A", 1.0, 1.0),
        ("B", 2.0, 1.0),
        ("C2", 3.0, 1.0),
        ("B", 4.0, 1.0),
        ("A", 5.0, 1.0),
        ("G", 6.0, 2.0),
        ("E", 8.0, 1.0),
        ("F", 9.0, 1.0),
        ("G", 10.0, 1.0),
        ("A", 11.0, 1.0),
        ("G", 12.0, 1.0),
        ("F", 13.0, 1.0),
        ("E", 14.0, 2.0),
        ("G", 16.0, 0.5),
        ("A", 16.5, 0.5),
        ("B", 17.0, 0.5),
        ("C2", 17.5, 0.5),
        ("B", 18.0, 0.5),
        ("A", 18.5, 0.5),
        ("G", 19.0, 1.0),
        ("C2", 20.0, 4.0),
    ];
    song("Simple Flute Melody", 90.0, &notes)
}

fn song(title: &str, tempo: f64, notes: &[(&str, f64, f64)]) -> Song {
    Song {
        title: title.to_string(),
        tempo,
        notes: notes
            .iter()
            .map(|&(pitch, start, duration)| NoteDefinition::new(pitch, start, duration))
            .collect(),
    }
}

pub fn requirement_table(mode: InputMode) -> RequirementTable {
    match mode {
        InputMode::Keys => seven_key_table(),
        InputMode::Fingering => fingering_table(),
    }
}

/// Each step up the scale lifts one more key, starting from all seven held.
/// High C needs no keys.
pub fn seven_key_table() -> RequirementTable {
    let keys: [(&str, &[KeyboardKey]); 8] = [
        ("C", &[A, S, D, F, G, H, J]),
        ("D", &[A, S, D, F, G, H]),
        ("E", &[A, S, D, F, G]),
        ("F", &[A, S, D, F]),
        ("G", &[A, S, D]),
        ("A", &[A, S]),
        ("B", &[A]),
        ("C2", &[]),
    ];
    keys.into_iter()
        .fold(RequirementTable::new(InputMode::Keys), |table, (pitch, keys)| {
            table.with_entry(pitch, keys.iter().copied())
        })
}

/// Closed keys of the standard Boehm fingering for each pitch.
pub fn fingering_table() -> RequirementTable {
    let fingerings: [(&str, &[FluteKey]); 13] = [
        ("C", &[Thumb, Lh1, Lh2, Lh3, Rh1, Rh2, Rh3, CRoller, CSharp]),
        ("D", &[Thumb, Lh1, Lh2, Lh3, Rh1, Rh2, Rh3]),
        ("E", &[Thumb, Lh1, Lh2, Lh3, Rh1, Rh2, Rh4]),
        ("F", &[Thumb, Lh1, Lh2, Lh3, Rh1, Rh4]),
        ("G", &[Thumb, Lh1, Lh2, Lh3, Rh4]),
        ("A", &[Thumb, Lh1, Lh2, Rh4]),
        ("B", &[Thumb, Lh1, Rh4]),
        ("C2", &[Lh1, Rh4]),
        ("C#", &[Thumb, Lh1, Lh2, Lh3, Rh1, Rh2]),
        ("D#", &[Thumb, Lh1, Lh2, Lh3, Rh1]),
        ("F#", &[Thumb, Lh1, Lh2, Lh3]),
        ("G#", &[Thumb, Lh1, Lh2]),
        ("A#", &[Thumb, Lh1]),
    ];
    fingerings
        .into_iter()
        .fold(RequirementTable::new(InputMode::Fingering), |table, (pitch, keys)| {
            table.with_entry(pitch, keys.iter().copied())
        })
}

/// Fundamental frequency in Hz, for audio adapters.
pub fn pitch_frequency(pitch: &str) -> Option<f64> {
    match pitch {
        "C" => Some(261.63),
        "D" => Some(293.66),
        "E" => Some(329.63),
        "F" => Some(349.23),
        "G" => Some(392.00),
        "A" => Some(440.00),
        "B" => Some(493.88),
        "C2" => Some(523.25),
        _ => None,
    }
}

/// Hex colour a renderer paints the note with. Unknown pitches are white.
pub fn note_color(pitch: &str) -> &'static str {
    match pitch {
        "C" => "#FF6B6B",
        "D" => "#FF8E53",
        "E" => "#FFA500",
        "F" => "#FFD93D",
        "G" => "#6BCB77",
        "A" => "#4D96FF",
        "B" => "#9D4EDD",
        "C2" => "#FF6B9D",
        _ => "#FFFFFF",
    }
}

/// Name shown on the treble staff in fingering-explore mode.
pub fn staff_label(pitch: &str) -> Option<&'static str> {
    match pitch {
        "C" => Some("C (Middle C)"),
        "D" => Some("D"),
        "E" => Some("E"),
        "F" => Some("F"),
        "G" => Some("G"),
        "A" => Some("A"),
        "B" => Some("B"),
        "C2" => Some("C (High C)"),
        _ => None,
    }
}
