use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type Seconds = f64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub title: String,
    #[serde(alias = "bpm")]
    pub tempo: f64,
    pub notes: Vec<NoteDefinition>,
}

impl Song {
    /// Start time of the final note, or `None` for an empty song.
    pub fn last_start_time(&self) -> Option<Seconds> {
        self.notes.last().map(|n| n.start_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteDefinition {
    #[serde(rename = "note", alias = "pitch")]
    pub pitch: String,
    #[serde(rename = "time", alias = "start_time")]
    pub start_time: Seconds,
    pub duration: Seconds,
}

impl NoteDefinition {
    pub fn new(pitch: impl Into<String>, start_time: Seconds, duration: Seconds) -> Self {
        Self {
            pitch: pitch.into(),
            start_time,
            duration,
        }
    }
}

/// The seven keyboard keys of the simple mapping, left hand to right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyboardKey {
    A,
    S,
    D,
    F,
    G,
    H,
    J,
}

impl KeyboardKey {
    pub const ALL: [KeyboardKey; 7] = [
        KeyboardKey::A,
        KeyboardKey::S,
        KeyboardKey::D,
        KeyboardKey::F,
        KeyboardKey::G,
        KeyboardKey::H,
        KeyboardKey::J,
    ];

    /// Maps a typed character (either case) to its key.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'S' => Some(Self::S),
            'D' => Some(Self::D),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'H' => Some(Self::H),
            'J' => Some(Self::J),
            _ => None,
        }
    }

    /// Column of the key on a seven-lane track.
    pub fn lane(self) -> usize {
        self as usize
    }
}

/// Keys and tone holes of a concert flute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FluteKey {
    Thumb,
    ThumbBb,
    Lh1,
    Lh2,
    Lh3,
    Lh4,
    Rh1,
    Rh2,
    Rh3,
    Rh4,
    Trill1,
    Trill2,
    BRoller,
    CRoller,
    CSharp,
}

impl FluteKey {
    pub fn name(self) -> &'static str {
        match self {
            FluteKey::Thumb => "thumb",
            FluteKey::ThumbBb => "thumbBb",
            FluteKey::Lh1 => "lh1",
            FluteKey::Lh2 => "lh2",
            FluteKey::Lh3 => "lh3",
            FluteKey::Lh4 => "lh4",
            FluteKey::Rh1 => "rh1",
            FluteKey::Rh2 => "rh2",
            FluteKey::Rh3 => "rh3",
            FluteKey::Rh4 => "rh4",
            FluteKey::Trill1 => "trill1",
            FluteKey::Trill2 => "trill2",
            FluteKey::BRoller => "bRoller",
            FluteKey::CRoller => "cRoller",
            FluteKey::CSharp => "cSharp",
        }
    }
}

/// One abstract input unit. A pitch is encoded by the set of elements held
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlElement {
    Key(KeyboardKey),
    Finger(FluteKey),
}

impl fmt::Display for ControlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlElement::Key(k) => write!(f, "{:?}", k),
            ControlElement::Finger(k) => f.write_str(k.name()),
        }
    }
}

impl From<KeyboardKey> for ControlElement {
    fn from(key: KeyboardKey) -> Self {
        ControlElement::Key(key)
    }
}

impl From<FluteKey> for ControlElement {
    fn from(key: FluteKey) -> Self {
        ControlElement::Finger(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Keys,
    Fingering,
}

pub type Requirement = BTreeSet<ControlElement>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementTable {
    pub mode: InputMode,
    pub entries: BTreeMap<String, Requirement>,
}

impl RequirementTable {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry<I, E>(mut self, pitch: impl Into<String>, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ControlElement>,
    {
        self.entries
            .insert(pitch.into(), elements.into_iter().map(Into::into).collect());
        self
    }

    pub fn requirement(&self, pitch: &str) -> Option<&Requirement> {
        self.entries.get(pitch)
    }

    pub fn pitches(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_definition_uses_song_file_field_names() {
        let note = NoteDefinition::new("C2", 7.0, 2.0);

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["note"], "C2");
        assert_eq!(json["time"], 7.0);
        assert_eq!(json["duration"], 2.0);
    }

    #[test]
    fn song_accepts_bpm_alias() {
        let v = serde_json::json!({
            "title": "Scale",
            "bpm": 80,
            "notes": [
                { "note": "C", "time": 0, "duration": 1 },
                { "pitch": "D", "start_time": 1, "duration": 1 }
            ]
        });

        let song: Song = serde_json::from_value(v).unwrap();
        assert_eq!(song.tempo, 80.0);
        assert_eq!(song.notes[1].pitch, "D");
        assert_eq!(song.last_start_time(), Some(1.0));
    }

    #[test]
    fn control_elements_deserialize_from_both_vocabularies() {
        let v = serde_json::json!(["A", "lh1", "cSharp", "J"]);
        let elements: Vec<ControlElement> = serde_json::from_value(v).unwrap();

        assert_eq!(
            elements,
            vec![
                ControlElement::Key(KeyboardKey::A),
                ControlElement::Finger(FluteKey::Lh1),
                ControlElement::Finger(FluteKey::CSharp),
                ControlElement::Key(KeyboardKey::J),
            ]
        );
        assert_eq!(elements[2].to_string(), "cSharp");
        assert_eq!(elements[3].to_string(), "J");
    }

    #[test]
    fn keyboard_key_from_char_ignores_case() {
        assert_eq!(KeyboardKey::from_char('a'), Some(KeyboardKey::A));
        assert_eq!(KeyboardKey::from_char('J'), Some(KeyboardKey::J));
        assert_eq!(KeyboardKey::from_char('k'), None);
        assert_eq!(KeyboardKey::H.lane(), 5);
    }

    #[test]
    fn requirement_table_roundtrip() {
        let table = RequirementTable::new(InputMode::Keys)
            .with_entry("B", [KeyboardKey::A])
            .with_entry("C2", Vec::<KeyboardKey>::new());

        let json = serde_json::to_string(&table).unwrap();
        let back: RequirementTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
        assert!(back.requirement("C2").unwrap().is_empty());
        assert!(back.requirement("Z").is_none());
        assert_eq!(back.pitches().collect::<Vec<_>>(), vec!["B", "C2"]);
    }
}
