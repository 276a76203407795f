use std::{fs, path::Path};

use song_schema::Song;

use crate::error::{LoadError, SongError};

pub fn load_song_from_path(path: impl AsRef<Path>) -> Result<Song, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let song: Song = serde_json::from_slice(&bytes)?;
    validate_song(&song)?;
    Ok(song)
}

pub fn load_song_from_str(json: &str) -> Result<Song, LoadError> {
    let song: Song = serde_json::from_str(json)?;
    validate_song(&song)?;
    Ok(song)
}

pub fn validate_song(song: &Song) -> Result<(), SongError> {
    if !(song.tempo > 0.0) {
        return Err(SongError::NonPositiveTempo(song.tempo));
    }
    if song.notes.is_empty() {
        return Err(SongError::Empty);
    }

    let mut previous = 0.0;
    for (index, note) in song.notes.iter().enumerate() {
        if !(note.start_time >= 0.0) {
            return Err(SongError::NegativeStartTime {
                index,
                pitch: note.pitch.clone(),
                start_time: note.start_time,
            });
        }
        if !(note.duration > 0.0) {
            return Err(SongError::NonPositiveDuration {
                index,
                pitch: note.pitch.clone(),
                duration: note.duration,
            });
        }
        if note.start_time < previous {
            return Err(SongError::Unordered {
                index,
                pitch: note.pitch.clone(),
                start_time: note.start_time,
                previous,
            });
        }
        previous = note.start_time;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_note_time_field_names() {
        let song = load_song_from_str(
            r#"{ "title": "T", "bpm": 90, "notes": [
                { "note": "G", "time": 0, "duration": 1 },
                { "note": "A", "time": 0, "duration": 0.5 },
                { "note": "B", "time": 1.5, "duration": 0.5 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(song.notes.len(), 3);
        assert_eq!(song.tempo, 90.0);
    }

    #[test]
    fn rejects_empty_song() {
        let err = load_song_from_str(r#"{ "title": "T", "tempo": 60, "notes": [] }"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(SongError::Empty)));
    }

    #[test]
    fn rejects_unordered_notes() {
        let err = load_song_from_str(
            r#"{ "title": "T", "tempo": 60, "notes": [
                { "note": "C", "time": 2, "duration": 1 },
                { "note": "D", "time": 1, "duration": 1 }
            ] }"#,
        )
        .unwrap_err();
        match err {
            LoadError::Invalid(SongError::Unordered { index, previous, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(previous, 2.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_duration_and_tempo() {
        let err = load_song_from_str(
            r#"{ "title": "T", "tempo": 60, "notes": [ { "note": "C", "time": 0, "duration": 0 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(SongError::NonPositiveDuration { index: 0, .. })
        ));

        let err = load_song_from_str(
            r#"{ "title": "T", "tempo": 0, "notes": [ { "note": "C", "time": 0, "duration": 1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Invalid(SongError::NonPositiveTempo(_))));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = load_song_from_str("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let missing = std::env::temp_dir().join(format!(
            "flute_core_missing_song_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&missing);

        let err = load_song_from_path(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
