use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use overworld::{write_text_atomic, Facing, PersistenceHook, PlayerSnapshot};
use serde::{Deserialize, Serialize};

pub(crate) const SAVE_VERSION: u32 = 1;
pub(crate) const SAVE_FILE_NAME: &str = "player.json";

type SaveLoadResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SaveGame {
    save_version: u32,
    x: f32,
    y: f32,
    facing: Facing,
}

impl SaveGame {
    fn from_snapshot(snapshot: PlayerSnapshot) -> Self {
        Self {
            save_version: SAVE_VERSION,
            x: snapshot.x,
            y: snapshot.y,
            facing: snapshot.facing,
        }
    }

    fn into_snapshot(self) -> PlayerSnapshot {
        PlayerSnapshot {
            x: self.x,
            y: self.y,
            facing: self.facing,
        }
    }
}

/// Versioned JSON save of the player position, one file per save dir.
#[derive(Debug, Clone)]
pub(crate) struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub(crate) fn in_dir(save_dir: &Path) -> Self {
        Self {
            path: save_dir.join(SAVE_FILE_NAME),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no save exists yet.
    pub(crate) fn load(&self) -> SaveLoadResult<Option<PlayerSnapshot>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(format!("read save '{}': {error}", self.path.display()));
            }
        };
        let save = parse_save_game_json(&raw)?;
        validate_save_game(&save)?;
        Ok(Some(save.into_snapshot()))
    }

    pub(crate) fn store(&self, snapshot: PlayerSnapshot) -> SaveLoadResult<()> {
        let save = SaveGame::from_snapshot(snapshot);
        validate_save_game(&save)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| format!("create save dir '{}': {error}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&save)
            .map_err(|error| format!("encode save json: {error}"))?;
        write_text_atomic(&self.path, &json)
            .map_err(|error| format!("write save '{}': {error}", self.path.display()))
    }

    pub(crate) fn remove(&self) -> SaveLoadResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(format!("remove save '{}': {error}", self.path.display())),
        }
    }
}

impl PersistenceHook for SaveStore {
    fn save(&mut self, snapshot: PlayerSnapshot) -> Result<(), String> {
        self.store(snapshot)
    }

    fn clear(&mut self) -> Result<(), String> {
        self.remove()
    }
}

fn parse_save_game_json(raw: &str) -> SaveLoadResult<SaveGame> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SaveGame>(&mut deserializer) {
        Ok(save) => Ok(save),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse save json: {source}"))
            } else {
                Err(format!("parse save json at {path}: {source}"))
            }
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> String {
    format!("validation failed at {path}: {}", message.into())
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> String {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn validate_save_game(save: &SaveGame) -> SaveLoadResult<()> {
    if save.save_version != SAVE_VERSION {
        return Err(expected_actual(
            "save_version",
            SAVE_VERSION,
            save.save_version,
        ));
    }
    if !save.x.is_finite() {
        return Err(expected_actual("x", "finite number", save.x));
    }
    if !save.y.is_finite() {
        return Err(expected_actual("y", "finite number", save.y));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PlayerSnapshot {
        PlayerSnapshot {
            x: 162.0,
            y: 98.5,
            facing: Facing::Left,
        }
    }

    #[test]
    fn store_then_load_returns_same_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::in_dir(dir.path());

        store.store(snapshot()).expect("store");
        assert_eq!(store.load().expect("load"), Some(snapshot()));
    }

    #[test]
    fn missing_save_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::in_dir(&dir.path().join("nested"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn store_creates_missing_save_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::in_dir(&dir.path().join("saves"));
        store.store(snapshot()).expect("store");
        assert!(store.path().is_file());
    }

    #[test]
    fn written_json_names_facing_in_lowercase() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::in_dir(dir.path());
        store.store(snapshot()).expect("store");

        let raw = fs::read_to_string(store.path()).expect("read");
        assert!(raw.contains("\"facing\": \"left\""), "{raw}");
        assert!(raw.contains("\"save_version\": 1"), "{raw}");
    }

    #[test]
    fn parse_error_reports_json_path() {
        let err = parse_save_game_json(r#"{"save_version":1,"x":1.0,"y":2.0,"facing":"north"}"#)
            .expect_err("bad facing");
        assert!(err.starts_with("parse save json at facing:"), "{err}");
    }

    #[test]
    fn parse_error_without_path_has_plain_prefix() {
        let err = parse_save_game_json("not json").expect_err("garbage");
        assert!(err.starts_with("parse save json: "), "{err}");
    }

    #[test]
    fn wrong_version_is_rejected() {
        let save = parse_save_game_json(r#"{"save_version":7,"x":1.0,"y":2.0,"facing":"up"}"#)
            .expect("parse");
        let err = validate_save_game(&save).expect_err("version");
        assert_eq!(err, "validation failed at save_version: expected 1, got 7");
    }

    #[test]
    fn non_finite_position_is_not_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::in_dir(dir.path());
        let err = store
            .store(PlayerSnapshot {
                x: f32::NAN,
                y: 0.0,
                facing: Facing::Down,
            })
            .expect_err("nan");
        assert!(err.starts_with("validation failed at x: expected finite number"), "{err}");
        assert!(!store.path().exists());
    }

    #[test]
    fn remove_deletes_save_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SaveStore::in_dir(dir.path());
        store.save(snapshot()).expect("save");
        store.clear().expect("clear");
        assert!(!store.path().exists());
        store.clear().expect("clear again");
    }
}
