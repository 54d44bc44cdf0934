use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;
pub mod world;

pub use app::{
    run_app, AppError, AutosaveTimer, LoopConfig, PersistenceHook, Renderer,
    DEFAULT_AUTOSAVE_INTERVAL, DEFAULT_WINDOW_SCALE,
};
pub use content::{
    builtin_overworld, generate_meadow, load_overworld, parse_overworld, write_text_atomic,
    ContentError, ContentErrorCode, NpcDef, OverworldDef, PlayerDef, SourceLocation,
    MEADOW_HEIGHT, MEADOW_WIDTH,
};
pub use world::{
    Actor, Camera, DialogueController, DialogueState, Facing, InputAction, InputSnapshot,
    MovementMode, Npc, PlayerSnapshot, TickReport, TileCoord, TileKind, TileMap, Vec2, Viewport,
    World, WorldConfig,
};

pub const ROOT_ENV_VAR: &str = "OVERWORLD_ROOT";
pub const CONTENT_ENV_VAR: &str = "OVERWORLD_CONTENT";
pub const DEFAULT_CONTENT_FILE: &str = "overworld.xml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub content_path: PathBuf,
    pub save_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create save directory at {path}: {source}")]
    CreateSaveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "OVERWORLD_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/overworld\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root, the overworld content file and the save
/// directory, creating the latter if needed.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let content_override = match env::var(CONTENT_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        Ok(_) | Err(env::VarError::NotPresent) => None,
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: CONTENT_ENV_VAR,
                source,
            })
        }
    };
    let paths = paths_for_root(root, content_override);

    fs::create_dir_all(&paths.save_dir).map_err(|source| StartupError::CreateSaveDir {
        path: paths.save_dir.clone(),
        source,
    })?;

    Ok(paths)
}

fn paths_for_root(root: PathBuf, content_override: Option<PathBuf>) -> AppPaths {
    let content_path = match content_override {
        Some(path) if path.is_absolute() => path,
        Some(path) => root.join(path),
        None => root.join("assets").join(DEFAULT_CONTENT_FILE),
    };
    let save_dir = root.join("saves");
    AppPaths {
        root,
        content_path,
        save_dir,
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_repo_marker(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
                    start_dir: normalize_path(&exe_dir),
                    env_var: ROOT_ENV_VAR,
                })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
