use std::time::{SystemTime, UNIX_EPOCH};

use overworld::{
    builtin_overworld, load_overworld, resolve_app_paths, AppError, AppPaths, LoopConfig,
    OverworldDef, PersistenceHook, World, WorldConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::save::SaveStore;

const SCALE_ENV_VAR: &str = "OVERWORLD_SCALE";
const BGR555_ENV_VAR: &str = "OVERWORLD_BGR555";
const SEED_ENV_VAR: &str = "OVERWORLD_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world: World,
    pub(crate) persistence: Option<Box<dyn PersistenceHook>>,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Overworld Startup ===");

    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        content_path = %app_paths.content_path.display(),
        save_dir = %app_paths.save_dir.display(),
        "startup"
    );

    let overworld = load_content(&app_paths)?;
    let encounter_seed = parse_seed_from_env().unwrap_or_else(clock_seed);
    info!(encounter_seed, "encounter_rng_seeded");
    let mut world = overworld.into_world(WorldConfig {
        encounter_seed,
        ..WorldConfig::default()
    });

    let store = SaveStore::in_dir(&app_paths.save_dir);
    match store.load() {
        Ok(Some(snapshot)) => {
            world.restore_player(snapshot);
        }
        Ok(None) => info!(path = %store.path().display(), "no_save_found"),
        Err(error) => warn!(error = %error, "save_load_failed_using_spawn"),
    }

    let config = LoopConfig {
        scale: parse_scale_from_env().unwrap_or(LoopConfig::default().scale),
        bgr555: parse_bgr555_from_env().unwrap_or(LoopConfig::default().bgr555),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        world,
        persistence: Some(Box::new(store)),
    })
}

fn load_content(app_paths: &AppPaths) -> Result<OverworldDef, AppError> {
    if app_paths.content_path.is_file() {
        return Ok(load_overworld(&app_paths.content_path)?);
    }
    info!(
        path = %app_paths.content_path.display(),
        "content_missing_using_builtin"
    );
    Ok(builtin_overworld())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_scale_from_env() -> Option<u32> {
    let raw = std::env::var(SCALE_ENV_VAR).ok()?;
    let parsed = parse_scale(&raw);
    if parsed.is_none() {
        warn!(var = SCALE_ENV_VAR, value = %raw, "invalid_env_value_ignored");
    }
    parsed
}

fn parse_bgr555_from_env() -> Option<bool> {
    let raw = std::env::var(BGR555_ENV_VAR).ok()?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        warn!(var = BGR555_ENV_VAR, value = %raw, "invalid_env_value_ignored");
    }
    parsed
}

fn parse_seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV_VAR).ok()?;
    let parsed = raw.trim().parse::<u64>().ok();
    if parsed.is_none() {
        warn!(var = SEED_ENV_VAR, value = %raw, "invalid_env_value_ignored");
    }
    parsed
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_scale(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|scale| *scale > 0)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
