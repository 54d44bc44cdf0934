mod input;
mod loop_runner;
mod rendering;

pub use loop_runner::{
    run_app, AppError, AutosaveTimer, LoopConfig, PersistenceHook, DEFAULT_AUTOSAVE_INTERVAL,
    DEFAULT_WINDOW_SCALE,
};
pub use rendering::Renderer;
