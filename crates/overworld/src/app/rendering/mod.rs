mod canvas;
mod palette;
mod renderer;
mod scene;

pub use renderer::Renderer;
