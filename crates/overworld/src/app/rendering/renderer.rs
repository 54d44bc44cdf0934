use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::debug;
use winit::window::Window;

use crate::world::{Viewport, World};

use super::canvas::Canvas;
use super::palette::quantize_bgr555;
use super::scene::draw_world;

/// Owns the window surface. The pixel buffer always has the logical viewport
/// size; resizing the window only rescales the surface it is presented on.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    bgr555: bool,
}

impl Renderer {
    pub fn new(window: Arc<Window>, viewport: Viewport, bgr555: bool) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), viewport, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport,
            bgr555,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        debug!(width, height, "surface_resized");
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        viewport: Viewport,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width.max(1), surface_height.max(1), window);
        Pixels::new(viewport.width, viewport.height, surface)
    }

    pub fn render(&mut self, world: &World, time_ms: u64) -> Result<(), Error> {
        let Viewport { width, height } = self.viewport;
        let frame = self.pixels.frame_mut();
        let mut canvas = Canvas::new(frame, width, height);
        draw_world(&mut canvas, world, time_ms);
        if self.bgr555 {
            quantize_bgr555(frame);
        }
        self.pixels.render()
    }
}
