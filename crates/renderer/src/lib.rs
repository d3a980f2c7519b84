//! Renderer crate for colorfield.
//!
//! Glues the window, the `wgpu` pipeline, and the animated background
//! shaders together. The overall flow is:
//!
//! ```text
//!   colorfield CLI
//!          │ RendererConfig + ThemeStore
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                │                    │
//!          │                └─ pointer/touch ─▶ ColorPicker ─▶ ThemeStore
//!          │                                     │
//!          │                                     └─▶ scene uniforms ─▶ GPU UBO
//! ```
//!
//! `WindowState` owns the GPU resources, the drag picker, and the theme
//! store for the lifetime of the event loop; `Renderer` is the thin
//! entry point. Both backgrounds are built-in GLSL fragment shaders
//! drawn over a full-screen triangle: the grain variant reads the theme
//! background color and the live drag position, the marble variant only
//! needs time and resolution.

mod compile;
mod gpu;
mod params;
mod shaders;
mod types;
mod window;

pub use types::{Antialiasing, Background, MarbleGrid, RendererConfig};

use anyhow::Result;
use theme::ThemeStore;

/// High-level entry point that owns the configuration and the store.
pub struct Renderer {
    config: RendererConfig,
    store: ThemeStore,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration and theme store.
    pub fn new(config: RendererConfig, store: ThemeStore) -> Self {
        Self { config, store }
    }

    /// Opens the window and drives the event loop until it closes.
    ///
    /// Returns an error if the window, GPU context, or shaders fail to
    /// initialize. There is no retry and no fallback renderer: the
    /// background is cosmetic, so the caller logs the error and gives up.
    pub fn run(self) -> Result<()> {
        window::run_event_loop(self.config, self.store)
    }
}
