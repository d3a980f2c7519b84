//! Color domain for colorfield.
//!
//! Everything here is pure state and math: the hue/saturation pair picked
//! by drag gestures, the derived background/text colors, and the store
//! that publishes changes to subscribers. Rendering and persistence live
//! in the `renderer` and `colorfield` crates; this crate never touches a
//! window, a GPU, or the filesystem.

mod color;
mod picker;
mod store;

pub use color::{ColorState, Hsl, DEFAULT_HUE, DEFAULT_SATURATION};
pub use picker::{ColorPicker, DragSession};
pub use store::{Theme, ThemeStore};
