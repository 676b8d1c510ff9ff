// Pixel-sampling color dropper.
// A `SamplingSurface` turns pointer moves into `SampleEvent`s; a
// `MagnifierController` mirrors them into a magnifier grid while the tool is
// active and keeps the single committed color.
// `cli` and `draw` belong to the demo window and need the `demo` feature.

#[cfg(feature = "demo")]
pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
#[cfg(feature = "demo")]
pub mod draw;
pub mod error;
pub mod events;
pub mod gamma;
pub mod logging;
pub mod magnifier;
pub mod surface;
pub mod types;

pub use color::{pixel_to_hex, rgba_to_hex, HexColor};
pub use config::DropperConfig;
pub use controller::{MagnifierController, OverlayContainer};
pub use error::Error;
pub use events::{Confirm, Crossing, HostEvents, Neighborhood, PointerMove, SampleEvent, Subscription, Topic};
pub use surface::{center_index, PixelSource, SamplingSurface};
pub use types::{PixelSample, Rect, ToolState};
