pub mod alpha;
pub mod background;
pub mod bounding_box;
pub mod canvas;
pub mod sharpen;

pub use alpha::{count_opaque, snap_alpha};
pub use background::{BackgroundStrategy, CornerKeyOutcome};
pub use bounding_box::{content_bounds, crop_to_content, Bounds};
pub use canvas::{center_offset, center_on_canvas, fit_within};
pub use sharpen::sharpen;
