use image::{GenericImageView, RgbaImage};

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub const fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub const fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Grow by `padding` on every side without leaving a `width` x `height` image.
    pub fn expand(self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(padding),
            top: self.top.saturating_sub(padding),
            right: (self.right + padding).min(width.saturating_sub(1)),
            bottom: (self.bottom + padding).min(height.saturating_sub(1)),
        }
    }
}

/// Tight box around pixels with alpha above `threshold`, or `None` when there are none.
pub fn content_bounds(image: &RgbaImage, threshold: u8) -> Option<Bounds> {
    let (width, height) = image.dimensions();
    let mut bounds = [width, height, 0, 0]; // [x1, y1, x2, y2]
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > threshold {
            update_bounds(&mut bounds, x, y);
            found = true;
        }
    }

    found.then_some(Bounds {
        left: bounds[0],
        top: bounds[1],
        right: bounds[2],
        bottom: bounds[3],
    })
}

/// Crop to the padded content box. Fully transparent images come back unchanged.
pub fn crop_to_content(image: &RgbaImage, threshold: u8, padding: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    match content_bounds(image, threshold) {
        Some(bounds) => {
            let b = bounds.expand(padding, width, height);
            image.view(b.left, b.top, b.width(), b.height()).to_image()
        }
        None => image.clone(),
    }
}

fn update_bounds(bounds: &mut [u32; 4], x: u32, y: u32) {
    bounds[0] = bounds[0].min(x);
    bounds[1] = bounds[1].min(y);
    bounds[2] = bounds[2].max(x);
    bounds[3] = bounds[3].max(y);
}
