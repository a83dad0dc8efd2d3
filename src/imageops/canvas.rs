use image::{imageops, GenericImageView, Rgba, RgbaImage};

/// Integer-floor offsets that center `width` x `height` on a square canvas.
pub fn center_offset(width: u32, height: u32, canvas: u32) -> Option<(i64, i64)> {
    if width > canvas || height > canvas {
        return None;
    }
    Some((
        i64::from((canvas - width) / 2),
        i64::from((canvas - height) / 2),
    ))
}

/// Place `image` in the middle of a fully transparent `size` x `size` canvas.
pub fn center_on_canvas<I>(image: &I, size: u32) -> Option<RgbaImage>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = image.dimensions();
    center_offset(width, height, size).map(|(x, y)| {
        let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
        imageops::replace(&mut canvas, image, x, y);
        canvas
    })
}

/// Aspect-preserving size whose larger side is `target`; the smaller side truncates
/// and never drops below one pixel.
pub fn fit_within(width: u32, height: u32, target: u32) -> (u32, u32) {
    let largest = width.max(height).max(1);
    let scale = |dim: u32| ((u64::from(dim) * u64::from(target)) / u64::from(largest)).max(1) as u32;
    (scale(width), scale(height))
}
