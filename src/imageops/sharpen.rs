use image::RgbaImage;

const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_SCALE: u32 = 13;

/// 3x3 smoothing of the color channels. Border pixels are copied unchanged.
fn smooth(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut output = image.clone();
    if width < 3 || height < 3 {
        return output;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0u32; 3];
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let pixel = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                        *sum += u32::from(channel) * weight;
                    }
                }
            }
            let target = output.get_pixel_mut(x, y);
            for (channel, sum) in target.0.iter_mut().zip(sums) {
                *channel = ((sum + SMOOTH_SCALE / 2) / SMOOTH_SCALE) as u8;
            }
        }
    }
    output
}

/// Sharpness enhancement: extrapolate from a smoothed copy towards the original.
///
/// A factor of 1.0 returns the image unchanged, larger values sharpen. Alpha is
/// never touched, so a binary alpha mask stays binary.
pub fn sharpen(image: &RgbaImage, factor: f32) -> RgbaImage {
    let degenerate = smooth(image);
    let mut output = image.clone();

    for ((target, original), soft) in output
        .pixels_mut()
        .zip(image.pixels())
        .zip(degenerate.pixels())
    {
        for channel in 0..3 {
            let soft_value = f32::from(soft[channel]);
            let value = soft_value + factor * (f32::from(original[channel]) - soft_value);
            target[channel] = value.clamp(0.0, 255.0) as u8;
        }
    }
    output
}
