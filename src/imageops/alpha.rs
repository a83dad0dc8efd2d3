use image::RgbaImage;

/// Pixels with any opacity at all.
pub fn count_opaque(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p[3] > 0).count()
}

/// Binary alpha policy: below `low` becomes 0, `low..high` becomes 255,
/// `high` and above is kept as is.
pub fn snap_alpha(image: &mut RgbaImage, low: u8, high: u8) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3];
        if alpha < low {
            pixel[3] = 0;
        } else if alpha < high {
            pixel[3] = u8::MAX;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_snap_alpha_bands() {
        let alphas = [0u8, 1, 49, 50, 120, 199, 200, 230, 255];
        let mut image = RgbaImage::from_fn(alphas.len() as u32, 1, |x, _| {
            Rgba([10, 20, 30, alphas[x as usize]])
        });

        snap_alpha(&mut image, 50, 200);

        let snapped: Vec<u8> = image.pixels().map(|p| p[3]).collect();
        assert_eq!(snapped, vec![0, 0, 0, 255, 255, 255, 200, 230, 255]);
        // colors are left alone
        assert!(image.pixels().all(|p| p.0[..3] == [10, 20, 30]));
    }

    #[test]
    fn test_count_opaque() {
        let mut image = RgbaImage::new(3, 3);
        image.put_pixel(1, 1, Rgba([0, 0, 0, 1]));
        assert_eq!(count_opaque(&image), 1);
    }
}
