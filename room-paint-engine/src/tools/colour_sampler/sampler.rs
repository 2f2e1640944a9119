use bevy::math::{Rect, UVec2, Vec2};
use image::{GenericImageView, Rgb};

use crate::engine::colour::PaintColour;

/// How pixels around the tapped point are reduced to one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePolicy {
    SinglePixel,
    /// Mean over a square window centred on the point. Even sizes grow to the next odd size.
    BlockAverage { size: u32 },
}

impl Default for SamplePolicy {
    fn default() -> Self {
        Self::BlockAverage {
            size: constants::sampling::SAMPLE_BLOCK_SIZE,
        }
    }
}

impl SamplePolicy {
    /// Pixels either side of the centre that the window reaches.
    fn half_extent(&self) -> u32 {
        match self {
            Self::SinglePixel => 0,
            Self::BlockAverage { size } => size / 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// No decoded frame yet, or the video has no on-screen size.
    NotReady,
    Sampled {
        colour: PaintColour,
        image_point: UVec2,
    },
}

impl SampleOutcome {
    pub fn colour(&self) -> Option<PaintColour> {
        match self {
            Self::NotReady => None,
            Self::Sampled { colour, .. } => Some(*colour),
        }
    }
}

/// Map a screen point over the displayed video rectangle into frame pixels.
///
/// Points outside the rectangle clamp to the nearest edge pixel. Returns `None`
/// when either the rectangle or the frame is empty.
pub fn map_to_image(screen: Vec2, viewport: Rect, frame_size: UVec2) -> Option<UVec2> {
    let view_size = viewport.size();
    if view_size.x <= 0.0 || view_size.y <= 0.0 || frame_size.x == 0 || frame_size.y == 0 {
        return None;
    }

    let scale = frame_size.as_vec2() / view_size;
    let mapped = ((screen - viewport.min) * scale).round();
    let max = (frame_size - UVec2::ONE).as_vec2();

    Some(mapped.clamp(Vec2::ZERO, max).as_uvec2())
}

/// Sample the frame under a screen point.
///
/// The averaging window is clipped to the frame, so edge samples only read
/// in-bounds pixels. Channel means are rounded to the nearest integer.
pub fn sample_colour_at<I>(
    frame: Option<&I>,
    screen: Vec2,
    viewport: Rect,
    policy: SamplePolicy,
) -> SampleOutcome
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let Some(frame) = frame else {
        return SampleOutcome::NotReady;
    };
    let (width, height) = frame.dimensions();
    let Some(point) = map_to_image(screen, viewport, UVec2::new(width, height)) else {
        return SampleOutcome::NotReady;
    };

    let half = policy.half_extent();
    let x_range = point.x.saturating_sub(half)..=(point.x + half).min(width - 1);
    let y_range = point.y.saturating_sub(half)..=(point.y + half).min(height - 1);

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in y_range {
        for x in x_range.clone() {
            let Rgb(px) = frame.get_pixel(x, y);
            for (sum, channel) in sums.iter_mut().zip(px) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    // count >= 1: the clamped centre is always inside the frame.
    let mean = |sum: u64| ((sum + count / 2) / count) as u8;

    SampleOutcome::Sampled {
        colour: PaintColour::new(mean(sums[0]), mean(sums[1]), mean(sums[2])),
        image_point: point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn viewport(w: f32, h: f32) -> Rect {
        Rect::new(0.0, 0.0, w, h)
    }

    #[test]
    fn viewport_centre_maps_to_frame_centre() {
        let point = map_to_image(
            Vec2::new(195.0, 422.0),
            viewport(390.0, 844.0),
            UVec2::new(1920, 1080),
        );
        assert_eq!(point, Some(UVec2::new(960, 540)));
    }

    #[test]
    fn offset_viewport_is_subtracted_before_scaling() {
        let rect = Rect::new(100.0, 50.0, 300.0, 150.0);
        let point = map_to_image(Vec2::new(200.0, 100.0), rect, UVec2::new(400, 200));
        assert_eq!(point, Some(UVec2::new(200, 100)));
    }

    #[test]
    fn points_outside_the_video_clamp_to_the_edge() {
        let frame = UVec2::new(640, 480);
        let rect = viewport(320.0, 240.0);
        assert_eq!(
            map_to_image(Vec2::new(-40.0, -3.0), rect, frame),
            Some(UVec2::ZERO)
        );
        assert_eq!(
            map_to_image(Vec2::new(900.0, 900.0), rect, frame),
            Some(UVec2::new(639, 479))
        );
    }

    #[test]
    fn empty_viewport_cannot_be_mapped() {
        assert_eq!(
            map_to_image(Vec2::ZERO, viewport(0.0, 100.0), UVec2::new(10, 10)),
            None
        );
        assert_eq!(
            map_to_image(Vec2::ZERO, viewport(10.0, 10.0), UVec2::ZERO),
            None
        );
    }

    #[test]
    fn uniform_block_averages_exactly() {
        let frame = RgbImage::from_pixel(5, 5, Rgb([10, 20, 30]));
        let outcome = sample_colour_at(
            Some(&frame),
            Vec2::new(2.0, 2.0),
            viewport(5.0, 5.0),
            SamplePolicy::BlockAverage { size: 5 },
        );
        let colour = outcome.colour().unwrap();
        assert_eq!(colour.channels(), [10, 20, 30]);
        assert_eq!(colour.hex(), "#0a141e");
    }

    #[test]
    fn corner_sample_reads_only_in_bounds_pixels() {
        let mut frame = RgbImage::from_pixel(8, 8, Rgb([200, 200, 200]));
        // The 3x3 in-bounds corner of a 5x5 window centred on (0, 0).
        for y in 0..3 {
            for x in 0..3 {
                frame.put_pixel(x, y, Rgb([9, 18, 27]));
            }
        }
        let outcome = sample_colour_at(
            Some(&frame),
            Vec2::ZERO,
            viewport(8.0, 8.0),
            SamplePolicy::BlockAverage { size: 5 },
        );
        match outcome {
            SampleOutcome::Sampled {
                colour,
                image_point,
            } => {
                assert_eq!(image_point, UVec2::ZERO);
                assert_eq!(colour.hex(), "#09121b");
            }
            SampleOutcome::NotReady => panic!("corner sample should succeed"),
        }
    }

    #[test]
    fn block_mean_rounds_to_nearest() {
        let mut frame = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        frame.put_pixel(1, 0, Rgb([1, 3, 255]));
        let outcome = sample_colour_at(
            Some(&frame),
            Vec2::ZERO,
            viewport(2.0, 1.0),
            SamplePolicy::BlockAverage { size: 3 },
        );
        // (0+1)/2 = 0.5 -> 1, (0+3)/2 = 1.5 -> 2, 255/2 = 127.5 -> 128
        assert_eq!(outcome.colour().unwrap().channels(), [1, 2, 128]);
    }

    #[test]
    fn single_pixel_ignores_neighbours() {
        let mut frame = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
        frame.put_pixel(1, 1, Rgb([0x33, 0x66, 0x99]));
        let outcome = sample_colour_at(
            Some(&frame),
            Vec2::new(1.0, 1.0),
            viewport(3.0, 3.0),
            SamplePolicy::SinglePixel,
        );
        assert_eq!(outcome.colour().unwrap().hex(), "#336699");
    }

    #[test]
    fn every_in_rect_point_yields_a_hex_colour() {
        let frame = RgbImage::from_fn(64, 36, |x, y| Rgb([(x * 4) as u8, (y * 7) as u8, 128]));
        let rect = Rect::new(10.0, 20.0, 170.0, 110.0);
        for sy in (20..=110).step_by(9) {
            for sx in (10..=170).step_by(8) {
                let outcome = sample_colour_at(
                    Some(&frame),
                    Vec2::new(sx as f32, sy as f32),
                    rect,
                    SamplePolicy::default(),
                );
                let hex = outcome.colour().unwrap().hex();
                assert_eq!(hex.len(), 7);
                assert!(hex.starts_with('#'));
                assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }

    #[test]
    fn missing_frame_is_not_ready() {
        let outcome = sample_colour_at::<RgbImage>(
            None,
            Vec2::new(1.0, 1.0),
            viewport(4.0, 4.0),
            SamplePolicy::SinglePixel,
        );
        assert_eq!(outcome, SampleOutcome::NotReady);
    }
}
