//! Brute-force sliding-window matcher with per-channel tolerance

use super::{MatchLocation, Template};
use crate::traits::TemplateMatchable;
use image::{Rgba, RgbaImage};
use screenwatch_core::Region;

/// Exhaustive pixel comparison matcher.
///
/// Cost is O(region pixels x template pixels) in the worst case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelMatcher;

impl PixelMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Scan `region` of `container` row-major and stop at the first offset
    /// where every opaque template pixel is within `template.tolerance`.
    pub fn find_in(
        &self,
        container: &RgbaImage,
        template: &Template,
        region: Region,
    ) -> Option<MatchLocation> {
        let (tw, th) = template.image.dimensions();
        if tw == 0 || th == 0 {
            return None;
        }

        let area = region.clip_to(container.width(), container.height());
        if area.width < tw || area.height < th {
            return None;
        }

        let last_x = area.right() - tw;
        let last_y = area.bottom() - th;

        for y in area.y..=last_y {
            for x in area.x..=last_x {
                if matches_at(container, &template.image, x, y, template.tolerance) {
                    return Some(MatchLocation { x, y });
                }
            }
        }

        None
    }
}

impl TemplateMatchable for PixelMatcher {
    fn find(
        &self,
        container: &RgbaImage,
        template: &Template,
        region: Region,
    ) -> Option<MatchLocation> {
        self.find_in(container, template, region)
    }
}

/// Compare the template against the container block at (`x`, `y`).
/// The caller guarantees the block lies inside the container.
fn matches_at(container: &RgbaImage, template: &RgbaImage, x: u32, y: u32, margin: u8) -> bool {
    for ty in 0..template.height() {
        for tx in 0..template.width() {
            let wanted = template.get_pixel(tx, ty);
            let seen = container.get_pixel(x + tx, y + ty);
            if !pixel_matches(wanted, seen, margin) {
                return false;
            }
        }
    }
    true
}

/// Alpha 0 in the template is a wildcard; container alpha is ignored.
#[inline]
fn pixel_matches(wanted: &Rgba<u8>, seen: &Rgba<u8>, margin: u8) -> bool {
    if wanted[3] == 0 {
        return true;
    }

    (0..3).all(|c| wanted[c].abs_diff(seen[c]) <= margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_anywhere(container: &RgbaImage, template: &Template) -> Option<MatchLocation> {
        let whole = Region::full(container.width(), container.height());
        PixelMatcher::new().find_in(container, template, whole)
    }

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8, 255])
        })
    }

    fn paste(container: &mut RgbaImage, patch: &RgbaImage, x: u32, y: u32) {
        image::imageops::replace(container, patch, x as i64, y as i64);
    }

    #[test]
    fn test_exact_match_location() {
        let patch = checker(4, 3);
        let mut screen = solid(40, 30, [0, 0, 0, 255]);
        paste(&mut screen, &patch, 21, 9);

        let template = Template::new("patch".to_string(), patch);
        let found = find_anywhere(&screen, &template);
        assert_eq!(found, Some(MatchLocation { x: 21, y: 9 }));
    }

    #[test]
    fn test_first_match_is_row_major() {
        let mut screen = solid(20, 20, [0, 0, 0, 255]);
        let patch = solid(2, 2, [200, 10, 10, 255]);
        paste(&mut screen, &patch, 15, 3);
        paste(&mut screen, &patch, 2, 12);

        let template = Template::new("red".to_string(), patch);
        let found = find_anywhere(&screen, &template);
        assert_eq!(found, Some(MatchLocation { x: 15, y: 3 }));
    }

    #[test]
    fn test_tolerance_boundary() {
        let screen = solid(10, 10, [100, 100, 100, 255]);
        let template = Template::new("t".to_string(), solid(3, 3, [100, 105, 100, 255]));

        let loose = template.clone().with_tolerance(5);
        let strict = template.with_tolerance(4);
        assert!(find_anywhere(&screen, &loose).is_some());
        assert!(find_anywhere(&screen, &strict).is_none());
    }

    #[test]
    fn test_tolerance_near_channel_limits() {
        let dark = solid(4, 4, [0, 0, 0, 255]);
        let bright = solid(4, 4, [255, 255, 255, 255]);

        let near_black =
            Template::new("nb".to_string(), solid(2, 2, [3, 3, 3, 255])).with_tolerance(10);
        let near_white =
            Template::new("nw".to_string(), solid(2, 2, [250, 250, 250, 255])).with_tolerance(10);
        assert!(find_anywhere(&dark, &near_black).is_some());
        assert!(find_anywhere(&bright, &near_white).is_some());
        assert!(find_anywhere(&bright, &near_black).is_none());
    }

    #[test]
    fn test_wildcard_pixels() {
        let mut screen = solid(12, 12, [0, 0, 0, 255]);
        screen.put_pixel(5, 5, Rgba([255, 255, 255, 255]));
        screen.put_pixel(6, 5, Rgba([10, 200, 30, 255]));

        let mut ring = solid(3, 1, [255, 255, 255, 255]);
        ring.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        ring.put_pixel(2, 0, Rgba([0, 0, 0, 255]));

        let template = Template::new("ring".to_string(), ring);
        let found = find_anywhere(&screen, &template);
        assert_eq!(found, Some(MatchLocation { x: 5, y: 5 }));
    }

    #[test]
    fn test_container_alpha_ignored() {
        let screen = solid(5, 5, [40, 50, 60, 0]);
        let template = Template::new("t".to_string(), solid(2, 2, [40, 50, 60, 255]));
        assert!(find_anywhere(&screen, &template).is_some());
    }

    #[test]
    fn test_fully_transparent_matches_where_it_fits() {
        let screen = checker(6, 6);
        let clear = Template::new("clear".to_string(), solid(6, 6, [9, 9, 9, 0]));
        let too_big = Template::new("big".to_string(), solid(7, 6, [9, 9, 9, 0]));

        assert_eq!(
            find_anywhere(&screen, &clear),
            Some(MatchLocation { x: 0, y: 0 })
        );
        assert!(find_anywhere(&screen, &too_big).is_none());
    }

    #[test]
    fn test_no_match_near_far_edge() {
        // Partial copy hanging off the bottom-right corner must not be read past bounds
        let patch = checker(5, 5);
        let mut screen = solid(16, 16, [1, 2, 3, 255]);
        let corner = image::imageops::crop_imm(&patch, 0, 0, 3, 3).to_image();
        paste(&mut screen, &corner, 13, 13);

        let template = Template::new("patch".to_string(), patch);
        assert!(find_anywhere(&screen, &template).is_none());
    }

    #[test]
    fn test_template_larger_than_container() {
        let screen = solid(4, 4, [0, 0, 0, 255]);
        let template = Template::new("t".to_string(), solid(5, 2, [0, 0, 0, 255]));
        assert!(find_anywhere(&screen, &template).is_none());
    }

    #[test]
    fn test_empty_template_never_matches() {
        let screen = solid(4, 4, [0, 0, 0, 255]);
        let template = Template::new("empty".to_string(), RgbaImage::new(0, 0));
        assert!(find_anywhere(&screen, &template).is_none());
    }

    #[test]
    fn test_search_region_bounds() {
        let patch = checker(3, 3);
        let mut screen = solid(30, 30, [0, 0, 0, 255]);
        paste(&mut screen, &patch, 20, 20);
        let template = Template::new("patch".to_string(), patch);
        let matcher = PixelMatcher::new();

        assert!(matcher.matches(&screen, &template, Region::new(18, 18, 6, 6)));
        assert!(!matcher.matches(&screen, &template, Region::new(18, 18, 4, 6)));
        assert!(!matcher.matches(&screen, &template, Region::new(0, 0, 20, 30)));
        // Region overhanging the container is clipped, not an error
        assert!(matcher.matches(&screen, &template, Region::new(19, 19, 500, 500)));
    }
}
