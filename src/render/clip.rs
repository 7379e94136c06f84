//! Cohen-Sutherland line clipping against a [`ClipRect`].

use crate::fixed::Fixed;
use crate::geometry::ClipRect;

const LEFT: u8 = 0x1;
const RIGHT: u8 = 0x2;
const BOTTOM: u8 = 0x4;
const TOP: u8 = 0x8;

/// Each pass moves one endpoint onto a clip edge; a segment needs at most four
/// per endpoint; truncation can add a few more.
const MAX_PASSES: usize = 32;

#[inline]
fn encode(clip: &ClipRect, x: i32, y: i32) -> u8 {
    let mut code = 0;
    if x < clip.left {
        code |= LEFT;
    } else if x > clip.right {
        code |= RIGHT;
    }
    if y < clip.top {
        code |= TOP;
    } else if y > clip.bottom {
        code |= BOTTOM;
    }
    code
}

#[inline]
fn delta(a: i32, b: i32) -> Fixed {
    Fixed::from_i64(i64::from(a) - i64::from(b))
}

/// Move one outside endpoint onto the edge named by its outcode.
fn clip_point(clip: &ClipRect, code: u8, x: i32, y: i32, vertical: bool, slope: Fixed) -> (i32, i32) {
    if code & LEFT != 0 {
        (clip.left, y.saturating_add((delta(clip.left, x) * slope).to_int()))
    } else if code & RIGHT != 0 {
        (clip.right, y.saturating_add((delta(clip.right, x) * slope).to_int()))
    } else if code & BOTTOM != 0 {
        let dx = if vertical {
            0
        } else {
            delta(clip.bottom, y).checked_div(slope).map_or(0, Fixed::to_int)
        };
        (x.saturating_add(dx), clip.bottom)
    } else {
        let dx = if vertical {
            0
        } else {
            delta(clip.top, y).checked_div(slope).map_or(0, Fixed::to_int)
        };
        (x.saturating_add(dx), clip.top)
    }
}

/// Clip the segment `(x1, y1)-(x2, y2)` to `clip`.
///
/// Returns the clipped endpoints in their original order, or `None` when no
/// part of the segment is visible.
#[must_use]
pub fn clip_line(clip: &ClipRect, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<(i32, i32, i32, i32)> {
    if clip.is_empty() {
        return None;
    }
    let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);

    for _ in 0..MAX_PASSES {
        let code1 = encode(clip, x1, y1);
        let code2 = encode(clip, x2, y2);
        if code1 | code2 == 0 {
            return Some((x1, y1, x2, y2));
        }
        if code1 & code2 != 0 {
            return None;
        }

        let vertical = x1 == x2;
        let slope = if vertical {
            Fixed::ONE
        } else {
            delta(y2, y1).checked_div(delta(x2, x1)).unwrap_or(Fixed::ONE)
        };

        if code1 != 0 {
            (x1, y1) = clip_point(clip, code1, x1, y1, vertical, slope);
        } else {
            (x2, y2) = clip_point(clip, code2, x2, y2, vertical, slope);
        }
    }

    log::warn!("line ({x1}, {y1})-({x2}, {y2}) did not converge against clip {clip:?}; rejecting");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIP: ClipRect = ClipRect::full(100, 50);

    #[test]
    fn test_inside_unchanged() {
        assert_eq!(clip_line(&CLIP, 5, 6, 70, 40), Some((5, 6, 70, 40)));
        assert_eq!(clip_line(&CLIP, 70, 40, 5, 6), Some((70, 40, 5, 6)));
    }

    #[test]
    fn test_trivial_reject() {
        assert_eq!(clip_line(&CLIP, -10, 5, -1, 40), None);
        assert_eq!(clip_line(&CLIP, 0, 60, 99, 51), None);
    }

    #[test]
    fn test_horizontal_clipped() {
        assert_eq!(clip_line(&CLIP, -20, 10, 200, 10), Some((0, 10, 99, 10)));
        assert_eq!(clip_line(&CLIP, 200, 10, -20, 10), Some((99, 10, 0, 10)));
    }

    #[test]
    fn test_vertical_clipped() {
        assert_eq!(clip_line(&CLIP, 3, -100, 3, 100), Some((3, 0, 3, 49)));
    }

    #[test]
    fn test_diagonal_clipped() {
        assert_eq!(clip_line(&CLIP, -10, -10, 10, 10), Some((0, 0, 10, 10)));
        assert_eq!(clip_line(&CLIP, 10, 10, -10, -10), Some((10, 10, 0, 0)));
    }

    #[test]
    fn test_corner_miss() {
        assert_eq!(clip_line(&CLIP, -10, 5, 5, -10), None);
    }

    #[test]
    fn test_empty_clip() {
        assert_eq!(clip_line(&ClipRect::EMPTY, 0, 0, 0, 0), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn prop_clipped_endpoints_inside(
                x1 in -5000i32..5000, y1 in -5000i32..5000,
                x2 in -5000i32..5000, y2 in -5000i32..5000,
            ) {
                if let Some((a, b, c, d)) = clip_line(&CLIP, x1, y1, x2, y2) {
                    prop_assert!(CLIP.contains(a, b));
                    prop_assert!(CLIP.contains(c, d));
                }
            }

            #[test]
            fn prop_inside_segment_untouched(
                x1 in 0i32..100, y1 in 0i32..50, x2 in 0i32..100, y2 in 0i32..50,
            ) {
                prop_assert_eq!(clip_line(&CLIP, x1, y1, x2, y2), Some((x1, y1, x2, y2)));
            }
        }
    }
}
