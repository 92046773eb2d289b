#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure click classification against the live actor's hit region.

use zombie_pop_core::{HitRegion, ScreenPoint};

/// Outcome of testing a single click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The click landed inside the hit region.
    Hit,
    /// The click landed outside the hit region.
    Miss,
}

/// Reports whether `point` lies on one of the pixels covered by `region`.
#[must_use]
pub fn is_hit(point: ScreenPoint, region: &HitRegion) -> bool {
    let x = i64::from(point.x());
    let y = i64::from(point.y());
    (region.left()..=region.right()).contains(&x)
        && (region.top()..=region.bottom()).contains(&y)
}

/// Classifies a click against the provided region.
#[must_use]
pub fn classify(point: ScreenPoint, region: &HitRegion) -> Verdict {
    if is_hit(point, region) {
        Verdict::Hit
    } else {
        Verdict::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_pop_core::RegionSize;

    fn region() -> HitRegion {
        HitRegion::from_origin_and_size(ScreenPoint::new(100, 200), RegionSize::new(74, 42))
    }

    #[test]
    fn interior_points_hit() {
        assert!(is_hit(ScreenPoint::new(130, 220), &region()));
    }

    #[test]
    fn corner_points_hit() {
        let region = region();
        for corner in [
            ScreenPoint::new(100, 200),
            ScreenPoint::new(173, 200),
            ScreenPoint::new(100, 241),
            ScreenPoint::new(173, 241),
        ] {
            assert_eq!(classify(corner, &region), Verdict::Hit, "{corner:?}");
        }
    }

    #[test]
    fn one_pixel_outside_misses() {
        let region = region();
        for outside in [
            ScreenPoint::new(99, 220),
            ScreenPoint::new(174, 220),
            ScreenPoint::new(130, 199),
            ScreenPoint::new(130, 242),
            ScreenPoint::new(174, 242),
        ] {
            assert_eq!(classify(outside, &region), Verdict::Miss, "{outside:?}");
        }
    }

    #[test]
    fn click_just_past_the_width_misses() {
        let region = region();
        assert_eq!(classify(ScreenPoint::new(174, 220), &region), Verdict::Miss);
        assert_eq!(classify(ScreenPoint::new(173, 220), &region), Verdict::Hit);
    }

    #[test]
    fn zero_sized_regions_never_hit() {
        let region =
            HitRegion::from_origin_and_size(ScreenPoint::new(100, 200), RegionSize::new(0, 0));
        assert_eq!(classify(ScreenPoint::new(100, 200), &region), Verdict::Miss);
    }

    #[test]
    fn regions_near_integer_limits_do_not_overflow() {
        let region = HitRegion::from_origin_and_size(
            ScreenPoint::new(i32::MAX - 1, i32::MAX - 1),
            RegionSize::new(u32::MAX, u32::MAX),
        );
        assert!(is_hit(ScreenPoint::new(i32::MAX, i32::MAX), &region));
        assert!(!is_hit(ScreenPoint::new(0, 0), &region));
    }
}
