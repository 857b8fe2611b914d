use std::ops::Add;
use std::ops::Sub;

use serde::Deserialize;

pub type Extents = Padding;

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

impl Pos {
    pub fn new(
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn values(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Squared euclidean distance; used for nearest-head lookups where only
    /// the ordering matters.
    pub fn square_dist(
        &self,
        pos: Self,
    ) -> i64 {
        let dx = (pos.x - self.x) as i64;
        let dy = (pos.y - self.y) as i64;

        dx * dx + dy * dy
    }

    pub fn is_origin(&self) -> bool {
        *self
            == Pos {
                x: 0,
                y: 0,
            }
    }
}

impl Add<Pos> for Pos {
    type Output = Self;

    fn add(
        self,
        other: Pos,
    ) -> Self::Output {
        Self::Output {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: i32,
    pub h: i32,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
        }
    }
}

impl Dim {
    pub fn new(
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            w,
            h,
        }
    }

    pub fn values(&self) -> (i32, i32) {
        (self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

impl Sub for Pos {
    type Output = Dim;

    fn sub(
        self,
        other: Self,
    ) -> Self::Output {
        Self::Output {
            w: self.x - other.x,
            h: self.y - other.y,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
        }
    }
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    pub fn values(&self) -> (Pos, Dim) {
        (self.pos, self.dim)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.dim.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.dim.h
    }

    pub fn center(&self) -> Pos {
        Pos {
            x: self.pos.x + self.dim.w / 2,
            y: self.pos.y + self.dim.h / 2,
        }
    }

    /// Whether `pos` lies within the region grown outward by `border` on
    /// every side.
    pub fn inside_border(
        &self,
        pos: Pos,
        border: i32,
    ) -> bool {
        pos.x >= self.pos.x - border
            && pos.y >= self.pos.y - border
            && pos.x < self.right() + border
            && pos.y < self.bottom() + border
    }

    pub fn contains(
        &self,
        region: Region,
    ) -> bool {
        region.pos.x >= self.pos.x
            && region.pos.y >= self.pos.y
            && region.right() <= self.right()
            && region.bottom() <= self.bottom()
    }

    /// Strict interval intersection on both axes; shared edges do not count.
    pub fn overlaps(
        &self,
        region: Region,
    ) -> bool {
        self.pos.x < region.right()
            && region.pos.x < self.right()
            && self.pos.y < region.bottom()
            && region.pos.y < self.bottom()
    }

    /// Clamps the top-left corner so that a `dim`-sized rectangle placed at
    /// `pos` stays within this region. Each axis is clamped on its own and
    /// the dimensions are never shrunk.
    pub fn clamp_pos_within(
        &self,
        pos: Pos,
        dim: Dim,
    ) -> Pos {
        Pos {
            x: clamp(pos.x, self.pos.x, self.right() - dim.w),
            y: clamp(pos.y, self.pos.y, self.bottom() - dim.h),
        }
    }

    pub fn with_minimum_dim(
        self,
        minimum_dim: &Dim,
    ) -> Self {
        Self {
            pos: self.pos,
            dim: Dim {
                w: std::cmp::max(minimum_dim.w, self.dim.w),
                h: std::cmp::max(minimum_dim.h, self.dim.h),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        }
    }
}

impl Padding {
    pub fn new(
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
    ) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left <= 0 && self.right <= 0 && self.top <= 0 && self.bottom <= 0
    }
}

impl Add<Padding> for Padding {
    type Output = Self;

    fn add(
        self,
        other: Self,
    ) -> Self::Output {
        Self::Output {
            left: self.left.saturating_add(other.left),
            right: self.right.saturating_add(other.right),
            top: self.top.saturating_add(other.top),
            bottom: self.bottom.saturating_add(other.bottom),
        }
    }
}

impl Sub<Padding> for Region {
    type Output = Self;

    fn sub(
        self,
        padding: Padding,
    ) -> Self::Output {
        Self::Output {
            pos: Pos {
                x: self.pos.x.saturating_add(padding.left),
                y: self.pos.y.saturating_add(padding.top),
            },
            dim: Dim {
                w: self.dim.w.saturating_sub(padding.left.saturating_add(padding.right)),
                h: self.dim.h.saturating_sub(padding.top.saturating_add(padding.bottom)),
            },
        }
    }
}

/// Clamps `value` into `[low, high]`; `low` wins when the bounds cross.
#[inline]
pub fn clamp(
    value: i32,
    low: i32,
    high: i32,
) -> i32 {
    if value > high {
        std::cmp::max(high, low)
    } else if value < low {
        low
    } else {
        value
    }
}

/// `round(value / span * 100)`, with an empty span yielding 0.
pub fn percent_of_span(
    value: i32,
    span: i32,
) -> i32 {
    if span == 0 {
        return 0;
    }

    (value as f64 / span as f64 * 100f64 + 0.5).floor() as i32
}

/// `round(percent * span / 100)`: the inverse of [`percent_of_span`].
pub fn percentage_value_of(
    percent: i32,
    span: i32,
) -> i32 {
    (percent as f64 * span as f64 / 100f64 + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_sums_saturate() {
        let sum = Padding::new(0, 5, i32::MAX, 0) + Padding::new(3, 5, i32::MAX, 0);

        assert_eq!(sum, Padding::new(3, 10, i32::MAX, 0));
    }

    #[test]
    fn region_shrinks_by_padding() {
        let region = Region::new(100, 0, 1920, 1080) - Padding::new(10, 20, 30, 40);

        assert_eq!(region, Region::new(110, 30, 1890, 1010));
    }

    #[test]
    fn inside_border_grows_outward() {
        let region = Region::new(10, 10, 100, 50);

        assert!(region.inside_border(Pos::new(10, 10), 0));
        assert!(!region.inside_border(Pos::new(9, 10), 0));
        assert!(region.inside_border(Pos::new(8, 8), 2));
        assert!(!region.inside_border(Pos::new(7, 8), 2));

        assert!(region.inside_border(Pos::new(109, 59), 0));
        assert!(!region.inside_border(Pos::new(110, 59), 0));
        assert!(region.inside_border(Pos::new(111, 61), 2));
        assert!(!region.inside_border(Pos::new(112, 61), 2));
    }

    #[test]
    fn touching_regions_do_not_overlap() {
        let left = Region::new(0, 0, 1920, 1080);
        let right = Region::new(1920, 0, 1920, 1080);
        let straddling = Region::new(1900, 100, 40, 40);

        assert!(!left.overlaps(right));
        assert!(!right.overlaps(left));
        assert!(left.overlaps(straddling));
        assert!(right.overlaps(straddling));
        assert!(!left.overlaps(Region::new(0, 1080, 10, 10)));
    }

    #[test]
    fn clamping_keeps_dimensions() {
        let head = Region::new(1920, 0, 1920, 1080);
        let dim = Dim::new(400, 300);

        assert_eq!(head.clamp_pos_within(Pos::new(0, 0), dim), Pos::new(1920, 0));
        assert_eq!(
            head.clamp_pos_within(Pos::new(3800, 900), dim),
            Pos::new(3440, 780)
        );
        assert_eq!(
            head.clamp_pos_within(Pos::new(2000, 100), dim),
            Pos::new(2000, 100)
        );

        for &(x, y) in &[(-5000, -5000), (5000, 5000), (2500, -10), (100, 700)] {
            let pos = head.clamp_pos_within(Pos::new(x, y), dim);
            assert!(head.contains(Region {
                pos,
                dim
            }));
        }
    }

    #[test]
    fn clamping_oversized_prefers_origin() {
        let head = Region::new(0, 0, 100, 100);
        let pos = head.clamp_pos_within(Pos::new(50, 50), Dim::new(200, 200));

        assert_eq!(pos, Pos::new(0, 0));
    }

    #[test]
    fn percentages_round_and_never_divide_by_zero() {
        assert_eq!(percent_of_span(50, 200), 25);
        assert_eq!(percent_of_span(1, 3), 33);
        assert_eq!(percent_of_span(2, 3), 67);
        assert_eq!(percent_of_span(10, 0), 0);

        assert_eq!(percentage_value_of(10, 1000), 100);
        assert_eq!(percentage_value_of(33, 10), 3);
    }

    #[test]
    fn square_distance() {
        assert_eq!(Pos::new(0, 0).square_dist(Pos::new(3, 4)), 25);
        assert_eq!(Pos::new(-3, 0).square_dist(Pos::new(0, -4)), 25);
    }
}
