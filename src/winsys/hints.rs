use crate::geometry::Dim;
use crate::geometry::Pos;

use std::convert::TryFrom;

/// ICCCM `win_gravity`: which reference point of the client stays put when
/// the frame adds decorations around it.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum Gravity {
    Forget,
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    Static,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::NorthWest
    }
}

impl TryFrom<u32> for Gravity {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Gravity::Forget,
            1 => Gravity::NorthWest,
            2 => Gravity::North,
            3 => Gravity::NorthEast,
            4 => Gravity::West,
            5 => Gravity::Center,
            6 => Gravity::East,
            7 => Gravity::SouthWest,
            8 => Gravity::South,
            9 => Gravity::SouthEast,
            10 => Gravity::Static,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Copy, Clone, PartialOrd)]
pub struct SizeHints {
    pub by_user: bool,
    pub pos: Option<Pos>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
    pub base_width: Option<i32>,
    pub base_height: Option<i32>,
    pub inc_width: Option<i32>,
    pub inc_height: Option<i32>,
    pub min_ratio: Option<f64>,
    pub max_ratio: Option<f64>,
    pub gravity: Gravity,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            by_user: false,
            pos: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            base_width: None,
            base_height: None,
            inc_width: None,
            inc_height: None,
            min_ratio: None,
            max_ratio: None,
            gravity: Gravity::default(),
        }
    }
}

impl SizeHints {
    pub fn apply(
        &self,
        dim: &mut Dim,
    ) {
        let mut dest_width = dim.w;
        let mut dest_height = dim.h;

        if let Some(min_width) = self.min_width {
            dest_width = std::cmp::max(dest_width, min_width);
        }

        if let Some(min_height) = self.min_height {
            dest_height = std::cmp::max(dest_height, min_height);
        }

        if let Some(max_width) = self.max_width {
            if max_width > 0 {
                dest_width = std::cmp::min(dest_width, max_width);
            }
        }

        if let Some(max_height) = self.max_height {
            if max_height > 0 {
                dest_height = std::cmp::min(dest_height, max_height);
            }
        }

        let base_width = self.base_width.unwrap_or(0);
        let base_height = self.base_height.unwrap_or(0);

        let mut width = if base_width < dest_width {
            dest_width - base_width
        } else {
            dest_width
        };

        let mut height = if base_height < dest_height {
            dest_height - base_height
        } else {
            dest_height
        };

        if self.min_ratio.is_some() || self.max_ratio.is_some() {
            if height == 0 {
                height = 1;
            }

            let current_ratio = width as f64 / height as f64;
            let mut new_ratio = None;

            if let Some(min_ratio) = self.min_ratio {
                if current_ratio < min_ratio {
                    new_ratio = Some(min_ratio);
                }
            }

            if new_ratio.is_none() {
                if let Some(max_ratio) = self.max_ratio {
                    if current_ratio > max_ratio {
                        new_ratio = Some(max_ratio);
                    }
                }
            }

            if let Some(new_ratio) = new_ratio {
                height = (width as f64 / new_ratio).round() as i32;
                width = (height as f64 * new_ratio).round() as i32;

                dest_width = width + base_width;
                dest_height = height + base_height;
            }
        }

        if let Some(inc_height) = self.inc_height {
            if inc_height > 0 && dest_height >= base_height {
                dest_height -= base_height;
                dest_height -= dest_height % inc_height;
                dest_height += base_height;
            }
        }

        if let Some(inc_width) = self.inc_width {
            if inc_width > 0 && dest_width >= base_width {
                dest_width -= base_width;
                dest_width -= dest_width % inc_width;
                dest_width += base_width;
            }
        }

        dim.w = std::cmp::max(dest_width, 0i32);
        dim.h = std::cmp::max(dest_height, 0i32);
    }
}

impl PartialEq for SizeHints {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.min_width == other.min_width
            && self.min_height == other.min_height
            && self.max_width == other.max_width
            && self.max_height == other.max_height
            && self.base_width == other.base_width
            && self.base_height == other.base_height
            && self.inc_width == other.inc_width
            && self.inc_height == other.inc_height
            && self.gravity == other.gravity
    }
}

impl Eq for SizeHints {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_snap_down_from_base() {
        let hints = SizeHints {
            base_width: Some(4),
            base_height: Some(4),
            inc_width: Some(10),
            inc_height: Some(20),
            ..Default::default()
        };

        let mut dim = Dim::new(127, 95);
        hints.apply(&mut dim);

        assert_eq!(dim, Dim::new(124, 84));
    }

    #[test]
    fn minimum_and_maximum_bound_the_size() {
        let hints = SizeHints {
            min_width: Some(100),
            min_height: Some(50),
            max_width: Some(300),
            max_height: Some(200),
            ..Default::default()
        };

        let mut small = Dim::new(10, 10);
        hints.apply(&mut small);
        assert_eq!(small, Dim::new(100, 50));

        let mut large = Dim::new(1000, 1000);
        hints.apply(&mut large);
        assert_eq!(large, Dim::new(300, 200));
    }

    #[test]
    fn gravity_from_protocol_value() {
        assert_eq!(Gravity::try_from(10), Ok(Gravity::Static));
        assert_eq!(Gravity::try_from(5), Ok(Gravity::Center));
        assert!(Gravity::try_from(11).is_err());
    }
}
