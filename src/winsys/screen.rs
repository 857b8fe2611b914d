use crate::geometry::percent_of_span;
use crate::geometry::percentage_value_of;
use crate::geometry::Dim;
use crate::geometry::Padding;
use crate::geometry::Pos;
use crate::geometry::Region;

use serde::Deserialize;

/// Head index as handed out to callers: `1..=num_heads()` for physical
/// heads, `0` for the whole screen (or "no head" when multi-head addressing
/// is inactive).
pub type Head = usize;

/// Groups every per-head strut created by a single request; clearing the
/// identifier removes all of them.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct StrutId(usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Strut {
    id: StrutId,
    head: Head,
    padding: Padding,
}

impl Strut {
    #[inline]
    pub fn id(&self) -> StrutId {
        self.id
    }

    #[inline]
    pub fn head(&self) -> Head {
        self.head
    }

    #[inline]
    pub fn padding(&self) -> Padding {
        self.padding
    }
}

/// Struts applied from configuration rather than by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StrutConfig {
    pub all: Padding,
    pub heads: Vec<HeadStrut>,
}

/// A configured strut replacing the global one on a single head.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadStrut {
    pub head: Head,
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub bottom: i32,
}

impl Default for StrutConfig {
    fn default() -> Self {
        Self {
            all: Padding::default(),
            heads: Vec::new(),
        }
    }
}

impl StrutConfig {
    pub fn for_head(
        &self,
        head: Head,
    ) -> Padding {
        match self.heads.iter().find(|strut| strut.head == head) {
            Some(strut) => Padding::new(strut.left, strut.right, strut.top, strut.bottom),
            None => self.all,
        }
    }
}

/// The strut arena and usable area of a single head.
#[derive(Debug, Clone)]
pub struct HeadArea {
    region: Region,
    struts: Vec<Strut>,
    margins: Padding,
    available: Region,
}

impl HeadArea {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            struts: Vec::new(),
            margins: Padding::default(),
            available: region,
        }
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn set_region(
        &mut self,
        region: Region,
    ) {
        self.region = region;
    }

    /// Per-edge reserved space as of the last [`HeadArea::update`].
    #[inline]
    pub fn margins(&self) -> Padding {
        self.margins
    }

    #[inline]
    pub fn available_region(&self) -> Region {
        self.available
    }

    #[inline]
    pub fn struts(&self) -> &[Strut] {
        &self.struts
    }

    fn add_strut(
        &mut self,
        strut: Strut,
    ) {
        self.struts.push(strut);
    }

    fn clear_strut(
        &mut self,
        id: StrutId,
    ) -> bool {
        let len = self.struts.len();
        self.struts.retain(|strut| strut.id != id);
        self.struts.len() != len
    }

    /// Recomputes the available region from the active struts, returning
    /// whether it differs from the cached one.
    ///
    /// Margins on the same edge add up. Their sums are clamped so the
    /// available region never leaves the head.
    pub fn update(&mut self) -> bool {
        let sum = self
            .struts
            .iter()
            .fold(Padding::default(), |acc, strut| acc + strut.padding);

        let (w, h) = self.region.dim.values();

        let left = sum.left.max(0).min(w);
        let right = sum.right.max(0).min(w - left);
        let top = sum.top.max(0).min(h);
        let bottom = sum.bottom.max(0).min(h - top);

        let margins = Padding::new(left, right, top, bottom);
        let available = self.region - margins;

        let changed = available != self.available;

        self.margins = margins;
        self.available = available;

        changed
    }
}

/// ScreenGeometry: the physical heads of one X screen and the strut
/// accounting that derives their usable areas.
#[derive(Debug, Clone)]
pub struct Screen {
    number: usize,
    full_region: Region,
    heads: Vec<Region>,
    areas: Vec<HeadArea>,
    full_maximize: bool,
    strut_config: StrutConfig,
    configured_struts: Vec<StrutId>,
    next_strut: usize,
}

impl std::cmp::PartialEq<Self> for Screen {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.number == other.number
    }
}

impl Screen {
    pub fn new(
        region: Region,
        number: usize,
    ) -> Self {
        Self {
            number,
            full_region: region,
            heads: Vec::new(),
            areas: vec![HeadArea::new(region)],
            full_maximize: false,
            strut_config: StrutConfig::default(),
            configured_struts: Vec::new(),
            next_strut: 0,
        }
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    #[inline]
    pub fn full_region(&self) -> Region {
        self.full_region
    }

    #[inline]
    pub fn set_full_region(
        &mut self,
        region: Region,
    ) {
        self.full_region = region;

        if self.heads.is_empty() {
            self.areas[0].set_region(region);
        }
    }

    #[inline]
    pub fn has_xinerama(&self) -> bool {
        !self.heads.is_empty()
    }

    /// Zero when multi-head addressing is inactive.
    #[inline]
    pub fn num_heads(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub fn full_maximize(&self) -> bool {
        self.full_maximize
    }

    #[inline]
    pub fn set_full_maximize(
        &mut self,
        full_maximize: bool,
    ) {
        self.full_maximize = full_maximize;
    }

    #[inline]
    pub fn set_strut_config(
        &mut self,
        strut_config: StrutConfig,
    ) {
        self.strut_config = strut_config;
    }

    /// Replaces the head topology with `heads` (`None` disables multi-head
    /// addressing). Head areas are matched to the new list by position:
    /// surplus areas are dropped along with their struts and new ones start
    /// empty. Configured struts are re-requested afterwards.
    ///
    /// Returns whether any head's available area changed.
    pub fn init_heads(
        &mut self,
        heads: Option<Vec<Region>>,
    ) -> bool {
        self.heads = match heads {
            Some(heads) if !heads.is_empty() => heads,
            _ => Vec::new(),
        };

        let area_count = std::cmp::max(1, self.heads.len());
        self.areas.truncate(area_count);

        info!("screen {} has {} head(s)", self.number, self.heads.len());

        for index in 0..area_count {
            let region = self.heads.get(index).copied().unwrap_or(self.full_region);

            match self.areas.get_mut(index) {
                Some(area) => area.set_region(region),
                None => self.areas.push(HeadArea::new(region)),
            }
        }

        self.reconfigure_struts()
    }

    /// Clears every configured strut and requests them again for the
    /// current set of heads.
    pub fn reconfigure_struts(&mut self) -> bool {
        for id in std::mem::take(&mut self.configured_struts) {
            self.clear_strut(id);
        }

        for head in 1..=std::cmp::max(1, self.num_heads()) {
            let padding = self.strut_config.for_head(head);

            if let Some(id) = self.request_strut(head, padding) {
                self.configured_struts.push(id);
            }
        }

        self.update_available_area()
    }

    /// Reserves `padding` on `head`, or on every head when `head` is 0.
    ///
    /// Heads beyond the last one are clamped to it. Negative margins count
    /// as zero, and a request reserving nothing yields `None`.
    pub fn request_strut(
        &mut self,
        head: Head,
        padding: Padding,
    ) -> Option<StrutId> {
        let padding = Padding::new(
            padding.left.max(0),
            padding.right.max(0),
            padding.top.max(0),
            padding.bottom.max(0),
        );

        if padding.is_empty() {
            debug!("ignoring empty strut request for head {}", head);
            return None;
        }

        let num_heads = self.num_heads();
        let mut head = head;

        if head > num_heads && head != 1 {
            head = num_heads;
        }

        let (begin, end) = if head == 0 {
            (0, std::cmp::max(1, num_heads))
        } else {
            (head - 1, head)
        };

        let id = StrutId(self.next_strut);
        self.next_strut += 1;

        for index in begin..end {
            self.areas[index].add_strut(Strut {
                id,
                head: index + 1,
                padding,
            });
        }

        Some(id)
    }

    /// Removes every strut created by the request that yielded `id`.
    pub fn clear_strut(
        &mut self,
        id: StrutId,
    ) -> bool {
        self.areas
            .iter_mut()
            .fold(false, |cleared, area| area.clear_strut(id) || cleared)
    }

    pub fn update_available_area(&mut self) -> bool {
        self.areas
            .iter_mut()
            .fold(false, |changed, area| area.update() || changed)
    }

    #[inline]
    fn area(
        &self,
        head: Head,
    ) -> &HeadArea {
        let index = std::cmp::min(head.saturating_sub(1), self.areas.len() - 1);
        &self.areas[index]
    }

    pub fn head_area(
        &self,
        head: Head,
    ) -> &HeadArea {
        self.area(head)
    }

    pub fn available_region(
        &self,
        head: Head,
    ) -> Region {
        self.area(head).available_region()
    }

    /// Raw bounds of `head`; the whole screen for 0 or an unknown head.
    pub fn head_region(
        &self,
        head: Head,
    ) -> Region {
        if head == 0 || head > self.num_heads() {
            return self.full_region;
        }

        self.heads[head - 1]
    }

    pub fn head_regions(&self) -> &[Region] {
        &self.heads
    }

    /// The first head containing `pos`, or 0.
    pub fn head_at(
        &self,
        pos: Pos,
    ) -> Head {
        self.heads
            .iter()
            .position(|head| head.inside_border(pos, 0))
            .map_or(0, |index| index + 1)
    }

    /// The head a window with bounds `region` is on: the head under its
    /// center, else the head whose center lies closest to it.
    pub fn head_of(
        &self,
        region: Region,
    ) -> Head {
        if !self.has_xinerama() {
            return 0;
        }

        let center = region.center();
        let head = self.head_at(center);

        if head != 0 {
            return head;
        }

        let mut closest: Option<(Head, i64)> = None;

        for (index, head) in self.heads.iter().enumerate() {
            let dist = center.square_dist(head.center());

            match closest {
                Some((_, min)) if dist >= min => {},
                _ => closest = Some((index + 1, dist)),
            }
        }

        closest.map_or(0, |(head, _)| head)
    }

    #[inline]
    pub fn current_head(
        &self,
        pointer: Pos,
    ) -> Head {
        self.head_at(pointer)
    }

    /// Moves `pos` so that a `dim`-sized rectangle lies within `head`.
    /// Head 0 means the first head while multi-head addressing is active.
    pub fn clamp_to_head(
        &self,
        head: Head,
        pos: Pos,
        dim: Dim,
    ) -> Pos {
        let head = if head == 0 && self.num_heads() != 0 {
            1
        } else {
            head
        };

        self.head_region(head).clamp_pos_within(pos, dim)
    }

    /// For a window that no longer overlaps any head, the head it should be
    /// moved to.
    pub fn relocation_head(
        &self,
        region: Region,
    ) -> Option<Head> {
        if !self.has_xinerama() || self.heads.iter().any(|head| head.overlaps(region)) {
            return None;
        }

        Some(std::cmp::max(1, self.head_of(region)))
    }

    fn max_margins(
        &self,
        head: Head,
    ) -> Padding {
        if self.full_maximize {
            Padding::default()
        } else {
            self.area(head).margins()
        }
    }

    pub fn max_left(
        &self,
        head: Head,
    ) -> i32 {
        self.head_region(head).pos.x + self.max_margins(head).left
    }

    pub fn max_right(
        &self,
        head: Head,
    ) -> i32 {
        self.head_region(head).right() - self.max_margins(head).right
    }

    pub fn max_top(
        &self,
        head: Head,
    ) -> i32 {
        self.head_region(head).pos.y + self.max_margins(head).top
    }

    pub fn max_bottom(
        &self,
        head: Head,
    ) -> i32 {
        self.head_region(head).bottom() - self.max_margins(head).bottom
    }

    /// The region a window maximized on `head` occupies.
    pub fn max_region(
        &self,
        head: Head,
    ) -> Region {
        let (left, top) = (self.max_left(head), self.max_top(head));

        Region::new(
            left,
            top,
            self.max_right(head) - left,
            self.max_bottom(head) - top,
        )
    }

    #[inline]
    pub fn gap_x(
        &self,
        head: Head,
    ) -> i32 {
        self.max_right(head) - self.max_left(head)
    }

    #[inline]
    pub fn gap_y(
        &self,
        head: Head,
    ) -> i32 {
        self.max_bottom(head) - self.max_top(head)
    }

    /// Pixels making up `percent` of the usable width of `head`.
    pub fn relative_width(
        &self,
        head: Head,
        percent: i32,
    ) -> i32 {
        percentage_value_of(percent, self.gap_x(head))
    }

    pub fn relative_height(
        &self,
        head: Head,
        percent: i32,
    ) -> i32 {
        percentage_value_of(percent, self.gap_y(head))
    }

    /// Percentage of the usable width of `head` at which the absolute
    /// coordinate `x` lies.
    pub fn relative_position_x(
        &self,
        head: Head,
        x: i32,
    ) -> i32 {
        percent_of_span(x - self.max_left(head), self.gap_x(head))
    }

    pub fn relative_position_y(
        &self,
        head: Head,
        y: i32,
    ) -> i32 {
        percent_of_span(y - self.max_top(head), self.gap_y(head))
    }

    pub fn relative_dimension_w(
        &self,
        head: Head,
        w: i32,
    ) -> i32 {
        percent_of_span(w, self.gap_x(head))
    }

    pub fn relative_dimension_h(
        &self,
        head: Head,
        h: i32,
    ) -> i32 {
        percent_of_span(h, self.gap_y(head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_head() -> Screen {
        let mut screen = Screen::new(Region::new(0, 0, 3840, 1080), 0);

        screen.init_heads(Some(vec![
            Region::new(0, 0, 1920, 1080),
            Region::new(1920, 0, 1920, 1080),
        ]));

        screen
    }

    #[test]
    fn strut_on_all_heads_reaches_second_head() {
        let mut screen = dual_head();

        let id = screen.request_strut(0, Padding::new(0, 0, 30, 0));
        assert!(id.is_some());
        assert!(screen.update_available_area());

        let available = screen.available_region(2);
        assert_eq!(available.pos.y, 30);
        assert_eq!(available.dim.h, 1050);
        assert_eq!(available.pos.x, 1920);
        assert_eq!(available.dim.w, 1920);

        assert_eq!(screen.available_region(1), Region::new(0, 30, 1920, 1050));
    }

    #[test]
    fn struts_on_the_same_edge_add_up() {
        let mut screen = dual_head();

        screen.request_strut(1, Padding::new(10, 0, 0, 0));
        screen.request_strut(1, Padding::new(15, 0, 0, 0));
        screen.request_strut(1, Padding::new(0, 0, 0, 24));
        screen.update_available_area();

        assert_eq!(screen.available_region(1), Region::new(25, 0, 1895, 1056));
        assert_eq!(screen.available_region(2), Region::new(1920, 0, 1920, 1080));
    }

    #[test]
    fn clearing_a_strut_clears_every_head() {
        let mut screen = dual_head();

        let panel = screen.request_strut(0, Padding::new(0, 0, 30, 0));
        let dock = screen.request_strut(2, Padding::new(0, 40, 0, 0));
        screen.update_available_area();

        assert!(screen.clear_strut(panel.unwrap()));
        assert!(screen.update_available_area());
        assert!(!screen.update_available_area());

        assert_eq!(screen.available_region(1), Region::new(0, 0, 1920, 1080));
        assert_eq!(screen.available_region(2), Region::new(1920, 0, 1880, 1080));

        assert!(screen.clear_strut(dock.unwrap()));
        assert!(!screen.clear_strut(dock.unwrap()));
    }

    #[test]
    fn empty_or_negative_struts_are_ignored() {
        let mut screen = dual_head();

        assert!(screen.request_strut(1, Padding::default()).is_none());
        assert!(screen.request_strut(1, Padding::new(-5, 0, -1, 0)).is_none());
        assert!(!screen.update_available_area());
    }

    #[test]
    fn available_area_stays_within_the_head() {
        let mut screen = dual_head();

        screen.request_strut(2, Padding::new(1500, 1500, 0, 0));
        screen.update_available_area();

        let head = screen.head_region(2);
        let available = screen.available_region(2);

        assert!(head.contains(available));
        assert_eq!(available.dim.w, 0);
    }

    #[test]
    fn oversized_struts_on_one_edge_do_not_overflow() {
        let mut screen = dual_head();

        screen.request_strut(1, Padding::new(0, 0, i32::MAX, 0));
        screen.request_strut(1, Padding::new(0, 0, i32::MAX, 0));
        assert!(screen.update_available_area());

        let head = screen.head_region(1);
        let available = screen.available_region(1);

        assert!(head.contains(available));
        assert_eq!(available.dim.h, 0);
        assert_eq!(screen.available_region(2), Region::new(1920, 0, 1920, 1080));
    }

    #[test]
    fn strut_for_missing_head_lands_on_last_head() {
        let mut screen = dual_head();

        screen.request_strut(7, Padding::new(0, 0, 0, 20));
        screen.update_available_area();

        assert_eq!(screen.available_region(2).dim.h, 1060);
        assert_eq!(screen.available_region(1).dim.h, 1080);
    }

    #[test]
    fn head_lookup_by_point_and_window() {
        let screen = dual_head();

        assert_eq!(screen.head_at(Pos::new(100, 100)), 1);
        assert_eq!(screen.head_at(Pos::new(1920, 100)), 2);
        assert_eq!(screen.head_at(Pos::new(4000, 100)), 0);

        assert_eq!(screen.head_of(Region::new(1800, 10, 400, 300)), 2);
        assert_eq!(screen.head_of(Region::new(5000, 10, 400, 300)), 2);
        assert_eq!(screen.head_of(Region::new(-900, 10, 400, 300)), 1);
    }

    #[test]
    fn closest_head_ties_resolve_to_lowest_index() {
        let screen = dual_head();

        // equidistant from both head centers, below the screen
        let region = Region::new(1820, 2000, 200, 100);
        assert_eq!(screen.head_at(region.center()), 0);
        assert_eq!(screen.head_of(region), 1);
    }

    #[test]
    fn clamp_to_head_keeps_window_on_head() {
        let screen = dual_head();
        let dim = Dim::new(800, 600);

        assert_eq!(
            screen.clamp_to_head(2, Pos::new(100, 700), dim),
            Pos::new(1920, 480)
        );
        assert_eq!(
            screen.clamp_to_head(0, Pos::new(1800, -50), dim),
            Pos::new(1120, 0)
        );

        for head in 1..=2 {
            let bounds = screen.head_region(head);

            for &(x, y) in &[(-3000, -3000), (9000, 9000), (1919, 540)] {
                let pos = screen.clamp_to_head(head, Pos::new(x, y), dim);
                assert!(bounds.contains(Region {
                    pos,
                    dim
                }));
            }
        }
    }

    #[test]
    fn max_edges_respect_full_maximize() {
        let mut screen = dual_head();

        screen.request_strut(2, Padding::new(0, 0, 30, 20));
        screen.update_available_area();

        assert_eq!(screen.max_top(2), 30);
        assert_eq!(screen.max_bottom(2), 1060);
        assert_eq!(screen.max_left(2), 1920);
        assert_eq!(screen.max_region(2), Region::new(1920, 30, 1920, 1030));

        screen.set_full_maximize(true);

        assert_eq!(screen.max_top(2), 0);
        assert_eq!(screen.max_bottom(2), 1080);
    }

    #[test]
    fn single_head_without_xinerama() {
        let mut screen = Screen::new(Region::new(0, 0, 1280, 1024), 0);
        screen.init_heads(None);

        assert_eq!(screen.num_heads(), 0);
        assert_eq!(screen.head_of(Region::new(10, 10, 10, 10)), 0);

        screen.request_strut(0, Padding::new(0, 0, 0, 24));
        screen.update_available_area();

        assert_eq!(screen.max_bottom(0), 1000);
        assert_eq!(screen.max_bottom(1), 1000);
        assert_eq!(screen.relocation_head(Region::new(5000, 0, 10, 10)), None);
    }

    #[test]
    fn topology_refresh_drops_struts_of_removed_heads() {
        let mut screen = dual_head();

        screen.request_strut(2, Padding::new(0, 0, 30, 0));
        screen.update_available_area();

        screen.init_heads(Some(vec![Region::new(0, 0, 1920, 1080)]));
        assert_eq!(screen.num_heads(), 1);

        screen.init_heads(Some(vec![
            Region::new(0, 0, 1920, 1080),
            Region::new(1920, 0, 1920, 1080),
        ]));

        assert_eq!(screen.available_region(2), Region::new(1920, 0, 1920, 1080));
    }

    #[test]
    fn configured_struts_survive_topology_refresh() {
        let mut screen = Screen::new(Region::new(0, 0, 3840, 1080), 0);
        screen.set_strut_config(StrutConfig {
            all: Padding::new(0, 0, 20, 0),
            heads: vec![HeadStrut {
                head: 2,
                left: 0,
                right: 0,
                top: 0,
                bottom: 40,
            }],
        });

        assert!(screen.init_heads(Some(vec![
            Region::new(0, 0, 1920, 1080),
            Region::new(1920, 0, 1920, 1080),
        ])));

        assert_eq!(screen.available_region(1), Region::new(0, 20, 1920, 1060));
        assert_eq!(screen.available_region(2), Region::new(1920, 0, 1920, 1040));

        assert!(!screen.reconfigure_struts());
        assert_eq!(screen.head_area(1).struts().len(), 1);
    }

    #[test]
    fn windows_off_every_head_are_relocated() {
        let screen = dual_head();

        assert_eq!(screen.relocation_head(Region::new(100, 100, 50, 50)), None);
        assert_eq!(
            screen.relocation_head(Region::new(4000, 100, 50, 50)),
            Some(2)
        );
        assert_eq!(
            screen.relocation_head(Region::new(-500, 2000, 50, 50)),
            Some(1)
        );
    }

    #[test]
    fn relative_helpers_use_usable_span() {
        let mut screen = dual_head();

        screen.request_strut(1, Padding::new(20, 0, 0, 0));
        screen.update_available_area();

        assert_eq!(screen.gap_x(1), 1900);
        assert_eq!(screen.relative_width(1, 10), 190);
        assert_eq!(screen.relative_position_x(1, 970), 50);
        assert_eq!(screen.relative_dimension_h(1, 540), 50);
        assert_eq!(screen.relative_height(1, 50), 540);
        assert_eq!(screen.relative_position_y(2, 270), 25);
        assert_eq!(screen.relative_dimension_w(2, 960), 50);
    }
}
