use crate::context::Context;
use crate::decoration::FrameTheme;
use crate::face::FocusState;
use crate::face::RenderCache;

use winsys::connection::Connection;
use winsys::geometry::Dim;
use winsys::geometry::Extents;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::hints::Gravity;
use winsys::hints::SizeHints;
use winsys::screen::Screen;
use winsys::texture::Color;
use winsys::texture::Orientation;
use winsys::window::Window;

use std::collections::HashMap;

use serde::Deserialize;

/// Where external tabs are attached, as side followed by the end of that
/// side the strip is aligned to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabPlacement {
    TopLeft,
    Top,
    TopRight,
    BottomLeft,
    Bottom,
    BottomRight,
    LeftTop,
    Left,
    LeftBottom,
    RightTop,
    Right,
    RightBottom,
}

impl TabPlacement {
    pub fn orientation(&self) -> Orientation {
        match self {
            TabPlacement::LeftTop | TabPlacement::Left | TabPlacement::LeftBottom => {
                Orientation::Rot270
            },
            TabPlacement::RightTop | TabPlacement::Right | TabPlacement::RightBottom => {
                Orientation::Rot90
            },
            _ => Orientation::Rot0,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            TabPlacement::TopLeft | TabPlacement::BottomLeft => Alignment::Left,
            TabPlacement::Top | TabPlacement::Bottom | TabPlacement::Left => Alignment::Center,
            TabPlacement::TopRight | TabPlacement::BottomRight | TabPlacement::LeftTop => {
                Alignment::Right
            },
            _ => Alignment::Left,
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        !self.orientation().is_vertical()
    }
}

/// How tab items are packed along their container.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Relative,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TabMode {
    Internal,
    External,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Stick,
    Shade,
    Maximize,
    Iconify,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TabSettings {
    pub placement: TabPlacement,
    pub tab_width: u32,
    pub max_over_tabs: bool,
    pub internal_tabs: bool,
}

/// Everything a frame consults but does not own.
#[derive(Clone, Copy)]
pub struct FrameEnv<'a> {
    pub conn: &'a dyn Connection,
    pub screen: &'a Screen,
    pub theme: &'a FrameTheme,
    pub tabs: TabSettings,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameElement {
    Window,
    Titlebar,
    Label,
    TabContainer,
    Tab,
    Handle,
    LeftGrip,
    RightGrip,
    LeftButton,
    RightButton,
}

/// One decoration window and the geometry it was last given, relative to
/// its parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pane {
    window: Window,
    region: Region,
    border_width: i32,
    mapped: bool,
}

impl Pane {
    fn new(
        window: Window,
        region: Region,
    ) -> Self {
        Self {
            window,
            region,
            border_width: 0,
            mapped: false,
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn border_width(&self) -> i32 {
        self.border_width
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    fn place(
        &mut self,
        conn: &dyn Connection,
        region: Region,
    ) {
        self.region = region;
        conn.place_window(self.window, &region);
    }

    fn move_to(
        &mut self,
        conn: &dyn Connection,
        pos: Pos,
    ) {
        self.region.pos = pos;
        conn.move_window(self.window, pos);
    }

    fn resize(
        &mut self,
        conn: &dyn Connection,
        dim: Dim,
    ) {
        self.region.dim = dim;
        conn.resize_window(self.window, dim);
    }

    fn set_border_width(
        &mut self,
        conn: &dyn Connection,
        width: i32,
    ) {
        self.border_width = width;
        conn.set_window_border_width(self.window, width as u32);
    }

    fn show(
        &mut self,
        conn: &dyn Connection,
    ) {
        if !self.mapped {
            self.mapped = true;
            conn.map_window(self.window);
        }
    }

    fn hide(
        &mut self,
        conn: &dyn Connection,
    ) {
        if self.mapped {
            self.mapped = false;
            conn.unmap_window(self.window);
        }
    }

    #[inline]
    fn clear(
        &self,
        conn: &dyn Connection,
    ) {
        conn.clear_window(self.window);
    }

    #[inline]
    fn raise(
        &self,
        conn: &dyn Connection,
    ) {
        conn.raise_window(self.window);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct TitleButton {
    pane: Pane,
    kind: ButtonKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Tab {
    pane: Pane,
    client: Window,
}

/// The window state a frame is laid out for, plus the geometry to return
/// to once it is no longer maximized, shaded or fullscreen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameState {
    pub focused: bool,
    pub shaded: bool,
    pub fullscreen: bool,
    pub maximized_vert: bool,
    pub maximized_horz: bool,
    pub use_titlebar: bool,
    pub use_handle: bool,
    pub use_tabs: bool,
    pub use_border: bool,
    saved: Region,
}

impl FrameState {
    fn new(region: Region) -> Self {
        Self {
            focused: false,
            shaded: false,
            fullscreen: false,
            maximized_vert: false,
            maximized_horz: false,
            use_titlebar: true,
            use_handle: true,
            use_tabs: true,
            use_border: true,
            saved: region,
        }
    }

    #[inline]
    pub fn is_maximized(&self) -> bool {
        self.maximized_vert || self.maximized_horz
    }

    #[inline]
    pub fn saved_region(&self) -> Region {
        self.saved
    }

    /// Remembers `region` along every axis the window is not maximized on.
    pub fn save_geometry(
        &mut self,
        region: Region,
        force: bool,
    ) {
        if (self.fullscreen || (self.maximized_vert && self.maximized_horz)) && !force {
            return;
        }

        if !self.maximized_horz {
            self.saved.pos.x = region.pos.x;
            self.saved.dim.w = region.dim.w;
        }

        if !self.maximized_vert {
            self.saved.pos.y = region.pos.y;

            if !self.shaded {
                self.saved.dim.h = region.dim.h;
            }
        }
    }
}

/// The decoration wrapped around a client window.
pub struct WinFrame {
    window: Pane,
    titlebar: Pane,
    label: Pane,
    tab_container: Pane,
    handle: Pane,
    grip_left: Pane,
    grip_right: Pane,
    buttons_left: Vec<TitleButton>,
    buttons_right: Vec<TitleButton>,
    tabs: Vec<Tab>,
    client: Option<Window>,
    client_area: Region,
    faces: RenderCache,
    dispatch: HashMap<Window, FrameElement>,
    state: FrameState,
    tab_mode: TabMode,
    tab_orientation: Orientation,
    tab_alignment: Alignment,
    tab_width: u32,
    tabs_on_root: bool,
    use_titlebar: bool,
    use_handle: bool,
    use_tabs: bool,
    visible: bool,
    need_render: bool,
    bevel: i32,
    button_size: i32,
    border_color: Option<Color>,
    pressed: Option<Window>,
    size_hints: SizeHints,
    gravity: Gravity,
    client_bw: i32,
}

impl WinFrame {
    pub fn new(
        env: &FrameEnv,
        region: Region,
    ) -> Self {
        let conn = env.conn;

        let window = conn.create_frame(region);
        let titlebar = conn.create_decoration(window, Region::new(0, 0, 100, 16));
        let label = conn.create_decoration(titlebar, Region::new(0, 0, 1, 1));
        let tab_container = conn.create_decoration(titlebar, Region::new(0, 0, 1, 1));
        let handle = conn.create_decoration(window, Region::new(0, 0, 100, 5));
        let grip_right = conn.create_decoration(handle, Region::new(0, 0, 10, 4));
        let grip_left = conn.create_decoration(handle, Region::new(0, 0, 10, 4));

        let dispatch = [
            (window, FrameElement::Window),
            (titlebar, FrameElement::Titlebar),
            (label, FrameElement::Label),
            (tab_container, FrameElement::TabContainer),
            (handle, FrameElement::Handle),
            (grip_left, FrameElement::LeftGrip),
            (grip_right, FrameElement::RightGrip),
        ]
        .iter()
        .copied()
        .collect();

        let mut frame = Self {
            window: Pane::new(window, region),
            titlebar: Pane::new(titlebar, Region::new(0, 0, 100, 16)),
            label: Pane::new(label, Region::new(0, 0, 1, 1)),
            tab_container: Pane::new(tab_container, Region::new(0, 0, 1, 1)),
            handle: Pane::new(handle, Region::new(0, 0, 100, 5)),
            grip_left: Pane::new(grip_left, Region::new(0, 0, 10, 4)),
            grip_right: Pane::new(grip_right, Region::new(0, 0, 10, 4)),
            buttons_left: Vec::new(),
            buttons_right: Vec::new(),
            tabs: Vec::new(),
            client: None,
            client_area: Region::default(),
            faces: RenderCache::default(),
            dispatch,
            state: FrameState::new(region),
            tab_mode: if env.tabs.internal_tabs {
                TabMode::Internal
            } else {
                TabMode::External
            },
            tab_orientation: Orientation::Rot0,
            tab_alignment: Alignment::Relative,
            tab_width: env.tabs.tab_width,
            tabs_on_root: false,
            use_titlebar: true,
            use_handle: true,
            use_tabs: true,
            visible: false,
            need_render: true,
            bevel: 1,
            button_size: Self::BUTTON_SIZE,
            border_color: None,
            pressed: None,
            size_hints: SizeHints::default(),
            gravity: Gravity::NorthWest,
            client_bw: 0,
        };

        if env.theme.handle_width == 0 {
            frame.use_handle = false;
        }

        frame.grip_left.show(conn);
        frame.grip_right.show(conn);
        frame.apply_tab_mode(env, frame.tab_mode);
        frame.reconfigure(env);

        info!("created frame {:#0x}", window);
        frame
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window.window
    }

    #[inline]
    pub fn client(&self) -> Option<Window> {
        self.client
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.window.region
    }

    #[inline]
    pub fn titlebar(&self) -> &Pane {
        &self.titlebar
    }

    #[inline]
    pub fn label(&self) -> &Pane {
        &self.label
    }

    #[inline]
    pub fn tab_container(&self) -> &Pane {
        &self.tab_container
    }

    #[inline]
    pub fn handle(&self) -> &Pane {
        &self.handle
    }

    #[inline]
    pub fn grips(&self) -> (&Pane, &Pane) {
        (&self.grip_left, &self.grip_right)
    }

    #[inline]
    pub fn client_area(&self) -> Region {
        self.client_area
    }

    /// Absolute geometry of the client window inside the frame.
    pub fn client_region(&self) -> Region {
        let bw = self.window.border_width;

        Region {
            pos: self.window.region.pos
                + self.client_area.pos
                + Pos {
                    x: bw,
                    y: bw,
                },
            dim: self.client_area.dim,
        }
    }

    #[inline]
    pub fn tab_mode(&self) -> TabMode {
        self.tab_mode
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.need_render
    }

    #[inline]
    pub fn state(&self) -> &FrameState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut FrameState {
        &mut self.state
    }

    #[inline]
    pub fn set_size_hints(
        &mut self,
        size_hints: SizeHints,
    ) {
        self.size_hints = size_hints;
    }

    #[inline]
    pub fn element(
        &self,
        window: Window,
    ) -> Option<FrameElement> {
        self.dispatch.get(&window).copied()
    }

    /// Every window this frame created.
    pub fn windows(&self) -> Vec<Window> {
        self.dispatch.keys().copied().collect()
    }

    pub fn titlebar_height(&self) -> i32 {
        if self.use_titlebar {
            self.titlebar.region.dim.h + self.titlebar.border_width
        } else {
            0
        }
    }

    pub fn handle_height(&self) -> i32 {
        if self.use_handle {
            self.handle.region.dim.h + self.handle.border_width
        } else {
            0
        }
    }

    #[inline]
    pub fn button_height(&self) -> i32 {
        self.titlebar.region.dim.h - self.bevel * 2
    }

    /// The space the frame adds around its client on each side.
    pub fn extents(&self) -> Extents {
        let bw = self.window.border_width;

        Extents {
            left: bw,
            right: bw,
            top: bw + self.titlebar_height(),
            bottom: bw + self.handle_height(),
        }
    }

    pub fn show(
        &mut self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        self.visible = true;

        if self.need_render {
            self.render_all(env);
            self.apply_all(env);
            self.clear_all(env);
        }

        if self.tab_mode == TabMode::External && self.use_tabs {
            self.tab_container.show(conn);
        }

        self.show_subwindows(conn);
        self.window.show(conn);
    }

    pub fn hide(
        &mut self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        self.window.hide(conn);

        if self.tab_mode == TabMode::External && self.use_tabs {
            self.tab_container.hide(conn);
        }

        self.visible = false;
    }

    fn show_subwindows(
        &mut self,
        conn: &dyn Connection,
    ) {
        if self.use_titlebar {
            self.titlebar.show(conn);
        }

        if self.use_handle {
            self.handle.show(conn);
        }

        for button in self.buttons_left.iter_mut().chain(self.buttons_right.iter_mut()) {
            button.pane.show(conn);
        }

        for tab in self.tabs.iter_mut() {
            tab.pane.show(conn);
        }

        if let Some(client) = self.client {
            conn.map_window(client);
        }
    }

    #[inline]
    pub fn move_to(
        &mut self,
        env: &FrameEnv,
        pos: Pos,
    ) {
        let dim = self.window.region.dim;

        self.move_resize(
            env,
            Region {
                pos,
                dim,
            },
            true,
            false,
            false,
        );
    }

    #[inline]
    pub fn resize(
        &mut self,
        env: &FrameEnv,
        dim: Dim,
    ) {
        let pos = self.window.region.pos;

        self.move_resize(
            env,
            Region {
                pos,
                dim,
            },
            false,
            true,
            false,
        );
    }

    pub fn move_resize(
        &mut self,
        env: &FrameEnv,
        region: Region,
        mut do_move: bool,
        mut do_resize: bool,
        force: bool,
    ) {
        let current = self.window.region;

        if !force && do_move && region.pos == current.pos {
            do_move = false;
        }

        if !force && do_resize && region.dim == current.dim {
            do_resize = false;
        }

        if !do_move && !do_resize {
            return;
        }

        let mut target = current;

        if do_move {
            target.pos = region.pos;
        }

        if do_resize {
            target.dim = region.dim;
        }

        self.window.place(env.conn, target);
        self.state.save_geometry(target, false);

        let placement = env.tabs.placement;

        if do_move
            || (do_resize
                && placement != TabPlacement::TopLeft
                && placement != TabPlacement::LeftTop)
        {
            self.align_tabs(env);
        }

        if do_resize {
            self.reconfigure(env);
        }
    }

    /// Moves and resizes the frame so that its client ends up with `region`,
    /// honoring the client's window gravity.
    pub fn move_resize_for_client(
        &mut self,
        env: &FrameEnv,
        mut region: Region,
        gravity: Gravity,
        client_bw: i32,
        do_move: bool,
        do_resize: bool,
    ) {
        if do_resize {
            region.dim.h += self.titlebar_height() + self.handle_height();
        }

        region.pos = self.gravity_translate(region.pos, gravity, false, client_bw);
        self.gravity = gravity;
        self.client_bw = client_bw;

        self.move_resize(env, region, do_move, do_resize, false);
    }

    /// The layout pass: sizes the handle and grips, lays out the titlebar,
    /// places external tabs and the client area, then renders if visible.
    pub fn reconfigure(
        &mut self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        let theme = env.theme;

        let negated = self.gravity_translate(Pos::default(), self.gravity, true, self.client_bw);

        self.bevel = theme.bevel as i32;

        let handle_width = theme.handle_width as i32;

        if self.use_handle && self.handle.region.dim.h != handle_width {
            let dim = Dim {
                w: self.window.region.dim.w,
                h: self.window.region.dim.h - self.handle.region.dim.h + handle_width,
            };

            self.window.resize(conn, dim);
        }

        self.handle.region.dim.h = handle_width;

        if self.use_titlebar {
            self.reconfigure_titlebar(env);
            self.titlebar.raise(conn);
        }

        if self.tab_mode == TabMode::External {
            self.align_tabs(env);
        }

        if !self.state.shaded || self.state.fullscreen {
            let window = self.window.region;
            let mut client_top = 0;
            let mut client_height = window.dim.h;

            if self.use_titlebar {
                let titlebar_height = self.titlebar.region.dim.h + self.titlebar.border_width;
                client_top += titlebar_height;
                client_height -= titlebar_height;
            }

            let grip_height = self.handle.region.dim.h;
            let handle_bw = self.handle.border_width;
            let mut ypos = window.dim.h;

            // an unused handle sits just below the window
            if self.use_handle {
                ypos -= grip_height + handle_bw;
            }

            self.handle
                .place(conn, Region::new(-handle_bw, ypos, window.dim.w, grip_height));

            self.grip_left.place(
                conn,
                Region::new(-handle_bw, -handle_bw, Self::GRIP_WIDTH, grip_height),
            );

            self.grip_right.place(
                conn,
                Region::new(
                    self.handle.region.dim.w - Self::GRIP_WIDTH - handle_bw,
                    -handle_bw,
                    Self::GRIP_WIDTH,
                    grip_height,
                ),
            );

            if self.use_handle {
                self.handle.raise(conn);
                client_height -= self.handle.region.dim.h + self.handle.border_width;
            }

            self.client_area = Region::new(0, client_top, window.dim.w, client_height);

            if let Some(client) = self.client {
                conn.place_window(client, &self.client_area);
            }
        }

        let offset = self.gravity_translate(negated, self.gravity, false, self.client_bw);

        if !offset.is_origin() {
            let pos = self.window.region.pos + offset;
            self.move_to(env, pos);
        }

        if self.visible {
            self.render_all(env);
            self.apply_all(env);
            self.clear_all(env);
        } else {
            self.need_render = true;
        }
    }

    fn reconfigure_titlebar(
        &mut self,
        env: &FrameEnv,
    ) {
        if !self.use_titlebar {
            return;
        }

        let conn = env.conn;
        let original_height = self.titlebar.region.dim.h;
        let title_height = env.theme.title_height();

        if original_height != title_height {
            let dim = Dim {
                w: self.window.region.dim.w,
                h: self.window.region.dim.h - original_height + title_height,
            };

            self.window.resize(conn, dim);
        }

        let titlebar_bw = self.titlebar.border_width;
        self.titlebar.place(
            conn,
            Region::new(
                -titlebar_bw,
                -titlebar_bw,
                self.window.region.dim.w,
                title_height,
            ),
        );

        let bevel = self.bevel;
        let button_size = self.button_height();
        self.button_size = button_size;

        let mut next_x = bevel;

        for button in self.buttons_left.iter_mut() {
            button
                .pane
                .place(conn, Region::new(next_x, bevel, button_size, button_size));

            next_x += button_size + bevel;
        }

        next_x += bevel;

        let mut space_left = self.titlebar.region.dim.w
            - next_x
            - self.buttons_right.len() as i32 * (button_size + bevel)
            - bevel;

        if space_left <= 0 {
            space_left = 1;
        }

        let label = Region::new(next_x, bevel, space_left, button_size);
        self.label.place(conn, label);

        if self.tab_mode == TabMode::Internal {
            self.tab_container.place(conn, label);
            self.layout_tabs(conn);
        } else if self.use_tabs {
            let dim = self.tab_container.region.dim;

            self.tab_container.resize(
                conn,
                if self.tab_orientation.is_vertical() {
                    Dim::new(button_size, dim.h)
                } else {
                    Dim::new(dim.w, button_size)
                },
            );
        }

        next_x += label.dim.w + bevel;

        for button in self.buttons_right.iter_mut() {
            button
                .pane
                .place(conn, Region::new(next_x, bevel, button_size, button_size));

            next_x += button_size + bevel;
        }

        self.titlebar.raise(conn);
    }

    /// Translates `pos` by the offset window gravity implies for this
    /// frame's decorations; `invert` applies the opposite offset.
    pub fn gravity_translate(
        &self,
        pos: Pos,
        gravity: Gravity,
        invert: bool,
        client_bw: i32,
    ) -> Pos {
        let bw = self.window.border_width;
        let bw_diff = client_bw - bw;
        let height_diff = 2 * bw_diff - self.titlebar_height() - self.handle_height();
        let width_diff = 2 * bw_diff;

        let mut x_offset = match gravity {
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => width_diff,
            Gravity::North | Gravity::Center | Gravity::South => width_diff / 2,
            _ => 0,
        };

        let mut y_offset = match gravity {
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => height_diff,
            Gravity::West | Gravity::Center | Gravity::East => height_diff / 2,
            _ => 0,
        };

        if gravity == Gravity::Static {
            x_offset = bw_diff;
            y_offset = bw_diff - self.titlebar_height();
        }

        if invert {
            x_offset = -x_offset;
            y_offset = -y_offset;
        }

        Pos {
            x: pos.x + x_offset,
            y: pos.y + y_offset,
        }
    }

    fn external_tabs_in_use(&self) -> bool {
        self.tab_mode == TabMode::External && self.use_tabs
    }

    pub fn x_offset(
        &self,
        env: &FrameEnv,
    ) -> i32 {
        if !self.external_tabs_in_use() {
            return 0;
        }

        match env.tabs.placement {
            TabPlacement::LeftTop | TabPlacement::Left | TabPlacement::LeftBottom => {
                self.tab_container.region.dim.w + self.window.border_width
            },
            _ => 0,
        }
    }

    pub fn y_offset(
        &self,
        env: &FrameEnv,
    ) -> i32 {
        if !self.external_tabs_in_use() {
            return 0;
        }

        match env.tabs.placement {
            TabPlacement::TopLeft | TabPlacement::Top | TabPlacement::TopRight => {
                self.tab_container.region.dim.h + self.window.border_width
            },
            _ => 0,
        }
    }

    pub fn width_offset(
        &self,
        env: &FrameEnv,
    ) -> i32 {
        if !self.external_tabs_in_use() || env.tabs.placement.is_horizontal() {
            return 0;
        }

        self.tab_container.region.dim.w + self.window.border_width
    }

    pub fn height_offset(
        &self,
        env: &FrameEnv,
    ) -> i32 {
        if !self.external_tabs_in_use() || !env.tabs.placement.is_horizontal() {
            return 0;
        }

        self.tab_container.region.dim.h + self.window.border_width
    }

    /// Switches between tabs inside the titlebar and tabs in a strip
    /// outside the frame. Returns whether the frame extents changed.
    pub fn set_tab_mode(
        &mut self,
        env: &FrameEnv,
        tab_mode: TabMode,
    ) -> bool {
        if self.tab_mode == tab_mode {
            return false;
        }

        self.apply_tab_mode(env, tab_mode)
    }

    fn apply_tab_mode(
        &mut self,
        env: &FrameEnv,
        tab_mode: TabMode,
    ) -> bool {
        let conn = env.conn;
        let mut changed = true;

        self.tab_mode = tab_mode;

        match tab_mode {
            TabMode::External => {
                self.label.show(conn);
                self.tab_container
                    .set_border_width(conn, self.window.border_width);

                self.align_tabs(env);

                if self.use_tabs && self.visible {
                    self.tab_container.show(conn);
                } else {
                    changed = false;
                    self.tab_container.hide(conn);
                }
            },
            TabMode::Internal => {
                self.tab_alignment = Alignment::Relative;
                self.tab_orientation = Orientation::Rot0;

                if self.tabs_on_root {
                    self.tab_container.hide(conn);
                    conn.reparent_window(
                        self.tab_container.window,
                        self.titlebar.window,
                        self.label.region.pos,
                    );

                    self.tabs_on_root = false;
                    self.tab_container.place(conn, self.label.region);
                }

                self.tab_container.set_border_width(conn, 0);
                self.layout_tabs(conn);

                self.render_tab_container(env);
                self.apply_tab_container(env);

                self.tab_container.clear(conn);
                self.tab_container.raise(conn);
                self.tab_container.show(conn);

                if !self.use_tabs {
                    changed = false;
                }

                self.label.hide(conn);
            },
        }

        changed
    }

    /// Positions the external tab strip around the frame according to the
    /// configured placement.
    pub fn align_tabs(
        &mut self,
        env: &FrameEnv,
    ) {
        if self.tab_mode != TabMode::External {
            return;
        }

        let conn = env.conn;
        let placement = env.tabs.placement;
        let original_orientation = self.tab_orientation;
        let original_tab_width = self.tab_width;

        self.tab_width = env.tabs.tab_width;

        if original_orientation != placement.orientation() {
            self.tab_container.hide(conn);
        }

        self.tab_orientation = placement.orientation();
        self.tab_alignment = placement.alignment();
        self.fit_tab_container(conn, placement);

        let bw = self.window.border_width;
        let (pos, dim) = self.window.region.values();
        let (w, h) = dim.values();
        let (tw, th) = self.tab_container.region.dim.values();
        let xo = self.x_offset(env);
        let yo = self.y_offset(env);

        let (mut tab_x, mut tab_y) = pos.values();

        match placement {
            TabPlacement::TopLeft => {
                tab_y -= yo;
            },
            TabPlacement::Top => {
                tab_x += (w - tw) / 2;
                tab_y -= yo;
            },
            TabPlacement::TopRight => {
                tab_x += w - tw;
                tab_y -= yo;
            },
            TabPlacement::BottomLeft => {
                tab_y += h + bw;
            },
            TabPlacement::Bottom => {
                tab_x += (w - tw) / 2;
                tab_y += h + bw;
            },
            TabPlacement::BottomRight => {
                tab_x += w - tw;
                tab_y += h + bw;
            },
            TabPlacement::LeftTop => {
                tab_x -= xo;
            },
            TabPlacement::Left => {
                tab_x -= xo;
                tab_y += (h - th) / 2;
            },
            TabPlacement::LeftBottom => {
                tab_x -= xo;
                tab_y += h - th;
            },
            TabPlacement::RightTop => {
                tab_x += w + bw;
            },
            TabPlacement::Right => {
                tab_x += w + bw;
                tab_y += (h - th) / 2;
            },
            TabPlacement::RightBottom => {
                tab_x += w + bw;
                tab_y += h - th;
            },
        }

        if self.tab_orientation != original_orientation || self.tab_width != original_tab_width {
            self.render_tab_container(env);

            if self.visible && self.use_tabs {
                self.apply_tab_container(env);
                self.tab_container.clear(conn);
                self.tab_container.show(conn);
            }
        }

        let tab_pos = Pos::new(tab_x, tab_y);

        if !self.tabs_on_root {
            conn.unparent_window(self.tab_container.window, tab_pos);
            self.tab_container.region.pos = tab_pos;
            self.tabs_on_root = true;
        } else {
            self.tab_container.move_to(conn, tab_pos);
        }
    }

    /// Sizes the external strip to its tabs, capped by the frame side it
    /// runs along.
    fn fit_tab_container(
        &mut self,
        conn: &dyn Connection,
        placement: TabPlacement,
    ) {
        let size = if placement.is_horizontal() {
            self.window.region.dim.w
        } else {
            self.window.region.dim.h
        };

        let count = std::cmp::max(1, self.tabs.len()) as i32;
        let length = std::cmp::max(1, std::cmp::min(count * self.tab_width as i32, size));
        let thickness = std::cmp::max(1, self.button_height());

        let dim = if placement.is_horizontal() {
            Dim::new(length, thickness)
        } else {
            Dim::new(thickness, length)
        };

        if dim != self.tab_container.region.dim {
            self.tab_container.resize(conn, dim);
        }

        self.layout_tabs(conn);
    }

    fn layout_tabs(
        &mut self,
        conn: &dyn Connection,
    ) {
        if self.tabs.is_empty() {
            return;
        }

        let vertical = self.tab_orientation.is_vertical();
        let dim = self.tab_container.region.dim;
        let (length, thickness) = if vertical {
            (dim.h, dim.w)
        } else {
            (dim.w, dim.h)
        };

        let count = self.tabs.len() as i32;
        let item = match self.tab_alignment {
            Alignment::Relative => length / count,
            _ => std::cmp::min(self.tab_width as i32, length / count),
        };

        let start = match self.tab_alignment {
            Alignment::Left | Alignment::Relative => 0,
            Alignment::Center => (length - item * count) / 2,
            Alignment::Right => length - item * count,
        };

        let relative = self.tab_alignment == Alignment::Relative;

        for (i, tab) in self.tabs.iter_mut().enumerate() {
            let offset = start + i as i32 * item;
            let size = if relative && i as i32 == count - 1 {
                length - offset
            } else {
                item
            };

            let region = if vertical {
                Region::new(0, offset, thickness, size)
            } else {
                Region::new(offset, 0, size, thickness)
            };

            tab.pane.place(conn, region);
        }
    }

    fn render_all(
        &mut self,
        env: &FrameEnv,
    ) {
        self.need_render = false;

        self.render_titlebar(env);
        self.render_handles(env);
        self.render_tab_container(env);
    }

    fn apply_all(
        &mut self,
        env: &FrameEnv,
    ) {
        self.apply_titlebar(env);
        self.apply_handles(env);
        self.apply_tab_container(env);
    }

    fn clear_all(
        &self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;

        if self.use_titlebar {
            self.redraw_titlebar(conn);

            for button in self.buttons_left.iter().chain(self.buttons_right.iter()) {
                button.pane.clear(conn);
            }
        } else if self.external_tabs_in_use() {
            self.tab_container.clear(conn);
        }

        if self.use_handle {
            self.handle.clear(conn);
            self.grip_left.clear(conn);
            self.grip_right.clear(conn);
        }
    }

    fn redraw_titlebar(
        &self,
        conn: &dyn Connection,
    ) {
        if !self.use_titlebar || !self.visible {
            return;
        }

        self.tab_container.clear(conn);
        self.label.clear(conn);
        self.titlebar.clear(conn);
    }

    fn render_titlebar(
        &mut self,
        env: &FrameEnv,
    ) {
        if !self.use_titlebar {
            return;
        }

        if !self.visible {
            self.need_render = true;
            return;
        }

        let conn = env.conn;
        let theme = env.theme;
        let title = self.titlebar.region.dim;
        let label = self.label.region.dim;

        for &focused in [true, false].iter() {
            let state = FocusState::from_focus(focused);
            let style = theme.style(focused);

            self.faces.title[state].render(conn, title, &style.title, Orientation::Rot0);
            self.faces.label[state].render(conn, label, &style.label, Orientation::Rot0);
        }
    }

    fn render_tab_container(
        &mut self,
        env: &FrameEnv,
    ) {
        if !self.visible {
            self.need_render = true;
            return;
        }

        let conn = env.conn;
        let dim = self.tab_container.region.dim;

        for &focused in [true, false].iter() {
            let style = env.theme.style(focused);
            let texture = if self.tab_mode == TabMode::External && style.label.is_parent_relative()
            {
                &style.title
            } else {
                &style.label
            };

            self.faces.tab_container[FocusState::from_focus(focused)].render(
                conn,
                dim,
                texture,
                self.tab_orientation,
            );
        }

        self.render_buttons(env);
    }

    fn render_handles(
        &mut self,
        env: &FrameEnv,
    ) {
        if !self.use_handle {
            return;
        }

        if !self.visible {
            self.need_render = true;
            return;
        }

        let conn = env.conn;
        let handle = self.handle.region.dim;
        let grip = self.grip_left.region.dim;

        for &focused in [true, false].iter() {
            let state = FocusState::from_focus(focused);
            let style = env.theme.style(focused);

            self.faces.handle[state].render(conn, handle, &style.handle, Orientation::Rot0);
            self.faces.grip[state].render(conn, grip, &style.grip, Orientation::Rot0);
        }
    }

    fn render_buttons(
        &mut self,
        env: &FrameEnv,
    ) {
        if !self.visible {
            self.need_render = true;
            return;
        }

        let conn = env.conn;
        let theme = env.theme;
        let dim = Dim::new(self.button_size, self.button_size);

        self.faces.button[FocusState::Unfocused].render(
            conn,
            dim,
            &theme.unfocused.button,
            Orientation::Rot0,
        );

        self.faces.button[FocusState::Focused].render(
            conn,
            dim,
            &theme.focused.button,
            Orientation::Rot0,
        );

        self.faces.button[FocusState::Pressed].render(
            conn,
            dim,
            &theme.button_pressed,
            Orientation::Rot0,
        );
    }

    fn apply_titlebar(
        &self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        let state = FocusState::from_focus(self.state.focused);

        if self.tab_mode != TabMode::Internal {
            self.faces.label[state].apply(conn, self.label.window);
        }

        self.faces.title[state].apply(conn, self.titlebar.window);
        self.apply_buttons(conn);
    }

    fn apply_buttons(
        &self,
        conn: &dyn Connection,
    ) {
        for button in self.buttons_left.iter().chain(self.buttons_right.iter()) {
            self.apply_button(conn, button.pane.window);
        }
    }

    fn apply_button(
        &self,
        conn: &dyn Connection,
        window: Window,
    ) {
        let state = if self.pressed == Some(window) {
            FocusState::Pressed
        } else {
            FocusState::from_focus(self.state.focused)
        };

        self.faces.button[state].apply(conn, window);
    }

    fn apply_handles(
        &self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        let state = FocusState::from_focus(self.state.focused);

        self.faces.handle[state].apply(conn, self.handle.window);
        self.faces.grip[state].apply(conn, self.grip_left.window);
        self.faces.grip[state].apply(conn, self.grip_right.window);
    }

    fn apply_tab_container(
        &self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;
        let state = FocusState::from_focus(self.state.focused);

        self.faces.tab_container[state].apply(conn, self.tab_container.window);

        for tab in self.tabs.iter() {
            self.faces.label[state].apply(conn, tab.pane.window);
        }
    }

    /// Re-applies the faces of the new focus state; nothing is re-rendered.
    pub fn set_focus(
        &mut self,
        env: &FrameEnv,
        focused: bool,
    ) {
        if self.state.focused == focused {
            return;
        }

        self.state.focused = focused;
        self.set_border_width(env, false);

        self.apply_all(env);
        self.clear_all(env);
    }

    /// Applies the theme's border to the frame and its decorations. Returns
    /// whether the border width changed.
    pub fn set_border_width(
        &mut self,
        env: &FrameEnv,
        do_move: bool,
    ) -> bool {
        let conn = env.conn;
        let border_width = env.theme.border.width as i32;
        let window_bw = if self.state.use_border {
            border_width
        } else {
            0
        };

        if border_width != 0 {
            let color = env.theme.style(self.state.focused).border_color;

            if self.border_color != Some(color) {
                self.border_color = Some(color);

                for window in [
                    self.window.window,
                    self.titlebar.window,
                    self.handle.window,
                    self.grip_left.window,
                    self.grip_right.window,
                    self.tab_container.window,
                ]
                .iter()
                {
                    conn.set_window_border_color(*window, color);
                }
            }
        }

        if border_width == self.handle.border_width && window_bw == self.window.border_width {
            return false;
        }

        let negated = self.gravity_translate(Pos::default(), self.gravity, true, self.client_bw);
        let mut bw_changes = 0;

        if self.use_titlebar {
            bw_changes += border_width - self.titlebar.border_width;
        }

        if self.use_handle {
            bw_changes += border_width - self.handle.border_width;
        }

        self.window.set_border_width(conn, window_bw);
        self.apply_tab_mode(env, self.tab_mode);

        self.titlebar.set_border_width(conn, border_width);
        self.handle.set_border_width(conn, border_width);
        self.grip_left.set_border_width(conn, border_width);
        self.grip_right.set_border_width(conn, border_width);

        if bw_changes != 0 {
            let dim = self.window.region.dim;
            self.resize(env, Dim::new(dim.w, dim.h + bw_changes));
        }

        if self.tab_mode == TabMode::External {
            self.align_tabs(env);
        }

        if do_move {
            let offset = self.gravity_translate(negated, self.gravity, false, self.client_bw);

            if !offset.is_origin() {
                let pos = self.window.region.pos + offset;
                self.move_to(env, pos);
            }
        }

        true
    }

    /// Brings the shown decorations in line with the window state. Returns
    /// whether the frame extents changed.
    pub fn apply_decorations(
        &mut self,
        env: &FrameEnv,
        do_move: bool,
    ) -> bool {
        let negated = self.gravity_translate(Pos::default(), self.gravity, true, self.client_bw);
        let mut client_move = self.set_border_width(env, false);

        // must precede the tab mode change so hidden external tabs stay hidden
        if self.state.use_tabs {
            client_move |= self.show_tabs(env);
        } else {
            client_move |= self.hide_tabs(env);
        }

        if self.state.use_titlebar {
            client_move |= self.show_titlebar(env);
            client_move |= self.set_tab_mode(
                env,
                if env.tabs.internal_tabs {
                    TabMode::Internal
                } else {
                    TabMode::External
                },
            );
        } else {
            client_move |= self.hide_titlebar(env);

            if self.state.use_tabs {
                client_move |= self.set_tab_mode(env, TabMode::External);
            }
        }

        if self.state.use_handle {
            client_move |= self.show_handle(env);
        } else {
            client_move |= self.hide_handle(env);
        }

        let offset = self.gravity_translate(negated, self.gravity, false, self.client_bw);

        if do_move && !offset.is_origin() {
            let pos = self.window.region.pos + offset;
            self.move_to(env, pos);
            client_move = true;
        }

        if do_move {
            self.reconfigure(env);
            let region = self.window.region;
            self.state.save_geometry(region, false);
        }

        client_move
    }

    /// Lays the frame out for its maximized, shaded or fullscreen state,
    /// starting from the saved geometry.
    pub fn apply_state(
        &mut self,
        env: &FrameEnv,
    ) {
        self.apply_decorations(env, false);

        let screen = env.screen;
        let head = screen.head_of(self.window.region);
        let border = 2 * self.window.border_width;
        let mut region = self.state.saved;

        if self.state.maximized_vert {
            region.pos.y = screen.max_top(head);
            region.dim.h = screen.max_bottom(head) - region.pos.y - border;

            if !env.tabs.max_over_tabs {
                region.pos.y += self.y_offset(env);
                region.dim.h -= self.height_offset(env);
            }
        }

        if self.state.maximized_horz {
            region.pos.x = screen.max_left(head);
            region.dim.w = screen.max_right(head) - region.pos.x - border;

            if !env.tabs.max_over_tabs {
                region.pos.x += self.x_offset(env);
                region.dim.w -= self.width_offset(env);
            }
        }

        if self.state.shaded {
            region.dim.h = self.titlebar.region.dim.h;
        } else if self.state.fullscreen {
            region = screen.head_region(head);
        } else if !self.state.is_maximized() {
            self.apply_size_hints(&mut region.dim);
        }

        self.move_resize(env, region, true, true, true);
    }

    /// Constrains a frame size so its client part satisfies the client's
    /// size hints.
    pub fn apply_size_hints(
        &self,
        dim: &mut Dim,
    ) {
        let decoration = self.titlebar_height() + self.handle_height();
        let mut client = Dim {
            w: dim.w,
            h: std::cmp::max(dim.h - decoration, decoration),
        };

        self.size_hints.apply(&mut client);

        dim.w = client.w;
        dim.h = client.h + decoration;
    }

    pub fn hide_titlebar(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if !self.use_titlebar {
            return false;
        }

        let conn = env.conn;
        self.titlebar.hide(conn);
        self.use_titlebar = false;

        // the other border still serves as the top border
        let dim = self.window.region.dim;
        let h = std::cmp::max(
            1,
            dim.h - self.titlebar.region.dim.h - self.titlebar.border_width,
        );

        self.window.resize(conn, Dim::new(dim.w, h));
        true
    }

    pub fn show_titlebar(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if self.use_titlebar {
            return false;
        }

        let conn = env.conn;
        self.titlebar.show(conn);
        self.use_titlebar = true;

        let dim = self.window.region.dim;
        let h = dim.h + self.titlebar.region.dim.h + self.titlebar.border_width;

        self.window.resize(conn, Dim::new(dim.w, h));
        true
    }

    pub fn hide_handle(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if !self.use_handle {
            return false;
        }

        let conn = env.conn;
        self.handle.hide(conn);
        self.grip_left.hide(conn);
        self.grip_right.hide(conn);
        self.use_handle = false;

        let dim = self.window.region.dim;
        let h = std::cmp::max(
            1,
            dim.h - self.handle.region.dim.h - self.handle.border_width,
        );

        self.window.resize(conn, Dim::new(dim.w, h));
        true
    }

    pub fn show_handle(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if self.use_handle || env.theme.handle_width == 0 {
            return false;
        }

        let conn = env.conn;
        self.use_handle = true;

        self.render_handles(env);
        self.apply_handles(env);

        self.handle.show(conn);
        self.grip_left.show(conn);
        self.grip_right.show(conn);

        let dim = self.window.region.dim;
        let h = dim.h + self.handle.region.dim.h + self.handle.border_width;

        self.window.resize(conn, Dim::new(dim.w, h));
        true
    }

    pub fn hide_tabs(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if self.tab_mode == TabMode::Internal || !self.use_tabs {
            self.use_tabs = false;
            return false;
        }

        self.use_tabs = false;
        self.tab_container.hide(env.conn);
        true
    }

    pub fn show_tabs(
        &mut self,
        env: &FrameEnv,
    ) -> bool {
        if self.tab_mode == TabMode::Internal || self.use_tabs {
            self.use_tabs = true;
            return false;
        }

        self.use_tabs = true;

        if self.visible {
            self.tab_container.show(env.conn);
        }

        true
    }

    fn add_button(
        &mut self,
        env: &FrameEnv,
        kind: ButtonKind,
        element: FrameElement,
    ) -> Window {
        let conn = env.conn;
        let region = Region::new(0, 0, self.button_size, self.button_size);
        let window = conn.create_decoration(self.titlebar.window, region);

        let mut button = TitleButton {
            pane: Pane::new(window, region),
            kind,
        };

        self.apply_button(conn, window);
        button.pane.show(conn);
        self.dispatch.insert(window, element);

        match element {
            FrameElement::LeftButton => self.buttons_left.push(button),
            _ => self.buttons_right.push(button),
        }

        window
    }

    #[inline]
    pub fn add_left_button(
        &mut self,
        env: &FrameEnv,
        kind: ButtonKind,
    ) -> Window {
        self.add_button(env, kind, FrameElement::LeftButton)
    }

    #[inline]
    pub fn add_right_button(
        &mut self,
        env: &FrameEnv,
        kind: ButtonKind,
    ) -> Window {
        self.add_button(env, kind, FrameElement::RightButton)
    }

    pub fn remove_all_buttons(
        &mut self,
        env: &FrameEnv,
    ) {
        for button in self.buttons_left.drain(..).chain(self.buttons_right.drain(..)) {
            self.dispatch.remove(&button.pane.window);
            env.conn.destroy_window(button.pane.window);
        }

        self.pressed = None;
    }

    pub fn button_kind(
        &self,
        window: Window,
    ) -> Option<ButtonKind> {
        self.buttons_left
            .iter()
            .chain(self.buttons_right.iter())
            .find(|button| button.pane.window == window)
            .map(|button| button.kind)
    }

    /// Shows `window`'s pressed face, or its focus face again on release.
    pub fn set_button_pressed(
        &mut self,
        env: &FrameEnv,
        window: Window,
        pressed: bool,
    ) -> Option<ButtonKind> {
        let kind = self.button_kind(window)?;

        self.pressed = if pressed {
            Some(window)
        } else {
            None
        };

        self.apply_button(env.conn, window);
        env.conn.clear_window(window);

        Some(kind)
    }

    /// Adds a tab representing `client`.
    pub fn create_tab(
        &mut self,
        env: &FrameEnv,
        client: Window,
    ) -> Window {
        let conn = env.conn;
        let window = conn.create_decoration(self.tab_container.window, Region::new(0, 0, 1, 1));
        let mut pane = Pane::new(window, Region::new(0, 0, 1, 1));

        pane.show(conn);
        self.dispatch.insert(window, FrameElement::Tab);
        self.tabs.push(Tab {
            pane,
            client,
        });

        self.relayout_tabs(env);
        self.faces.label[FocusState::from_focus(self.state.focused)].apply(conn, window);

        window
    }

    pub fn remove_tab(
        &mut self,
        env: &FrameEnv,
        client: Window,
    ) -> bool {
        match self.tabs.iter().position(|tab| tab.client == client) {
            Some(index) => {
                let tab = self.tabs.remove(index);

                self.dispatch.remove(&tab.pane.window);
                env.conn.destroy_window(tab.pane.window);
                self.relayout_tabs(env);

                true
            },
            None => false,
        }
    }

    /// Moves `client`'s tab `delta` positions along the strip.
    pub fn move_tab(
        &mut self,
        env: &FrameEnv,
        client: Window,
        delta: i32,
    ) -> bool {
        let index = match self.tabs.iter().position(|tab| tab.client == client) {
            Some(index) => index,
            None => return false,
        };

        let last = self.tabs.len() as i32 - 1;
        let target = std::cmp::max(0, std::cmp::min(last, index as i32 + delta)) as usize;

        if target == index {
            return false;
        }

        let tab = self.tabs.remove(index);
        self.tabs.insert(target, tab);
        self.relayout_tabs(env);

        true
    }

    pub fn tab_client(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.tabs
            .iter()
            .find(|tab| tab.pane.window == window)
            .map(|tab| tab.client)
    }

    fn relayout_tabs(
        &mut self,
        env: &FrameEnv,
    ) {
        match self.tab_mode {
            TabMode::External => self.align_tabs(env),
            TabMode::Internal => self.layout_tabs(env.conn),
        }
    }

    /// Reparents `client` into the client area.
    pub fn set_client_window(
        &mut self,
        env: &FrameEnv,
        client: Window,
    ) {
        let conn = env.conn;

        conn.set_window_border_width(client, 0);
        conn.reparent_window(client, self.window.window, self.client_area.pos);
        conn.place_window(client, &self.client_area);

        self.client = Some(client);

        if self.visible {
            conn.map_window(client);
        }

        conn.raise_window(client);
    }

    /// Absolute geometry of the tab container while it lives inside the
    /// titlebar.
    fn internal_tab_region(&self) -> Region {
        let bw = self.window.border_width;
        let tbw = self.titlebar.border_width;

        Region {
            pos: self.window.region.pos
                + self.titlebar.region.pos
                + self.tab_container.region.pos
                + Pos {
                    x: bw + tbw,
                    y: bw + tbw,
                },
            dim: self.tab_container.region.dim,
        }
    }

    /// Classifies a pointer event on `window` at the absolute position
    /// `pos`; `last_pos` is where the pointer was when a drag started.
    pub fn get_context(
        &self,
        window: Window,
        pos: Pos,
        last_pos: Pos,
        do_borders: bool,
    ) -> Context {
        let element = match self.dispatch.get(&window) {
            Some(element) => *element,
            None => return Context::empty(),
        };

        match element {
            FrameElement::LeftGrip => return Context::ON_LEFTGRIP,
            FrameElement::RightGrip => return Context::ON_RIGHTGRIP,
            _ => {},
        }

        let mut context = Context::empty();
        let bw = self.window.border_width;

        if do_borders {
            let external = self.tab_mode == TabMode::External;
            let tabs = self.internal_tab_region();

            let on_border = |pos: Pos| {
                !self.window.region.inside_border(pos, bw)
                    && (external || !tabs.inside_border(pos, bw))
            };

            if on_border(pos) || on_border(last_pos) {
                context = Context::ON_WINDOWBORDER;
            }
        }

        let px = pos.x - self.window.region.pos.x - bw;

        match element {
            FrameElement::Window => context | Context::ON_WINDOW,
            FrameElement::Handle => {
                let grip_left = self.grip_left.region;

                if px < grip_left.pos.x + grip_left.dim.w || px > self.grip_right.region.pos.x {
                    context
                } else {
                    Context::ON_WINDOWBORDER | Context::ON_WINDOW
                }
            },
            FrameElement::Titlebar => {
                let label = self.label.region;

                // outside the label span lie the buttons
                if px < label.pos.x || px >= label.pos.x + label.dim.w {
                    context
                } else {
                    context | Context::ON_TITLEBAR
                }
            },
            FrameElement::Label => context | Context::ON_TITLEBAR,
            FrameElement::TabContainer | FrameElement::Tab => {
                if self.tab_mode == TabMode::External {
                    context | Context::ON_TAB
                } else {
                    context | Context::ON_TAB | Context::ON_TITLEBAR
                }
            },
            _ => context,
        }
    }

    /// Clears the damaged part of the sub-window `window`. Returns whether
    /// the window belongs to this frame's decorations.
    pub fn expose(
        &self,
        env: &FrameEnv,
        window: Window,
        region: Region,
    ) -> bool {
        match self.dispatch.get(&window) {
            None | Some(FrameElement::Window) => false,
            Some(_) => {
                env.conn.clear_area(window, region);
                true
            },
        }
    }

    /// Reacts to the outer window having been configured to `region`.
    pub fn handle_configure(
        &mut self,
        env: &FrameEnv,
        window: Window,
        region: Region,
    ) -> bool {
        if window != self.window.window {
            return false;
        }

        self.resize(env, region.dim);
        true
    }

    /// Frees every pixmap and destroys every window the frame created. The
    /// client must have been reparented away beforehand.
    pub fn destroy(
        mut self,
        env: &FrameEnv,
    ) {
        let conn = env.conn;

        self.faces.release(conn);

        if self.tabs_on_root {
            conn.destroy_window(self.tab_container.window);
        }

        conn.destroy_window(self.window.window);
        debug!("destroyed frame {:#0x}", self.window.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::Call;
    use crate::mock::MockConnection;

    use winsys::geometry::Padding;
    use winsys::texture::Texture;
    use winsys::texture::TextureKind;

    fn theme() -> FrameTheme {
        let mut theme = FrameTheme::DEFAULT;
        theme.title_height = 25;
        theme.bevel = 0;
        theme.handle_width = 6;
        theme.border.width = 0;
        theme
    }

    fn tabs(internal_tabs: bool) -> TabSettings {
        TabSettings {
            placement: TabPlacement::TopLeft,
            tab_width: 64,
            max_over_tabs: false,
            internal_tabs,
        }
    }

    fn screen() -> Screen {
        Screen::new(Region::new(0, 0, 1920, 1080), 0)
    }

    fn env<'a>(
        conn: &'a MockConnection,
        screen: &'a Screen,
        theme: &'a FrameTheme,
        tabs: TabSettings,
    ) -> FrameEnv<'a> {
        FrameEnv {
            conn,
            screen,
            theme,
            tabs,
        }
    }

    fn buttoned_frame(env: &FrameEnv) -> WinFrame {
        let mut frame = WinFrame::new(env, Region::new(0, 0, 400, 300));

        frame.add_left_button(env, ButtonKind::Stick);
        frame.add_left_button(env, ButtonKind::Shade);
        frame.add_right_button(env, ButtonKind::Iconify);
        frame.add_right_button(env, ButtonKind::Maximize);
        frame.create_tab(env, 0x42);
        frame.reconfigure(env);

        frame
    }

    #[test]
    fn titlebar_lays_out_buttons_around_label() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);

        assert_eq!(frame.titlebar().region().dim.w, 400);
        assert_eq!(frame.label().region(), Region::new(50, 0, 300, 25));
        assert_eq!(frame.tab_container().region(), frame.label().region());
        assert_eq!(frame.buttons_right[0].pane.region(), Region::new(350, 0, 25, 25));
        assert_eq!(frame.buttons_right[1].pane.region(), Region::new(375, 0, 25, 25));
    }

    #[test]
    fn titlebar_hit_test_separates_label_from_buttons() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);
        let titlebar = frame.titlebar().window();

        let on_label = frame.get_context(titlebar, Pos::new(200, 10), Pos::new(200, 10), false);
        assert!(on_label.contains(Context::ON_TITLEBAR));
        assert!(!on_label.contains(Context::ON_TAB));

        let on_button = frame.get_context(titlebar, Pos::new(370, 10), Pos::new(370, 10), false);
        assert!(!on_button.contains(Context::ON_TITLEBAR));

        let label_end = frame.get_context(titlebar, Pos::new(350, 10), Pos::new(350, 10), false);
        assert!(!label_end.contains(Context::ON_TITLEBAR));

        let label_start = frame.get_context(titlebar, Pos::new(50, 10), Pos::new(50, 10), false);
        assert!(label_start.contains(Context::ON_TITLEBAR));
    }

    #[test]
    fn grips_take_priority_over_handle() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);
        let (grip_left, grip_right) = frame.grips();
        let bottom = frame.region().bottom() - 2;

        let pos = Pos::new(5, bottom);
        assert_eq!(
            frame.get_context(grip_left.window(), pos, pos, true),
            Context::ON_LEFTGRIP
        );

        let pos = Pos::new(395, bottom);
        assert_eq!(
            frame.get_context(grip_right.window(), pos, pos, true),
            Context::ON_RIGHTGRIP
        );

        let handle = frame.handle().window();
        let middle = Pos::new(200, bottom);
        assert_eq!(
            frame.get_context(handle, middle, middle, false),
            Context::ON_WINDOWBORDER | Context::ON_WINDOW
        );

        let corner = Pos::new(10, bottom);
        assert_eq!(frame.get_context(handle, corner, corner, false), Context::empty());
    }

    #[test]
    fn border_and_tab_contexts() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);
        let window = frame.window();

        let inside = Pos::new(200, 150);
        let outside = Pos::new(500, 150);

        assert_eq!(
            frame.get_context(window, inside, inside, true),
            Context::ON_WINDOW
        );
        assert_eq!(
            frame.get_context(window, inside, outside, true),
            Context::ON_WINDOWBORDER | Context::ON_WINDOW
        );

        let tab = frame.tabs[0].pane.window();
        assert_eq!(
            frame.get_context(tab, inside, inside, false),
            Context::ON_TAB | Context::ON_TITLEBAR
        );

        frame.set_tab_mode(&env, TabMode::External);
        assert_eq!(frame.get_context(tab, inside, inside, false), Context::ON_TAB);

        assert_eq!(frame.get_context(0xdead, inside, inside, true), Context::empty());
    }

    #[test]
    fn client_area_fills_space_between_titlebar_and_handle() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);
        let h = frame.region().dim.h;

        assert_eq!(frame.client_area(), Region::new(0, 25, 400, h - 25 - 6));
        assert_eq!(frame.handle().region(), Region::new(0, h - 6, 400, 6));
        assert_eq!(frame.grips().1.region(), Region::new(380, 0, 20, 6));
        assert_eq!(frame.extents(), Padding::new(0, 0, 25, 6));
    }

    #[test]
    fn client_sizing_adds_decorations() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        frame.move_resize_for_client(
            &env,
            Region::new(100, 100, 640, 480),
            Gravity::NorthWest,
            0,
            true,
            true,
        );

        assert_eq!(frame.region(), Region::new(100, 100, 640, 511));
        assert_eq!(frame.client_region(), Region::new(100, 125, 640, 480));
    }

    #[test]
    fn rendering_is_deferred_until_shown() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        let renders = |conn: &MockConnection| {
            conn.calls()
                .iter()
                .filter(|call| matches!(call, Call::Render(..)))
                .count()
        };

        assert!(frame.needs_render());
        assert_eq!(renders(&conn), 0);

        frame.show(&env);
        assert!(!frame.needs_render());
        assert!(renders(&conn) > 0);
        assert!(conn.calls().contains(&Call::Map(frame.window())));
    }

    #[test]
    fn retheming_does_not_leak_pixmaps() {
        let conn = MockConnection::new();
        let screen = screen();
        let mut theme = theme();

        theme.focused.handle =
            Texture::gradient(TextureKind::HorizontalGradient, Color(0), Color(0xffffff));
        theme.unfocused.handle = theme.focused.handle;

        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        frame.show(&env);
        let live = conn.live_pixmaps();
        assert!(live > 0);

        frame.reconfigure(&env);
        frame.reconfigure(&env);
        assert_eq!(conn.live_pixmaps(), live);

        frame.destroy(&env);
        assert_eq!(conn.live_pixmaps(), 0);
    }

    #[test]
    fn gravity_offsets_account_for_decorations() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);
        let origin = Pos::default();

        assert_eq!(frame.gravity_translate(origin, Gravity::NorthWest, false, 0), origin);
        assert_eq!(
            frame.gravity_translate(origin, Gravity::South, false, 0),
            Pos::new(0, -31)
        );
        assert_eq!(
            frame.gravity_translate(origin, Gravity::South, true, 0),
            Pos::new(0, 31)
        );
        assert_eq!(
            frame.gravity_translate(origin, Gravity::Center, false, 0),
            Pos::new(0, -15)
        );
        assert_eq!(
            frame.gravity_translate(origin, Gravity::Static, false, 2),
            Pos::new(2, 2 - 25)
        );
        assert_eq!(
            frame.gravity_translate(origin, Gravity::East, false, 2),
            Pos::new(4, (4 - 31) / 2)
        );
    }

    #[test]
    fn external_tabs_sit_above_frame() {
        let (conn, screen, mut theme) = (MockConnection::new(), screen(), theme());
        theme.border.width = 1;
        let env = env(&conn, &screen, &theme, tabs(false));
        let mut frame = WinFrame::new(&env, Region::new(100, 100, 400, 300));

        frame.create_tab(&env, 0x42);
        frame.create_tab(&env, 0x43);
        frame.set_border_width(&env, false);
        frame.show(&env);

        let tabs = frame.tab_container().region();
        assert_eq!(frame.tab_mode(), TabMode::External);
        assert_eq!(tabs.dim, Dim::new(128, frame.button_height()));
        assert_eq!(frame.y_offset(&env), tabs.dim.h + 1);
        assert_eq!(frame.height_offset(&env), tabs.dim.h + 1);
        assert_eq!(frame.x_offset(&env), 0);
        assert_eq!(frame.width_offset(&env), 0);
        assert_eq!(tabs.pos, Pos::new(100, 100 - tabs.dim.h - 1));
        assert!(frame.tab_container().is_mapped());
    }

    #[test]
    fn vertical_tab_placement_offsets_width() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let mut settings = tabs(false);
        settings.placement = TabPlacement::LeftBottom;

        let env = env(&conn, &screen, &theme, settings);
        let mut frame = WinFrame::new(&env, Region::new(100, 100, 400, 300));
        frame.create_tab(&env, 0x42);

        let tabs = frame.tab_container().region();
        assert_eq!(tabs.dim, Dim::new(frame.button_height(), 64));
        assert_eq!(frame.x_offset(&env), tabs.dim.w);
        assert_eq!(frame.width_offset(&env), tabs.dim.w);
        assert_eq!(frame.y_offset(&env), 0);

        let region = frame.region();
        assert_eq!(
            tabs.pos,
            Pos::new(region.pos.x - tabs.dim.w, region.pos.y + region.dim.h - 64)
        );
    }

    #[test]
    fn maximizing_respects_struts() {
        let conn = MockConnection::new();
        let mut screen = screen();
        screen.request_strut(0, Padding::new(0, 0, 30, 0));
        screen.update_available_area();

        let theme = theme();
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        frame.state_mut().maximized_vert = true;
        frame.state_mut().maximized_horz = true;
        frame.apply_state(&env);

        assert_eq!(frame.region(), Region::new(0, 30, 1920, 1050));

        frame.state_mut().maximized_vert = false;
        frame.state_mut().maximized_horz = false;
        frame.apply_state(&env);

        assert_eq!(frame.region().pos, Pos::new(0, 0));
        assert_eq!(frame.region().dim.w, 400);
    }

    #[test]
    fn shading_keeps_only_the_titlebar() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        frame.move_resize(&env, Region::new(10, 20, 400, 331), true, true, false);
        let saved = frame.state().saved_region();
        assert_eq!(saved, Region::new(10, 20, 400, 331));

        frame.state_mut().shaded = true;
        frame.apply_state(&env);
        assert_eq!(frame.region(), Region::new(10, 20, 400, 25));
        assert_eq!(frame.state().saved_region(), saved);

        frame.state_mut().shaded = false;
        frame.apply_state(&env);
        assert_eq!(frame.region(), saved);
    }

    #[test]
    fn toggling_titlebar_and_handle_changes_height() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);
        let h = frame.region().dim.h;

        assert!(frame.hide_titlebar(&env));
        assert!(!frame.hide_titlebar(&env));
        assert_eq!(frame.region().dim.h, h - 25);
        assert_eq!(frame.titlebar_height(), 0);

        assert!(frame.hide_handle(&env));
        assert_eq!(frame.region().dim.h, h - 31);

        assert!(frame.show_titlebar(&env));
        assert!(frame.show_handle(&env));
        assert!(!frame.show_handle(&env));
        assert_eq!(frame.region().dim.h, h);
    }

    #[test]
    fn tab_mode_change_reports_whether_it_happened() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        assert!(!frame.set_tab_mode(&env, TabMode::Internal));
        assert!(!frame.label().is_mapped());

        frame.show(&env);
        assert!(frame.set_tab_mode(&env, TabMode::External));
        assert!(frame.label().is_mapped());

        assert!(frame.set_tab_mode(&env, TabMode::Internal));
        let reparent = Call::Reparent(
            frame.tab_container().window(),
            frame.titlebar().window(),
            Pos::new(50, 0),
        );

        assert!(conn.calls().contains(&reparent));
    }

    #[test]
    fn expose_clears_only_damaged_window() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let frame = buttoned_frame(&env);
        let damage = Region::new(1, 2, 3, 4);

        conn.clear_calls();
        assert!(frame.expose(&env, frame.titlebar().window(), damage));
        assert_eq!(conn.calls(), vec![Call::ClearArea(frame.titlebar().window(), damage)]);

        let button = frame.buttons_left[0].pane.window();
        assert!(frame.expose(&env, button, damage));
        assert!(!frame.expose(&env, 0xdead, damage));
    }

    #[test]
    fn pressed_buttons_use_pressed_face() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);
        frame.show(&env);

        let button = frame.buttons_right[0].pane.window();
        conn.clear_calls();

        assert_eq!(
            frame.set_button_pressed(&env, button, true),
            Some(ButtonKind::Iconify)
        );
        assert!(conn
            .calls()
            .contains(&Call::BackgroundColor(button, theme.button_pressed.color)));

        assert_eq!(frame.set_button_pressed(&env, 0xdead, true), None);
    }

    #[test]
    fn configure_of_outer_window_resizes() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);
        let window = frame.window();

        assert!(!frame.handle_configure(&env, 0xdead, Region::new(0, 0, 10, 10)));
        assert!(frame.handle_configure(&env, window, Region::new(0, 0, 500, 300)));
        assert_eq!(frame.titlebar().region().dim.w, 500);
    }

    #[test]
    fn tabs_can_be_reordered_and_removed() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);

        let first = frame.tabs[0].pane.window;
        let second = frame.create_tab(&env, 0x43);

        assert_eq!(frame.tab_client(first), Some(0x42));
        assert_eq!(frame.tab_client(second), Some(0x43));
        assert_eq!(frame.element(second), Some(FrameElement::Tab));

        assert!(frame.move_tab(&env, 0x43, -5));
        assert!(!frame.move_tab(&env, 0x43, -1));
        assert_eq!(frame.tabs[0].client, 0x43);

        assert!(frame.remove_tab(&env, 0x43));
        assert!(!frame.remove_tab(&env, 0x43));
        assert_eq!(frame.tab_client(second), None);
        assert!(conn.calls().contains(&Call::Destroy(second)));
    }

    #[test]
    fn removed_buttons_stop_dispatching() {
        let (conn, screen, theme) = (MockConnection::new(), screen(), theme());
        let env = env(&conn, &screen, &theme, tabs(true));
        let mut frame = buttoned_frame(&env);
        let button = frame.buttons_right[0].pane.window;

        assert_eq!(frame.button_kind(button), Some(ButtonKind::Iconify));

        frame.remove_all_buttons(&env);
        frame.reconfigure(&env);

        assert_eq!(frame.button_kind(button), None);
        assert_eq!(frame.element(button), None);
        assert_eq!(frame.label().region(), Region::new(0, 0, 400, 25));
    }
}
