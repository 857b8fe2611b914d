use winsys::connection::Connection;
use winsys::event::Event;
use winsys::geometry::Dim;
use winsys::geometry::Extents;
use winsys::geometry::Padding;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::hints::SizeHints;
use winsys::texture::Color;
use winsys::texture::Orientation;
use winsys::texture::Pixmap;
use winsys::texture::Texture;
use winsys::window::IcccmWindowState;
use winsys::window::Window;
use winsys::Result;

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;

use anyhow::anyhow;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(Window, Option<Window>, Region),
    Map(Window),
    Unmap(Window),
    Reparent(Window, Window, Pos),
    Unparent(Window, Pos),
    Destroy(Window),
    Place(Window, Region),
    Move(Window, Pos),
    Resize(Window, Dim),
    Raise(Window),
    Focus(Window),
    BorderWidth(Window, u32),
    BorderColor(Window, Color),
    BackgroundColor(Window, Color),
    BackgroundPixmap(Window, Pixmap),
    Clear(Window),
    ClearArea(Window, Region),
    Render(Dim, Texture, Orientation),
    FreePixmap(Pixmap),
    IcccmState(Window, IcccmWindowState),
    WindowDesktop(Window, usize),
    FrameExtents(Window, Extents),
    CurrentDesktop(usize),
    Desktops(Vec<String>),
    Workarea(Vec<Region>),
    ClientList(Vec<Window>),
}

/// Records every request instead of talking to a display server.
pub struct MockConnection {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    live_pixmaps: RefCell<HashSet<Pixmap>>,
    fail_render: Cell<bool>,
    screen: Cell<Region>,
    heads: RefCell<Option<Vec<Region>>>,
    geometries: RefCell<HashMap<Window, Region>>,
    struts: RefCell<HashMap<Window, Padding>>,
    pointer: Cell<Pos>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::with_heads(Region::new(0, 0, 1920, 1080), None)
    }

    pub fn with_heads(
        screen: Region,
        heads: Option<Vec<Region>>,
    ) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(0x100),
            live_pixmaps: RefCell::new(HashSet::new()),
            fail_render: Cell::new(false),
            screen: Cell::new(screen),
            heads: RefCell::new(heads),
            geometries: RefCell::new(HashMap::new()),
            struts: RefCell::new(HashMap::new()),
            pointer: Cell::new(Pos::default()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_pixmaps(&self) -> usize {
        self.live_pixmaps.borrow().len()
    }

    pub fn set_fail_render(
        &self,
        fail: bool,
    ) {
        self.fail_render.set(fail);
    }

    pub fn set_heads(
        &self,
        screen: Region,
        heads: Option<Vec<Region>>,
    ) {
        self.screen.set(screen);
        self.heads.replace(heads);
    }

    pub fn set_geometry(
        &self,
        window: Window,
        region: Region,
    ) {
        self.geometries.borrow_mut().insert(window, region);
    }

    pub fn set_strut(
        &self,
        window: Window,
        padding: Padding,
    ) {
        self.struts.borrow_mut().insert(window, padding);
    }

    fn record(
        &self,
        call: Call,
    ) {
        self.calls.borrow_mut().push(call);
    }

    fn generate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Connection for MockConnection {
    fn flush(&self) -> bool {
        true
    }

    fn step(&self) -> Option<Event> {
        None
    }

    fn screen_region(&self) -> Region {
        self.screen.get()
    }

    fn connected_heads(&self) -> Option<Vec<Region>> {
        self.heads.borrow().clone()
    }

    fn top_level_windows(&self) -> Vec<Window> {
        Vec::new()
    }

    fn get_pointer_position(&self) -> Pos {
        self.pointer.get()
    }

    fn cleanup(&self) {}

    fn create_frame(
        &self,
        region: Region,
    ) -> Window {
        let window = self.generate_id();
        self.record(Call::Create(window, None, region));
        window
    }

    fn create_decoration(
        &self,
        parent: Window,
        region: Region,
    ) -> Window {
        let window = self.generate_id();
        self.record(Call::Create(window, Some(parent), region));
        window
    }

    fn init_window(
        &self,
        _window: Window,
        _focus_follows_mouse: bool,
    ) {
    }

    fn init_frame(
        &self,
        _window: Window,
        _focus_follows_mouse: bool,
    ) {
    }

    fn map_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Map(window));
    }

    fn unmap_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Unmap(window));
    }

    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        pos: Pos,
    ) {
        self.record(Call::Reparent(window, parent, pos));
    }

    fn unparent_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        self.record(Call::Unparent(window, pos));
    }

    fn destroy_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Destroy(window));
    }

    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        self.record(Call::Place(window, *region));
    }

    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        self.record(Call::Move(window, pos));
    }

    fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    ) {
        self.record(Call::Resize(window, dim));
    }

    fn raise_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Raise(window));
    }

    fn focus_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Focus(window));
    }

    fn unfocus(&self) {}

    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) {
        self.record(Call::BorderWidth(window, width));
    }

    fn set_window_border_color(
        &self,
        window: Window,
        color: Color,
    ) {
        self.record(Call::BorderColor(window, color));
    }

    fn set_window_background_color(
        &self,
        window: Window,
        color: Color,
    ) {
        self.record(Call::BackgroundColor(window, color));
    }

    fn set_window_background_pixmap(
        &self,
        window: Window,
        pixmap: Pixmap,
    ) {
        self.record(Call::BackgroundPixmap(window, pixmap));
    }

    fn clear_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Clear(window));
    }

    fn clear_area(
        &self,
        window: Window,
        region: Region,
    ) {
        self.record(Call::ClearArea(window, region));
    }

    fn render_texture(
        &self,
        dim: Dim,
        texture: &Texture,
        orientation: Orientation,
    ) -> Option<Pixmap> {
        self.record(Call::Render(dim, *texture, orientation));

        if self.fail_render.get() {
            return None;
        }

        let pixmap = self.generate_id();
        self.live_pixmaps.borrow_mut().insert(pixmap);
        Some(pixmap)
    }

    fn free_pixmap(
        &self,
        pixmap: Pixmap,
    ) {
        self.live_pixmaps.borrow_mut().remove(&pixmap);
        self.record(Call::FreePixmap(pixmap));
    }

    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        self.geometries
            .borrow()
            .get(&window)
            .copied()
            .ok_or_else(|| anyhow!("unknown window {:#0x}", window))
    }

    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool {
        self.geometries.borrow().contains_key(&window)
    }

    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String {
        format!("window {:#0x}", window)
    }

    fn get_icccm_window_transient_for(
        &self,
        _window: Window,
    ) -> Option<Window> {
        None
    }

    fn get_icccm_window_size_hints(
        &self,
        _window: Window,
    ) -> Option<SizeHints> {
        None
    }

    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    ) {
        self.record(Call::IcccmState(window, state));
    }

    fn get_window_strut(
        &self,
        window: Window,
    ) -> Option<Padding> {
        self.struts.borrow().get(&window).copied()
    }

    fn set_window_desktop(
        &self,
        window: Window,
        index: usize,
    ) {
        self.record(Call::WindowDesktop(window, index));
    }

    fn set_window_frame_extents(
        &self,
        window: Window,
        extents: Extents,
    ) {
        self.record(Call::FrameExtents(window, extents));
    }

    fn init_wm_properties(
        &self,
        _wm_name: &str,
        desktop_names: &[&str],
    ) {
        self.update_desktops(desktop_names);
    }

    fn set_current_desktop(
        &self,
        index: usize,
    ) {
        self.record(Call::CurrentDesktop(index));
    }

    fn update_desktops(
        &self,
        desktop_names: &[&str],
    ) {
        self.record(Call::Desktops(
            desktop_names.iter().map(|&name| name.to_owned()).collect(),
        ));
    }

    fn set_workarea(
        &self,
        workareas: &[Region],
    ) {
        self.record(Call::Workarea(workareas.to_vec()));
    }

    fn update_client_list(
        &self,
        clients: &[Window],
    ) {
        self.record(Call::ClientList(clients.to_vec()));
    }
}
