use crate::frame::FrameEnv;
use crate::frame::WinFrame;

use winsys::geometry::Region;
use winsys::hints::Gravity;
use winsys::hints::SizeHints;
use winsys::screen::StrutId;
use winsys::window::Window;

use std::cell::Cell;

/// A managed client window and the frame decorating it.
pub struct Client {
    window: Window,
    frame: WinFrame,
    name: String,
    size_hints: Option<SizeHints>,
    transient_for: Option<Window>,
    strut: Option<StrutId>,
    mapped: bool,
    expected_unmap_count: Cell<u8>,
}

impl Client {
    pub fn new(
        window: Window,
        frame: WinFrame,
        name: impl Into<String>,
        size_hints: Option<SizeHints>,
        transient_for: Option<Window>,
    ) -> Self {
        Self {
            window,
            frame,
            name: name.into(),
            size_hints,
            transient_for,
            strut: None,
            mapped: false,
            expected_unmap_count: Cell::new(0),
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn windows(&self) -> (Window, Window) {
        (self.window, self.frame.window())
    }

    #[inline]
    pub fn frame(&self) -> &WinFrame {
        &self.frame
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut WinFrame {
        &mut self.frame
    }

    #[inline]
    pub fn into_frame(self) -> WinFrame {
        self.frame
    }

    #[inline]
    pub fn set_name(
        &mut self,
        name: impl Into<String>,
    ) {
        self.name = name.into();
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_size_hints(
        &mut self,
        size_hints: Option<SizeHints>,
    ) {
        self.size_hints = size_hints;
        self.frame.set_size_hints(size_hints.unwrap_or_default());
    }

    #[inline]
    pub fn size_hints(&self) -> Option<SizeHints> {
        self.size_hints
    }

    #[inline]
    pub fn gravity(&self) -> Gravity {
        self.size_hints.map_or(Gravity::default(), |hints| hints.gravity)
    }

    #[inline]
    pub fn transient_for(&self) -> Option<Window> {
        self.transient_for
    }

    #[inline]
    pub fn set_strut(
        &mut self,
        strut: Option<StrutId>,
    ) -> Option<StrutId> {
        std::mem::replace(&mut self.strut, strut)
    }

    #[inline]
    pub fn strut(&self) -> Option<StrutId> {
        self.strut
    }

    /// Absolute geometry of the client inside its frame.
    #[inline]
    pub fn inner_region(&self) -> Region {
        self.frame.client_region()
    }

    /// Places the frame so the client itself ends up at `region`, never
    /// smaller than the minimum client size.
    pub fn set_region(
        &mut self,
        env: &FrameEnv,
        region: Region,
    ) {
        let region = region.with_minimum_dim(&Self::MIN_CLIENT_DIM);
        let gravity = self.gravity();

        self.frame
            .move_resize_for_client(env, region, gravity, 0, true, true);
    }

    #[inline]
    pub fn set_mapped(
        &mut self,
        mapped: bool,
    ) {
        self.mapped = mapped;
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    #[inline]
    pub fn expect_unmap(&self) {
        self.expected_unmap_count
            .set(self.expected_unmap_count.get() + 1);
    }

    #[inline]
    pub fn consume_unmap_if_expecting(&self) -> bool {
        let expected_unmap_count = self.expected_unmap_count.get();
        let expecting = expected_unmap_count > 0;

        if expecting {
            self.expected_unmap_count.set(expected_unmap_count - 1);
        }

        expecting
    }

    #[inline]
    pub fn is_expecting_unmap(&self) -> bool {
        self.expected_unmap_count.get() > 0
    }
}

impl PartialEq for Client {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.window == other.window
    }
}

pub struct Hex32(pub u32);

impl std::fmt::Debug for Hex32 {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{:#0x}", &self.0)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("window", &Hex32(self.window))
            .field("frame", &Hex32(self.frame.window()))
            .field("name", &self.name)
            .field("region", &self.frame.region())
            .field("size_hints", &self.size_hints)
            .field("transient_for", &self.transient_for.map(Hex32))
            .field("strut", &self.strut)
            .field("mapped", &self.mapped)
            .field("state", self.frame.state())
            .field("expected_unmap_count", &self.expected_unmap_count)
            .finish()
    }
}
