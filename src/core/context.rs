use bitflags::bitflags;

bitflags! {
    /// The regions of a frame a pointer event was classified into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Context: u32 {
        const ON_WINDOW       = 1 << 0;
        const ON_TITLEBAR     = 1 << 1;
        const ON_TAB          = 1 << 2;
        const ON_WINDOWBORDER = 1 << 3;
        const ON_LEFTGRIP     = 1 << 4;
        const ON_RIGHTGRIP    = 1 << 5;
    }
}

impl Context {
    #[inline]
    pub fn on_grip(&self) -> bool {
        self.intersects(Context::ON_LEFTGRIP | Context::ON_RIGHTGRIP)
    }
}
