use crate::context::Context;

use winsys::geometry::Dim;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::window::Window;

use std::cell::Cell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum BufferKind {
    Move,
    Resize,
}

/// State of an in-progress pointer drag on a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    kind: BufferKind,
    window: Cell<Option<Window>>,
    context: Cell<Context>,
    grip_pos: Cell<Option<Pos>>,
    window_region: Cell<Option<Region>>,
}

impl Buffer {
    pub fn new(kind: BufferKind) -> Self {
        Self {
            kind,
            window: Cell::new(None),
            context: Cell::new(Context::empty()),
            grip_pos: Cell::new(None),
            window_region: Cell::new(None),
        }
    }

    pub fn set(
        &self,
        window: Window,
        context: Context,
        pos: Pos,
        region: Region,
    ) {
        self.window.set(Some(window));
        self.context.set(context);
        self.grip_pos.set(Some(pos));
        self.window_region.set(Some(region));
    }

    pub fn unset(&self) {
        self.window.set(None);
        self.context.set(Context::empty());
        self.grip_pos.set(None);
        self.window_region.set(None);
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.window.get().is_some()
    }

    #[inline]
    pub fn window(&self) -> Option<Window> {
        self.window.get()
    }

    #[inline]
    pub fn context(&self) -> Context {
        self.context.get()
    }

    #[inline]
    pub fn grip_pos(&self) -> Option<Pos> {
        self.grip_pos.get()
    }

    #[inline]
    pub fn window_region(&self) -> Option<Region> {
        self.window_region.get()
    }

    /// The frame region the drag asks for with the pointer at `pos`. Resizes
    /// never shrink below `min_dim`; dragging the left grip keeps the right
    /// edge in place.
    pub fn target_region(
        &self,
        pos: Pos,
        min_dim: Dim,
    ) -> Option<Region> {
        let grip_pos = self.grip_pos.get()?;
        let mut region = self.window_region.get()?;
        let dx = pos.x - grip_pos.x;
        let dy = pos.y - grip_pos.y;

        match self.kind {
            BufferKind::Move => {
                region.pos.x += dx;
                region.pos.y += dy;
            },
            BufferKind::Resize => {
                let right = region.right();
                let height = std::cmp::max(min_dim.h, region.dim.h + dy);

                if self.context.get().contains(Context::ON_LEFTGRIP) {
                    let width = std::cmp::max(min_dim.w, region.dim.w - dx);
                    region.pos.x = right - width;
                    region.dim.w = width;
                } else {
                    region.dim.w = std::cmp::max(min_dim.w, region.dim.w + dx);
                }

                region.dim.h = height;
            },
        }

        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Dim = Dim {
        w: 50,
        h: 40,
    };

    #[test]
    fn unset_buffer_has_no_target() {
        let buffer = Buffer::new(BufferKind::Move);

        assert!(!buffer.is_occupied());
        assert_eq!(buffer.target_region(Pos::new(10, 10), MIN), None);
    }

    #[test]
    fn move_follows_pointer() {
        let buffer = Buffer::new(BufferKind::Move);
        buffer.set(0x1, Context::ON_TITLEBAR, Pos::new(100, 100), Region::new(50, 60, 200, 150));

        assert_eq!(
            buffer.target_region(Pos::new(130, 90), MIN),
            Some(Region::new(80, 50, 200, 150))
        );

        buffer.unset();
        assert_eq!(buffer.window(), None);
    }

    #[test]
    fn left_grip_resize_anchors_right_edge() {
        let buffer = Buffer::new(BufferKind::Resize);
        buffer.set(0x1, Context::ON_LEFTGRIP, Pos::new(0, 200), Region::new(0, 0, 200, 200));

        assert_eq!(
            buffer.target_region(Pos::new(20, 230), MIN),
            Some(Region::new(20, 0, 180, 230))
        );

        assert_eq!(
            buffer.target_region(Pos::new(190, 0), MIN),
            Some(Region::new(150, 0, 50, 40))
        );
    }

    #[test]
    fn right_grip_resize_grows() {
        let buffer = Buffer::new(BufferKind::Resize);
        buffer.set(0x1, Context::ON_RIGHTGRIP, Pos::new(200, 200), Region::new(0, 0, 200, 200));

        assert_eq!(
            buffer.target_region(Pos::new(250, 210), MIN),
            Some(Region::new(0, 0, 250, 210))
        );
    }
}
