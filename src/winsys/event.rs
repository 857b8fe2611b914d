pub use crate::Result;

use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::MouseEvent;
use crate::window::Window;

#[derive(Debug, Clone)]
pub enum Event {
    Mouse {
        event: MouseEvent,
    },
    MapRequest {
        window: Window,
        ignore: bool,
    },
    Enter {
        window: Window,
        root_rpos: Pos,
        window_rpos: Pos,
    },
    Destroy {
        window: Window,
    },
    Expose {
        window: Window,
        region: Region,
    },
    Unmap {
        window: Window,
        ignore: bool,
    },
    WorkspaceRequest {
        window: Option<Window>,
        index: usize,
        on_root: bool,
    },
    PlacementRequest {
        window: Window,
        pos: Option<Pos>,
        dim: Option<Dim>,
        on_root: bool,
    },
    Configure {
        window: Window,
        region: Region,
        on_root: bool,
    },
    Property {
        window: Window,
        kind: PropertyKind,
        on_root: bool,
    },
    ScreenChange,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum PropertyKind {
    Name,
    Size,
    Strut,
}
