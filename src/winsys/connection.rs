use crate::event::Event;
use crate::geometry::Dim;
use crate::geometry::Extents;
use crate::geometry::Padding;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::hints::SizeHints;
use crate::texture::Color;
use crate::texture::Orientation;
use crate::texture::Pixmap;
use crate::texture::Texture;
use crate::window::IcccmWindowState;
use crate::window::Window;
use crate::Result;

pub trait Connection {
    fn flush(&self) -> bool;
    fn step(&self) -> Option<Event>;
    fn screen_region(&self) -> Region;
    fn connected_heads(&self) -> Option<Vec<Region>>;
    fn top_level_windows(&self) -> Vec<Window>;
    fn get_pointer_position(&self) -> Pos;
    fn cleanup(&self);

    // Window manipulation
    fn create_frame(
        &self,
        region: Region,
    ) -> Window;
    fn create_decoration(
        &self,
        parent: Window,
        region: Region,
    ) -> Window;
    fn init_window(
        &self,
        window: Window,
        focus_follows_mouse: bool,
    );
    fn init_frame(
        &self,
        window: Window,
        focus_follows_mouse: bool,
    );
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        pos: Pos,
    );
    fn unparent_window(
        &self,
        window: Window,
        pos: Pos,
    );
    fn destroy_window(
        &self,
        window: Window,
    );
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    );
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    );
    fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    );
    fn raise_window(
        &self,
        window: Window,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn unfocus(&self);

    // Drawing
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    );
    fn set_window_border_color(
        &self,
        window: Window,
        color: Color,
    );
    fn set_window_background_color(
        &self,
        window: Window,
        color: Color,
    );
    fn set_window_background_pixmap(
        &self,
        window: Window,
        pixmap: Pixmap,
    );
    fn clear_window(
        &self,
        window: Window,
    );
    fn clear_area(
        &self,
        window: Window,
        region: Region,
    );
    fn render_texture(
        &self,
        dim: Dim,
        texture: &Texture,
        orientation: Orientation,
    ) -> Option<Pixmap>;
    fn free_pixmap(
        &self,
        pixmap: Pixmap,
    );

    // Client properties
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region>;
    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool;
    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String;
    fn get_icccm_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window>;
    fn get_icccm_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints>;
    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    );
    fn get_window_strut(
        &self,
        window: Window,
    ) -> Option<Padding>;
    fn set_window_desktop(
        &self,
        window: Window,
        index: usize,
    );
    fn set_window_frame_extents(
        &self,
        window: Window,
        extents: Extents,
    );

    // EWMH root properties
    fn init_wm_properties(
        &self,
        wm_name: &str,
        desktop_names: &[&str],
    );
    fn set_current_desktop(
        &self,
        index: usize,
    );
    fn update_desktops(
        &self,
        desktop_names: &[&str],
    );
    fn set_workarea(
        &self,
        workareas: &[Region],
    );
    fn update_client_list(
        &self,
        clients: &[Window],
    );
}
