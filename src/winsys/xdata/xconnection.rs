use crate::connection::Connection;
use crate::event::Event;
use crate::event::PropertyKind;
use crate::geometry::Dim;
use crate::geometry::Extents;
use crate::geometry::Padding;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::hints::Gravity;
use crate::hints::SizeHints;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::texture::Color;
use crate::texture::Orientation;
use crate::texture::Pixmap;
use crate::texture::Texture;
use crate::texture::TextureKind;
use crate::window::IcccmWindowState;
use crate::window::Window;
use crate::xdata::input::modifiers_from_state;
use crate::xdata::input::Button;
use crate::Result;

use std::convert::TryFrom;

use x11rb::connection;
use x11rb::errors::ReplyError;
use x11rb::properties;
use x11rb::protocol::randr;
use x11rb::protocol::xinerama;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;
use x11rb::wrapper::ConnectionExt as _;

use anyhow::anyhow;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        Any,
        ATOM,
        CARDINAL,
        WINDOW,
        STRING,
        UTF8_STRING,

        // ICCCM client properties
        WM_NAME,
        WM_NORMAL_HINTS,
        WM_TRANSIENT_FOR,

        // ICCCM window manager properties
        WM_STATE,
        WM_CLASS,

        // EWMH root properties
        _NET_SUPPORTED,
        _NET_CLIENT_LIST,
        _NET_NUMBER_OF_DESKTOPS,
        _NET_CURRENT_DESKTOP,
        _NET_DESKTOP_NAMES,
        _NET_ACTIVE_WINDOW,
        _NET_WORKAREA,
        _NET_SUPPORTING_WM_CHECK,

        // EWMH application properties
        _NET_WM_NAME,
        _NET_WM_DESKTOP,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_STRUT,
        _NET_WM_STRUT_PARTIAL,
        _NET_WM_PID,
        _NET_FRAME_EXTENTS,

        // EWMH window types
        _NET_WM_WINDOW_TYPE_DOCK,
        _NET_WM_WINDOW_TYPE_DESKTOP,
    }
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    atoms: Atoms,
    screen: xproto::Screen,
    check_window: Window,
    background_gc: xproto::Gcontext,
    window_event_mask: EventMask,
    frame_event_mask: EventMask,
    decoration_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
    ) -> Result<Self> {
        let screen = conn.setup().roots[screen_num].clone();
        let root = screen.root;

        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(
            EventMask::SUBSTRUCTURE_REDIRECT
                | EventMask::SUBSTRUCTURE_NOTIFY
                | EventMask::PROPERTY_CHANGE
                | EventMask::BUTTON_PRESS,
        );

        let res = conn.change_window_attributes(root, &aux)?.check();
        if let Err(ReplyError::X11Error(err)) = res {
            if err.error_kind == ErrorKind::Access {
                return Err(anyhow!("another window manager is already running"));
            } else {
                return Err(anyhow!("unable to set up window manager"));
            }
        }

        let atoms = Atoms::new(conn)?.reply()?;
        let check_window = conn.generate_id()?;

        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            xproto::WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &xproto::CreateWindowAux::default().override_redirect(1),
        )?;

        conn.map_window(check_window)?;
        conn.configure_window(
            check_window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::BELOW),
        )?;

        randr::select_input(
            conn,
            check_window,
            randr::NotifyMask::OUTPUT_CHANGE
                | randr::NotifyMask::CRTC_CHANGE
                | randr::NotifyMask::SCREEN_CHANGE,
        )?;

        let background_gc = conn.generate_id()?;
        conn.create_gc(background_gc, root, &xproto::CreateGCAux::default())?;

        let window_event_mask: EventMask =
            EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY | EventMask::FOCUS_CHANGE;

        let frame_event_mask: EventMask = EventMask::STRUCTURE_NOTIFY
            | EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::BUTTON_MOTION
            | EventMask::EXPOSURE;

        let decoration_event_mask: EventMask = EventMask::BUTTON_PRESS
            | EventMask::BUTTON_RELEASE
            | EventMask::BUTTON_MOTION
            | EventMask::EXPOSURE;

        Ok(Self {
            conn,
            atoms,
            screen,
            check_window,
            background_gc,
            window_event_mask,
            frame_event_mask,
            decoration_event_mask,
        })
    }

    fn window_is_any_of_types(
        &self,
        window: Window,
        types: &[Atom],
    ) -> bool {
        self.conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_WINDOW_TYPE,
                self.atoms.ATOM,
                0,
                std::u32::MAX,
            )
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    reply.value32().map_or(false, |mut window_types| {
                        window_types.any(|type_| types.contains(&type_))
                    })
                })
            })
    }

    fn get_cardinals(
        &self,
        window: Window,
        atom: Atom,
    ) -> Option<Vec<u32>> {
        self.conn
            .get_property(false, window, atom, self.atoms.CARDINAL, 0, std::u32::MAX)
            .ok()?
            .reply()
            .ok()
            .and_then(|reply| {
                let values: Vec<u32> = reply.value32()?.collect();

                if values.is_empty() {
                    None
                } else {
                    Some(values)
                }
            })
    }

    fn get_string_property(
        &self,
        window: Window,
        atom: Atom,
        type_: Atom,
    ) -> Option<String> {
        self.conn
            .get_property(false, window, atom, type_, 0, std::u32::MAX)
            .ok()?
            .reply()
            .ok()
            .and_then(|reply| {
                let value: Vec<u8> = reply.value8()?.collect();

                if value.is_empty() {
                    None
                } else {
                    String::from_utf8(value).ok()
                }
            })
    }

    fn fill(
        &self,
        drawable: u32,
        color: Color,
        rectangle: xproto::Rectangle,
    ) {
        drop(self.conn.change_gc(
            self.background_gc,
            &xproto::ChangeGCAux::new().foreground(color.pixel()),
        ));

        drop(
            self.conn
                .poly_fill_rectangle(drawable, self.background_gc, &[rectangle]),
        );
    }

    #[inline]
    fn mouse_event(
        &self,
        kind: MouseEventKind,
        detail: Option<u8>,
        state: u16,
        window: Window,
        root_rpos: Pos,
        window_rpos: Pos,
    ) -> Option<Event> {
        let button = match detail {
            Some(detail) => Some(Button::try_from(detail).ok()?),
            None => None,
        };

        Some(Event::Mouse {
            event: MouseEvent {
                kind,
                button,
                modifiers: modifiers_from_state(state),
                window,
                root_rpos,
                window_rpos,
            },
        })
    }

    #[inline]
    fn on_button_press(
        &self,
        event: &xproto::ButtonPressEvent,
    ) -> Option<Event> {
        self.mouse_event(
            MouseEventKind::Press,
            Some(event.detail),
            event.state,
            event.event,
            Pos::new(event.root_x as i32, event.root_y as i32),
            Pos::new(event.event_x as i32, event.event_y as i32),
        )
    }

    #[inline]
    fn on_button_release(
        &self,
        event: &xproto::ButtonReleaseEvent,
    ) -> Option<Event> {
        self.mouse_event(
            MouseEventKind::Release,
            Some(event.detail),
            event.state,
            event.event,
            Pos::new(event.root_x as i32, event.root_y as i32),
            Pos::new(event.event_x as i32, event.event_y as i32),
        )
    }

    #[inline]
    fn on_motion_notify(
        &self,
        event: &xproto::MotionNotifyEvent,
    ) -> Option<Event> {
        self.mouse_event(
            MouseEventKind::Motion,
            None,
            event.state,
            event.event,
            Pos::new(event.root_x as i32, event.root_y as i32),
            Pos::new(event.event_x as i32, event.event_y as i32),
        )
    }

    #[inline]
    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
            ignore: !self.must_manage_window(event.window),
        })
    }

    #[inline]
    fn on_enter_notify(
        &self,
        event: &xproto::EnterNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Enter {
            window: event.event,
            root_rpos: Pos {
                x: event.root_x as i32,
                y: event.root_y as i32,
            },
            window_rpos: Pos {
                x: event.event_x as i32,
                y: event.event_y as i32,
            },
        })
    }

    #[inline]
    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    #[inline]
    fn on_expose(
        &self,
        event: &xproto::ExposeEvent,
    ) -> Option<Event> {
        Some(Event::Expose {
            window: event.window,
            region: Region::new(
                event.x as i32,
                event.y as i32,
                event.width as i32,
                event.height as i32,
            ),
        })
    }

    #[inline]
    fn on_unmap_notify(
        &self,
        event: &xproto::UnmapNotifyEvent,
    ) -> Option<Event> {
        self.conn
            .get_window_attributes(event.window)
            .ok()
            .map(|cookie| Event::Unmap {
                window: event.window,
                ignore: cookie
                    .reply()
                    .map_or(false, |reply| reply.override_redirect),
            })
    }

    #[inline]
    fn on_configure_request(
        &self,
        event: &xproto::ConfigureRequestEvent,
    ) -> Option<Event> {
        let geometry = self.get_window_geometry(event.window).ok()?;
        let mask = event.value_mask;

        let has = |flag: xproto::ConfigWindow| mask & u16::from(flag) != 0;

        let pos = if has(xproto::ConfigWindow::X) || has(xproto::ConfigWindow::Y) {
            Some(Pos {
                x: if has(xproto::ConfigWindow::X) {
                    event.x as i32
                } else {
                    geometry.pos.x
                },
                y: if has(xproto::ConfigWindow::Y) {
                    event.y as i32
                } else {
                    geometry.pos.y
                },
            })
        } else {
            None
        };

        let dim = if has(xproto::ConfigWindow::WIDTH) || has(xproto::ConfigWindow::HEIGHT) {
            Some(Dim {
                w: if has(xproto::ConfigWindow::WIDTH) {
                    event.width as i32
                } else {
                    geometry.dim.w
                },
                h: if has(xproto::ConfigWindow::HEIGHT) {
                    event.height as i32
                } else {
                    geometry.dim.h
                },
            })
        } else {
            None
        };

        if pos.is_some() || dim.is_some() {
            return Some(Event::PlacementRequest {
                window: event.window,
                pos,
                dim,
                on_root: event.window == self.screen.root,
            });
        }

        None
    }

    #[inline]
    fn on_configure_notify(
        &self,
        event: &xproto::ConfigureNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Configure {
            window: event.window,
            region: Region::new(
                event.x as i32,
                event.y as i32,
                event.width as i32,
                event.height as i32,
            ),
            on_root: event.window == self.screen.root,
        })
    }

    #[inline]
    fn on_property_notify(
        &self,
        event: &xproto::PropertyNotifyEvent,
    ) -> Option<Event> {
        let kind = if event.atom == self.atoms.WM_NAME || event.atom == self.atoms._NET_WM_NAME {
            PropertyKind::Name
        } else if event.atom == self.atoms.WM_NORMAL_HINTS {
            PropertyKind::Size
        } else if event.atom == self.atoms._NET_WM_STRUT
            || event.atom == self.atoms._NET_WM_STRUT_PARTIAL
        {
            PropertyKind::Strut
        } else {
            return None;
        };

        Some(Event::Property {
            window: event.window,
            kind,
            on_root: event.window == self.screen.root,
        })
    }

    #[inline]
    fn on_client_message(
        &self,
        event: &xproto::ClientMessageEvent,
    ) -> Option<Event> {
        if event.format != 32 {
            return None;
        }

        let data = event.data.as_data32();

        if event.type_ == self.atoms._NET_CURRENT_DESKTOP {
            return Some(Event::WorkspaceRequest {
                window: None,
                index: data[0] as usize,
                on_root: event.window == self.screen.root,
            });
        }

        if event.type_ == self.atoms._NET_WM_DESKTOP {
            return Some(Event::WorkspaceRequest {
                window: Some(event.window),
                index: data[0] as usize,
                on_root: event.window == self.screen.root,
            });
        }

        None
    }

    #[inline]
    fn on_randr_notify(
        &self,
        _event: &randr::NotifyEvent,
    ) -> Option<Event> {
        Some(Event::ScreenChange)
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    #[inline]
    fn step(&self) -> Option<Event> {
        self.conn
            .wait_for_event()
            .ok()
            .and_then(|event| match event {
                XEvent::ButtonPress(e) => self.on_button_press(&e),
                XEvent::ButtonRelease(e) => self.on_button_release(&e),
                XEvent::MotionNotify(e) => self.on_motion_notify(&e),
                XEvent::MapRequest(e) => self.on_map_request(&e),
                XEvent::EnterNotify(e) => self.on_enter_notify(&e),
                XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
                XEvent::Expose(e) => self.on_expose(&e),
                XEvent::UnmapNotify(e) => self.on_unmap_notify(&e),
                XEvent::ConfigureRequest(e) => self.on_configure_request(&e),
                XEvent::ConfigureNotify(e) => self.on_configure_notify(&e),
                XEvent::PropertyNotify(e) => self.on_property_notify(&e),
                XEvent::ClientMessage(e) => self.on_client_message(&e),
                XEvent::RandrNotify(e) => self.on_randr_notify(&e),
                _ => None,
            })
    }

    #[inline]
    fn screen_region(&self) -> Region {
        Region::new(
            0,
            0,
            self.screen.width_in_pixels as i32,
            self.screen.height_in_pixels as i32,
        )
    }

    fn connected_heads(&self) -> Option<Vec<Region>> {
        let active = xinerama::is_active(self.conn)
            .ok()?
            .reply()
            .map_or(false, |reply| reply.state != 0);

        if !active {
            return None;
        }

        let reply = xinerama::query_screens(self.conn).ok()?.reply().ok()?;

        let heads: Vec<Region> = reply
            .screen_info
            .iter()
            .map(|info| {
                Region::new(
                    info.x_org as i32,
                    info.y_org as i32,
                    info.width as i32,
                    info.height as i32,
                )
            })
            .filter(|region| !region.dim.is_empty())
            .collect();

        if heads.is_empty() {
            None
        } else {
            Some(heads)
        }
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.conn
            .query_tree(self.screen.root)
            .map_or(Vec::with_capacity(0), |cookie| {
                cookie.reply().map_or(Vec::with_capacity(0), |reply| {
                    reply
                        .children
                        .into_iter()
                        .filter(|&w| self.must_manage_window(w))
                        .collect()
                })
            })
    }

    #[inline]
    fn get_pointer_position(&self) -> Pos {
        self.conn
            .query_pointer(self.screen.root)
            .map_or(Pos::default(), |cookie| {
                cookie.reply().map_or(Pos::default(), |reply| Pos {
                    x: reply.root_x as i32,
                    y: reply.root_y as i32,
                })
            })
    }

    fn cleanup(&self) {
        drop(self.conn.destroy_window(self.check_window));
        drop(self.conn.free_gc(self.background_gc));

        for &atom in &[
            self.atoms._NET_ACTIVE_WINDOW,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms._NET_WM_NAME,
            self.atoms.WM_CLASS,
            self.atoms._NET_SUPPORTED,
            self.atoms._NET_WM_PID,
            self.atoms._NET_CLIENT_LIST,
        ] {
            drop(self.conn.delete_property(self.screen.root, atom));
        }

        self.flush();
    }

    fn create_frame(
        &self,
        region: Region,
    ) -> Window {
        let frame = match self.conn.generate_id() {
            Ok(frame) => frame,
            Err(_) => return x11rb::NONE,
        };

        let aux = xproto::CreateWindowAux::new()
            .backing_store(Some(xproto::BackingStore::WHEN_MAPPED))
            .event_mask(self.frame_event_mask);

        drop(self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            frame,
            self.screen.root,
            region.pos.x as i16,
            region.pos.y as i16,
            std::cmp::max(1, region.dim.w) as u16,
            std::cmp::max(1, region.dim.h) as u16,
            0,
            xproto::WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        ));

        frame
    }

    fn create_decoration(
        &self,
        parent: Window,
        region: Region,
    ) -> Window {
        let window = match self.conn.generate_id() {
            Ok(window) => window,
            Err(_) => return x11rb::NONE,
        };

        let aux = xproto::CreateWindowAux::new().event_mask(self.decoration_event_mask);

        drop(self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            parent,
            region.pos.x as i16,
            region.pos.y as i16,
            std::cmp::max(1, region.dim.w) as u16,
            std::cmp::max(1, region.dim.h) as u16,
            0,
            xproto::WindowClass::INPUT_OUTPUT,
            0,
            &aux,
        ));

        window
    }

    #[inline]
    fn init_window(
        &self,
        window: Window,
        focus_follows_mouse: bool,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().event_mask(
                self.window_event_mask
                    | if focus_follows_mouse {
                        EventMask::ENTER_WINDOW
                    } else {
                        EventMask::NO_EVENT
                    },
            ),
        ));
    }

    #[inline]
    fn init_frame(
        &self,
        window: Window,
        focus_follows_mouse: bool,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().event_mask(
                self.frame_event_mask
                    | if focus_follows_mouse {
                        EventMask::ENTER_WINDOW
                    } else {
                        EventMask::NO_EVENT
                    },
            ),
        ));
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn unmap_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.unmap_window(window));
    }

    #[inline]
    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        pos: Pos,
    ) {
        drop(
            self.conn
                .reparent_window(window, parent, pos.x as i16, pos.y as i16),
        );
    }

    #[inline]
    fn unparent_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        drop(
            self.conn
                .reparent_window(window, self.screen.root, pos.x as i16, pos.y as i16),
        );
    }

    #[inline]
    fn destroy_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.destroy_window(window));
    }

    #[inline]
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(region.pos.x as i32)
                    .y(region.pos.y as i32)
                    .width(std::cmp::max(1, region.dim.w) as u32)
                    .height(std::cmp::max(1, region.dim.h) as u32),
            ),
        );
    }

    #[inline]
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(pos.x as i32)
                    .y(pos.y as i32),
            ),
        );
    }

    #[inline]
    fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .width(std::cmp::max(1, dim.w) as u32)
                    .height(std::cmp::max(1, dim.h) as u32),
            ),
        );
    }

    #[inline]
    fn raise_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::ABOVE),
        ));
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(
            self.conn
                .set_input_focus(xproto::InputFocus::PARENT, window, x11rb::CURRENT_TIME),
        );

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_ACTIVE_WINDOW,
            xproto::AtomEnum::WINDOW,
            &[window],
        ));
    }

    #[inline]
    fn unfocus(&self) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::PARENT,
            self.check_window,
            x11rb::CURRENT_TIME,
        ));

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW),
        );
    }

    #[inline]
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().border_width(width),
        ));
    }

    #[inline]
    fn set_window_border_color(
        &self,
        window: Window,
        color: Color,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().border_pixel(color.pixel()),
        ));
    }

    #[inline]
    fn set_window_background_color(
        &self,
        window: Window,
        color: Color,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().background_pixel(color.pixel()),
        ));
    }

    #[inline]
    fn set_window_background_pixmap(
        &self,
        window: Window,
        pixmap: Pixmap,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().background_pixmap(pixmap),
        ));
    }

    #[inline]
    fn clear_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.clear_area(false, window, 0, 0, 0, 0));
    }

    #[inline]
    fn clear_area(
        &self,
        window: Window,
        region: Region,
    ) {
        drop(self.conn.clear_area(
            false,
            window,
            region.pos.x as i16,
            region.pos.y as i16,
            region.dim.w as u16,
            region.dim.h as u16,
        ));
    }

    fn render_texture(
        &self,
        dim: Dim,
        texture: &Texture,
        orientation: Orientation,
    ) -> Option<Pixmap> {
        if dim.is_empty() || !texture.use_pixmap() {
            return None;
        }

        let texture = texture.rotated(orientation);
        let pixmap = self.conn.generate_id().ok()?;

        self.conn
            .create_pixmap(
                self.screen.root_depth,
                pixmap,
                self.screen.root,
                dim.w as u16,
                dim.h as u16,
            )
            .ok()?
            .check()
            .ok()?;

        let (w, h) = dim.values();

        match texture.kind {
            TextureKind::HorizontalGradient => {
                for x in 0..w {
                    self.fill(
                        pixmap,
                        texture.color.blend(texture.color_to, x as u32, (w - 1) as u32),
                        xproto::Rectangle {
                            x: x as i16,
                            y: 0,
                            width: 1,
                            height: h as u16,
                        },
                    );
                }
            },
            TextureKind::VerticalGradient => {
                for y in 0..h {
                    self.fill(
                        pixmap,
                        texture.color.blend(texture.color_to, y as u32, (h - 1) as u32),
                        xproto::Rectangle {
                            x: 0,
                            y: y as i16,
                            width: w as u16,
                            height: 1,
                        },
                    );
                }
            },
            TextureKind::DiagonalGradient => {
                let steps = (w + h - 2) as u32;

                for y in 0..h {
                    for x in 0..w {
                        self.fill(
                            pixmap,
                            texture.color.blend(texture.color_to, (x + y) as u32, steps),
                            xproto::Rectangle {
                                x: x as i16,
                                y: y as i16,
                                width: 1,
                                height: 1,
                            },
                        );
                    }
                }
            },
            _ => {
                self.fill(pixmap, texture.color, xproto::Rectangle {
                    x: 0,
                    y: 0,
                    width: w as u16,
                    height: h as u16,
                });
            },
        }

        Some(pixmap)
    }

    #[inline]
    fn free_pixmap(
        &self,
        pixmap: Pixmap,
    ) {
        drop(self.conn.free_pixmap(pixmap));
    }

    #[inline]
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        Ok(self.conn.get_geometry(window)?.reply().map(|reply| {
            Region::new(
                reply.x as i32,
                reply.y as i32,
                reply.width as i32,
                reply.height as i32,
            )
        })?)
    }

    #[inline]
    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool {
        let do_not_manage = self
            .conn
            .get_window_attributes(window)
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    reply.override_redirect || reply.class == xproto::WindowClass::INPUT_ONLY
                })
            });

        if do_not_manage {
            return false;
        }

        let to_exclude = &[
            self.atoms._NET_WM_WINDOW_TYPE_DOCK,
            self.atoms._NET_WM_WINDOW_TYPE_DESKTOP,
        ];

        !self.window_is_any_of_types(window, to_exclude)
    }

    #[inline]
    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String {
        static NO_NAME: &str = "n/a";

        self.get_string_property(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)
            .or_else(|| self.get_string_property(window, self.atoms.WM_NAME, self.atoms.STRING))
            .unwrap_or_else(|| NO_NAME.to_owned())
    }

    #[inline]
    fn get_icccm_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.conn
            .get_property(
                false,
                window,
                self.atoms.WM_TRANSIENT_FOR,
                self.atoms.WINDOW,
                0,
                std::u32::MAX,
            )
            .ok()?
            .reply()
            .ok()
            .and_then(|transient_for| {
                let transient_for: Vec<u32> = transient_for.value32()?.collect();
                transient_for.first().copied()
            })
            .filter(|&transient_for| transient_for != x11rb::NONE)
    }

    fn get_icccm_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints> {
        let size_hints = properties::WmSizeHints::get_normal_hints(self.conn, window)
            .ok()?
            .reply()
            .ok()?;

        let positive = |value: i32| if value > 0 { Some(value) } else { None };

        let (by_user, pos) = size_hints.position.map_or((false, None), |(spec, x, y)| {
            (
                match spec {
                    properties::WmSizeHintsSpecification::UserSpecified => true,
                    _ => false,
                },
                if x > 0 || y > 0 {
                    Some(Pos {
                        x,
                        y,
                    })
                } else {
                    None
                },
            )
        });

        let (min_width, min_height) = size_hints
            .min_size
            .map_or((None, None), |(w, h)| (positive(w), positive(h)));

        let (base_width, base_height) = size_hints
            .base_size
            .map_or((None, None), |(w, h)| (positive(w), positive(h)));

        let (max_width, max_height) = size_hints
            .max_size
            .map_or((None, None), |(w, h)| (positive(w), positive(h)));

        let (inc_width, inc_height) = size_hints.size_increment.map_or((None, None), |(w, h)| {
            (
                positive(w).filter(|&w| w < 0xFFFF),
                positive(h).filter(|&h| h < 0xFFFF),
            )
        });

        let (min_ratio, max_ratio) = size_hints.aspect.map_or((None, None), |(min, max)| {
            (
                if min.numerator > 0 && min.denominator > 0 {
                    Some(min.numerator as f64 / min.denominator as f64)
                } else {
                    None
                },
                if max.numerator > 0 && max.denominator > 0 {
                    Some(max.numerator as f64 / max.denominator as f64)
                } else {
                    None
                },
            )
        });

        let gravity = size_hints
            .win_gravity
            .and_then(|gravity| Gravity::try_from(u32::from(gravity)).ok())
            .unwrap_or_default();

        Some(SizeHints {
            by_user,
            pos,
            min_width: min_width.or(base_width),
            min_height: min_height.or(base_height),
            max_width,
            max_height,
            base_width: base_width.or(min_width),
            base_height: base_height.or(min_height),
            inc_width,
            inc_height,
            min_ratio,
            max_ratio,
            gravity,
        })
    }

    #[inline]
    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.CARDINAL,
            &[
                match state {
                    IcccmWindowState::Withdrawn => 0,
                    IcccmWindowState::Normal => 1,
                    IcccmWindowState::Iconic => 3,
                },
                0,
            ],
        ));
    }

    /// `_NET_WM_STRUT_PARTIAL` takes precedence over `_NET_WM_STRUT`; only
    /// the first four cardinals (left, right, top, bottom) are used.
    fn get_window_strut(
        &self,
        window: Window,
    ) -> Option<Padding> {
        let widths = self
            .get_cardinals(window, self.atoms._NET_WM_STRUT_PARTIAL)
            .or_else(|| self.get_cardinals(window, self.atoms._NET_WM_STRUT))?;

        padding_from_cardinals(&widths)
    }

    #[inline]
    fn set_window_desktop(
        &self,
        window: Window,
        index: usize,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms._NET_WM_DESKTOP,
            self.atoms.CARDINAL,
            &[index as u32],
        ));
    }

    #[inline]
    fn set_window_frame_extents(
        &self,
        window: Window,
        extents: Extents,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms._NET_FRAME_EXTENTS,
            self.atoms.CARDINAL,
            &[
                extents.left as u32,
                extents.right as u32,
                extents.top as u32,
                extents.bottom as u32,
            ],
        ));
    }

    fn init_wm_properties(
        &self,
        wm_name: &str,
        desktop_names: &[&str],
    ) {
        let wm_class = [wm_name, wm_name].join("\0");

        for &window in &[self.check_window, self.screen.root] {
            drop(self.conn.change_property8(
                xproto::PropMode::REPLACE,
                window,
                self.atoms._NET_WM_NAME,
                self.atoms.UTF8_STRING,
                wm_name.as_bytes(),
            ));

            drop(self.conn.change_property8(
                xproto::PropMode::REPLACE,
                window,
                self.atoms.WM_CLASS,
                self.atoms.UTF8_STRING,
                wm_class.as_bytes(),
            ));

            drop(self.conn.change_property32(
                xproto::PropMode::REPLACE,
                window,
                self.atoms._NET_WM_PID,
                self.atoms.CARDINAL,
                &[std::process::id() as u32],
            ));

            drop(self.conn.change_property32(
                xproto::PropMode::REPLACE,
                window,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                self.atoms.WINDOW,
                &[self.check_window],
            ));
        }

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_SUPPORTED,
            self.atoms.ATOM,
            &[
                self.atoms._NET_ACTIVE_WINDOW,
                self.atoms._NET_CLIENT_LIST,
                self.atoms._NET_CURRENT_DESKTOP,
                self.atoms._NET_DESKTOP_NAMES,
                self.atoms._NET_NUMBER_OF_DESKTOPS,
                self.atoms._NET_SUPPORTED,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                self.atoms._NET_WORKAREA,
                self.atoms._NET_FRAME_EXTENTS,
                self.atoms._NET_WM_DESKTOP,
                self.atoms._NET_WM_NAME,
                self.atoms._NET_WM_STRUT,
                self.atoms._NET_WM_STRUT_PARTIAL,
                self.atoms._NET_WM_WINDOW_TYPE,
            ],
        ));

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_CLIENT_LIST),
        );

        self.update_desktops(desktop_names);
    }

    #[inline]
    fn set_current_desktop(
        &self,
        index: usize,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_CURRENT_DESKTOP,
            self.atoms.CARDINAL,
            &[index as u32],
        ));
    }

    #[inline]
    fn update_desktops(
        &self,
        desktop_names: &[&str],
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_NUMBER_OF_DESKTOPS,
            self.atoms.CARDINAL,
            &[desktop_names.len() as u32],
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_DESKTOP_NAMES,
            self.atoms.UTF8_STRING,
            desktop_names.join("\0").as_bytes(),
        ));
    }

    #[inline]
    fn set_workarea(
        &self,
        workareas: &[Region],
    ) {
        let mut areas = Vec::with_capacity(workareas.len() * 4);

        workareas.iter().for_each(|workarea| {
            areas.push(workarea.pos.x as u32);
            areas.push(workarea.pos.y as u32);
            areas.push(workarea.dim.w as u32);
            areas.push(workarea.dim.h as u32);
        });

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_WORKAREA,
            self.atoms.CARDINAL,
            &areas[..],
        ));
    }

    #[inline]
    fn update_client_list(
        &self,
        clients: &[Window],
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_CLIENT_LIST,
            self.atoms.WINDOW,
            clients,
        ));
    }
}

/// Widths past `i32::MAX` are pinned there instead of wrapping negative.
fn padding_from_cardinals(widths: &[u32]) -> Option<Padding> {
    if widths.len() < 4 {
        return None;
    }

    let width = |n: usize| i32::try_from(widths[n]).unwrap_or(i32::MAX);

    Some(Padding::new(width(0), width(1), width(2), width(3)))
}
