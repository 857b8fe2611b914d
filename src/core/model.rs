use crate::buffer::Buffer;
use crate::buffer::BufferKind;
use crate::client::Client;
use crate::config::Config;
use crate::context::Context;
use crate::frame::ButtonKind;
use crate::frame::FrameEnv;
use crate::frame::FrameState;
use crate::frame::WinFrame;
use crate::workspace::Notification;
use crate::workspace::WorkspaceHandler;
use crate::workspace::WorkspaceManager;

use winsys::connection::Connection;
use winsys::event::Event;
use winsys::event::PropertyKind;
use winsys::geometry::Dim;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::Button;
use winsys::input::MouseEvent;
use winsys::input::MouseEventKind;
use winsys::screen::Screen;
use winsys::screen::StrutId;
use winsys::window::IcccmWindowState;
use winsys::window::Window;

use std::collections::HashMap;

fn frame_env<'e>(
    conn: &'e dyn Connection,
    screen: &'e Screen,
    config: &'e Config,
) -> FrameEnv<'e> {
    FrameEnv {
        conn,
        screen,
        theme: &config.theme,
        tabs: config.tab_settings(),
    }
}

fn focus_client(
    env: &FrameEnv,
    client_map: &mut HashMap<Window, Client>,
    focus: &mut Option<Window>,
    window: Window,
) {
    if *focus == Some(window) || !client_map.contains_key(&window) {
        return;
    }

    if let Some(prev) = focus.take() {
        if let Some(client) = client_map.get_mut(&prev) {
            client.frame_mut().set_focus(env, false);
        }
    }

    if let Some(client) = client_map.get_mut(&window) {
        client.frame_mut().set_focus(env, true);
        env.conn.raise_window(client.frame().window());
        env.conn.focus_window(window);
        *focus = Some(window);

        debug!("focused window {:#0x}", window);
    }
}

/// Carries out workspace membership changes on the managed clients.
struct ClientHandler<'m> {
    env: FrameEnv<'m>,
    client_map: &'m mut HashMap<Window, Client>,
    focus: &'m mut Option<Window>,
    suppress_enter: &'m mut bool,
    notifications: Vec<Notification>,
    revert: Option<usize>,
}

impl<'m> WorkspaceHandler for ClientHandler<'m> {
    fn show_window(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get_mut(&window) {
            client.frame_mut().show(&self.env);
            client.set_mapped(true);
            self.env
                .conn
                .set_icccm_window_state(window, IcccmWindowState::Normal);
        }
    }

    fn hide_window(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get_mut(&window) {
            if *self.focus == Some(window) {
                client.frame_mut().set_focus(&self.env, false);
                *self.focus = None;
            }

            client.frame_mut().hide(&self.env);
            client.set_mapped(false);
            self.env
                .conn
                .set_icccm_window_state(window, IcccmWindowState::Iconic);
        }
    }

    fn window_moved(
        &mut self,
        window: Window,
        workspace: usize,
    ) {
        self.env.conn.set_window_desktop(window, workspace);
    }

    fn focus_window(
        &mut self,
        window: Window,
    ) {
        focus_client(&self.env, self.client_map, self.focus, window);
    }

    fn revert_focus(
        &mut self,
        workspace: usize,
    ) {
        self.revert = Some(workspace);
    }

    fn suppress_enter_events(&mut self) {
        *self.suppress_enter = true;
    }

    fn notify(
        &mut self,
        notification: Notification,
    ) {
        if !self.notifications.contains(&notification) {
            self.notifications.push(notification);
        }
    }
}

pub struct Model<'a> {
    conn: &'a dyn Connection,
    config: Config,
    screen: Screen,
    workspaces: WorkspaceManager,
    client_map: HashMap<Window, Client>,
    frame_map: HashMap<Window, Window>,
    unmanaged_struts: HashMap<Window, StrutId>,
    move_buffer: Buffer,
    resize_buffer: Buffer,
    pressed_button: Option<(Window, Window)>,
    focus: Option<Window>,
    suppress_enter: bool,
    running: bool,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        config: Config,
    ) -> Self {
        let mut screen = Screen::new(conn.screen_region(), 0);
        screen.set_full_maximize(config.full_maximize);
        screen.set_strut_config(config.struts.clone());
        screen.init_heads(conn.connected_heads());

        let workspaces = WorkspaceManager::new(0, &config.workspaces, config.opaque_move);

        Self::init(Self {
            conn,
            config,
            screen,
            workspaces,
            client_map: HashMap::new(),
            frame_map: HashMap::new(),
            unmanaged_struts: HashMap::new(),
            move_buffer: Buffer::new(BufferKind::Move),
            resize_buffer: Buffer::new(BufferKind::Resize),
            pressed_button: None,
            focus: None,
            suppress_enter: false,
            running: true,
        })
    }

    fn init(mut model: Self) -> Self {
        info!("initializing window manager");

        model
            .conn
            .init_wm_properties(WM_NAME!(), &model.workspaces.workspace_names());
        model
            .conn
            .set_current_desktop(model.workspaces.current_workspace());
        model.update_workarea();

        for window in model.conn.top_level_windows() {
            model.manage(window, false);

            if let Some(client) = model.client_map.get(&window) {
                client.expect_unmap();
            }
        }

        model
    }

    pub fn run(&mut self) {
        while self.running {
            if let Some(event) = self.conn.step() {
                trace!("received event: {:?}", event);
                self.dispatch(event);
            }

            if !self.conn.flush() {
                error!("lost connection to the display server");
                self.running = false;
            }
        }

        self.exit();
    }

    pub fn dispatch(
        &mut self,
        event: Event,
    ) {
        if let Event::Enter {
            window, ..
        } = event
        {
            self.handle_enter(window);
            return;
        }

        match event {
            Event::Mouse {
                event,
            } => {
                self.suppress_enter = false;
                self.handle_mouse(event);
            },
            Event::MapRequest {
                window,
                ignore,
            } => self.handle_map_request(window, ignore),
            Event::Destroy {
                window,
            } => self.handle_destroy(window),
            Event::Expose {
                window,
                region,
            } => self.handle_expose(window, region),
            Event::Unmap {
                window,
                ignore,
            } => self.handle_unmap(window, ignore),
            Event::WorkspaceRequest {
                window,
                index,
                on_root,
            } => self.handle_workspace_request(window, index, on_root),
            Event::PlacementRequest {
                window,
                pos,
                dim,
                on_root,
            } => self.handle_placement_request(window, pos, dim, on_root),
            Event::Configure {
                window,
                region,
                on_root,
            } => self.handle_configure(window, region, on_root),
            Event::Property {
                window,
                kind,
                on_root,
            } => self.handle_property(window, kind, on_root),
            Event::ScreenChange => self.handle_screen_change(),
            Event::Enter {
                ..
            } => {},
        }
    }

    fn with_handler<T>(
        &mut self,
        f: impl FnOnce(&mut WorkspaceManager, &mut dyn WorkspaceHandler) -> T,
    ) -> T {
        let mut handler = ClientHandler {
            env: frame_env(self.conn, &self.screen, &self.config),
            client_map: &mut self.client_map,
            focus: &mut self.focus,
            suppress_enter: &mut self.suppress_enter,
            notifications: Vec::new(),
            revert: None,
        };

        let result = f(&mut self.workspaces, &mut handler);

        let ClientHandler {
            notifications,
            revert,
            ..
        } = handler;

        self.process_notifications(notifications);

        if let Some(workspace) = revert {
            self.revert_focus(workspace);
        }

        result
    }

    fn process_notifications(
        &mut self,
        notifications: Vec<Notification>,
    ) {
        for notification in notifications {
            debug!("processing notification {:?}", notification);

            match notification {
                Notification::WorkspaceCountChanged(_) => {
                    self.conn
                        .update_desktops(&self.workspaces.workspace_names());
                    self.update_workarea();
                },
                Notification::WorkspaceNamesChanged(_) => {
                    self.conn
                        .update_desktops(&self.workspaces.workspace_names());
                },
                Notification::CurrentWorkspaceChanged(_) => {
                    self.conn
                        .set_current_desktop(self.workspaces.current_workspace());
                },
                Notification::ClientListChanged(_) => {
                    self.conn.update_client_list(&self.workspaces.windows());
                },
                Notification::WorkspaceAreaChanged(_) => self.update_workarea(),
            }
        }
    }

    fn update_workarea(&self) {
        let workarea = self.screen.available_region(0);
        self.conn
            .set_workarea(&vec![workarea; self.workspaces.len()]);
    }

    fn focus_window(
        &mut self,
        window: Window,
    ) {
        let env = frame_env(self.conn, &self.screen, &self.config);
        focus_client(&env, &mut self.client_map, &mut self.focus, window);
    }

    fn unfocus(&mut self) {
        if let Some(prev) = self.focus.take() {
            let env = frame_env(self.conn, &self.screen, &self.config);

            if let Some(client) = self.client_map.get_mut(&prev) {
                client.frame_mut().set_focus(&env, false);
            }
        }

        self.conn.unfocus();
    }

    fn revert_focus(
        &mut self,
        workspace: usize,
    ) {
        if let Some(window) = self.focus {
            if self.workspaces.is_shown(window) {
                return;
            }
        }

        let workspaces = &self.workspaces;
        let target = workspaces.workspace(workspace).and_then(|workspace| {
            workspace
                .windows()
                .iter()
                .rev()
                .copied()
                .find(|&window| workspaces.is_shown(window))
        });

        match target {
            Some(window) => self.focus_window(window),
            None => self.unfocus(),
        }
    }

    fn manage(
        &mut self,
        window: Window,
        ignore: bool,
    ) {
        if ignore {
            debug!("mapping unmanaged window {:#0x}", window);
            self.update_strut(window);
            self.conn.map_window(window);
            return;
        }

        let geometry = match self.conn.get_window_geometry(window) {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!("could not manage window {:#0x}: {}", window, err);
                return;
            },
        };

        let name = self.conn.get_icccm_window_name(window);
        let size_hints = self.conn.get_icccm_window_size_hints(window);
        let transient_for = self.conn.get_icccm_window_transient_for(window);
        let ffm = self.config.focus_follows_mouse;

        let client = {
            let env = frame_env(self.conn, &self.screen, &self.config);
            let mut frame = WinFrame::new(&env, geometry);

            self.conn.init_frame(frame.window(), ffm);
            self.conn.init_window(window, ffm);

            for &kind in &self.config.left_buttons {
                frame.add_left_button(&env, kind);
            }

            for &kind in &self.config.right_buttons {
                frame.add_right_button(&env, kind);
            }

            frame.create_tab(&env, window);
            frame.set_client_window(&env, window);

            let mut client = Client::new(window, frame, name, size_hints, transient_for);
            client.set_size_hints(size_hints);
            client.frame_mut().apply_decorations(&env, false);

            let head = if geometry.pos.is_origin() {
                self.screen.current_head(self.conn.get_pointer_position())
            } else {
                self.screen.head_of(geometry)
            };

            let pos = self.screen.clamp_to_head(head, geometry.pos, geometry.dim);
            client.set_region(&env, Region {
                pos,
                dim: geometry.dim,
            });

            self.conn
                .set_window_frame_extents(window, client.frame().extents());

            client
        };

        for decoration in client.frame().windows() {
            self.frame_map.insert(decoration, window);
        }

        info!("managing client {:#0x} ({})", window, client.name());
        self.client_map.insert(window, client);
        self.update_strut(window);

        let target = transient_for.and_then(|parent| self.workspaces.workspace_of(parent));
        let workspace =
            self.with_handler(|workspaces, h| workspaces.add_window(window, target, transient_for, h));

        self.conn.set_window_desktop(window, workspace);

        if self.workspaces.is_shown(window) {
            self.with_handler(|_, h| {
                h.show_window(window);
                h.focus_window(window);
            });
        } else {
            self.with_handler(|_, h| h.hide_window(window));
        }
    }

    fn unmanage(
        &mut self,
        window: Window,
    ) {
        if let Some(id) = self.unmanaged_struts.remove(&window) {
            self.screen.clear_strut(id);
            self.update_available_area();
        }

        let client = match self.client_map.remove(&window) {
            Some(client) => client,
            None => return,
        };

        info!("unmanaging client {:#0x}", window);

        for decoration in client.frame().windows() {
            self.frame_map.remove(&decoration);
        }

        if let Some(strut) = client.strut() {
            self.screen.clear_strut(strut);
            self.update_available_area();
        }

        if let Some((owner, _)) = self.pressed_button {
            if owner == window {
                self.pressed_button = None;
            }
        }

        for buffer in &[&self.move_buffer, &self.resize_buffer] {
            if buffer.window() == Some(window) {
                buffer.unset();
            }
        }

        self.conn
            .unparent_window(window, client.inner_region().pos);
        self.conn
            .set_icccm_window_state(window, IcccmWindowState::Withdrawn);

        let env = frame_env(self.conn, &self.screen, &self.config);
        client.into_frame().destroy(&env);

        if self.focus == Some(window) {
            self.focus = None;
        }

        let current = self.workspaces.current_workspace();
        self.with_handler(|workspaces, h| {
            workspaces.remove_window(window, h);
            h.revert_focus(current);
        });
    }

    fn update_strut(
        &mut self,
        window: Window,
    ) {
        let region = match self.client_map.get(&window) {
            Some(client) => Some(client.frame().region()),
            None => self.conn.get_window_geometry(window).ok(),
        };

        let head = region.map_or(0, |region| self.screen.head_of(region));
        let strut = self
            .conn
            .get_window_strut(window)
            .and_then(|padding| self.screen.request_strut(head, padding));

        let previous = match self.client_map.get_mut(&window) {
            Some(client) => client.set_strut(strut),
            None => match strut {
                Some(strut) => self.unmanaged_struts.insert(window, strut),
                None => self.unmanaged_struts.remove(&window),
            },
        };

        if let Some(previous) = previous {
            self.screen.clear_strut(previous);
        }

        if strut.is_some() || previous.is_some() {
            debug!("strut of window {:#0x} is now {:?}", window, strut);
            self.update_available_area();
        }
    }

    fn update_available_area(&mut self) {
        if !self.screen.update_available_area() {
            return;
        }

        self.reapply_maximized();
        self.process_notifications(vec![Notification::WorkspaceAreaChanged(
            self.screen.number(),
        )]);
    }

    fn reapply_maximized(&mut self) {
        let env = frame_env(self.conn, &self.screen, &self.config);

        for client in self.client_map.values_mut() {
            let state = client.frame().state();

            if state.is_maximized() || state.fullscreen {
                client.frame_mut().apply_state(&env);
            }
        }
    }

    fn handle_map_request(
        &mut self,
        window: Window,
        ignore: bool,
    ) {
        debug!("MAP_REQUEST for window {:#0x}", window);

        if self.client_map.contains_key(&window) {
            if self.workspaces.is_iconic(window) {
                self.with_handler(|workspaces, h| {
                    if workspaces.deiconify(window, h) {
                        h.focus_window(window);
                    }
                });
            }

            return;
        }

        self.manage(window, ignore);
    }

    fn handle_unmap(
        &mut self,
        window: Window,
        ignore: bool,
    ) {
        debug!("UNMAP for window {:#0x}", window);

        if ignore {
            return;
        }

        if let Some(client) = self.client_map.get(&window) {
            if client.consume_unmap_if_expecting() {
                return;
            }
        }

        self.unmanage(window);
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) {
        debug!("DESTROY for window {:#0x}", window);
        self.unmanage(window);
    }

    fn handle_expose(
        &mut self,
        window: Window,
        region: Region,
    ) {
        let env = frame_env(self.conn, &self.screen, &self.config);

        if let Some(client) = self
            .frame_map
            .get(&window)
            .and_then(|owner| self.client_map.get(owner))
        {
            client.frame().expose(&env, window, region);
        }
    }

    fn handle_enter(
        &mut self,
        window: Window,
    ) {
        if self.suppress_enter {
            debug!("suppressed ENTER for window {:#0x}", window);
            return;
        }

        if !self.config.focus_follows_mouse || self.move_buffer.is_occupied() {
            return;
        }

        let owner = self.frame_map.get(&window).copied().unwrap_or(window);
        self.focus_window(owner);
    }

    fn handle_mouse(
        &mut self,
        event: MouseEvent,
    ) {
        match event.kind {
            MouseEventKind::Press => self.handle_press(event),
            MouseEventKind::Motion => self.handle_motion(event.root_rpos),
            MouseEventKind::Release => self.handle_release(event),
        }
    }

    fn owner_of(
        &self,
        window: Window,
    ) -> Option<Window> {
        if self.client_map.contains_key(&window) {
            return Some(window);
        }

        self.frame_map.get(&window).copied()
    }

    fn handle_press(
        &mut self,
        event: MouseEvent,
    ) {
        let owner = match self.owner_of(event.window) {
            Some(owner) => owner,
            None => {
                if event.is_scroll() {
                    self.handle_root_scroll(event.button);
                }

                return;
            },
        };

        debug!("BUTTON_PRESS for window {:#0x} on {:#0x}", owner, event.window);
        self.focus_window(owner);

        if event.button != Some(Button::Left) {
            return;
        }

        let env = frame_env(self.conn, &self.screen, &self.config);
        let client = match self.client_map.get_mut(&owner) {
            Some(client) => client,
            None => return,
        };

        let frame = client.frame_mut();

        if frame.set_button_pressed(&env, event.window, true).is_some() {
            self.pressed_button = Some((owner, event.window));
            return;
        }

        let pos = event.root_rpos;
        let context = frame.get_context(event.window, pos, pos, true);
        let region = frame.region();

        if context.on_grip() {
            self.resize_buffer.set(owner, context, pos, region);
        } else if context.intersects(Context::ON_TITLEBAR | Context::ON_TAB) {
            self.move_buffer.set(owner, context, pos, region);
            self.workspaces.set_moving(Some(owner));
        }
    }

    fn handle_root_scroll(
        &mut self,
        button: Option<Button>,
    ) {
        let result = match button {
            Some(Button::ScrollUp) => self.with_handler(|workspaces, h| workspaces.prev_workspace(1, h)),
            Some(Button::ScrollDown) => self.with_handler(|workspaces, h| workspaces.next_workspace(1, h)),
            _ => return,
        };

        if let Err(err) = result {
            debug!("workspace scroll had no effect: {:?}", err);
        }
    }

    fn handle_motion(
        &mut self,
        pos: Pos,
    ) {
        if self.move_buffer.is_occupied() {
            self.handle_move(pos);
        } else if self.resize_buffer.is_occupied() {
            self.handle_resize(pos);
        }
    }

    fn handle_move(
        &mut self,
        pos: Pos,
    ) {
        let window = match self.move_buffer.window() {
            Some(window) => window,
            None => return,
        };

        let region = match self.move_buffer.target_region(pos, Dim::default()) {
            Some(region) => region,
            None => return,
        };

        let env = frame_env(self.conn, &self.screen, &self.config);

        if let Some(client) = self.client_map.get_mut(&window) {
            client.frame_mut().move_to(&env, region.pos);
        }
    }

    fn handle_resize(
        &mut self,
        pos: Pos,
    ) {
        let window = match self.resize_buffer.window() {
            Some(window) => window,
            None => return,
        };

        let env = frame_env(self.conn, &self.screen, &self.config);
        let client = match self.client_map.get_mut(&window) {
            Some(client) => client,
            None => return,
        };

        let frame = client.frame_mut();
        let min_dim = Dim {
            w: Client::MIN_CLIENT_DIM.w,
            h: Client::MIN_CLIENT_DIM.h + frame.titlebar_height() + frame.handle_height(),
        };

        let mut region = match self.resize_buffer.target_region(pos, min_dim) {
            Some(region) => region,
            None => return,
        };

        let right = region.right();
        frame.apply_size_hints(&mut region.dim);

        if self.resize_buffer.context().contains(Context::ON_LEFTGRIP) {
            region.pos.x = right - region.dim.w;
        }

        frame.move_resize(&env, region, true, true, false);
    }

    fn handle_release(
        &mut self,
        event: MouseEvent,
    ) {
        if let Some(window) = self.move_buffer.window() {
            debug!("stopped moving window {:#0x}", window);
            self.move_buffer.unset();
            self.workspaces.set_moving(None);
            return;
        }

        if let Some(window) = self.resize_buffer.window() {
            debug!("stopped resizing window {:#0x}", window);
            self.resize_buffer.unset();
            return;
        }

        if let Some((owner, button)) = self.pressed_button.take() {
            let env = frame_env(self.conn, &self.screen, &self.config);
            let kind = self
                .client_map
                .get_mut(&owner)
                .and_then(|client| client.frame_mut().set_button_pressed(&env, button, false));

            if let Some(kind) = kind {
                if event.window == button {
                    self.activate_button(owner, kind);
                }
            }
        }
    }

    fn activate_button(
        &mut self,
        window: Window,
        kind: ButtonKind,
    ) {
        debug!("activating {:?} button of window {:#0x}", kind, window);

        match kind {
            ButtonKind::Stick => {
                if !self.workspaces.unstick(window) {
                    self.with_handler(|workspaces, h| workspaces.stick(window, h));
                }
            },
            ButtonKind::Shade => self.toggle_state(window, |state| {
                state.shaded = !state.shaded;
            }),
            ButtonKind::Maximize => self.toggle_state(window, |state| {
                let maximize = !state.is_maximized();
                state.maximized_vert = maximize;
                state.maximized_horz = maximize;
            }),
            ButtonKind::Iconify => {
                self.with_handler(|workspaces, h| workspaces.iconify(window, h));
            },
        }
    }

    fn toggle_state(
        &mut self,
        window: Window,
        toggle: impl FnOnce(&mut FrameState),
    ) {
        let env = frame_env(self.conn, &self.screen, &self.config);

        if let Some(client) = self.client_map.get_mut(&window) {
            toggle(client.frame_mut().state_mut());
            client.frame_mut().apply_state(&env);
        }
    }

    fn handle_workspace_request(
        &mut self,
        window: Option<Window>,
        index: usize,
        _on_root: bool,
    ) {
        debug!("WORKSPACE_REQUEST for workspace {} by {:?}", index, window);

        let result = match window {
            Some(window) if self.client_map.contains_key(&window) => self
                .with_handler(|workspaces, h| workspaces.send_to_workspace(index, window, false, h)),
            Some(_) => return,
            None => self.with_handler(|workspaces, h| workspaces.change_workspace(index, true, h)),
        };

        if let Err(err) = result {
            debug!("workspace request for {} had no effect: {:?}", index, err);
        }
    }

    fn handle_placement_request(
        &mut self,
        window: Window,
        pos: Option<Pos>,
        dim: Option<Dim>,
        _on_root: bool,
    ) {
        debug!("PLACEMENT_REQUEST for window {:#0x}", window);

        let env = frame_env(self.conn, &self.screen, &self.config);

        if let Some(client) = self.client_map.get_mut(&window) {
            let mut region = client.inner_region();

            if let Some(pos) = pos {
                region.pos = pos;
            }

            if let Some(dim) = dim {
                region.dim = dim;
            }

            client.set_region(&env, region);
            return;
        }

        if let Ok(mut region) = self.conn.get_window_geometry(window) {
            if let Some(pos) = pos {
                region.pos = pos;
            }

            if let Some(dim) = dim {
                region.dim = dim;
            }

            self.conn.place_window(window, &region);
        }
    }

    fn handle_configure(
        &mut self,
        window: Window,
        region: Region,
        on_root: bool,
    ) {
        if on_root {
            if self.screen.full_region() != region {
                self.screen.set_full_region(region);
                self.handle_screen_change();
            }

            return;
        }

        let owner = match self.frame_map.get(&window) {
            Some(&owner) => owner,
            None => return,
        };

        let env = frame_env(self.conn, &self.screen, &self.config);

        if let Some(client) = self.client_map.get_mut(&owner) {
            client.frame_mut().handle_configure(&env, window, region);
        }
    }

    fn handle_property(
        &mut self,
        window: Window,
        kind: PropertyKind,
        _on_root: bool,
    ) {
        debug!("PROPERTY {:?} for window {:#0x}", kind, window);

        match kind {
            PropertyKind::Name => {
                let name = self.conn.get_icccm_window_name(window);

                if let Some(client) = self.client_map.get_mut(&window) {
                    client.set_name(name);
                }
            },
            PropertyKind::Size => {
                let size_hints = self.conn.get_icccm_window_size_hints(window);

                if let Some(client) = self.client_map.get_mut(&window) {
                    client.set_size_hints(size_hints);
                }
            },
            PropertyKind::Strut => self.update_strut(window),
        }
    }

    fn handle_screen_change(&mut self) {
        info!("screen layout changed");

        self.screen.set_full_region(self.conn.screen_region());
        self.screen.init_heads(self.conn.connected_heads());
        debug!("heads: {:?}", self.screen.head_regions());

        let env = frame_env(self.conn, &self.screen, &self.config);

        for client in self.client_map.values_mut() {
            let region = client.frame().region();

            if let Some(head) = self.screen.relocation_head(region) {
                let pos = self.screen.clamp_to_head(head, region.pos, region.dim);
                debug!("relocating window {:#0x} to head {}", client.window(), head);
                client.frame_mut().move_to(&env, pos);
            }
        }

        self.reapply_maximized();
        self.update_workarea();
    }

    fn exit(&mut self) {
        info!("exit called, shutting down {}", WM_NAME!());

        let env = frame_env(self.conn, &self.screen, &self.config);

        for (window, client) in self.client_map.drain() {
            self.conn
                .unparent_window(window, client.inner_region().pos);
            client.into_frame().destroy(&env);
        }

        self.frame_map.clear();
        self.conn.cleanup();
        self.conn.flush();
    }
}
