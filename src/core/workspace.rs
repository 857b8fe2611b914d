use crate::error::StateChangeError;

use winsys::window::Window;

use std::collections::HashMap;
use std::collections::HashSet;

/// Outbound signals, each carrying the number of the screen they concern.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Notification {
    WorkspaceCountChanged(usize),
    CurrentWorkspaceChanged(usize),
    WorkspaceNamesChanged(usize),
    ClientListChanged(usize),
    WorkspaceAreaChanged(usize),
}

/// The side effects of membership changes, carried out by whoever owns the
/// windows.
pub trait WorkspaceHandler {
    fn show_window(
        &mut self,
        window: Window,
    );
    fn hide_window(
        &mut self,
        window: Window,
    );
    fn window_moved(
        &mut self,
        window: Window,
        workspace: usize,
    );
    fn focus_window(
        &mut self,
        window: Window,
    );
    fn revert_focus(
        &mut self,
        workspace: usize,
    );
    fn suppress_enter_events(&mut self);
    fn notify(
        &mut self,
        notification: Notification,
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: usize,
    name: String,
    windows: Vec<Window>,
}

impl Workspace {
    pub fn new(
        id: usize,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            windows: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.windows.contains(&window)
    }

    fn add_window(
        &mut self,
        window: Window,
    ) {
        if !self.contains(window) {
            self.windows.push(window);
        }
    }

    fn remove_window(
        &mut self,
        window: Window,
    ) -> bool {
        match self.windows.iter().position(|&w| w == window) {
            Some(index) => {
                self.windows.remove(index);
                true
            },
            None => false,
        }
    }
}

/// The ordered workspaces of one screen and the windows assigned to them.
///
/// Every managed window is listed by exactly one workspace. Stuck windows
/// are carried along to whichever workspace becomes current, and iconic
/// windows stay listed but are never shown.
pub struct WorkspaceManager {
    screen: usize,
    workspaces: Vec<Workspace>,
    names: Vec<String>,
    current: usize,
    former: Option<usize>,
    membership: HashMap<Window, usize>,
    stuck: HashSet<Window>,
    iconic: HashSet<Window>,
    transients: HashMap<Window, Vec<Window>>,
    opaque_move: bool,
    moving: Option<Window>,
}

impl WorkspaceManager {
    pub fn new(
        screen: usize,
        names: &[String],
        opaque_move: bool,
    ) -> Self {
        let mut names = names.to_vec();

        if names.is_empty() {
            names.push(Self::default_name(0));
        }

        let workspaces = names
            .iter()
            .enumerate()
            .map(|(id, name)| Workspace::new(id, name.as_str()))
            .collect();

        Self {
            screen,
            workspaces,
            names,
            current: 0,
            former: None,
            membership: HashMap::new(),
            stuck: HashSet::new(),
            iconic: HashSet::new(),
            transients: HashMap::new(),
            opaque_move,
            moving: None,
        }
    }

    fn default_name(id: usize) -> String {
        format!("{}", id + 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    #[inline]
    pub fn current_workspace(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn former_workspace(&self) -> Option<usize> {
        self.former
    }

    #[inline]
    pub fn workspace(
        &self,
        id: usize,
    ) -> Option<&Workspace> {
        self.workspaces.get(id)
    }

    #[inline]
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn workspace_names(&self) -> Vec<&str> {
        self.workspaces.iter().map(Workspace::name).collect()
    }

    #[inline]
    pub fn workspace_of(
        &self,
        window: Window,
    ) -> Option<usize> {
        self.membership.get(&window).copied()
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.membership.contains_key(&window)
    }

    #[inline]
    pub fn is_stuck(
        &self,
        window: Window,
    ) -> bool {
        self.stuck.contains(&window)
    }

    #[inline]
    pub fn is_iconic(
        &self,
        window: Window,
    ) -> bool {
        self.iconic.contains(&window)
    }

    /// Whether `window` belongs on screen right now.
    pub fn is_shown(
        &self,
        window: Window,
    ) -> bool {
        self.workspace_of(window) == Some(self.current) && !self.is_iconic(window)
    }

    /// Every managed window, workspace by workspace.
    pub fn windows(&self) -> Vec<Window> {
        self.workspaces
            .iter()
            .flat_map(|workspace| workspace.windows.iter().copied())
            .collect()
    }

    #[inline]
    pub fn moving(&self) -> Option<Window> {
        self.moving
    }

    #[inline]
    pub fn set_moving(
        &mut self,
        moving: Option<Window>,
    ) {
        self.moving = moving;
    }

    #[inline]
    pub fn set_opaque_move(
        &mut self,
        opaque_move: bool,
    ) {
        self.opaque_move = opaque_move;
    }

    /// Appends a workspace, named after its slot if that slot was named
    /// before. Returns the new workspace count.
    pub fn add_workspace(
        &mut self,
        h: &mut dyn WorkspaceHandler,
    ) -> usize {
        let id = self.workspaces.len();
        let name = match self.names.get(id) {
            Some(name) => name.clone(),
            None => {
                let name = Self::default_name(id);
                self.names.push(name.clone());
                h.notify(Notification::WorkspaceNamesChanged(self.screen));
                name
            },
        };

        info!("adding workspace {} ({})", id, name);
        self.workspaces.push(Workspace::new(id, name));
        h.notify(Notification::WorkspaceCountChanged(self.screen));

        self.workspaces.len()
    }

    /// Removes the last workspace, moving its windows to the one before it.
    /// Returns the new workspace count, or 0 if only one workspace is left.
    pub fn remove_last_workspace(
        &mut self,
        h: &mut dyn WorkspaceHandler,
    ) -> usize {
        if self.workspaces.len() <= 1 {
            warn!("refusing to remove the only workspace");
            return 0;
        }

        let last = self.workspaces.len() - 1;
        let target = last - 1;

        if self.current == last {
            let _ = self.change_workspace(target, false, h);
        }

        if self.former == Some(last) {
            self.former = None;
        }

        for window in self.workspaces[last].windows.clone() {
            self.move_membership(window, target, h);
            self.sync_visibility(window, h);
        }

        h.notify(Notification::ClientListChanged(self.screen));

        // dropped only once every window has left it
        let removed = self.workspaces.pop();
        h.notify(Notification::WorkspaceCountChanged(self.screen));

        if let Some(removed) = removed {
            info!("removed workspace {} ({})", removed.id, removed.name);
        }

        self.workspaces.len()
    }

    /// Grows or shrinks the workspace list to `count`, which is at least 1.
    pub fn sync_workspace_count(
        &mut self,
        count: usize,
        h: &mut dyn WorkspaceHandler,
    ) {
        let count = std::cmp::max(1, count);

        while self.workspaces.len() < count {
            self.add_workspace(h);
        }

        while self.workspaces.len() > count {
            self.remove_last_workspace(h);
        }
    }

    pub fn set_workspace_name(
        &mut self,
        id: usize,
        name: &str,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        let workspace = self
            .workspaces
            .get_mut(id)
            .ok_or(StateChangeError::InvalidIndex)?;

        if workspace.name == name {
            return Err(StateChangeError::StateUnchanged);
        }

        workspace.name = name.to_owned();

        while self.names.len() <= id {
            self.names.push(Self::default_name(self.names.len()));
        }

        self.names[id] = name.to_owned();
        h.notify(Notification::WorkspaceNamesChanged(self.screen));

        Ok(())
    }

    /// Makes workspace `id` current. Its windows are shown before those of
    /// the previous workspace are hidden.
    pub fn change_workspace(
        &mut self,
        id: usize,
        revert: bool,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        if id >= self.workspaces.len() {
            warn!("attempted to activate nonexistent workspace {}", id);
            return Err(StateChangeError::InvalidIndex);
        }

        if id == self.current {
            return Err(StateChangeError::StateUnchanged);
        }

        let old = self.current;
        self.former = Some(old);

        h.suppress_enter_events();

        let moving = if self.opaque_move {
            self.moving
        } else {
            None
        };

        if let Some(window) = moving {
            if self.contains(window) {
                self.move_membership(window, id, h);
            }
        }

        self.current = id;

        for window in self.workspaces[id].windows.clone() {
            if !self.is_iconic(window) {
                h.show_window(window);
            }
        }

        let stuck: Vec<Window> = self.workspaces[old]
            .windows
            .iter()
            .copied()
            .filter(|window| self.stuck.contains(window))
            .collect();

        for window in stuck {
            self.move_membership(window, id, h);
        }

        match moving {
            Some(window) => h.focus_window(window),
            None if revert => h.revert_focus(id),
            None => {},
        }

        for window in self.workspaces[old].windows.clone() {
            if !self.is_iconic(window) {
                h.hide_window(window);
            }
        }

        info!("activated workspace {}", id);
        h.notify(Notification::CurrentWorkspaceChanged(self.screen));

        Ok(())
    }

    /// Moves `window` and its transients to workspace `id`, optionally
    /// following them there.
    pub fn send_to_workspace(
        &mut self,
        id: usize,
        window: Window,
        change: bool,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        if id >= self.workspaces.len() {
            warn!("attempted to send window {:#0x} to nonexistent workspace {}", window, id);
            return Err(StateChangeError::InvalidIndex);
        }

        if !self.contains(window) {
            return Err(StateChangeError::InvalidCaller);
        }

        if self.is_stuck(window) {
            return Err(StateChangeError::StateUnchanged);
        }

        for window in self.transient_tree(window) {
            if self.is_stuck(window) {
                continue;
            }

            self.reassociate(window, id, true, h);

            if change && id != self.current {
                let _ = self.change_workspace(id, false, h);
            }

            if id == self.current && !self.is_iconic(window) {
                h.show_window(window);
            } else {
                h.hide_window(window);
                h.revert_focus(self.current);
            }
        }

        Ok(())
    }

    /// Transfers `window` to workspace `id`, clamping an unknown `id` to the
    /// current workspace. Stuck windows stay put unless `ignore_sticky` is
    /// set. Returns whether the window moved.
    pub fn reassociate(
        &mut self,
        window: Window,
        id: usize,
        ignore_sticky: bool,
        h: &mut dyn WorkspaceHandler,
    ) -> bool {
        let id = if id >= self.workspaces.len() {
            self.current
        } else {
            id
        };

        match self.workspace_of(window) {
            Some(from) if from == id => false,
            Some(_) => {
                if self.is_iconic(window) || ignore_sticky || !self.is_stuck(window) {
                    self.move_membership(window, id, h);
                    true
                } else {
                    false
                }
            },
            None => false,
        }
    }

    /// Switches `delta` workspaces forward, wrapping around; a `delta` of 0
    /// returns to the former workspace.
    pub fn next_workspace(
        &mut self,
        delta: usize,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        let target = if delta == 0 {
            self.former.ok_or(StateChangeError::StateUnchanged)?
        } else {
            (self.current + delta) % self.workspaces.len()
        };

        self.change_workspace(target, true, h)
    }

    pub fn prev_workspace(
        &mut self,
        delta: usize,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        let count = self.workspaces.len();
        let target = if delta == 0 {
            self.former.ok_or(StateChangeError::StateUnchanged)?
        } else {
            (count + self.current - delta % count) % count
        };

        self.change_workspace(target, true, h)
    }

    /// Switches `delta` workspaces forward without wrapping.
    pub fn right_workspace(
        &mut self,
        delta: usize,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        if self.current + delta >= self.workspaces.len() {
            return Err(StateChangeError::LimitReached);
        }

        self.change_workspace(self.current + delta, true, h)
    }

    pub fn left_workspace(
        &mut self,
        delta: usize,
        h: &mut dyn WorkspaceHandler,
    ) -> Result<(), StateChangeError> {
        if self.current < delta {
            return Err(StateChangeError::LimitReached);
        }

        self.change_workspace(self.current - delta, true, h)
    }

    /// Starts tracking `window` on workspace `id`, or on the current one.
    /// Returns the workspace it ended up on.
    pub fn add_window(
        &mut self,
        window: Window,
        id: Option<usize>,
        transient_for: Option<Window>,
        h: &mut dyn WorkspaceHandler,
    ) -> usize {
        if let Some(id) = self.workspace_of(window) {
            return id;
        }

        let id = match id {
            Some(id) if id < self.workspaces.len() => id,
            _ => self.current,
        };

        self.workspaces[id].add_window(window);
        self.membership.insert(window, id);

        if let Some(parent) = transient_for {
            if parent != window {
                self.transients.entry(parent).or_default().push(window);
            }
        }

        debug!("window {:#0x} added to workspace {}", window, id);
        h.notify(Notification::ClientListChanged(self.screen));

        id
    }

    pub fn remove_window(
        &mut self,
        window: Window,
        h: &mut dyn WorkspaceHandler,
    ) -> Option<usize> {
        let id = self.membership.remove(&window)?;

        self.workspaces[id].remove_window(window);
        self.stuck.remove(&window);
        self.iconic.remove(&window);
        self.transients.remove(&window);

        for children in self.transients.values_mut() {
            children.retain(|&child| child != window);
        }

        if self.moving == Some(window) {
            self.moving = None;
        }

        debug!("window {:#0x} removed from workspace {}", window, id);
        h.notify(Notification::ClientListChanged(self.screen));

        Some(id)
    }

    pub fn iconify(
        &mut self,
        window: Window,
        h: &mut dyn WorkspaceHandler,
    ) -> bool {
        if !self.contains(window) || !self.iconic.insert(window) {
            return false;
        }

        h.hide_window(window);
        h.revert_focus(self.current);

        true
    }

    /// Brings an iconic window back, onto the current workspace.
    pub fn deiconify(
        &mut self,
        window: Window,
        h: &mut dyn WorkspaceHandler,
    ) -> bool {
        if !self.iconic.remove(&window) {
            return false;
        }

        let current = self.current;

        if self.workspace_of(window) != Some(current) {
            self.move_membership(window, current, h);
        }

        h.show_window(window);
        true
    }

    pub fn stick(
        &mut self,
        window: Window,
        h: &mut dyn WorkspaceHandler,
    ) -> bool {
        if !self.contains(window) || !self.stuck.insert(window) {
            return false;
        }

        let current = self.current;

        if self.workspace_of(window) != Some(current) {
            self.move_membership(window, current, h);
            self.sync_visibility(window, h);
        }

        true
    }

    #[inline]
    pub fn unstick(
        &mut self,
        window: Window,
    ) -> bool {
        self.stuck.remove(&window)
    }

    fn move_membership(
        &mut self,
        window: Window,
        to: usize,
        h: &mut dyn WorkspaceHandler,
    ) {
        if let Some(from) = self.membership.insert(window, to) {
            self.workspaces[from].remove_window(window);
        }

        self.workspaces[to].add_window(window);
        h.window_moved(window, to);
    }

    fn sync_visibility(
        &self,
        window: Window,
        h: &mut dyn WorkspaceHandler,
    ) {
        if self.is_shown(window) {
            h.show_window(window);
        } else {
            h.hide_window(window);
        }
    }

    /// `window` followed by its transients, each listed once.
    fn transient_tree(
        &self,
        window: Window,
    ) -> Vec<Window> {
        let mut seen = HashSet::new();
        let mut tree = Vec::new();
        let mut pending = vec![window];

        while let Some(window) = pending.pop() {
            if !seen.insert(window) {
                continue;
            }

            tree.push(window);

            if let Some(children) = self.transients.get(&window) {
                pending.extend(children.iter().rev().copied());
            }
        }

        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum Record {
        Show(Window),
        Hide(Window),
        Moved(Window, usize),
        Focus(Window),
        Revert(usize),
        Suppress,
        Notify(Notification),
    }

    #[derive(Default)]
    struct Recorder {
        records: Vec<Record>,
    }

    impl Recorder {
        fn position(
            &self,
            record: Record,
        ) -> Option<usize> {
            self.records.iter().position(|&r| r == record)
        }

        fn count(
            &self,
            record: Record,
        ) -> usize {
            self.records.iter().filter(|&&r| r == record).count()
        }
    }

    impl WorkspaceHandler for Recorder {
        fn show_window(
            &mut self,
            window: Window,
        ) {
            self.records.push(Record::Show(window));
        }

        fn hide_window(
            &mut self,
            window: Window,
        ) {
            self.records.push(Record::Hide(window));
        }

        fn window_moved(
            &mut self,
            window: Window,
            workspace: usize,
        ) {
            self.records.push(Record::Moved(window, workspace));
        }

        fn focus_window(
            &mut self,
            window: Window,
        ) {
            self.records.push(Record::Focus(window));
        }

        fn revert_focus(
            &mut self,
            workspace: usize,
        ) {
            self.records.push(Record::Revert(workspace));
        }

        fn suppress_enter_events(&mut self) {
            self.records.push(Record::Suppress);
        }

        fn notify(
            &mut self,
            notification: Notification,
        ) {
            self.records.push(Record::Notify(notification));
        }
    }

    fn manager(count: usize) -> WorkspaceManager {
        let names: Vec<String> = (1..=count).map(|i| i.to_string()).collect();
        WorkspaceManager::new(0, &names, true)
    }

    fn assert_exclusive(manager: &WorkspaceManager) {
        for window in manager.windows() {
            let holders = manager
                .workspaces()
                .iter()
                .filter(|workspace| workspace.contains(window))
                .count();

            assert_eq!(holders, 1, "window {:#0x} listed {} times", window, holders);
        }
    }

    #[test]
    fn switching_notifies_exactly_once() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        assert_eq!(manager.change_workspace(1, false, &mut h), Ok(()));
        assert_eq!(manager.current_workspace(), 1);
        assert_eq!(manager.former_workspace(), Some(0));
        assert_eq!(
            h.count(Record::Notify(Notification::CurrentWorkspaceChanged(0))),
            1
        );
    }

    #[test]
    fn invalid_switches_do_nothing() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        assert_eq!(
            manager.change_workspace(2, false, &mut h),
            Err(StateChangeError::InvalidIndex)
        );
        assert_eq!(
            manager.change_workspace(0, false, &mut h),
            Err(StateChangeError::StateUnchanged)
        );
        assert!(h.records.is_empty());
        assert_eq!(manager.current_workspace(), 0);
    }

    #[test]
    fn new_windows_are_shown_before_old_ones_are_hidden() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(0), None, &mut h);
        manager.add_window(0xb, Some(1), None, &mut h);
        h.records.clear();

        manager.change_workspace(1, true, &mut h).unwrap();

        let suppress = h.position(Record::Suppress).unwrap();
        let show = h.position(Record::Show(0xb)).unwrap();
        let hide = h.position(Record::Hide(0xa)).unwrap();
        let notify = h
            .position(Record::Notify(Notification::CurrentWorkspaceChanged(0)))
            .unwrap();

        assert!(suppress < show);
        assert!(show < hide);
        assert!(hide < notify);
        assert!(h.position(Record::Revert(1)).is_some());
    }

    #[test]
    fn last_workspace_cannot_be_removed() {
        let mut manager = manager(1);
        let mut h = Recorder::default();

        assert_eq!(manager.remove_last_workspace(&mut h), 0);
        assert_eq!(manager.len(), 1);
        assert!(h.records.is_empty());
    }

    #[test]
    fn removing_current_workspace_moves_everything_back() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(2), None, &mut h);
        manager.add_window(0xb, Some(2), None, &mut h);
        manager.change_workspace(2, false, &mut h).unwrap();
        manager.iconify(0xb, &mut h);
        h.records.clear();

        assert_eq!(manager.remove_last_workspace(&mut h), 2);
        assert_eq!(manager.current_workspace(), 1);
        assert_eq!(manager.former_workspace(), None);
        assert_eq!(manager.workspace_of(0xa), Some(1));
        assert_eq!(manager.workspace_of(0xb), Some(1));
        assert!(manager.is_iconic(0xb));
        assert!(h.position(Record::Show(0xa)).is_some());
        assert_exclusive(&manager);

        let client_list = h
            .position(Record::Notify(Notification::ClientListChanged(0)))
            .unwrap();
        let count = h
            .position(Record::Notify(Notification::WorkspaceCountChanged(0)))
            .unwrap();

        assert!(client_list < count);
    }

    #[test]
    fn windows_stay_in_exactly_one_workspace() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        for window in 1..=6 {
            manager.add_window(window, Some(window as usize % 3), None, &mut h);
        }

        manager.send_to_workspace(2, 1, false, &mut h).unwrap();
        manager.send_to_workspace(0, 2, true, &mut h).unwrap();
        manager.reassociate(3, 1, false, &mut h);
        manager.next_workspace(1, &mut h).unwrap();
        manager.remove_window(4, &mut h);

        assert_exclusive(&manager);
        assert_eq!(manager.windows().len(), 5);
        assert_eq!(manager.workspace_of(1), Some(2));
        assert_eq!(manager.workspace_of(4), None);
    }

    #[test]
    fn sending_away_hides_and_following_shows() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        manager.add_window(0xa, None, None, &mut h);
        h.records.clear();

        manager.send_to_workspace(1, 0xa, false, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 0);
        assert!(h.position(Record::Hide(0xa)).is_some());

        h.records.clear();
        manager.send_to_workspace(2, 0xa, true, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 2);
        assert!(h.position(Record::Show(0xa)).is_some());

        assert_eq!(
            manager.send_to_workspace(5, 0xa, false, &mut h),
            Err(StateChangeError::InvalidIndex)
        );
        assert_eq!(
            manager.send_to_workspace(0, 0xdead, false, &mut h),
            Err(StateChangeError::InvalidCaller)
        );
    }

    #[test]
    fn stuck_windows_follow_the_current_workspace() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(0), None, &mut h);
        assert!(manager.stick(0xa, &mut h));
        h.records.clear();

        manager.change_workspace(2, false, &mut h).unwrap();

        assert_eq!(manager.workspace_of(0xa), Some(2));
        assert!(manager.is_shown(0xa));
        assert_eq!(h.position(Record::Hide(0xa)), None);
        assert!(!manager.workspace(0).unwrap().contains(0xa));
        assert_exclusive(&manager);

        assert_eq!(
            manager.send_to_workspace(1, 0xa, false, &mut h),
            Err(StateChangeError::StateUnchanged)
        );
        assert!(!manager.reassociate(0xa, 1, false, &mut h));

        assert!(manager.unstick(0xa));
        assert!(manager.reassociate(0xa, 1, false, &mut h));
    }

    #[test]
    fn navigation_wraps_or_stops() {
        let mut manager = manager(4);
        let mut h = Recorder::default();

        assert_eq!(
            manager.next_workspace(0, &mut h),
            Err(StateChangeError::StateUnchanged)
        );

        manager.prev_workspace(1, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 3);

        manager.next_workspace(1, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 0);

        manager.next_workspace(0, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 3);

        manager.prev_workspace(6, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 1);

        assert_eq!(
            manager.right_workspace(3, &mut h),
            Err(StateChangeError::LimitReached)
        );
        manager.right_workspace(2, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 3);

        assert_eq!(
            manager.left_workspace(4, &mut h),
            Err(StateChangeError::LimitReached)
        );
        manager.left_workspace(1, &mut h).unwrap();
        assert_eq!(manager.current_workspace(), 2);
    }

    #[test]
    fn transients_travel_with_their_parent() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(0), None, &mut h);
        manager.add_window(0xb, Some(0), Some(0xa), &mut h);
        manager.add_window(0xc, Some(1), Some(0xb), &mut h);

        manager.send_to_workspace(2, 0xa, false, &mut h).unwrap();

        assert_eq!(manager.workspace_of(0xa), Some(2));
        assert_eq!(manager.workspace_of(0xb), Some(2));
        assert_eq!(manager.workspace_of(0xc), Some(2));
    }

    #[test]
    fn added_workspaces_reuse_name_slots() {
        let names = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let mut manager = WorkspaceManager::new(0, &names, true);
        let mut h = Recorder::default();

        assert_eq!(manager.remove_last_workspace(&mut h), 2);
        h.records.clear();

        assert_eq!(manager.add_workspace(&mut h), 3);
        assert_eq!(manager.workspace(2).unwrap().name(), "c");
        assert_eq!(
            h.count(Record::Notify(Notification::WorkspaceNamesChanged(0))),
            0
        );

        assert_eq!(manager.add_workspace(&mut h), 4);
        assert_eq!(manager.workspace_names(), vec!["a", "b", "c", "4"]);
        assert_eq!(
            h.count(Record::Notify(Notification::WorkspaceNamesChanged(0))),
            1
        );
        assert_eq!(
            h.count(Record::Notify(Notification::WorkspaceCountChanged(0))),
            2
        );

        manager.sync_workspace_count(0, &mut h);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn iconic_windows_stay_hidden_across_switches() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(1), None, &mut h);
        assert!(manager.iconify(0xa, &mut h));
        assert!(!manager.iconify(0xa, &mut h));
        h.records.clear();

        manager.change_workspace(1, false, &mut h).unwrap();
        assert_eq!(h.position(Record::Show(0xa)), None);

        manager.change_workspace(0, false, &mut h).unwrap();
        assert!(manager.deiconify(0xa, &mut h));
        assert_eq!(manager.workspace_of(0xa), Some(0));
        assert!(manager.is_shown(0xa));
    }

    #[test]
    fn unknown_target_clamps_to_current() {
        let mut manager = manager(3);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(2), None, &mut h);
        assert!(manager.reassociate(0xa, 42, false, &mut h));
        assert_eq!(manager.workspace_of(0xa), Some(0));
        assert!(h.position(Record::Moved(0xa, 0)).is_some());
    }

    #[test]
    fn opaque_move_carries_the_dragged_window() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(0), None, &mut h);
        manager.set_moving(Some(0xa));
        h.records.clear();

        manager.change_workspace(1, true, &mut h).unwrap();

        assert_eq!(manager.workspace_of(0xa), Some(1));
        assert!(h.position(Record::Focus(0xa)).is_some());
        assert_eq!(h.position(Record::Revert(1)), None);
        assert_eq!(h.position(Record::Hide(0xa)), None);
    }

    #[test]
    fn outline_moves_leave_the_window_behind() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        manager.add_window(0xa, Some(0), None, &mut h);
        manager.set_moving(Some(0xa));
        manager.set_opaque_move(false);
        h.records.clear();

        manager.change_workspace(1, true, &mut h).unwrap();

        assert_eq!(manager.workspace_of(0xa), Some(0));
        assert!(h.position(Record::Hide(0xa)).is_some());
        assert!(h.position(Record::Revert(1)).is_some());
    }

    #[test]
    fn renaming_updates_the_name_slot() {
        let mut manager = manager(2);
        let mut h = Recorder::default();

        assert_eq!(manager.set_workspace_name(1, "mail", &mut h), Ok(()));
        assert_eq!(manager.workspace_names(), vec!["1", "mail"]);
        assert_eq!(h.count(Record::Notify(Notification::WorkspaceNamesChanged(0))), 1);

        assert_eq!(
            manager.set_workspace_name(1, "mail", &mut h),
            Err(StateChangeError::StateUnchanged)
        );
        assert_eq!(
            manager.set_workspace_name(5, "x", &mut h),
            Err(StateChangeError::InvalidIndex)
        );

        manager.remove_last_workspace(&mut h);
        manager.add_workspace(&mut h);
        assert_eq!(manager.workspace(1).map(Workspace::name), Some("mail"));
    }
}
