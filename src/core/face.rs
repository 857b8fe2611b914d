use winsys::connection::Connection;
use winsys::geometry::Dim;
use winsys::texture::Color;
use winsys::texture::Orientation;
use winsys::texture::Pixmap;
use winsys::texture::Texture;
use winsys::texture::PARENT_RELATIVE;
use winsys::window::Window;

use std::ops::Index;
use std::ops::IndexMut;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FocusState {
    Unfocused,
    Focused,
    Pressed,
}

impl FocusState {
    #[inline]
    pub fn from_focus(focused: bool) -> Self {
        if focused {
            FocusState::Focused
        } else {
            FocusState::Unfocused
        }
    }
}

/// A server-side pixmap this process must give back. It is deliberately
/// neither `Copy` nor `Clone`, and the only way to drop the handle is to
/// hand it back to the server.
#[derive(Debug, PartialEq, Eq)]
pub struct OwnedPixmap(Pixmap);

impl OwnedPixmap {
    #[inline]
    pub fn pixmap(&self) -> Pixmap {
        self.0
    }

    pub fn release(
        self,
        conn: &dyn Connection,
    ) {
        conn.free_pixmap(self.0);
    }
}

/// What a decoration window shows as its background for one focus state.
#[derive(Debug, PartialEq, Eq)]
pub enum Face {
    Color(Color),
    Pixmap(OwnedPixmap),
    ParentRelative,
}

impl Default for Face {
    fn default() -> Self {
        Face::Color(Color::default())
    }
}

impl Face {
    /// Regenerates this face from `texture`.
    ///
    /// The new pixmap is rendered first, the previous one is freed, and only
    /// then is the new one adopted. When rendering fails the face falls back
    /// to the texture's base color.
    pub fn render(
        &mut self,
        conn: &dyn Connection,
        dim: Dim,
        texture: &Texture,
        orientation: Orientation,
    ) {
        let next = if texture.is_parent_relative() {
            Face::ParentRelative
        } else if texture.use_pixmap() {
            match conn.render_texture(dim, texture, orientation) {
                Some(pixmap) => Face::Pixmap(OwnedPixmap(pixmap)),
                None => {
                    warn!("unable to render {:?} texture, using its color", texture.kind);
                    Face::Color(texture.color)
                },
            }
        } else {
            Face::Color(texture.color)
        };

        self.release(conn);
        *self = next;
    }

    pub fn release(
        &mut self,
        conn: &dyn Connection,
    ) {
        if let Face::Pixmap(pixmap) = std::mem::take(self) {
            pixmap.release(conn);
        }
    }

    /// Pushes this face onto `window`'s background.
    pub fn apply(
        &self,
        conn: &dyn Connection,
        window: Window,
    ) {
        match self {
            Face::Color(color) => conn.set_window_background_color(window, *color),
            Face::Pixmap(pixmap) => conn.set_window_background_pixmap(window, pixmap.pixmap()),
            Face::ParentRelative => conn.set_window_background_pixmap(window, PARENT_RELATIVE),
        }
    }

    #[inline]
    pub fn is_pixmap(&self) -> bool {
        match self {
            Face::Pixmap(_) => true,
            _ => false,
        }
    }
}

/// One face per focus state of a decoration element.
#[derive(Debug, Default)]
pub struct FaceSet([Face; 3]);

impl FaceSet {
    pub fn release(
        &mut self,
        conn: &dyn Connection,
    ) {
        for face in self.0.iter_mut() {
            face.release(conn);
        }
    }
}

impl Index<FocusState> for FaceSet {
    type Output = Face;

    fn index(
        &self,
        state: FocusState,
    ) -> &Self::Output {
        &self.0[state as usize]
    }
}

impl IndexMut<FocusState> for FaceSet {
    fn index_mut(
        &mut self,
        state: FocusState,
    ) -> &mut Self::Output {
        &mut self.0[state as usize]
    }
}

/// Every face a frame owns. Pressed faces are only rendered for buttons.
#[derive(Debug, Default)]
pub struct RenderCache {
    pub title: FaceSet,
    pub label: FaceSet,
    pub tab_container: FaceSet,
    pub handle: FaceSet,
    pub grip: FaceSet,
    pub button: FaceSet,
}

impl RenderCache {
    fn sets(&self) -> [&FaceSet; 6] {
        [
            &self.title,
            &self.label,
            &self.tab_container,
            &self.handle,
            &self.grip,
            &self.button,
        ]
    }

    /// Pixmaps still owned, and so still allocated on the server.
    pub fn held_pixmaps(&self) -> usize {
        self.sets()
            .iter()
            .flat_map(|set| set.0.iter())
            .filter(|face| face.is_pixmap())
            .count()
    }

    pub fn release(
        &mut self,
        conn: &dyn Connection,
    ) {
        self.title.release(conn);
        self.label.release(conn);
        self.tab_container.release(conn);
        self.handle.release(conn);
        self.grip.release(conn);
        self.button.release(conn);
    }
}

impl Drop for RenderCache {
    fn drop(&mut self) {
        let held = self.held_pixmaps();

        if held != 0 {
            warn!("render cache dropped while holding {} pixmaps", held);
        }
    }
}
