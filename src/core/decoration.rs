use winsys::geometry::Extents;
use winsys::geometry::Padding;
use winsys::texture::Color;
use winsys::texture::Texture;

use std::ops::Add;

use serde::Deserialize;

/// Textures and colors of one focus state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    pub title: Texture,
    pub label: Texture,
    pub handle: Texture,
    pub grip: Texture,
    pub button: Texture,
    pub border_color: Color,
}

impl Default for FrameStyle {
    fn default() -> Self {
        FrameTheme::DEFAULT.unfocused
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    pub height: u32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        FrameTheme::DEFAULT.font
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Border {
    pub width: u32,
}

impl Default for Border {
    fn default() -> Self {
        FrameTheme::DEFAULT.border
    }
}

impl Add<Border> for Padding {
    type Output = Self;

    fn add(
        self,
        border: Border,
    ) -> Self::Output {
        Self::Output {
            left: self.left + border.width as i32,
            right: self.right + border.width as i32,
            top: self.top + border.width as i32,
            bottom: self.bottom + border.width as i32,
        }
    }
}

/// The look of every frame: a style per focus state plus the metrics the
/// layout pass works from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrameTheme {
    pub focused: FrameStyle,
    pub unfocused: FrameStyle,
    pub button_pressed: Texture,
    pub font: FontMetrics,
    pub bevel: u32,
    pub handle_width: u32,
    /// Overrides the height derived from the font when nonzero.
    pub title_height: u32,
    pub border: Border,
}

impl Default for FrameTheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FrameTheme {
    #[inline]
    pub fn style(
        &self,
        focused: bool,
    ) -> &FrameStyle {
        if focused {
            &self.focused
        } else {
            &self.unfocused
        }
    }

    pub fn title_height(&self) -> i32 {
        if self.title_height != 0 {
            return self.title_height as i32;
        }

        if self.font.height == 0 {
            16
        } else {
            (self.font.height + self.bevel * 2 + 2) as i32
        }
    }

    /// Space taken by a frame border on each side of a window.
    pub fn border_extents(&self) -> Extents {
        Extents::default() + self.border
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_height_follows_font_unless_overridden() {
        let mut theme = FrameTheme::DEFAULT;

        theme.title_height = 0;
        theme.bevel = 2;
        theme.font.height = 12;
        assert_eq!(theme.title_height(), 18);

        theme.font.height = 0;
        assert_eq!(theme.title_height(), 16);

        theme.title_height = 25;
        assert_eq!(theme.title_height(), 25);
    }

    #[test]
    fn theme_parses_partially() {
        let theme: FrameTheme = toml::from_str(
            r#"
            bevel = 3
            [focused.title]
            kind = "vertical_gradient"
            color = 0x112233
            color_to = 0x445566
            "#,
        )
        .unwrap();

        assert_eq!(theme.bevel, 3);
        assert!(theme.focused.title.use_pixmap());
        assert_eq!(theme.unfocused, FrameTheme::DEFAULT.unfocused);
        assert_eq!(theme.border_extents().left, theme.border.width as i32);
    }
}
