use serde::Deserialize;

pub type Pixmap = u32;

/// Background pixmap value telling the server to inherit the parent's
/// background.
pub const PARENT_RELATIVE: Pixmap = 1;

/// A 24-bit RGB color as understood by a TrueColor visual.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Default for Color {
    fn default() -> Self {
        Color(0x000000)
    }
}

impl Color {
    #[inline]
    pub fn pixel(&self) -> u32 {
        self.0 & 0xffffff
    }

    #[inline]
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    pub fn from_rgb(
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Linear interpolation towards `to`, `step` out of `steps`.
    pub fn blend(
        &self,
        to: Color,
        step: u32,
        steps: u32,
    ) -> Self {
        if steps == 0 {
            return *self;
        }

        let (r0, g0, b0) = self.rgb();
        let (r1, g1, b1) = to.rgb();

        let mix = |from: u8, to: u8| -> u8 {
            let from = from as i64;
            let to = to as i64;
            (from + (to - from) * step as i64 / steps as i64) as u8
        };

        Color::from_rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }
}

/// Rotation applied to a texture before it is rendered, used for vertical
/// tab strips.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    Rot0,
    Rot90,
    Rot270,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Rot0
    }
}

impl Orientation {
    #[inline]
    pub fn is_vertical(&self) -> bool {
        *self != Orientation::Rot0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    Solid,
    HorizontalGradient,
    VerticalGradient,
    DiagonalGradient,
    ParentRelative,
}

impl Default for TextureKind {
    fn default() -> Self {
        TextureKind::Solid
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Texture {
    pub kind: TextureKind,
    pub color: Color,
    pub color_to: Color,
}

impl Default for Texture {
    fn default() -> Self {
        Self {
            kind: TextureKind::Solid,
            color: Color::default(),
            color_to: Color::default(),
        }
    }
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: TextureKind::Solid,
            color,
            color_to: color,
        }
    }

    pub fn gradient(
        kind: TextureKind,
        color: Color,
        color_to: Color,
    ) -> Self {
        Self {
            kind,
            color,
            color_to,
        }
    }

    /// Whether rendering this texture needs a generated pixmap, as opposed
    /// to a plain background color.
    pub fn use_pixmap(&self) -> bool {
        match self.kind {
            TextureKind::HorizontalGradient
            | TextureKind::VerticalGradient
            | TextureKind::DiagonalGradient => true,
            _ => false,
        }
    }

    #[inline]
    pub fn is_parent_relative(&self) -> bool {
        self.kind == TextureKind::ParentRelative
    }

    /// The gradient as seen after rotating by `orientation`.
    pub fn rotated(
        &self,
        orientation: Orientation,
    ) -> Self {
        let kind = match (self.kind, orientation.is_vertical()) {
            (TextureKind::HorizontalGradient, true) => TextureKind::VerticalGradient,
            (TextureKind::VerticalGradient, true) => TextureKind::HorizontalGradient,
            (kind, _) => kind,
        };

        let (color, color_to) = match orientation {
            Orientation::Rot90 => (self.color_to, self.color),
            _ => (self.color, self.color_to),
        };

        Self {
            kind,
            color,
            color_to,
        }
    }
}
