use crate::client::Client;
use crate::decoration::Border;
use crate::decoration::FontMetrics;
use crate::decoration::FrameStyle;
use crate::decoration::FrameTheme;
use crate::frame::WinFrame;

use winsys::geometry::Dim;
use winsys::texture::Color;
use winsys::texture::Texture;
use winsys::texture::TextureKind;

#[macro_export]
macro_rules! WM_NAME (
    () => { "wzframe" };
);

impl Client {
    pub const MIN_CLIENT_DIM: Dim = Dim {
        w: 75,
        h: 50,
    };
}

impl WinFrame {
    pub const BUTTON_SIZE: i32 = 26;
    pub const GRIP_WIDTH: i32 = 20;
    pub const TAB_WIDTH: u32 = 64;
}

impl FrameTheme {
    pub const DEFAULT: Self = Self {
        focused: FrameStyle {
            title: Texture {
                kind: TextureKind::VerticalGradient,
                color: Color(0xe78a53),
                color_to: Color(0xc06a3a),
            },
            label: Texture {
                kind: TextureKind::ParentRelative,
                color: Color(0xe78a53),
                color_to: Color(0xe78a53),
            },
            handle: Texture {
                kind: TextureKind::Solid,
                color: Color(0xc06a3a),
                color_to: Color(0xc06a3a),
            },
            grip: Texture {
                kind: TextureKind::Solid,
                color: Color(0xfbcb97),
                color_to: Color(0xfbcb97),
            },
            button: Texture {
                kind: TextureKind::Solid,
                color: Color(0xe78a53),
                color_to: Color(0xe78a53),
            },
            border_color: Color(0x5f8787),
        },
        unfocused: FrameStyle {
            title: Texture {
                kind: TextureKind::Solid,
                color: Color(0x333333),
                color_to: Color(0x333333),
            },
            label: Texture {
                kind: TextureKind::ParentRelative,
                color: Color(0x333333),
                color_to: Color(0x333333),
            },
            handle: Texture {
                kind: TextureKind::Solid,
                color: Color(0x444444),
                color_to: Color(0x444444),
            },
            grip: Texture {
                kind: TextureKind::Solid,
                color: Color(0x999999),
                color_to: Color(0x999999),
            },
            button: Texture {
                kind: TextureKind::Solid,
                color: Color(0x333333),
                color_to: Color(0x333333),
            },
            border_color: Color(0x444444),
        },
        button_pressed: Texture {
            kind: TextureKind::Solid,
            color: Color(0xc1c1c1),
            color_to: Color(0xc1c1c1),
        },
        font: FontMetrics {
            height: 12,
        },
        bevel: 1,
        handle_width: 6,
        title_height: 0,
        border: Border {
            width: 1,
        },
    };
}
