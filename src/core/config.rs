use crate::decoration::FrameTheme;
use crate::frame::ButtonKind;
use crate::frame::TabPlacement;
use crate::frame::TabSettings;
use crate::frame::WinFrame;

use winsys::screen::StrutConfig;
use winsys::Result;

use std::fs;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspaces: Vec<String>,
    pub full_maximize: bool,
    pub max_over_tabs: bool,
    pub opaque_move: bool,
    pub internal_tabs: bool,
    pub tab_placement: TabPlacement,
    pub tab_width: u32,
    pub focus_follows_mouse: bool,
    pub left_buttons: Vec<ButtonKind>,
    pub right_buttons: Vec<ButtonKind>,
    pub struts: StrutConfig,
    pub theme: FrameTheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspaces: ["main", "web", "term", "4"]
                .iter()
                .map(|&name| name.to_owned())
                .collect(),
            full_maximize: false,
            max_over_tabs: false,
            opaque_move: true,
            internal_tabs: true,
            tab_placement: TabPlacement::TopLeft,
            tab_width: WinFrame::TAB_WIDTH,
            focus_follows_mouse: false,
            left_buttons: vec![ButtonKind::Stick],
            right_buttons: vec![ButtonKind::Iconify, ButtonKind::Maximize, ButtonKind::Shade],
            struts: StrutConfig::default(),
            theme: FrameTheme::default(),
        }
    }
}

impl Config {
    /// Reads the configuration file, falling back to the defaults when
    /// there is none.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            info!("no configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration file {:?}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse configuration file {:?}", path))?;

        info!("configuration loaded from {:?}", path);
        debug!("configuration: {:?}", config);

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;

        if config.workspaces.is_empty() {
            warn!("configuration names no workspaces, keeping a single one");
            config.workspaces.push("1".to_owned());
        }

        Ok(config)
    }

    fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow!("no configuration directory"))?;
        Ok(dir.join(WM_NAME!()).join("config.toml"))
    }

    #[inline]
    pub fn tab_settings(&self) -> TabSettings {
        TabSettings {
            placement: self.tab_placement,
            tab_width: self.tab_width,
            max_over_tabs: self.max_over_tabs,
            internal_tabs: self.internal_tabs,
        }
    }
}
