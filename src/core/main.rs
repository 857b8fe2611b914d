#![deny(clippy::all)]

#[macro_use]
extern crate log;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

#[macro_use]
mod defaults;

mod buffer;
mod client;
mod config;
mod context;
mod decoration;
mod error;
mod face;
mod frame;
mod model;
mod workspace;

#[cfg(test)]
mod mock;

use config::Config;
use model::Model;

pub fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    SimpleLogger::init(LevelFilter::Debug, simplelog::Config::default())?;
    #[cfg(not(debug_assertions))]
    SimpleLogger::init(LevelFilter::Info, simplelog::Config::default())?;

    let config = Config::load()?;

    let (conn, screen_num) = x11rb::connect(None)?;
    let xconn = XConnection::new(&conn, screen_num)?;

    Model::new(&xconn, config).run();

    Ok(())
}
