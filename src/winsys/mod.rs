#![allow(dead_code)]

#[macro_use]
extern crate log;

pub type Result<T> = anyhow::Result<T>;

pub mod connection;
pub mod event;
pub mod geometry;
pub mod hints;
pub mod input;
pub mod screen;
pub mod texture;
pub mod window;
pub mod xdata;
