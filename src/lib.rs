#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

pub mod commands;
pub mod config;
pub mod constants;
pub mod data;
pub mod logging;
pub mod registry;
pub mod sync;
pub mod util;
