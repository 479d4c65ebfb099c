//! Command line shared by `raven-dock` and `raven-dock-ctl`.

pub mod client;
