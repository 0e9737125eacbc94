//! Side-by-side comparison of the horizontal viewing angles of multi-monitor
//! desk setups, served as a small local web page.

pub mod config;
pub mod controller;
pub mod events;
pub mod page;
pub mod sys;
pub mod view;
