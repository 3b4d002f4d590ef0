pub mod catalog;
pub mod config;
pub mod kudago;
pub mod logging;
