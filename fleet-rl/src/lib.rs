pub mod data;
pub mod environment;
pub mod logging;
pub mod module;
pub mod objective;
