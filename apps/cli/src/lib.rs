pub mod args;
pub mod logging;
pub mod output;
pub mod shutdown;
