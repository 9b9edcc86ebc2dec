pub mod clock;
pub mod dir;
pub mod logging;
pub mod names;
pub mod time;
