pub mod audio;
pub mod chart;
pub mod config;
pub mod gameplay;
pub mod input;
pub mod time;
