pub mod config;
pub mod pose;
pub mod protocol;
pub mod recording;
pub mod session;
pub mod tracker;
