pub mod config;
pub mod events;
pub mod geometry;
pub mod playback;
pub mod render;
pub mod timer;
pub mod tasks {
    pub mod carousel;
    pub mod output;
    pub mod script;
}
