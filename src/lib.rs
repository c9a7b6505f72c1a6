pub mod audio;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod input;
pub mod map;
pub mod physics;
pub mod renderer;
pub mod update;
pub mod world;
