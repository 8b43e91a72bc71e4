//! Snake simulation engine with two interchangeable body models.
//!
//! The continuous trail follows a sampled pointer and keeps a fixed arc
//! length; the discrete chain steps on a grid and grows one segment per
//! food. [`game::GameSession`] drives either model one tick at a time and
//! reports a [`game::Snapshot`] for whatever front-end draws it.

pub mod collision;
pub mod config;
pub mod controls;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
