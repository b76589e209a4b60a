//! Flappy bird for the terminal.
//!
//! - [`session`] – the game session controller and its render snapshot
//! - [`obstacle`] – obstacle pairs, spawning, overlap and pass tests
//! - [`tuning`] – gameplay constants and INI overrides
//! - [`highscore`] – the persisted high score
//! - [`timer`] – fixed-period intervals fed by frame time
//! - [`input`] – terminal events to commands
//! - [`render`] – half-block pixel renderer
//! - [`audio`] – synthesized sound cues

pub mod audio;
pub mod highscore;
pub mod input;
pub mod obstacle;
pub mod render;
pub mod session;
pub mod timer;
pub mod tuning;
