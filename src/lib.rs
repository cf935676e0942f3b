//! pose_snake - a grid snake steered by head pose
//!
//! Two cooperating processes share nothing but a newline-delimited TCP
//! protocol:
//! - the game (game, net::server, render, input modules): a command server
//!   feeding a turn-propagating grid engine drawn in the terminal
//! - the pose pipeline (pose, net::dispatcher modules): camera frames
//!   through an opaque face model, classified into discrete directions and
//!   dispatched as lower-case tokens, one per line

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod net;
pub mod pose;
pub mod render;
