#![warn(missing_docs)]
//! Core of a maze-ball game: generate a perfect maze, map it onto 2-D
//! physics geometry, steer a ball with keyboard impulses, and detect the win
//! when the ball reaches the goal.
//!
//! The embedding front end (rendering, DOM, buttons) stays outside this
//! crate; it drives a [`session::GameSession`] with start/restart signals,
//! raw key codes, and fixed-rate [`session::GameSession::step`] calls, and
//! reads the [`layout::BodyDescriptor`] list if it wants to draw the world
//! itself.

pub mod constants;
pub mod layout;
pub mod maze;
pub mod physics;
pub mod session;
pub mod util;
