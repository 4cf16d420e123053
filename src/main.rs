//! Headless demo: generate a maze, steer the ball for a moment, report
//! where it ended up. Stands in for the front end that would normally drive
//! the session.
//!
//! Usage: `mazeball [seed]`

use anyhow::Result;
use log::info;
use mazeball::session::{GameSession, SessionConfig};

fn main() -> Result<()> {
    env_logger::init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse()?),
        None => None,
    };

    let mut session = GameSession::new(SessionConfig {
        seed,
        ..SessionConfig::default()
    });
    session.start()?;

    if let Some(maze) = session.maze() {
        println!("{maze}");
    }

    // nudge the ball right and down, then let the world run for a second
    for key_code in [68, 68, 83] {
        session.handle_key(key_code);
    }
    for _ in 0..60 {
        session.step();
    }

    if let (Some(position), Some(velocity)) = (session.ball_position(), session.ball_velocity()) {
        info!(
            "after 60 steps: ball at ({:.1}, {:.1}), speed {:.1}, state {:?}",
            position.x,
            position.y,
            velocity.norm(),
            session.state()
        );
    }
    Ok(())
}
