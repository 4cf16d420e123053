//! One play-through of the maze game: generation, input, and the win watch.
//!
//! [`GameSession`] is the piece a front end drives. It owns the maze, the
//! mapped geometry, and the physics world, and moves through the states
//! `Idle -> Running -> Won`, with `TornDown` reachable from anywhere via
//! teardown/restart. The embedder supplies the event sources: start/restart
//! signals, raw key codes, and a fixed-rate call to [`GameSession::step`].

use crate::constants::{KEY_IMPULSE, RELEASE_GRAVITY};
use crate::layout::{grid_dimensions, BodyKind, SceneLayout};
use crate::maze::{Direction, Maze};
use crate::physics::MazeSimulation;
use anyhow::{bail, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rapier2d::na::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Map a raw keyboard code to a steering direction.
///
/// WASD and the arrow keys steer; everything else is `None` and silently
/// ignored by the session.
pub fn direction_for_key(key_code: u32) -> Option<Direction> {
    match key_code {
        87 | 38 => Some(Direction::Up),
        83 | 40 => Some(Direction::Down),
        68 | 39 => Some(Direction::Right),
        65 | 37 => Some(Direction::Left),
        _ => None,
    }
}

/// Parameters for one session
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Fixed rng seed for a reproducible maze; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 600.0,
            seed: None,
        }
    }
}

/// Where a session is in its lifecycle
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, nothing generated yet
    Idle,
    /// Maze generated, world live, ball steerable
    Running,
    /// Ball reached the goal; the maze has been released
    Won,
    /// World discarded; a new start begins a fresh session
    TornDown,
}

/// Orchestrates one play-through of the maze game
pub struct GameSession {
    config: SessionConfig,
    state: SessionState,
    maze: Option<Maze>,
    layout: Option<SceneLayout>,
    simulation: Option<MazeSimulation>,
}

impl GameSession {
    /// Create an idle session; nothing happens until [`GameSession::start`]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            maze: None,
            layout: None,
            simulation: None,
        }
    }

    /// Generate the maze, map it to geometry, build the physics world, and
    /// enter `Running`.
    ///
    /// Fails if the session is already live, or if the configured viewport
    /// cannot produce a valid scene; a failed start leaves no partial world
    /// behind.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazeball::session::{GameSession, SessionConfig, SessionState};
    ///
    /// let mut session = GameSession::new(SessionConfig {
    ///     seed: Some(7),
    ///     ..SessionConfig::default()
    /// });
    /// session.start().unwrap();
    /// assert_eq!(session.state(), SessionState::Running);
    /// ```
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::TornDown => {}
            state => bail!("cannot start a session in state {state:?}"),
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (rows, cols) = grid_dimensions(self.config.viewport_width, self.config.viewport_height)?;
        let maze = Maze::generate(rows, cols, &mut rng)?;
        let layout = SceneLayout::map(&maze, self.config.viewport_width, self.config.viewport_height)?;
        let simulation = MazeSimulation::new(&layout.bodies())?;

        info!("session started with a {rows}x{cols} maze");
        self.maze = Some(maze);
        self.layout = Some(layout);
        self.simulation = Some(simulation);
        self.state = SessionState::Running;
        Ok(())
    }

    /// Feed one raw key press into the session.
    ///
    /// Mapped keys add a fixed-magnitude velocity to the ball on the
    /// relevant axis; repeated presses compound. Unmapped keys and presses
    /// outside a live session are ignored.
    pub fn handle_key(&mut self, key_code: u32) {
        if !matches!(self.state, SessionState::Running | SessionState::Won) {
            return;
        }
        let Some(direction) = direction_for_key(key_code) else {
            debug!("ignoring unmapped key code {key_code}");
            return;
        };
        if let Some(simulation) = &mut self.simulation {
            let (dx, dy) = direction.vector();
            simulation.nudge_ball(Vector2::new(dx * KEY_IMPULSE, dy * KEY_IMPULSE));
        }
    }

    /// Advance the physics world one fixed timestep and run the win watch
    /// over the collision-begin events it produced. Returns the state after
    /// the step so callers can poll for the win.
    pub fn step(&mut self) -> SessionState {
        if let Some(simulation) = &mut self.simulation {
            simulation.step();
            for (kind_a, kind_b) in simulation.take_started_contacts() {
                self.observe_contact(kind_a, kind_b);
            }
        }
        self.state
    }

    /// React to one contact pair from the collision watch. A ball/goal pair
    /// (in either order) wins; the `Running` check makes the transition
    /// happen at most once per session, duplicates included.
    fn observe_contact(&mut self, kind_a: BodyKind, kind_b: BodyKind) {
        if self.state != SessionState::Running {
            return;
        }
        let is_win = matches!(
            (kind_a, kind_b),
            (BodyKind::Ball, BodyKind::Goal) | (BodyKind::Goal, BodyKind::Ball)
        );
        if !is_win {
            return;
        }

        if let Some(simulation) = &mut self.simulation {
            simulation.release_walls();
            simulation.set_gravity(Vector2::new(0.0, RELEASE_GRAVITY));
        }
        self.state = SessionState::Won;
        info!("maze solved, walls released");
    }

    /// Discard the physics world and all per-session state. The next
    /// [`GameSession::start`] generates a fresh maze.
    pub fn teardown(&mut self) {
        self.maze = None;
        self.layout = None;
        self.simulation = None;
        self.state = SessionState::TornDown;
    }

    /// Hard reset: teardown plus an immediate fresh start
    pub fn restart(&mut self) -> Result<()> {
        self.teardown();
        self.start()
    }

    /// The session's current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The generated maze, while the session is live
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    /// The mapped geometry, while the session is live
    pub fn layout(&self) -> Option<&SceneLayout> {
        self.layout.as_ref()
    }

    /// The ball's current position, while the session is live
    pub fn ball_position(&self) -> Option<Point2<f32>> {
        self.simulation.as_ref().map(|s| s.ball_position())
    }

    /// The ball's current velocity, while the session is live
    pub fn ball_velocity(&self) -> Option<Vector2<f32>> {
        self.simulation.as_ref().map(|s| s.ball_velocity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 180x120 viewport: a 2x3 maze with 60-pixel cells
    fn small_config(seed: u64) -> SessionConfig {
        SessionConfig {
            viewport_width: 180.0,
            viewport_height: 120.0,
            seed: Some(seed),
        }
    }

    #[test]
    fn start_builds_a_running_session() {
        let mut session = GameSession::new(small_config(4));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.ball_position(), None);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Running);

        let maze = session.maze().unwrap();
        assert_eq!((maze.rows(), maze.cols()), (2, 3));
        assert_eq!(session.ball_position(), Some(Point2::new(30.0, 30.0)));

        // a second start on a live session is refused
        assert!(session.start().is_err());
    }

    #[test]
    fn same_seed_reproduces_the_session_maze() {
        let mut a = GameSession::new(small_config(11));
        let mut b = GameSession::new(small_config(11));
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.maze(), b.maze());
    }

    #[test]
    fn mapped_keys_compound_velocity() {
        let mut session = GameSession::new(small_config(4));
        session.start().unwrap();

        session.handle_key(87); // W
        assert_eq!(session.ball_velocity(), Some(Vector2::new(0.0, -5.0)));

        session.handle_key(38); // ArrowUp
        assert_eq!(session.ball_velocity(), Some(Vector2::new(0.0, -10.0)));

        session.handle_key(65); // A
        session.handle_key(39); // ArrowRight
        session.handle_key(40); // ArrowDown
        assert_eq!(session.ball_velocity(), Some(Vector2::new(0.0, -5.0)));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut session = GameSession::new(small_config(4));

        // before start: no-op, no panic
        session.handle_key(87);

        session.start().unwrap();
        session.handle_key(87);
        session.handle_key(13); // Enter
        session.handle_key(0);
        assert_eq!(session.ball_velocity(), Some(Vector2::new(0.0, -5.0)));
    }

    #[test]
    fn ball_goal_contact_wins_exactly_once() {
        let mut session = GameSession::new(small_config(4));
        session.start().unwrap();

        // synthetic collision pairs, both orders plus duplicates in the
        // same batch
        session.observe_contact(BodyKind::Ball, BodyKind::Goal);
        assert_eq!(session.state(), SessionState::Won);
        let gravity = session.simulation.as_ref().unwrap().gravity();
        assert!(gravity.y > 0.0);

        session.observe_contact(BodyKind::Goal, BodyKind::Ball);
        session.observe_contact(BodyKind::Ball, BodyKind::Goal);
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn wall_contacts_do_not_win() {
        let mut session = GameSession::new(small_config(4));
        session.start().unwrap();

        session.observe_contact(BodyKind::Ball, BodyKind::Wall);
        session.observe_contact(BodyKind::Wall, BodyKind::Goal);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn single_cell_session_wins_on_its_own() {
        // 60x60 viewport degenerates to a 1x1 maze where the ball spawns
        // on the goal
        let mut session = GameSession::new(SessionConfig {
            viewport_width: 60.0,
            viewport_height: 60.0,
            seed: Some(0),
        });
        session.start().unwrap();
        assert_eq!(session.layout().unwrap().interior_wall_count(), 0);

        let mut state = session.state();
        for _ in 0..5 {
            state = session.step();
            if state == SessionState::Won {
                break;
            }
        }
        assert_eq!(state, SessionState::Won);
    }

    #[test]
    fn restart_discards_and_rebuilds() {
        let mut session = GameSession::new(small_config(4));
        session.start().unwrap();
        session.observe_contact(BodyKind::Ball, BodyKind::Goal);
        assert_eq!(session.state(), SessionState::Won);

        session.restart().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        // fixed seed: the fresh session reproduces the same maze, at rest
        assert_eq!((session.maze().unwrap().rows(), session.maze().unwrap().cols()), (2, 3));
        assert_eq!(session.ball_velocity(), Some(Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn teardown_parks_the_session() {
        let mut session = GameSession::new(small_config(4));
        session.start().unwrap();
        session.teardown();

        assert_eq!(session.state(), SessionState::TornDown);
        assert_eq!(session.maze(), None);
        assert_eq!(session.ball_position(), None);
        // stepping a torn-down session is a harmless no-op
        assert_eq!(session.step(), SessionState::TornDown);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn key_mapping_table_is_complete() {
        for (codes, expected) in [
            ([87, 38], Direction::Up),
            ([83, 40], Direction::Down),
            ([68, 39], Direction::Right),
            ([65, 37], Direction::Left),
        ] {
            for code in codes {
                assert_eq!(direction_for_key(code), Some(expected));
            }
        }
        assert_eq!(direction_for_key(13), None);
    }
}
