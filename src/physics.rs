//! Handles all physics related operations.
//!
//! [`MazeSimulation`] owns the rapier2d world for one play-through: fixed
//! bodies for the maze walls and the goal, one dynamic ball, and the
//! collision-begin events the session's win watcher consumes. The world
//! starts with zero gravity; gravity only turns on when the maze is released
//! after a win.

use crate::layout::{BodyDescriptor, BodyKind, BodyShape};
use anyhow::{bail, Result};
use rapier2d::crossbeam::channel::Receiver;
use rapier2d::dynamics::{IntegrationParameters, RigidBodySet};
use rapier2d::geometry::{BroadPhase, NarrowPhase};
use rapier2d::na::{Point2, Vector2};
use rapier2d::prelude::*;
use std::collections::HashMap;

/// Handles all physics related operations
pub struct MazeSimulation {
    gravity: Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    event_collector: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    _contact_force_events: Receiver<ContactForceEvent>,

    kinds: HashMap<ColliderHandle, BodyKind>,
    ball: ColliderHandle,
    wall_bodies: Vec<RigidBodyHandle>,
}

impl MazeSimulation {
    /// Create a world from a list of body descriptors.
    ///
    /// The scene must contain exactly one ball and exactly one goal;
    /// anything else leaves the engine with nothing to watch and is refused.
    /// Only the ball and goal colliders emit collision events, so wall
    /// contacts stay quiet.
    pub fn new(bodies: &[BodyDescriptor]) -> Result<Self> {
        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        let mut kinds = HashMap::new();
        let mut ball = None;
        let mut goal = None;
        let mut wall_bodies = vec![];

        for descriptor in bodies {
            let builder = if descriptor.is_static {
                RigidBodyBuilder::fixed()
            } else {
                RigidBodyBuilder::dynamic()
            };
            let rigid_body = builder
                .translation(Vector2::new(descriptor.position.x, descriptor.position.y))
                .build();
            let rigid_body_handle = rigid_body_set.insert(rigid_body);

            let mut collider = match descriptor.shape {
                BodyShape::Rectangle { width, height } => {
                    ColliderBuilder::cuboid(width / 2.0, height / 2.0)
                }
                BodyShape::Circle { radius } => ColliderBuilder::ball(radius),
            };
            if matches!(descriptor.kind, Some(BodyKind::Ball) | Some(BodyKind::Goal)) {
                collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
            }

            let collider_handle =
                collider_set.insert_with_parent(collider.build(), rigid_body_handle, &mut rigid_body_set);

            match descriptor.kind {
                Some(BodyKind::Ball) => {
                    if ball.replace(collider_handle).is_some() {
                        bail!("scene has more than one ball");
                    }
                }
                Some(BodyKind::Goal) => {
                    if goal.replace(collider_handle).is_some() {
                        bail!("scene has more than one goal");
                    }
                }
                Some(BodyKind::Wall) => wall_bodies.push(rigid_body_handle),
                None => {}
            }
            if let Some(kind) = descriptor.kind {
                kinds.insert(collider_handle, kind);
            }
        }

        let Some(ball) = ball else {
            bail!("scene has no ball");
        };
        if goal.is_none() {
            bail!("scene has no goal");
        }

        let (collision_send, collision_recv) = rapier2d::crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = rapier2d::crossbeam::channel::unbounded();

        Ok(Self {
            gravity: Vector2::zeros(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),

            rigid_body_set,
            collider_set,

            event_collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_events: collision_recv,
            _contact_force_events: contact_force_recv,

            kinds,
            ball,
            wall_bodies,
        })
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.event_collector,
        );
    }

    /// Drain the collision-begin events recorded since the last call,
    /// reported as the kinds of the two tagged bodies involved. Contacts
    /// with untagged scenery are dropped.
    pub fn take_started_contacts(&mut self) -> Vec<(BodyKind, BodyKind)> {
        let mut started = vec![];
        while let Ok(event) = self.collision_events.try_recv() {
            if let CollisionEvent::Started(a, b, _) = event {
                if let (Some(&kind_a), Some(&kind_b)) = (self.kinds.get(&a), self.kinds.get(&b)) {
                    started.push((kind_a, kind_b));
                }
            }
        }
        started
    }

    /// Add a velocity delta to the ball; repeated nudges compound
    pub fn nudge_ball(&mut self, delta: Vector2<f32>) {
        let body = self.ball_body_mut();
        let velocity = *body.linvel() + delta;
        body.set_linvel(velocity, true);
    }

    /// The ball's current velocity
    pub fn ball_velocity(&self) -> Vector2<f32> {
        *self.ball_body().linvel()
    }

    /// The ball's current center position
    pub fn ball_position(&self) -> Point2<f32> {
        Point2::from(self.ball_body().position().translation.vector)
    }

    /// Switch every interior wall body to dynamic so the maze collapses
    /// under whatever gravity is set
    pub fn release_walls(&mut self) {
        for &handle in &self.wall_bodies {
            if let Some(body) = self.rigid_body_set.get_mut(handle) {
                body.set_body_type(RigidBodyType::Dynamic, true);
            }
        }
    }

    /// Set the world gravity applied on subsequent steps
    pub fn set_gravity(&mut self, gravity: Vector2<f32>) {
        self.gravity = gravity;
    }

    /// The current world gravity
    pub fn gravity(&self) -> Vector2<f32> {
        self.gravity
    }

    fn ball_body(&self) -> &RigidBody {
        let handle = self.collider_set[self.ball].parent().unwrap();
        &self.rigid_body_set[handle]
    }

    fn ball_body_mut(&mut self) -> &mut RigidBody {
        let handle = self.collider_set[self.ball].parent().unwrap();
        &mut self.rigid_body_set[handle]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SceneLayout;
    use crate::maze::Maze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simulation_for(rows: usize, cols: usize, seed: u64) -> MazeSimulation {
        let maze = Maze::generate(rows, cols, &mut StdRng::seed_from_u64(seed)).unwrap();
        let layout = SceneLayout::map(&maze, cols as f32 * 60.0, rows as f32 * 60.0).unwrap();
        MazeSimulation::new(&layout.bodies()).unwrap()
    }

    #[test]
    fn nudges_compound_on_the_ball_velocity() {
        let mut sim = simulation_for(3, 3, 7);
        assert_eq!(sim.ball_velocity(), Vector2::new(0.0, 0.0));

        sim.nudge_ball(Vector2::new(0.0, -5.0));
        assert_eq!(sim.ball_velocity(), Vector2::new(0.0, -5.0));

        sim.nudge_ball(Vector2::new(0.0, -5.0));
        sim.nudge_ball(Vector2::new(5.0, 0.0));
        assert_eq!(sim.ball_velocity(), Vector2::new(5.0, -10.0));
    }

    #[test]
    fn ball_spawning_on_the_goal_reports_a_contact() {
        // 1x1 maze: goal center and player start coincide, so the very
        // first step begins a ball/goal contact
        let mut sim = simulation_for(1, 1, 0);
        sim.step();

        let contacts = sim.take_started_contacts();
        assert!(contacts
            .iter()
            .any(|&pair| pair == (BodyKind::Ball, BodyKind::Goal)
                || pair == (BodyKind::Goal, BodyKind::Ball)));

        // drained events do not come back
        assert!(sim.take_started_contacts().is_empty());
    }

    #[test]
    fn release_walls_makes_interior_walls_dynamic() {
        let maze = Maze::fully_closed(2, 2);
        let layout = SceneLayout::map(&maze, 120.0, 120.0).unwrap();
        let mut sim = MazeSimulation::new(&layout.bodies()).unwrap();
        assert!(!sim.wall_bodies.is_empty());

        assert!(sim
            .wall_bodies
            .iter()
            .all(|&h| sim.rigid_body_set[h].is_fixed()));

        sim.release_walls();
        assert!(sim
            .wall_bodies
            .iter()
            .all(|&h| sim.rigid_body_set[h].is_dynamic()));
    }

    #[test]
    fn stationary_ball_stays_put_without_gravity() {
        let mut sim = simulation_for(2, 2, 3);
        let before = sim.ball_position();
        for _ in 0..30 {
            sim.step();
        }
        let after = sim.ball_position();
        assert!((after - before).norm() < 1.0e-3);
    }

    #[test]
    fn scene_without_ball_or_goal_is_refused() {
        let maze = Maze::fully_closed(2, 2);
        let layout = SceneLayout::map(&maze, 120.0, 120.0).unwrap();

        let no_ball: Vec<_> = layout
            .bodies()
            .into_iter()
            .filter(|b| b.kind != Some(BodyKind::Ball))
            .collect();
        assert!(MazeSimulation::new(&no_ball).is_err());

        let no_goal: Vec<_> = layout
            .bodies()
            .into_iter()
            .filter(|b| b.kind != Some(BodyKind::Goal))
            .collect();
        assert!(MazeSimulation::new(&no_goal).is_err());
    }
}
