//! Maps a [`Maze`](crate::maze::Maze) onto world-space shapes and the body
//! descriptors handed to the physics layer.
//!
//! All coordinates are pixels in screen space: the origin is the top-left
//! corner of the viewport and the y axis points down.

use crate::constants::{
    BALL_COLOR, BALL_RADIUS_FRACTION, BOUNDARY_THICKNESS, GOAL_CELL_FRACTION, GOAL_COLOR,
    HORIZONTAL_WALL_COLOR, TARGET_CELL_SPAN, VERTICAL_WALL_COLOR, WALL_THICKNESS,
};
use crate::maze::Maze;
use anyhow::{bail, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rapier2d::na::Point2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its center point and full extents
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center x coordinate
    pub x: f32,
    /// Center y coordinate
    pub y: f32,
    /// Full width
    pub width: f32,
    /// Full height
    pub height: f32,
}

impl Rect {
    /// Construct a rectangle from its center and extents
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle's center as a point
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Role of a body in the game, matched by the collision watcher.
///
/// Replaces the label strings of a typical physics setup with a tagged
/// variant; outer boundary walls carry no kind at all and are ignored by the
/// win logic.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BodyKind {
    /// An interior maze wall, released (made dynamic) when the game is won
    Wall = 0,
    /// The goal zone near the bottom-right cell
    Goal = 1,
    /// The player-controlled ball
    Ball = 2,
}

/// Collision shape of a body descriptor
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Axis-aligned rectangle with full extents
    Rectangle {
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

/// Everything the physics layer needs to create one body
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    /// Game role, if any; `None` for untagged scenery such as the boundary
    pub kind: Option<BodyKind>,
    /// Collision shape
    pub shape: BodyShape,
    /// Center position in pixels
    pub position: Point2<f32>,
    /// Whether the body is immovable
    pub is_static: bool,
    /// Suggested fill color for the embedding renderer, if any
    pub render_color: Option<[u8; 3]>,
}

/// World-space geometry for one maze: wall rectangles, the goal zone, and
/// where the ball starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    cell_width: f32,
    cell_height: f32,
    horizontal_walls: Vec<Rect>,
    vertical_walls: Vec<Rect>,
    boundary_walls: [Rect; 4],
    goal: Rect,
    player_start: Point2<f32>,
    ball_radius: f32,
}

impl SceneLayout {
    /// Map a maze onto viewport-sized geometry.
    ///
    /// Each cell spans `viewport_width / cols` by `viewport_height / rows`
    /// pixels (cells need not be square). Every closed interior wall becomes
    /// one rectangle; the four outer boundary walls are always emitted. The
    /// goal sits in the bottom-right cell and the ball starts in the center
    /// of the top-left cell.
    ///
    /// Degenerate (non-positive) viewports are refused.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use mazeball::layout::SceneLayout;
    /// use mazeball::maze::Maze;
    ///
    /// let maze = Maze::generate(10, 16, &mut StdRng::seed_from_u64(3)).unwrap();
    /// let layout = SceneLayout::map(&maze, 960.0, 600.0).unwrap();
    /// assert_eq!(layout.ball_radius(), 15.0);
    /// ```
    pub fn map(maze: &Maze, viewport_width: f32, viewport_height: f32) -> Result<Self> {
        if !(viewport_width > 0.0 && viewport_height > 0.0) {
            bail!("invalid viewport: {viewport_width}x{viewport_height}");
        }

        let rows = maze.rows();
        let cols = maze.cols();
        let cell_width = viewport_width / cols as f32;
        let cell_height = viewport_height / rows as f32;

        // one rectangle per closed wall, centered on the shared cell edge
        let mut horizontal_walls = vec![];
        for row in 0..rows - 1 {
            for col in 0..cols {
                if !maze.passage_down(row, col) {
                    horizontal_walls.push(Rect::new(
                        col as f32 * cell_width + cell_width / 2.0,
                        (row + 1) as f32 * cell_height,
                        cell_width,
                        WALL_THICKNESS,
                    ));
                }
            }
        }

        let mut vertical_walls = vec![];
        for row in 0..rows {
            for col in 0..cols - 1 {
                if !maze.passage_right(row, col) {
                    vertical_walls.push(Rect::new(
                        (col + 1) as f32 * cell_width,
                        row as f32 * cell_height + cell_height / 2.0,
                        WALL_THICKNESS,
                        cell_height,
                    ));
                }
            }
        }

        let (w, h) = (viewport_width, viewport_height);
        let boundary_walls = [
            Rect::new(w / 2.0, 0.0, w, BOUNDARY_THICKNESS),
            Rect::new(w / 2.0, h, w, BOUNDARY_THICKNESS),
            Rect::new(0.0, h / 2.0, BOUNDARY_THICKNESS, h),
            Rect::new(w, h / 2.0, BOUNDARY_THICKNESS, h),
        ];

        let goal = Rect::new(
            w - cell_width / 2.0,
            h - cell_height / 2.0,
            cell_width * GOAL_CELL_FRACTION,
            cell_height * GOAL_CELL_FRACTION,
        );

        Ok(Self {
            cell_width,
            cell_height,
            horizontal_walls,
            vertical_walls,
            boundary_walls,
            goal,
            player_start: Point2::new(cell_width / 2.0, cell_height / 2.0),
            ball_radius: cell_width.min(cell_height) * BALL_RADIUS_FRACTION,
        })
    }

    /// Width of one cell in pixels
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Height of one cell in pixels
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// All interior wall rectangles
    pub fn wall_rects(&self) -> impl Iterator<Item = &Rect> {
        self.horizontal_walls.iter().chain(self.vertical_walls.iter())
    }

    /// Number of interior wall rectangles
    pub fn interior_wall_count(&self) -> usize {
        self.horizontal_walls.len() + self.vertical_walls.len()
    }

    /// The four outer boundary walls (top, bottom, left, right)
    pub fn boundary_walls(&self) -> &[Rect; 4] {
        &self.boundary_walls
    }

    /// The goal zone rectangle
    pub fn goal(&self) -> Rect {
        self.goal
    }

    /// Center of the top-left cell, where the ball spawns
    pub fn player_start(&self) -> Point2<f32> {
        self.player_start
    }

    /// Radius of the player ball
    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    /// The full list of body descriptors for the physics layer: boundary and
    /// interior walls, the goal, and the ball. Everything except the ball is
    /// static.
    pub fn bodies(&self) -> Vec<BodyDescriptor> {
        let mut bodies = Vec::with_capacity(self.interior_wall_count() + 6);

        for rect in &self.boundary_walls {
            bodies.push(BodyDescriptor {
                kind: None,
                shape: BodyShape::Rectangle {
                    width: rect.width,
                    height: rect.height,
                },
                position: rect.center(),
                is_static: true,
                render_color: None,
            });
        }

        for (walls, color) in [
            (&self.horizontal_walls, HORIZONTAL_WALL_COLOR),
            (&self.vertical_walls, VERTICAL_WALL_COLOR),
        ] {
            for rect in walls {
                bodies.push(BodyDescriptor {
                    kind: Some(BodyKind::Wall),
                    shape: BodyShape::Rectangle {
                        width: rect.width,
                        height: rect.height,
                    },
                    position: rect.center(),
                    is_static: true,
                    render_color: Some(color),
                });
            }
        }

        bodies.push(BodyDescriptor {
            kind: Some(BodyKind::Goal),
            shape: BodyShape::Rectangle {
                width: self.goal.width,
                height: self.goal.height,
            },
            position: self.goal.center(),
            is_static: true,
            render_color: Some(GOAL_COLOR),
        });

        bodies.push(BodyDescriptor {
            kind: Some(BodyKind::Ball),
            shape: BodyShape::Circle {
                radius: self.ball_radius,
            },
            position: self.player_start,
            is_static: false,
            render_color: Some(BALL_COLOR),
        });

        bodies
    }
}

/// Derive grid dimensions `(rows, cols)` from a viewport, aiming for cells of
/// [`TARGET_CELL_SPAN`] pixels with a minimum of one cell per axis.
pub fn grid_dimensions(viewport_width: f32, viewport_height: f32) -> Result<(usize, usize)> {
    if !(viewport_width > 0.0 && viewport_height > 0.0) {
        bail!("invalid viewport: {viewport_width}x{viewport_height}");
    }
    let rows = ((viewport_height / TARGET_CELL_SPAN) as usize).max(1);
    let cols = ((viewport_width / TARGET_CELL_SPAN) as usize).max(1);
    Ok((rows, cols))
}
