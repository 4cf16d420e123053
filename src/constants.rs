//! Provides constants for the library.

/// Edge length, in pixels, a maze cell should be close to; the grid
/// dimensions are derived by dividing the viewport by this span
pub const TARGET_CELL_SPAN: f32 = 60.0;
/// Thickness of interior maze wall rectangles
pub const WALL_THICKNESS: f32 = 5.0;
/// Thickness of the four outer boundary walls
pub const BOUNDARY_THICKNESS: f32 = 2.0;
/// Fraction of a cell the goal zone covers on each axis
pub const GOAL_CELL_FRACTION: f32 = 0.7;
/// Ball radius as a fraction of the smaller cell dimension
pub const BALL_RADIUS_FRACTION: f32 = 0.25;
/// Velocity added to the ball on each mapped key press
pub const KEY_IMPULSE: f32 = 5.0;
/// Downward gravity (y axis points down) applied once the maze is released
pub const RELEASE_GRAVITY: f32 = 980.0;

/// Render color for horizontal wall segments
pub const HORIZONTAL_WALL_COLOR: [u8; 3] = [0xf7, 0x25, 0x85];
/// Render color for vertical wall segments
pub const VERTICAL_WALL_COLOR: [u8; 3] = [0x4c, 0xc9, 0xf0];
/// Render color for the goal zone
pub const GOAL_COLOR: [u8; 3] = [0x06, 0xd6, 0xa0];
/// Render color for the player ball
pub const BALL_COLOR: [u8; 3] = [0xfd, 0xff, 0xb6];
