//! Maze-to-world compilation
//!
//! Turns the passage matrices of a [`Maze`] into body descriptors. A closed
//! passage becomes a thin static wall on the shared edge of its two cells; an
//! open passage emits nothing. The four boundary walls, the goal and the ball
//! complete the plan.

use glam::Vec2;

use super::body::{BodyDesc, BodyHandle, Label};
use super::maze::Maze;
use super::world::World;
use crate::renderer::colors;
use crate::settings::Settings;

/// World geometry derived from settings and grid size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub unit_x: f32,
    pub unit_y: f32,
    pub wall_thickness: f32,
    pub border_thickness: f32,
    pub goal_ratio: f32,
    pub ball_ratio: f32,
}

impl Layout {
    /// Layout for a grid of `rows` x `cols` (settings must be validated)
    pub fn new(settings: &Settings, rows: usize, cols: usize) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            unit_x: settings.width / cols as f32,
            unit_y: settings.height / rows as f32,
            wall_thickness: settings.wall_thickness,
            border_thickness: settings.border_thickness,
            goal_ratio: settings.goal_ratio,
            ball_ratio: settings.ball_ratio,
        }
    }

    /// Centre of a grid cell in world coordinates
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            col as f32 * self.unit_x + self.unit_x / 2.0,
            row as f32 * self.unit_y + self.unit_y / 2.0,
        )
    }

    /// Grid cell containing a world point, clamped to the grid
    pub fn cell_at(&self, point: Vec2, rows: usize, cols: usize) -> (usize, usize) {
        let last_row = rows.saturating_sub(1) as f32;
        let last_col = cols.saturating_sub(1) as f32;
        let row = (point.y / self.unit_y).floor().clamp(0.0, last_row) as usize;
        let col = (point.x / self.unit_x).floor().clamp(0.0, last_col) as usize;
        (row, col)
    }

    pub fn ball_radius(&self) -> f32 {
        self.unit_x.min(self.unit_y) * self.ball_ratio
    }
}

/// Every body a maze needs, before it is added to a world
#[derive(Debug, Clone)]
pub struct WorldPlan {
    pub boundary: Vec<BodyDesc>,
    /// Walls for closed passages
    pub walls: Vec<BodyDesc>,
    pub goal: BodyDesc,
    pub ball: BodyDesc,
}

impl WorldPlan {
    /// Static obstacles: boundary, interior walls and the goal
    pub fn obstacle_count(&self) -> usize {
        self.boundary.len() + self.walls.len() + 1
    }

    /// Add every body to `world`
    pub fn install(self, world: &mut World) -> Installed {
        let boundary = self.boundary.into_iter().map(|d| world.add_body(d)).collect();
        let walls = self.walls.into_iter().map(|d| world.add_body(d)).collect();
        let goal = world.add_body(self.goal);
        let ball = world.add_body(self.ball);
        Installed {
            boundary,
            walls,
            goal,
            ball,
        }
    }
}

/// Handles of an installed plan
#[derive(Debug, Clone)]
pub struct Installed {
    pub boundary: Vec<BodyHandle>,
    pub walls: Vec<BodyHandle>,
    pub goal: BodyHandle,
    pub ball: BodyHandle,
}

impl Installed {
    /// Every body labelled `wall`
    pub fn all_walls(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.boundary.iter().chain(self.walls.iter()).copied()
    }
}

/// Compile a maze into body descriptors
pub fn compile(maze: &Maze, layout: &Layout) -> WorldPlan {
    let Layout {
        width,
        height,
        unit_x,
        unit_y,
        wall_thickness,
        border_thickness,
        ..
    } = *layout;

    let boundary = vec![
        BodyDesc::rectangle(
            Vec2::new(width / 2.0, 0.0),
            Vec2::new(width, border_thickness),
            Label::Wall,
        ),
        BodyDesc::rectangle(
            Vec2::new(width / 2.0, height),
            Vec2::new(width, border_thickness),
            Label::Wall,
        ),
        BodyDesc::rectangle(
            Vec2::new(0.0, height / 2.0),
            Vec2::new(border_thickness, height),
            Label::Wall,
        ),
        BodyDesc::rectangle(
            Vec2::new(width, height / 2.0),
            Vec2::new(border_thickness, height),
            Label::Wall,
        ),
    ];

    let mut walls = Vec::with_capacity(maze.closed_horizontal_count() + maze.closed_vertical_count());

    for (row, line) in maze.horizontals.iter().enumerate() {
        for (col, &open) in line.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(
                BodyDesc::rectangle(
                    Vec2::new(
                        col as f32 * unit_x + unit_x / 2.0,
                        row as f32 * unit_y + unit_y,
                    ),
                    Vec2::new(unit_x, wall_thickness),
                    Label::Wall,
                )
                .with_style(colors::WALL),
            );
        }
    }

    for (row, line) in maze.verticals.iter().enumerate() {
        for (col, &open) in line.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(
                BodyDesc::rectangle(
                    Vec2::new(
                        col as f32 * unit_x + unit_x,
                        row as f32 * unit_y + unit_y / 2.0,
                    ),
                    Vec2::new(wall_thickness, unit_y),
                    Label::Wall,
                )
                .with_style(colors::WALL),
            );
        }
    }

    let last = maze.last_cell();
    let goal = BodyDesc::rectangle(
        layout.cell_center(last.row, last.col),
        Vec2::new(unit_x * layout.goal_ratio, unit_y * layout.goal_ratio),
        Label::Goal,
    )
    .with_style(colors::GOAL);

    let first = maze.first_cell();
    let ball = BodyDesc::circle(
        layout.cell_center(first.row, first.col),
        layout.ball_radius(),
        Label::Ball,
    )
    .with_style(colors::BALL);

    WorldPlan {
        boundary,
        walls,
        goal,
        ball,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Shape;
    use crate::sim::maze::{Cell, Direction, generate, generate_from};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn layout_for(maze: &Maze) -> Layout {
        Layout::new(&Settings::default(), maze.rows, maze.cols)
    }

    fn size_of(desc: &BodyDesc) -> Vec2 {
        match desc.shape {
            Shape::Rect { size } => size,
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    #[test]
    fn test_three_by_three_plan() {
        let mut rng = Pcg32::seed_from_u64(3);
        let maze = generate_from(3, 3, Cell::new(0, 0), &mut rng).unwrap();
        let layout = layout_for(&maze);
        let plan = compile(&maze, &layout);

        // 12 interior edges, 8 of them opened
        assert_eq!(plan.walls.len(), 4);
        assert_eq!(plan.obstacle_count(), 4 + 4 + 1);

        assert_eq!(plan.goal.position, Vec2::new(500.0, 500.0));
        assert_eq!(plan.goal.label, Label::Goal);
        assert!(plan.goal.is_static);
        assert!((size_of(&plan.goal) - Vec2::splat(140.0)).length() < 0.001);

        assert_eq!(plan.ball.position, Vec2::new(100.0, 100.0));
        assert_eq!(plan.ball.label, Label::Ball);
        assert!(!plan.ball.is_static);
        assert_eq!(plan.ball.shape, Shape::Circle { radius: 50.0 });
    }

    #[test]
    fn test_wall_placement() {
        // 2x2 grid, everything closed except right of (0,0)
        let mut maze = Maze::closed(2, 2, Cell::new(0, 0));
        maze.open(Cell::new(0, 0), Direction::Right);
        let layout = layout_for(&maze);
        let plan = compile(&maze, &layout);

        let centers: Vec<(Vec2, Vec2)> = plan
            .walls
            .iter()
            .map(|d| (d.position, size_of(d)))
            .collect();
        assert_eq!(
            centers,
            vec![
                // horizontals[0][0], horizontals[0][1]
                (Vec2::new(150.0, 300.0), Vec2::new(300.0, 5.0)),
                (Vec2::new(450.0, 300.0), Vec2::new(300.0, 5.0)),
                // verticals[1][0]
                (Vec2::new(300.0, 450.0), Vec2::new(5.0, 300.0)),
            ]
        );
        assert!(plan.walls.iter().all(|d| d.label == Label::Wall && d.is_static));
    }

    #[test]
    fn test_boundary_spans_edges() {
        let maze = Maze::closed(1, 1, Cell::new(0, 0));
        let plan = compile(&maze, &layout_for(&maze));
        assert!(plan.walls.is_empty());
        assert_eq!(plan.boundary.len(), 4);
        assert!(plan.boundary.iter().all(|d| d.label == Label::Wall && d.is_static));

        let positions: Vec<Vec2> = plan.boundary.iter().map(|d| d.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(300.0, 0.0),
                Vec2::new(300.0, 600.0),
                Vec2::new(0.0, 300.0),
                Vec2::new(600.0, 300.0),
            ]
        );
        assert_eq!(size_of(&plan.boundary[0]), Vec2::new(600.0, 2.0));
        assert_eq!(size_of(&plan.boundary[2]), Vec2::new(2.0, 600.0));

        // Single cell: ball and goal share the centre
        assert_eq!(plan.goal.position, plan.ball.position);
    }

    #[test]
    fn test_rectangular_units() {
        let settings = Settings {
            rows: 2,
            cols: 4,
            width: 800.0,
            height: 300.0,
            ..Default::default()
        };
        let maze = generate(2, 4, &mut Pcg32::seed_from_u64(8)).unwrap();
        let layout = Layout::new(&settings, 2, 4);
        let plan = compile(&maze, &layout);

        assert_eq!(layout.unit_x, 200.0);
        assert_eq!(layout.unit_y, 150.0);
        assert_eq!(plan.goal.position, Vec2::new(700.0, 225.0));
        assert_eq!(plan.ball.shape, Shape::Circle { radius: 37.5 });
        assert_eq!(layout.cell_at(Vec2::new(650.0, 10.0), 2, 4), (0, 3));
        assert_eq!(layout.cell_at(Vec2::new(-5.0, 999.0), 2, 4), (1, 0));
    }

    #[test]
    fn test_cell_at_empty_grid_clamps_to_origin() {
        let layout = Layout::new(&Settings::default(), 3, 3);
        assert_eq!(layout.cell_at(Vec2::new(650.0, 10.0), 0, 0), (0, 0));
        assert_eq!(layout.cell_at(Vec2::new(450.0, 450.0), 0, 3), (0, 2));
    }

    #[test]
    fn test_install_returns_handles() {
        let maze = generate(4, 4, &mut Pcg32::seed_from_u64(12)).unwrap();
        let plan = compile(&maze, &layout_for(&maze));
        let total = plan.obstacle_count() + 1;
        let mut world = World::new(0.0);
        let installed = plan.install(&mut world);

        assert_eq!(world.len(), total);
        assert_eq!(world.body(installed.ball).map(|b| b.label), Some(Label::Ball));
        assert_eq!(world.body(installed.goal).map(|b| b.label), Some(Label::Goal));
        assert_eq!(installed.all_walls().count(), total - 2);
        assert!(installed
            .all_walls()
            .all(|h| world.body(h).map(|b| b.label) == Some(Label::Wall)));
    }

    proptest! {
        #[test]
        fn obstacle_count_matches_closed_passages(
            seed in any::<u64>(),
            rows in 1_usize..=10,
            cols in 1_usize..=10,
        ) {
            let maze = generate(rows, cols, &mut Pcg32::seed_from_u64(seed)).unwrap();
            let plan = compile(&maze, &layout_for(&maze));

            let expected = 4 + maze.closed_horizontal_count() + maze.closed_vertical_count() + 1;
            prop_assert_eq!(plan.obstacle_count(), expected);

            // Interior edges minus the spanning tree's passages
            let interior = (rows - 1) * cols + rows * (cols - 1);
            prop_assert_eq!(plan.walls.len(), interior - (rows * cols - 1));
        }
    }
}
