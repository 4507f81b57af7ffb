pub mod edge;
pub mod swipe;

pub use edge::{Disposition, EdgeBackNavigator};
pub use swipe::{Side, SwipeConfig, SwipeController};

/// A pointer position in gesture units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}
