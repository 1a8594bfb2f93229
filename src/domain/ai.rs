/// Enemy targeting heuristic.
///
/// Straight-line-to-target only, no pathfinding: compare coordinates with
/// the target and step along one axis per turn. When the x coordinates
/// match (within floating epsilon — positions are continuous mid-move),
/// close the gap on y; otherwise close it on x. Never diagonal.

use super::grid::Vec2;

pub fn chase_direction(from: Vec2, target: Vec2) -> (i32, i32) {
    if (target.x - from.x).abs() < f32::EPSILON {
        (0, if target.y > from.y { 1 } else { -1 })
    } else {
        (if target.x > from.x { 1 } else { -1 }, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Cell;

    #[test]
    fn same_column_moves_along_y() {
        let dir = chase_direction(Cell::new(3, 5).to_vec2(), Cell::new(3, 1).to_vec2());
        assert_eq!(dir, (0, -1));
        let dir = chase_direction(Cell::new(3, 1).to_vec2(), Cell::new(3, 5).to_vec2());
        assert_eq!(dir, (0, 1));
    }

    #[test]
    fn different_column_moves_along_x() {
        let dir = chase_direction(Cell::new(6, 2).to_vec2(), Cell::new(1, 7).to_vec2());
        assert_eq!(dir, (-1, 0));
        let dir = chase_direction(Cell::new(1, 7).to_vec2(), Cell::new(6, 2).to_vec2());
        assert_eq!(dir, (1, 0));
    }

    #[test]
    fn never_diagonal() {
        for (fx, fy, tx, ty) in [(1, 1, 6, 6), (6, 6, 1, 1), (2, 5, 5, 2)] {
            let (dx, dy) =
                chase_direction(Cell::new(fx, fy).to_vec2(), Cell::new(tx, ty).to_vec2());
            assert!(dx == 0 || dy == 0);
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }
}
