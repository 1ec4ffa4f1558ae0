use gl_scoped::linear::Vec2;

/// Clip-space units a held direction moves a shape per frame.
pub const PAN_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, PAN_STEP),
            Direction::Down => Vec2::new(0.0, -PAN_STEP),
            Direction::Left => Vec2::new(-PAN_STEP, 0.0),
            Direction::Right => Vec2::new(PAN_STEP, 0.0),
        }
    }
}

/// Folds the directions held this frame into one translation delta.
/// Simultaneous directions compose additively; the input-polling layer feeds
/// the result to the most recently registered shape.
pub fn pan_delta(held: &[Direction]) -> Vec2 {
    held.iter().fold(Vec2::zero(), |acc, d| acc + d.delta())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_direction_is_one_step() {
        assert_eq!(pan_delta(&[Direction::Right]), Vec2::new(PAN_STEP, 0.0));
        assert_eq!(pan_delta(&[Direction::Down]), Vec2::new(0.0, -PAN_STEP));
    }

    #[test]
    fn opposite_directions_cancel() {
        assert_eq!(
            pan_delta(&[Direction::Left, Direction::Right]),
            Vec2::zero()
        );
    }

    #[test]
    fn diagonals_compose_additively() {
        assert_eq!(
            pan_delta(&[Direction::Up, Direction::Right]),
            Vec2::new(PAN_STEP, PAN_STEP)
        );
    }

    #[test]
    fn nothing_held_means_no_motion() {
        assert_eq!(pan_delta(&[]), Vec2::zero());
    }
}
