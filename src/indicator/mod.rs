//! Maps a compass heading onto the border of the 8x8 LED matrix, so that the
//! lit LED keeps pointing at north while the board turns.

pub mod matrix;

use core::fmt;

use crate::types::measurement::FULL_CIRCLE;

pub const WIDTH: u8 = 8;
pub const RING_SIZE: usize = 28;

/// Matrix indices (`y * 8 + x`) of the border LEDs, starting at the top edge
/// just right of center and walking clockwise.
pub const LED_LOOP: [u8; RING_SIZE] = [
    4, 5, 6, 7, 15, 23, 31, 39, 47, 55, 63, 62, 61, 60, //
    59, 58, 57, 56, 48, 40, 32, 24, 16, 8, 0, 1, 2, 3,
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub fn from_index(index: u8) -> Self {
        Self { x: index % WIDTH, y: index / WIDTH }
    }

    /// Row major matrix index, `None` when off the matrix
    pub fn index(&self) -> Option<usize> {
        match self.x < WIDTH && self.y < WIDTH {
            true => Some(self.y as usize * WIDTH as usize + self.x as usize),
            false => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Error {
    InvalidInput(f32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidInput(heading) => write!(f, "Heading {} not within [0, 360)", heading),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Update {
    pub position: Position,
    /// Position lit by the previous update, None on the first one
    pub previous: Option<Position>,
}

/// Ring slot for a heading; the ring turns the opposite way of the board.
pub fn ring_index(heading: f32) -> Result<usize, Error> {
    if !heading.is_finite() || heading < 0.0 || heading >= FULL_CIRCLE {
        return Err(Error::InvalidInput(heading));
    }
    let inverted = FULL_CIRCLE - heading;
    let index = libm::floorf(RING_SIZE as f32 * inverted / FULL_CIRCLE) as usize;
    Ok(index.min(RING_SIZE - 1))
}

#[derive(Default)]
pub struct DirectionIndicator {
    previous: Option<Position>,
}

impl DirectionIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Position> {
        self.previous
    }

    pub fn update(&mut self, heading: f32) -> Result<Update, Error> {
        let index = ring_index(heading)?;
        let position = Position::from_index(LED_LOOP[index]);
        let previous = self.previous.replace(position);
        if previous != Some(position) {
            trace!("Indicator moves to {} for heading {:.1}", position, heading);
        }
        Ok(Update { position, previous })
    }
}

/// Keeps the clear-old and set-new steps of concurrent updates from interleaving
pub type SharedIndicator = spin::Mutex<DirectionIndicator>;

mod test {
    #[test]
    fn test_led_loop_is_matrix_border() {
        use super::{Position, LED_LOOP, WIDTH};

        let mut seen = [false; 64];
        for (i, &index) in LED_LOOP.iter().enumerate() {
            let p = Position::from_index(index);
            assert!(p.x == 0 || p.y == 0 || p.x == WIDTH - 1 || p.y == WIDTH - 1);
            assert!(!seen[index as usize], "duplicated {}", index);
            seen[index as usize] = true;
            // consecutive entries are neighbours, including the wrap
            let next = Position::from_index(LED_LOOP[(i + 1) % LED_LOOP.len()]);
            let distance = (p.x as i8 - next.x as i8).abs() + (p.y as i8 - next.y as i8).abs();
            assert_eq!(distance, 1);
        }
    }

    #[test]
    fn test_position_index() {
        use super::{Position, LED_LOOP};

        for &index in LED_LOOP.iter() {
            assert_eq!(Position::from_index(index).index(), Some(index as usize));
        }
        assert_eq!(Position { x: 8, y: 0 }.index(), None);
        assert_eq!(Position { x: 0, y: 40 }.index(), None);
    }

    #[test]
    fn test_ring_index_inverted() {
        use super::ring_index;

        assert_eq!(ring_index(0.0), Ok(27));
        assert_eq!(ring_index(1.0), Ok(27));
        assert_eq!(ring_index(90.0), Ok(21));
        assert_eq!(ring_index(180.0), Ok(14));
        assert_eq!(ring_index(270.0), Ok(7));
        assert_eq!(ring_index(359.99), Ok(0));
    }

    #[test]
    fn test_wrap_around_adjacent() {
        use super::{ring_index, RING_SIZE};

        let low = ring_index(0.0).unwrap();
        let high = ring_index(360.0 - 1e-4).unwrap();
        let distance = (low as isize - high as isize).rem_euclid(RING_SIZE as isize);
        assert!(distance <= 1 || distance == RING_SIZE as isize - 1);
    }

    #[test]
    fn test_every_slot_reachable() {
        use super::{ring_index, RING_SIZE};

        let mut reached = [false; RING_SIZE];
        for tenth in 0..3600 {
            reached[ring_index(tenth as f32 / 10.0).unwrap()] = true;
        }
        assert!(reached.iter().all(|&r| r));
    }

    #[test]
    fn test_invalid_heading() {
        use super::{DirectionIndicator, Error};

        let mut indicator = DirectionIndicator::new();
        assert_eq!(indicator.update(360.0), Err(Error::InvalidInput(360.0)));
        assert_eq!(indicator.update(-0.5), Err(Error::InvalidInput(-0.5)));
        assert_eq!(indicator.update(f32::INFINITY), Err(Error::InvalidInput(f32::INFINITY)));
        assert!(indicator.update(f32::NAN).is_err());
        assert_eq!(indicator.position(), None);
    }

    #[test]
    fn test_update_keeps_previous() {
        use super::{DirectionIndicator, Position};

        let mut indicator = DirectionIndicator::new();
        let first = indicator.update(123.0).unwrap();
        assert_eq!(first.previous, None);
        let second = indicator.update(123.0).unwrap();
        assert_eq!(second.position, first.position);
        assert_eq!(second.previous, Some(first.position));

        let third = indicator.update(0.0).unwrap();
        assert_eq!(third.position, Position { x: 3, y: 0 });
        assert_eq!(third.previous, Some(first.position));
    }

    #[test]
    fn test_shared_indicator() {
        use super::{DirectionIndicator, SharedIndicator};

        let shared = SharedIndicator::new(DirectionIndicator::new());
        shared.lock().update(45.0).unwrap();
        let update = shared.lock().update(50.0).unwrap();
        assert!(update.previous.is_some());
    }
}
