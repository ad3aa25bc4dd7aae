use core::fmt::{self, Write};

use super::{Position, WIDTH};
use crate::hal::indicator::IndicatorSink;

pub type RGB = [u8; 3];

const SIZE: usize = (WIDTH as usize) * (WIDTH as usize);
const TEXT_SIZE: usize = SIZE + WIDTH as usize;

/// Frame buffer model of the Sense HAT LED matrix
pub struct Matrix {
    pixels: [RGB; SIZE],
    color: RGB,
}

impl Matrix {
    pub fn new(color: RGB) -> Self {
        Self { pixels: [[0; 3]; SIZE], color }
    }

    pub fn set_color(&mut self, color: RGB) {
        self.color = color
    }

    pub fn pixel(&self, position: Position) -> Option<RGB> {
        position.index().map(|index| self.pixels[index])
    }

    fn write(&mut self, position: Position, rgb: RGB) {
        match position.index() {
            Some(index) => self.pixels[index] = rgb,
            None => warn!("LED {} outside of matrix", position),
        }
    }

    pub fn lit(&self) -> impl Iterator<Item = Position> + '_ {
        let indices = self.pixels.iter().enumerate().filter(|(_, rgb)| **rgb != [0; 3]);
        indices.map(|(i, _)| Position::from_index(i as u8))
    }

    /// One text line per matrix row, `#` for a lit LED
    pub fn render(&self) -> heapless::String<TEXT_SIZE> {
        let mut string = heapless::String::new();
        write!(string, "{}", self).ok();
        string
    }
}

impl IndicatorSink for Matrix {
    fn set(&mut self, position: Position) {
        self.write(position, self.color)
    }

    fn clear(&mut self, position: Position) {
        self.write(position, [0; 3])
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.pixels.chunks(WIDTH as usize) {
            for rgb in row {
                f.write_char(if *rgb == [0; 3] { '.' } else { '#' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

mod test {
    #[test]
    fn test_set_and_clear() {
        use super::Matrix;
        use crate::hal::indicator::IndicatorSink;
        use crate::indicator::Position;

        let mut matrix = Matrix::new([255, 0, 0]);
        let position = Position { x: 7, y: 3 };
        matrix.set(position);
        assert_eq!(matrix.pixel(position), Some([255, 0, 0]));
        assert_eq!(matrix.lit().collect::<std::vec::Vec<_>>(), [position]);
        matrix.clear(position);
        assert_eq!(matrix.lit().count(), 0);
    }

    #[test]
    fn test_render() {
        use super::Matrix;
        use crate::hal::indicator::IndicatorSink;
        use crate::indicator::Position;

        let mut matrix = Matrix::new([0, 0, 255]);
        matrix.set(Position { x: 3, y: 0 });
        matrix.set(Position { x: 0, y: 7 });
        let expected = "...#....\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        #.......\n";
        assert_eq!(matrix.render().as_str(), expected);
    }

    #[test]
    fn test_off_matrix_ignored() {
        use super::Matrix;
        use crate::hal::indicator::IndicatorSink;
        use crate::indicator::Position;

        let mut matrix = Matrix::new([255, 255, 255]);
        matrix.set(Position { x: 9, y: 9 });
        matrix.set(Position { x: 0, y: 40 });
        matrix.set(Position { x: 255, y: 255 });
        matrix.clear(Position { x: 8, y: 0 });
        assert_eq!(matrix.lit().count(), 0);
        assert_eq!(matrix.pixel(Position { x: 9, y: 9 }), None);
    }
}
