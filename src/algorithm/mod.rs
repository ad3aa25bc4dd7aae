pub mod lpf;
pub mod tilt;

pub use tilt::compute_heading;
