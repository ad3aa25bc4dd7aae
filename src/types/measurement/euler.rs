use core::f32::consts::PI;

pub const DEGREE_PER_DAG: f32 = 180.0 / PI;

/// Device tilt, all angles in radians.
#[derive(Default, Copy, Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Orientation {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Sense HAT style readings are in degrees
    pub fn from_degrees(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self::new(roll, pitch, yaw) / DEGREE_PER_DAG
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

impl core::ops::Mul<f32> for Orientation {
    type Output = Self;

    fn mul(self, m: f32) -> Orientation {
        Orientation { roll: self.roll * m, pitch: self.pitch * m, yaw: self.yaw * m }
    }
}

impl core::ops::Div<f32> for Orientation {
    type Output = Self;

    fn div(self, d: f32) -> Orientation {
        Orientation { roll: self.roll / d, pitch: self.pitch / d, yaw: self.yaw / d }
    }
}

mod test {
    #[test]
    fn test_degrees_round_trip() {
        use super::{Orientation, DEGREE_PER_DAG};

        let orientation = Orientation::from_degrees(90.0, -45.0, 180.0);
        assert!((orientation.roll - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((orientation.pitch + core::f32::consts::FRAC_PI_4).abs() < 1e-6);
        let degrees = orientation * DEGREE_PER_DAG;
        assert!((degrees.roll - 90.0).abs() < 1e-3);
        assert!((degrees.pitch + 45.0).abs() < 1e-3);
        assert!((degrees.yaw - 180.0).abs() < 1e-3);
    }
}
