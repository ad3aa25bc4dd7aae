use nalgebra::Vector3;

/// Hard-iron offset, subtracted from the raw reading
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bias {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Soft-iron scale, applied per axis after the offset
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gain {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Gain {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

/// Raw magnetic field strength along the sensor axes, in whatever unit the
/// magnetometer reports (micro-tesla on a Sense HAT).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Magnetism {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Magnetism {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn calibrate(self, bias: &Bias, gain: &Gain) -> Self {
        let v: Vector3<f32> = self.into();
        let bias = Vector3::new(bias.x, bias.y, bias.z);
        let gain = Vector3::new(gain.x, gain.y, gain.z);
        (v - bias).component_mul(&gain).into()
    }
}

impl Into<Vector3<f32>> for Magnetism {
    fn into(self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3<f32>> for Magnetism {
    fn from(v: Vector3<f32>) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }
}

mod test {
    #[test]
    fn test_calibrate() {
        use super::{Bias, Gain, Magnetism};

        let raw = Magnetism::new(12.0, -3.0, 40.0);
        let bias = Bias { x: 2.0, y: -1.0, z: 10.0 };
        let gain = Gain { x: 0.5, y: 2.0, z: 1.0 };
        assert_eq!(raw.calibrate(&bias, &gain), Magnetism::new(5.0, -4.0, 30.0));
    }

    #[test]
    fn test_default_calibration_is_identity() {
        use super::Magnetism;

        let raw = Magnetism::new(-21.5, 7.25, 0.0);
        assert_eq!(raw.calibrate(&Default::default(), &Default::default()), raw);
    }

    #[test]
    fn test_serialize() {
        use serde_json::json;

        use super::Magnetism;

        let expected = json!({"x": 1.0, "y": -2.0, "z": 0.5});
        assert_eq!(expected, serde_json::to_value(&Magnetism::new(1.0, -2.0, 0.5)).unwrap());
    }
}
