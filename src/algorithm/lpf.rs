use crate::types::sensor::Magnetism;

/// First order low pass filter
pub struct LPF {
    alpha: f32,
    value: Option<f32>,
}

impl LPF {
    pub fn new(sample_rate: f32, freq: f32) -> Self {
        let rc = 1.0 / (2.0 * core::f32::consts::PI * freq);
        let alpha = 1.0 / (1.0 + rc * sample_rate);
        Self { alpha, value: None }
    }

    /// First sample passes through, so the output does not ramp up from zero
    pub fn filter(&mut self, sample: f32) -> f32 {
        let value = match self.value {
            Some(value) => (1.0 - self.alpha) * value + self.alpha * sample,
            None => sample,
        };
        self.value = Some(value);
        value
    }

    pub fn reset(&mut self) {
        self.value = None
    }
}

/// Smooths each magnetometer axis independently. Filtering the axes rather than
/// the heading keeps the 0/360 wrap out of the filter.
pub struct AxesLPF {
    x: LPF,
    y: LPF,
    z: LPF,
}

impl AxesLPF {
    pub fn new(sample_rate: f32, freq: f32) -> Self {
        Self {
            x: LPF::new(sample_rate, freq),
            y: LPF::new(sample_rate, freq),
            z: LPF::new(sample_rate, freq),
        }
    }

    pub fn filter(&mut self, magnetism: Magnetism) -> Magnetism {
        Magnetism {
            x: self.x.filter(magnetism.x),
            y: self.y.filter(magnetism.y),
            z: self.z.filter(magnetism.z),
        }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
    }
}

mod test {
    #[test]
    fn test_lpf() {
        use super::LPF;

        let mut lpf = LPF::new(10.0, 1.0);
        assert_eq!(lpf.filter(3.335), 3.335);
        let value0 = lpf.filter(3.295);
        let value1 = lpf.filter(3.295);
        assert!(3.295 < value1 && value1 < value0);
        let value2 = lpf.filter(3.295);
        assert!(3.295 < value2 && value2 < value1);
    }

    #[test]
    fn test_axes_lpf() {
        use super::AxesLPF;
        use crate::types::sensor::Magnetism;

        let mut lpf = AxesLPF::new(10.0, 1.0);
        let first = Magnetism::new(10.0, -10.0, 0.0);
        assert_eq!(lpf.filter(first), first);
        let output = lpf.filter(Magnetism::new(20.0, -20.0, 0.0));
        assert!(10.0 < output.x && output.x < 20.0);
        assert!(-20.0 < output.y && output.y < -10.0);
        assert_eq!(output.z, 0.0);

        lpf.reset();
        let fresh = Magnetism::new(1.0, 2.0, 3.0);
        assert_eq!(lpf.filter(fresh), fresh);
    }
}
