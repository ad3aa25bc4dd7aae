use core::{fmt, ops};

pub mod euler;

pub use euler::{Orientation, DEGREE_PER_DAG};

pub const FULL_CIRCLE: f32 = 360.0;

/// Wraps a finite angle in degrees into [0, 360).
///
/// NaN is passed through untouched, callers validating input must check for it.
pub fn normalize(degrees: f32) -> f32 {
    let mut value = degrees % FULL_CIRCLE;
    if value < 0.0 {
        value += FULL_CIRCLE;
    }
    // -1e-8 + 360.0 rounds to 360.0 in f32, and -0.0 would print as "-0"
    if value >= FULL_CIRCLE || value == 0.0 {
        return 0.0;
    }
    value
}

/// Compass heading in degrees, 0 toward the reference axis, increasing clockwise
/// when viewed from above. Always within [0, 360).
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct Heading(f32);

impl Heading {
    pub fn new(degrees: f32) -> Self {
        Self(normalize(degrees))
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    /// Signed angle from `other` to `self`, within (-180, 180]
    pub fn deviation(self, other: Self) -> f32 {
        let delta = self.0 - other.0;
        if delta > FULL_CIRCLE / 2.0 {
            delta - FULL_CIRCLE
        } else if delta <= -FULL_CIRCLE / 2.0 {
            delta + FULL_CIRCLE
        } else {
            delta
        }
    }
}

impl ops::Add<f32> for Heading {
    type Output = Self;

    fn add(self, degrees: f32) -> Self {
        Self::new(self.0 + degrees)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl<'a> serde::Deserialize<'a> for Heading {
    fn deserialize<D: serde::Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(<f32 as serde::Deserialize>::deserialize(deserializer)?))
    }
}

mod test {
    #[test]
    fn test_normalize() {
        use super::normalize;

        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(-0.0), 0.0);
        assert_eq!(normalize(90.0), 90.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(450.0), 90.0);
        assert_eq!(normalize(-720.0), 0.0);
        assert_eq!(normalize(-1e-8), 0.0);
        assert!(normalize(f32::NAN).is_nan());
    }

    #[test]
    fn test_deviation() {
        use super::Heading;

        assert_eq!(Heading::new(10.0).deviation(Heading::new(350.0)), 20.0);
        assert_eq!(Heading::new(350.0).deviation(Heading::new(10.0)), -20.0);
        assert_eq!(Heading::new(180.0).deviation(Heading::new(0.0)), 180.0);
        assert_eq!(Heading::new(0.0).deviation(Heading::new(180.0)), 180.0);
        assert_eq!(Heading::new(45.0).deviation(Heading::new(45.0)), 0.0);
    }

    #[test]
    fn test_add_declination() {
        use super::Heading;

        assert_eq!(Heading::new(355.0) + 10.0, Heading::new(5.0));
        assert_eq!(Heading::new(5.0) + -10.0, Heading::new(355.0));
    }

    #[test]
    fn test_serde() {
        use super::Heading;

        assert_eq!("90.0", serde_json::to_string(&Heading::new(450.0)).unwrap());
        let heading: Heading = serde_json::from_str("-90.0").unwrap();
        assert_eq!(heading.degrees(), 270.0);
    }
}
