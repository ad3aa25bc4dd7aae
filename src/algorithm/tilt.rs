use libm::{atan2f, cosf, sinf};

use crate::types::{
    measurement::{Heading, Orientation, DEGREE_PER_DAG},
    sensor::Magnetism,
};

/// Projects the magnetometer reading onto the horizontal plane and returns
/// the planar angle of the field.
///
/// `orientation.pitch` and `orientation.roll` must be radians, yaw is ignored.
/// An all-zero field yields 0, a zero reading is a sensor fault to be detected
/// upstream.
pub fn compute_heading(magnetism: &Magnetism, orientation: &Orientation) -> Heading {
    let (m, pitch, roll) = (magnetism, orientation.pitch, orientation.roll);
    let (sp, cp) = (sinf(pitch), cosf(pitch));
    let (sr, cr) = (sinf(roll), cosf(roll));

    let x_h = m.x * cp + m.y * sr * sp - m.z * cr * sp;
    let y_h = m.y * cr - m.z * sr;
    if x_h == 0.0 && y_h == 0.0 {
        return Heading::default(); // atan2(0, -0) is 180
    }

    let mut heading = atan2f(y_h, x_h) * DEGREE_PER_DAG;
    if heading < 0.0 {
        heading += 360.0;
    }
    Heading::new(heading)
}

mod test {
    #[test]
    fn test_level_cardinal_points() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        let level = Orientation::default();
        let cases = [((1.0, 0.0, 0.0), 0.0), ((0.0, 1.0, 0.0), 90.0), ((-1.0, 0.0, 0.0), 180.0)];
        for ((x, y, z), expected) in cases.iter() {
            let heading = compute_heading(&Magnetism::new(*x, *y, *z), &level);
            assert!((heading.degrees() - expected).abs() < 1e-4, "{} != {}", heading, expected);
        }
        let heading = compute_heading(&Magnetism::new(0.0, -1.0, 0.0), &level);
        assert!((heading.degrees() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_level_matches_planar_atan2() {
        use super::compute_heading;
        use crate::types::{
            measurement::{normalize, Orientation},
            sensor::Magnetism,
        };

        for i in 0..36 {
            let angle = (i * 10) as f32 + 3.0;
            let (y, x) = angle.to_radians().sin_cos();
            let mag = Magnetism::new(x * 48.0, y * 48.0, -20.0);
            let heading = compute_heading(&mag, &Orientation::default());
            let expected = normalize(y.atan2(x).to_degrees());
            assert!((heading.degrees() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_field() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        for orientation in [
            Orientation::default(),
            Orientation::new(0.3, -0.2, 1.0),
            Orientation::from_degrees(-80.0, 45.0, 270.0),
            Orientation::new(2.0, 2.5, 0.0),
        ] {
            assert_eq!(compute_heading(&Magnetism::default(), &orientation).degrees(), 0.0);
        }
    }

    #[test]
    fn test_always_normalized() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        let values = [-1000.0, -37.5, -1.0, -1e-7, 0.0, 1e-7, 0.5, 12.0, 1e4];
        let angles = [-3.0, -1.2, -0.01, 0.0, 0.7, 1.5, 3.1];
        for &x in values.iter() {
            for &y in values.iter() {
                for &z in values.iter().step_by(3) {
                    for &pitch in angles.iter() {
                        for &roll in angles.iter() {
                            let mag = Magnetism::new(x, y, z);
                            let heading = compute_heading(&mag, &Orientation::new(roll, pitch, 0.0));
                            let degrees = heading.degrees();
                            assert!(degrees >= 0.0 && degrees < 360.0, "{:?} => {}", mag, degrees);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_pitch_compensation() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        // horizontal field (hx, hy) with vertical component v, seen by a pitched sensor
        let (hx, hy, v) = (0.6f32, 0.6f32, -0.8f32);
        for degrees in [-60.0f32, -20.0, 0.0, 15.0, 50.0] {
            let pitch = degrees.to_radians();
            let (sp, cp) = pitch.sin_cos();
            let mag = Magnetism::new(hx * cp + v * sp, hy, -hx * sp + v * cp);
            let heading = compute_heading(&mag, &Orientation::new(0.0, pitch, 0.0));
            assert!((heading.degrees() - 45.0).abs() < 1e-3, "pitch {} => {}", degrees, heading);
        }
    }

    #[test]
    fn test_roll_compensation() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        let (hx, hy, v) = (-0.5f32, 0.5f32, 0.7f32);
        for degrees in [-45.0f32, -10.0, 30.0, 70.0] {
            let roll = degrees.to_radians();
            let (sr, cr) = roll.sin_cos();
            let mag = Magnetism::new(hx, hy * cr + v * sr, -hy * sr + v * cr);
            let heading = compute_heading(&mag, &Orientation::new(roll, 0.0, 0.0));
            assert!((heading.degrees() - 135.0).abs() < 1e-3, "roll {} => {}", degrees, heading);
        }
    }

    #[test]
    fn test_tilt_changes_uncompensated_reading() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        let pitch = 40f32.to_radians();
        let (sp, cp) = pitch.sin_cos();
        let mag = Magnetism::new(0.6 * cp - 0.8 * sp, 0.6, -0.6 * sp - 0.8 * cp);
        let naive = compute_heading(&mag, &Orientation::default());
        let compensated = compute_heading(&mag, &Orientation::new(0.0, pitch, 0.0));
        assert!((compensated.degrees() - 45.0).abs() < 1e-3);
        assert!((naive.degrees() - 45.0).abs() > 5.0);
    }

    #[test]
    fn test_single_wrap_per_rotation() {
        use super::compute_heading;
        use crate::types::{measurement::Orientation, sensor::Magnetism};

        let orientation = Orientation::new(0.1, -0.15, 0.0);
        let mut last: Option<f32> = None;
        let mut wraps = 0;
        for step in 0..=720 {
            let angle = (step as f32 * 0.5).to_radians();
            let (y, x) = angle.sin_cos();
            let heading = compute_heading(&Magnetism::new(x, y, 0.3), &orientation).degrees();
            if let Some(previous) = last {
                let delta = (heading - previous).abs();
                if delta > 180.0 {
                    wraps += 1;
                } else {
                    assert!(delta < 2.0, "jump of {} at step {}", delta, step);
                }
            }
            last = Some(heading);
        }
        assert_eq!(wraps, 1);
    }
}
