#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

use std::time;

use balloon_compass::components::compass::{self, Compass, Reading};
use balloon_compass::config::{setter, Config};
use balloon_compass::hal::sensors::{Instant, Sample};
use balloon_compass::indicator::matrix::Matrix;
use balloon_compass::types::measurement::{Heading, Orientation, FULL_CIRCLE};
use balloon_compass::types::sensor::Magnetism;

/// Orientation the way a Sense HAT reports it, in degrees
#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub struct OrientationDegrees {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl From<OrientationDegrees> for Orientation {
    fn from(o: OrientationDegrees) -> Self {
        Orientation::from_degrees(o.roll, o.pitch, o.yaw)
    }
}

/// Raw Sense HAT `get_compass()` reading in degrees. It turns the opposite way
/// of a heading and is mirrored into heading convention on arrival.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct ReferenceCompass {
    pub heading: f32,
}

pub type Outcome = Option<Result<Reading, compass::Error>>;

pub struct Simulator {
    config: Config,
    compass: Compass<Matrix>,
    epoch: time::Instant,
    magnetism: Option<(Magnetism, Instant)>,
    orientation: Option<(Orientation, Instant)>,
    reference: Option<f32>,
    reading: Option<Reading>,
}

impl Simulator {
    pub fn new(config: Config) -> Self {
        let compass = Compass::new(&config.compass, Matrix::new(config.indicator.color));
        Self {
            config,
            compass,
            epoch: time::Instant::now(),
            magnetism: None,
            orientation: None,
            reference: None,
            reading: None,
        }
    }

    fn now(&self) -> Instant {
        Instant::from_ticks(self.epoch.elapsed().as_millis() as u64)
    }

    pub fn get_reading(&self) -> Option<Reading> {
        self.reading
    }

    pub fn render_indicator(&self) -> String {
        self.compass.sink().render().as_str().to_owned()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, path: &str, value: Option<&str>) -> Result<(), setter::Error> {
        let mut config = self.config;
        match value {
            Some(value) => config.assign(&format!("{}={}", path, value))?,
            None => config.assign(path)?,
        }
        info!("Config {} updated", path);
        self.compass.reconfigure(&config.compass);
        self.compass.sink_mut().set_color(config.indicator.color);
        self.config = config;
        Ok(())
    }

    pub fn update_magnetism(&mut self, magnetism: Magnetism) -> Outcome {
        let now = self.now();
        self.update_magnetism_at(magnetism, now)
    }

    pub fn update_magnetism_at(&mut self, magnetism: Magnetism, at: Instant) -> Outcome {
        self.magnetism = Some((magnetism, at));
        self.invoke()
    }

    pub fn update_orientation(&mut self, orientation: OrientationDegrees) -> Outcome {
        let now = self.now();
        self.update_orientation_at(orientation.into(), now)
    }

    pub fn update_orientation_at(&mut self, orientation: Orientation, at: Instant) -> Outcome {
        self.orientation = Some((orientation, at));
        self.invoke()
    }

    pub fn update_reference(&mut self, reference: ReferenceCompass) {
        self.reference = Some(Heading::new(FULL_CIRCLE - reference.heading).degrees());
    }

    /// Runs the compass once both halves of a sample arrived
    fn invoke(&mut self) -> Outcome {
        if self.magnetism.is_none() || self.orientation.is_none() {
            return None;
        }
        let (magnetism, magnetism_at) = self.magnetism.take()?;
        let (orientation, orientation_at) = self.orientation.take()?;
        let reference = self.reference.take();
        let sample = Sample { magnetism, magnetism_at, orientation, orientation_at, reference };
        trace!("Invoke compass update");
        let result = self.compass.update(&sample);
        match &result {
            Ok(reading) => {
                if let (Some(compass), Some(deviation)) = (reference, reading.deviation) {
                    let heading = reading.heading;
                    debug!("Compass {:.0} heading {} deviation {:.0}", compass, heading, deviation);
                }
                self.reading = Some(*reading)
            }
            Err(e) => warn!("Compass update failed: {}", e),
        }
        Some(result)
    }
}

mod test {
    #[test]
    fn test_pairing() {
        use balloon_compass::hal::sensors::Instant;
        use balloon_compass::types::{measurement::Orientation, sensor::Magnetism};

        use super::Simulator;

        let mut simulator = Simulator::new(Default::default());
        let at = Instant::from_ticks(1000);
        assert!(simulator.update_magnetism_at(Magnetism::new(0.0, 30.0, -10.0), at).is_none());
        assert!(simulator.get_reading().is_none());
        let outcome = simulator.update_orientation_at(Orientation::default(), at).unwrap();
        let reading = outcome.unwrap();
        assert!((reading.heading.degrees() - 90.0).abs() < 1e-3);
        assert_eq!(simulator.get_reading(), Some(reading));

        // pair consumed, next orientation alone does nothing
        assert!(simulator.update_orientation_at(Orientation::default(), at).is_none());
    }

    #[test]
    fn test_skewed_pair() {
        use balloon_compass::components::compass::Error;
        use balloon_compass::hal::sensors::Instant;
        use balloon_compass::types::{measurement::Orientation, sensor::Magnetism};

        use super::Simulator;

        let mut simulator = Simulator::new(Default::default());
        simulator.update_magnetism_at(Magnetism::new(30.0, 0.0, 0.0), Instant::from_ticks(0));
        let outcome = simulator.update_orientation_at(Orientation::default(), Instant::from_ticks(500));
        assert!(matches!(outcome, Some(Err(Error::Skewed(_)))));
        assert!(simulator.get_reading().is_none());
    }

    #[test]
    fn test_indicator_and_config() {
        use balloon_compass::hal::sensors::Instant;
        use balloon_compass::types::{measurement::Orientation, sensor::Magnetism};

        use super::{ReferenceCompass, Simulator};

        let mut simulator = Simulator::new(Default::default());
        simulator.set_config("compass.declination", Some("12.5")).unwrap();
        assert!(simulator.set_config("compass.unknown", Some("1")).is_err());
        assert_eq!(simulator.config().compass.declination, 12.5);

        let at = Instant::from_ticks(0);
        simulator.update_reference(ReferenceCompass { heading: 355.0 });
        simulator.update_magnetism_at(Magnetism::new(30.0, 0.0, 0.0), at);
        let reading = simulator.update_orientation_at(Orientation::default(), at).unwrap().unwrap();
        assert!((reading.true_heading.degrees() - 12.5).abs() < 1e-3);
        assert!((reading.deviation.unwrap() - 5.0).abs() < 1e-3);
        assert!(simulator.render_indicator().starts_with("...#....\n"));
    }

    #[test]
    fn test_reference_compass_mirrored() {
        use balloon_compass::hal::sensors::Instant;
        use balloon_compass::types::{measurement::Orientation, sensor::Magnetism};

        use super::{ReferenceCompass, Simulator};

        let mut simulator = Simulator::new(Default::default());
        let at = Instant::from_ticks(0);
        simulator.update_reference(ReferenceCompass { heading: 270.0 });
        simulator.update_magnetism_at(Magnetism::new(0.0, 30.0, -10.0), at);
        let reading = simulator.update_orientation_at(Orientation::default(), at).unwrap().unwrap();
        assert!((reading.heading.degrees() - 90.0).abs() < 1e-3);
        assert!(reading.deviation.unwrap().abs() < 1e-3);

        simulator.update_reference(ReferenceCompass { heading: 0.0 });
        simulator.update_magnetism_at(Magnetism::new(30.0, 1.0, -10.0), at);
        let reading = simulator.update_orientation_at(Orientation::default(), at).unwrap().unwrap();
        assert!(reading.deviation.unwrap().abs() < 2.0);
    }
}
