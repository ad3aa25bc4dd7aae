use core::{convert::Infallible, fmt};

use fugit::MillisDurationU64 as Duration;

use crate::{
    algorithm::{compute_heading, lpf::AxesLPF},
    config,
    hal::{IndicatorSink, Sample, SensorSource},
    indicator::{self, DirectionIndicator, Update},
    types::measurement::Heading,
};

#[derive(Debug)]
pub enum Error<E = Infallible> {
    Source(E),
    /// Magnetometer and orientation readings too far apart for tilt compensation
    Skewed(Duration),
    /// NaN or infinity in magnetometer or orientation readout
    InvalidSample,
    Indicator(indicator::Error),
}

impl Error {
    fn cast<E>(self) -> Error<E> {
        match self {
            Self::Source(never) => match never {},
            Self::Skewed(skew) => Error::Skewed(skew),
            Self::InvalidSample => Error::InvalidSample,
            Self::Indicator(e) => Error::Indicator(e),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Sensor read failed: {}", e),
            Self::Skewed(skew) => write!(f, "Readings {}ms apart", skew.ticks()),
            Self::InvalidSample => write!(f, "Non-finite sensor readout"),
            Self::Indicator(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Reading {
    /// Tilt compensated magnetic heading
    pub heading: Heading,
    /// Magnetic heading corrected by declination
    pub true_heading: Heading,
    /// Reference compass minus computed heading, within (-180, 180]
    pub deviation: Option<f32>,
    pub indicator: Update,
}

/// One polling cycle: calibrate, smooth, compensate tilt, then move the indicator.
/// The indicator points at magnetic north.
pub struct Compass<S> {
    config: config::Compass,
    filter: Option<AxesLPF>,
    indicator: DirectionIndicator,
    sink: S,
}

fn build_filter(config: &config::Compass) -> Option<AxesLPF> {
    match config.cutoff > 0.0 {
        true => Some(AxesLPF::new(config.sample_rate, config.cutoff)),
        false => None,
    }
}

impl<S: IndicatorSink> Compass<S> {
    pub fn new(config: &config::Compass, sink: S) -> Self {
        info!("Compass declination {:.1}, cutoff {:.1}Hz", config.declination, config.cutoff);
        let filter = build_filter(config);
        Self { config: *config, filter, indicator: DirectionIndicator::new(), sink }
    }

    pub fn reconfigure(&mut self, config: &config::Compass) {
        if self.config == *config {
            return;
        }
        info!("Compass reconfigured");
        self.filter = build_filter(config);
        self.config = *config;
    }

    pub fn config(&self) -> &config::Compass {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn update(&mut self, sample: &Sample) -> Result<Reading, Error> {
        let skew = sample.skew();
        if skew.ticks() > self.config.max_skew as u64 {
            warn!("Magnetometer and orientation {}ms apart, skipped", skew.ticks());
            return Err(Error::Skewed(skew));
        }
        if !sample.magnetism.is_finite() || !sample.orientation.is_finite() {
            warn!("Non-finite readout {:?} {:?}", sample.magnetism, sample.orientation);
            return Err(Error::InvalidSample);
        }
        if sample.magnetism.is_zero() {
            warn!("All zero magnetometer readout");
        }

        let config = &self.config;
        let mut magnetism = sample.magnetism.calibrate(&config.bias, &config.gain);
        if let Some(ref mut filter) = self.filter {
            magnetism = filter.filter(magnetism);
        }

        let heading = compute_heading(&magnetism, &sample.orientation);
        let true_heading = heading + config.declination;
        let deviation = sample.reference.map(|r| Heading::new(r).deviation(heading));

        let update = self.indicator.update(heading.degrees()).map_err(Error::Indicator)?;
        if let Some(previous) = update.previous {
            if previous != update.position {
                self.sink.clear(previous);
            }
        }
        self.sink.set(update.position);

        debug!("Heading {} true {} at {}", heading, true_heading, update.position);
        Ok(Reading { heading, true_heading, deviation, indicator: update })
    }

    pub fn poll<SS: SensorSource>(&mut self, source: &mut SS) -> Result<Reading, Error<SS::Error>> {
        let sample = source.read().map_err(Error::Source)?;
        self.update(&sample).map_err(Error::cast)
    }
}

mod test {
    #[cfg(test)]
    mod fixture {
        use std::vec::Vec;

        use crate::{
            hal::{indicator::IndicatorSink, sensors::Instant, Sample, SensorSource},
            indicator::Position,
            types::{measurement::Orientation, sensor::Magnetism},
        };

        #[derive(Default)]
        pub struct Recorder(pub Vec<(bool, Position)>);

        impl IndicatorSink for Recorder {
            fn set(&mut self, position: Position) {
                self.0.push((true, position))
            }

            fn clear(&mut self, position: Position) {
                self.0.push((false, position))
            }
        }

        pub struct Replay(pub Vec<Sample>);

        impl SensorSource for Replay {
            type Error = &'static str;

            fn read(&mut self) -> Result<Sample, &'static str> {
                match self.0.is_empty() {
                    true => Err("exhausted"),
                    false => Ok(self.0.remove(0)),
                }
            }
        }

        pub fn level(x: f32, y: f32) -> Sample {
            Sample::new(Magnetism::new(x, y, -30.0), Orientation::default(), Instant::from_ticks(0))
        }
    }

    #[test]
    fn test_heading_and_declination() {
        use super::Compass;
        use crate::config;
        use self::fixture::{Recorder, level};

        let config = config::Compass { declination: -10.0, ..Default::default() };
        let mut compass = Compass::new(&config, Recorder::default());
        let reading = compass.update(&level(0.0, 20.0)).unwrap();
        assert!((reading.heading.degrees() - 90.0).abs() < 1e-3);
        assert!((reading.true_heading.degrees() - 80.0).abs() < 1e-3);
        assert_eq!(reading.deviation, None);

        let reading = compass.update(&level(20.0, 0.0)).unwrap();
        assert!((reading.true_heading.degrees() - 350.0).abs() < 1e-3);
    }

    #[test]
    fn test_calibration_applied() {
        use super::Compass;
        use crate::{config, types::sensor::Bias};
        use self::fixture::{Recorder, level};

        let bias = Bias { x: 5.0, y: 5.0, z: 0.0 };
        let config = config::Compass { bias, ..Default::default() };
        let mut compass = Compass::new(&config, Recorder::default());
        let reading = compass.update(&level(5.0, 25.0)).unwrap();
        assert!((reading.heading.degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_reference_deviation() {
        use super::Compass;
        use self::fixture::{Recorder, level};

        let mut compass = Compass::new(&Default::default(), Recorder::default());
        let mut sample = level(20.0, 0.0);
        sample.reference = Some(352.0);
        let reading = compass.update(&sample).unwrap();
        assert!((reading.deviation.unwrap() + 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_sink_updates() {
        use super::Compass;
        use crate::indicator::Position;
        use self::fixture::{Recorder, level};

        let mut compass = Compass::new(&Default::default(), Recorder::default());
        compass.update(&level(20.0, 0.0)).unwrap();
        compass.update(&level(20.0, 0.0)).unwrap();
        compass.update(&level(1.0, 20.0)).unwrap();
        let north = Position { x: 3, y: 0 };
        let east = Position { x: 0, y: 3 };
        let expected = [(true, north), (true, north), (false, north), (true, east)];
        assert_eq!(compass.sink().0, expected);
    }

    #[test]
    fn test_skewed_sample() {
        use super::{Compass, Error};
        use crate::hal::sensors::Instant;
        use self::fixture::{Recorder, level};

        let mut compass = Compass::new(&Default::default(), Recorder::default());
        let mut sample = level(20.0, 0.0);
        sample.orientation_at = Instant::from_ticks(100);
        assert!(compass.update(&sample).is_ok());
        sample.orientation_at = Instant::from_ticks(101);
        match compass.update(&sample) {
            Err(Error::Skewed(skew)) => assert_eq!(skew.ticks(), 101),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(compass.sink().0.len(), 1);
    }

    #[test]
    fn test_invalid_sample() {
        use super::{Compass, Error};
        use self::fixture::{Recorder, level};

        let mut compass = Compass::new(&Default::default(), Recorder::default());
        let mut sample = level(20.0, 0.0);
        sample.orientation.pitch = f32::NAN;
        assert!(matches!(compass.update(&sample), Err(Error::InvalidSample)));
        let mut sample = level(20.0, 0.0);
        sample.magnetism.y = f32::INFINITY;
        assert!(matches!(compass.update(&sample), Err(Error::InvalidSample)));
        assert!(compass.sink().0.is_empty());

        assert!(compass.update(&level(20.0, 0.0)).is_ok());
    }

    #[test]
    fn test_filter() {
        use super::Compass;
        use crate::config;
        use self::fixture::{Recorder, level};

        let config = config::Compass { cutoff: 1.0, ..Default::default() };
        let mut compass = Compass::new(&config, Recorder::default());
        compass.update(&level(20.0, 0.0)).unwrap();
        let reading = compass.update(&level(0.0, 20.0)).unwrap();
        let degrees = reading.heading.degrees();
        assert!(0.0 < degrees && degrees < 90.0);

        compass.reconfigure(&Default::default());
        let reading = compass.update(&level(0.0, 20.0)).unwrap();
        assert!((reading.heading.degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_poll() {
        use super::{Compass, Error};
        use self::fixture::{Recorder, Replay, level};

        let mut source = Replay(std::vec![level(0.0, -20.0)]);
        let mut compass = Compass::new(&Default::default(), Recorder::default());
        let reading = compass.poll(&mut source).unwrap();
        assert!((reading.heading.degrees() - 270.0).abs() < 1e-3);
        assert!(matches!(compass.poll(&mut source), Err(Error::Source("exhausted"))));
    }
}
