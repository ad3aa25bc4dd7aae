use fugit::{MillisDurationU64 as Duration, TimerInstantU64};

use crate::types::{measurement::Orientation, sensor::Magnetism};

pub type Instant = TimerInstantU64<1000>;

/// One polling cycle worth of readings
#[derive(Copy, Clone, Debug)]
pub struct Sample {
    pub magnetism: Magnetism,
    pub magnetism_at: Instant,
    /// Radians
    pub orientation: Orientation,
    pub orientation_at: Instant,
    /// On-board compass reading in heading convention (clockwise degrees), if any
    pub reference: Option<f32>,
}

impl Sample {
    pub fn new(magnetism: Magnetism, orientation: Orientation, at: Instant) -> Self {
        Self { magnetism, magnetism_at: at, orientation, orientation_at: at, reference: None }
    }

    pub fn skew(&self) -> Duration {
        let (m, o) = (self.magnetism_at, self.orientation_at);
        let skew = m.checked_duration_since(o).or_else(|| o.checked_duration_since(m));
        skew.unwrap_or(Duration::from_ticks(0))
    }
}

pub trait SensorSource {
    type Error;

    fn read(&mut self) -> Result<Sample, Self::Error>;
}

mod test {
    #[test]
    fn test_skew() {
        use super::{Instant, Sample};

        let mut sample = Sample::new(Default::default(), Default::default(), Instant::from_ticks(0));
        assert_eq!(sample.skew().ticks(), 0);
        sample.magnetism_at = Instant::from_ticks(1250);
        sample.orientation_at = Instant::from_ticks(1180);
        assert_eq!(sample.skew().ticks(), 70);
        sample.orientation_at = Instant::from_ticks(1400);
        assert_eq!(sample.skew().ticks(), 150);
    }
}
