pub mod indicator;
pub mod sensors;

pub use indicator::IndicatorSink;
pub use sensors::{Sample, SensorSource};
