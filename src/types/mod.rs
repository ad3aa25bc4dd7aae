pub mod measurement;
pub mod sensor;
