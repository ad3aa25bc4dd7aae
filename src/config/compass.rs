use super::setter::{Error, Path, Setter, Value};
use crate::types::sensor::{Bias, Gain};

const DEFAULT_SAMPLE_RATE: f32 = 10.0;
const DEFAULT_MAX_SKEW: u32 = 100;

impl Setter for Bias {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "x" => self.x = value.parse_or(0.0)?,
            "y" => self.y = value.parse_or(0.0)?,
            "z" => self.z = value.parse_or(0.0)?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}

impl Setter for Gain {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "x" => self.x = value.parse_or(1.0)?,
            "y" => self.y = value.parse_or(1.0)?,
            "z" => self.z = value.parse_or(1.0)?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Compass {
    /// Degrees, east positive
    pub declination: f32,
    pub bias: Bias,
    pub gain: Gain,
    /// Polling rate in Hz
    pub sample_rate: f32,
    /// Low pass cutoff frequency in Hz, 0 disables filtering
    pub cutoff: f32,
    /// Milliseconds allowed between magnetometer and orientation readings
    pub max_skew: u32,
}

impl Default for Compass {
    fn default() -> Self {
        Self {
            declination: 0.0,
            bias: Bias::default(),
            gain: Gain::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            cutoff: 0.0,
            max_skew: DEFAULT_MAX_SKEW,
        }
    }
}

impl Compass {
    /// Rejects values the low pass filter cannot work with
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.sample_rate > 0.0) || !(self.cutoff >= 0.0) {
            return Err(Error::UnexpectedValue);
        }
        Ok(())
    }
}

impl Setter for Compass {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "declination" => self.declination = value.parse_or(0.0)?,
            "bias" => return self.bias.set(path, value),
            "gain" => return self.gain.set(path, value),
            "sample-rate" => {
                let compass = Self { sample_rate: value.parse_or(DEFAULT_SAMPLE_RATE)?, ..*self };
                compass.validate()?;
                *self = compass
            }
            "cutoff" => {
                let compass = Self { cutoff: value.parse_or(0.0)?, ..*self };
                compass.validate()?;
                *self = compass
            }
            "max-skew" => self.max_skew = value.parse_or(DEFAULT_MAX_SKEW)?,
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}
