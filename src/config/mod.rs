pub mod compass;
pub mod indicator;
pub mod setter;

pub use compass::Compass;
pub use indicator::Indicator;

use setter::{Error, Path, Setter, Value};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compass: Compass,
    pub indicator: Indicator,
}

impl Setter for Config {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "compass" => self.compass.set(path, value),
            "indicator" => self.indicator.set(path, value),
            _ => Err(Error::UnknownPath),
        }
    }
}

impl Config {
    /// Applies a `path=value` assignment, a bare `path` resets to default
    pub fn assign(&mut self, assignment: &str) -> Result<(), Error> {
        let mut splitted = assignment.splitn(2, '=');
        let path = splitted.next().map(|p| p.trim()).unwrap_or_default();
        let value = splitted.next().map(|v| v.trim());
        self.set(Path::new(path), Value(value))
    }

    /// Checks a config that did not come through `assign`, e.g. one read from a file
    pub fn validate(&self) -> Result<(), Error> {
        self.compass.validate()
    }
}

mod test {
    #[test]
    fn test_deserialize_partial() {
        use super::Config;

        let json = r#"{"compass": {"declination": -4.5, "bias": {"x": 1.0, "y": 2.0, "z": 3.0}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.compass.declination, -4.5);
        assert_eq!(config.compass.bias.z, 3.0);
        assert_eq!(config.compass.gain, Default::default());
        assert_eq!(config.compass.max_skew, 100);
        assert_eq!(config.indicator.color, [255, 0, 0]);
    }

    #[test]
    fn test_serialize() {
        use serde_json::json;

        use super::Config;

        let expected = json!({
            "compass": {
                "declination": 0.0,
                "bias": {"x": 0.0, "y": 0.0, "z": 0.0},
                "gain": {"x": 1.0, "y": 1.0, "z": 1.0},
                "sample-rate": 10.0,
                "cutoff": 0.0,
                "max-skew": 100
            },
            "indicator": {"color": [255, 0, 0]}
        });
        assert_eq!(expected, serde_json::to_value(&Config::default()).unwrap());
    }

    #[test]
    fn test_assign() {
        use super::{setter::Error, Config};

        let mut config = Config::default();
        config.assign("compass.declination=3.5").unwrap();
        config.assign("compass.gain.y = 1.25").unwrap();
        config.assign("compass.max-skew=40").unwrap();
        config.assign("indicator.color=0, 255, 16").unwrap();
        assert_eq!(config.compass.declination, 3.5);
        assert_eq!(config.compass.gain.y, 1.25);
        assert_eq!(config.compass.max_skew, 40);
        assert_eq!(config.indicator.color, [0, 255, 16]);

        config.assign("compass.declination").unwrap();
        assert_eq!(config.compass.declination, 0.0);

        assert_eq!(config.assign("compass.heading=1"), Err(Error::UnknownPath));
        assert_eq!(config.assign("compass.bias=1"), Err(Error::MalformedPath));
        assert_eq!(config.assign("compass.cutoff=-1"), Err(Error::UnexpectedValue));
        assert_eq!(config.assign("compass.sample-rate=0"), Err(Error::UnexpectedValue));
        assert_eq!(config.assign("indicator.color=1,2"), Err(Error::UnexpectedValue));
        assert_eq!(config.assign("gps.rate=1"), Err(Error::UnknownPath));
    }

    #[test]
    fn test_validate() {
        use super::{setter::Error, Config};

        assert_eq!(Config::default().validate(), Ok(()));

        let json = r#"{"compass": {"sample-rate": -20.0, "cutoff": 1.0}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.validate(), Err(Error::UnexpectedValue));

        let config: Config = serde_json::from_str(r#"{"compass": {"cutoff": -0.5}}"#).unwrap();
        assert_eq!(config.validate(), Err(Error::UnexpectedValue));

        let mut config = Config::default();
        assert_eq!(config.assign("compass.sample-rate=-20"), Err(Error::UnexpectedValue));
        assert_eq!(config.compass.sample_rate, 10.0);
    }
}
