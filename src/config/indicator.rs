use super::setter::{Error, Path, Setter, Value};
use crate::indicator::matrix::RGB;

const DEFAULT_COLOR: RGB = [255, 0, 0];

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indicator {
    pub color: RGB,
}

impl Default for Indicator {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR }
    }
}

fn parse_color(value: &str) -> Result<RGB, Error> {
    let mut color = [0u8; 3];
    let mut splitted = value.split(',');
    for channel in color.iter_mut() {
        let string = splitted.next().ok_or(Error::UnexpectedValue)?;
        *channel = string.trim().parse().map_err(|_| Error::UnexpectedValue)?;
    }
    match splitted.next() {
        Some(_) => Err(Error::UnexpectedValue),
        None => Ok(color),
    }
}

impl Setter for Indicator {
    fn set(&mut self, mut path: Path, value: Value) -> Result<(), Error> {
        match path.str()? {
            "color" => match value.0 {
                Some(string) => self.color = parse_color(string)?,
                None => self.color = DEFAULT_COLOR,
            },
            _ => return Err(Error::UnknownPath),
        }
        Ok(())
    }
}
