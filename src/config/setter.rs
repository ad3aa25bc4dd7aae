use core::str::{FromStr, Split};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Error {
    UnknownPath,
    MalformedPath,
    ExpectValue,
    UnexpectedValue,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let err_string = match self {
            Self::UnknownPath => "Specified path not exists",
            Self::MalformedPath => "Specified path invalid",
            Self::ExpectValue => "Expected some value specified",
            Self::UnexpectedValue => "Value not valid",
        };
        write!(f, "{}", err_string)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Dot separated config path, e.g. `compass.bias.x`
pub struct Path<'a>(Split<'a, char>);

impl<'a> Path<'a> {
    pub fn new(path: &'a str) -> Self {
        Self(path.split('.'))
    }

    pub fn str(&mut self) -> Result<&'a str, Error> {
        match self.0.next() {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(Error::MalformedPath),
        }
    }

    pub fn parse<T: FromStr>(&mut self) -> Result<T, Error> {
        self.str()?.parse().map_err(|_| Error::MalformedPath)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Value<'a>(pub Option<&'a str>);

impl<'a> Value<'a> {
    pub fn parse<T: FromStr>(&self) -> Result<T, Error> {
        match self.0 {
            Some(s) => s.trim().parse().map_err(|_| Error::UnexpectedValue),
            None => Err(Error::ExpectValue),
        }
    }

    /// Unset value restores `default`
    pub fn parse_or<T: FromStr>(&self, default: T) -> Result<T, Error> {
        match self.0 {
            Some(_) => self.parse(),
            None => Ok(default),
        }
    }
}

pub trait Setter {
    fn set(&mut self, path: Path, value: Value) -> Result<(), Error>;
}

mod test {
    #[test]
    fn test_path() {
        use super::{Error, Path};

        let mut path = Path::new("compass.max-skew");
        assert_eq!(path.str(), Ok("compass"));
        assert_eq!(path.str(), Ok("max-skew"));
        assert_eq!(path.str(), Err(Error::MalformedPath));
        assert_eq!(Path::new("").str(), Err(Error::MalformedPath));
        assert_eq!(Path::new("1.x").parse::<u8>(), Ok(1));
    }

    #[test]
    fn test_value() {
        use super::{Error, Value};

        assert_eq!(Value(Some(" 3.5")).parse::<f32>(), Ok(3.5));
        assert_eq!(Value(Some("abc")).parse::<f32>(), Err(Error::UnexpectedValue));
        assert_eq!(Value(None).parse::<f32>(), Err(Error::ExpectValue));
        assert_eq!(Value(None).parse_or(1.0f32), Ok(1.0));
    }
}
