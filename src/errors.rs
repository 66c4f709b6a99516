use std::fmt::{Debug, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Plain(String),
    Configuration { key: String, message: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Plain(msg) => write!(f, "{}", msg),
            Error::Configuration { key, message } => {
                write!(f, "{}: {}", message, key)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Plain(e.to_string())
    }
}
