use thiserror::Error;

pub mod manifest;
pub mod maven;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading configuration toml: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid platform version `{0}`")]
    InvalidVersion(String),
    #[error("Invalid Maven coordinate `{0}`")]
    InvalidCoordinate(String),
    #[error("Missing TOML key `{0}` while parsing")]
    MissingKey(String),
}
