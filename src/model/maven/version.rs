use std::{fmt::Display, str::FromStr};

use regex_lite::Regex;

use crate::model::ParseError;

/// Classification of a platform version derived from its qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    Ga,
    Milestone,
    Snapshot,
}

/// A platform version of the form `major.minor.patch` with an optional
/// qualifier, accepting both separator styles (`3.2.0-M1`, `2.7.18.RELEASE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub qualifier: Option<Qualifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub separator: char,
    pub id: String,
}

impl PlatformVersion {
    pub fn release_channel(&self) -> ReleaseChannel {
        match &self.qualifier {
            None => ReleaseChannel::Ga,
            Some(qualifier) if qualifier.id == "RELEASE" => ReleaseChannel::Ga,
            Some(qualifier) if qualifier.id.contains("SNAPSHOT") => ReleaseChannel::Snapshot,
            Some(_) => ReleaseChannel::Milestone,
        }
    }

    /// A maintenance release of an already published line, i.e. patch > 0.
    pub fn is_maintenance_release(&self) -> bool {
        self.patch > 0
    }
}

impl FromStr for PlatformVersion {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(
            r"^(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)(?:(?P<separator>[.-])(?P<qualifier>[A-Za-z0-9.-]+))?$",
        )
        .unwrap();
        let captures = re
            .captures(value)
            .ok_or_else(|| ParseError::InvalidVersion(value.to_string()))?;

        let number = |name: &str| -> Result<u32, ParseError> {
            captures
                .name(name)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| ParseError::InvalidVersion(value.to_string()))
        };

        let qualifier = match (captures.name("separator"), captures.name("qualifier")) {
            (Some(separator), Some(id)) => Some(Qualifier {
                separator: separator.as_str().chars().next().unwrap_or('-'),
                id: id.as_str().to_string(),
            }),
            _ => None,
        };

        Ok(PlatformVersion {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            qualifier,
        })
    }
}

impl Display for PlatformVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{}{}", qualifier.separator, qualifier.id)?;
        }
        Ok(())
    }
}
