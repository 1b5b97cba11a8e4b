use std::fmt;

use thiserror::Error;
use url::Url;

/// Reference caps the analysis service accepts.
pub const ALLOWED_BREADTHS: [u8; 5] = [1, 3, 5, 7, 10];

/// Inclusive bounds for the reference search window, in days.
pub const DAYS_OLD_RANGE: std::ops::RangeInclusive<u16> = 1..=3650;

/// Unvalidated job input as typed by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRequest {
    pub url: String,
    pub max_references: Option<u32>,
    pub days_old: Option<u32>,
}

impl JobRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_max_references(mut self, max_references: u32) -> Self {
        self.max_references = Some(max_references);
        self
    }

    pub fn with_days_old(mut self, days_old: u32) -> Self {
        self.days_old = Some(days_old);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("URL is required")]
    MissingUrl,
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("URL must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },
    #[error("max references must be one of 1, 3, 5, 7 or 10, got {0}")]
    InvalidBreadth(u32),
    #[error("days old must be between 1 and 3650, got {0}")]
    InvalidDaysOld(u32),
}

/// Cap on the number of reference sources the service consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breadth(u8);

impl Breadth {
    pub fn new(value: u32) -> Result<Self, ParamsError> {
        ALLOWED_BREADTHS
            .iter()
            .copied()
            .find(|allowed| u32::from(*allowed) == value)
            .map(Self)
            .ok_or(ParamsError::InvalidBreadth(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Breadth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated submission input. Only constructible through [`JobParameters::from_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParameters {
    url: Url,
    max_references: Option<Breadth>,
    days_old: Option<u16>,
}

impl JobParameters {
    pub fn from_request(request: &JobRequest) -> Result<Self, ParamsError> {
        let raw = request.url.trim();
        if raw.is_empty() {
            return Err(ParamsError::MissingUrl);
        }
        let url = Url::parse(raw).map_err(|err| ParamsError::InvalidUrl {
            url: raw.to_string(),
            message: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ParamsError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            });
        }

        let max_references = request.max_references.map(Breadth::new).transpose()?;
        let days_old = request
            .days_old
            .map(|days| {
                u16::try_from(days)
                    .ok()
                    .filter(|days| DAYS_OLD_RANGE.contains(days))
                    .ok_or(ParamsError::InvalidDaysOld(days))
            })
            .transpose()?;

        Ok(Self {
            url,
            max_references,
            days_old,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn max_references(&self) -> Option<Breadth> {
        self.max_references
    }

    pub fn days_old(&self) -> Option<u16> {
        self.days_old
    }
}
