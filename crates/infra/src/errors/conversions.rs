//! Conversions from external infrastructure errors into domain errors.

use busylight_domain::BusylightError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BusylightError);

impl From<InfraError> for BusylightError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BusylightError> for InfraError {
    fn from(value: BusylightError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBusylightError {
    fn into_busylight(self) -> BusylightError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BusylightError */
/* -------------------------------------------------------------------------- */

impl IntoBusylightError for HttpError {
    fn into_busylight(self) -> BusylightError {
        if self.is_timeout() {
            return BusylightError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BusylightError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return BusylightError::Network(format!("HTTP response body unreadable: {self}"));
        }

        if self.is_builder() {
            return BusylightError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                408 | 429 => BusylightError::Network(message),
                400..=499 => BusylightError::InvalidInput(message),
                _ => BusylightError::Network(message),
            };
        }

        BusylightError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_busylight())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → BusylightError */
/* -------------------------------------------------------------------------- */

impl IntoBusylightError for JsonError {
    fn into_busylight(self) -> BusylightError {
        BusylightError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_busylight())
    }
}

impl IntoBusylightError for TomlError {
    fn into_busylight(self) -> BusylightError {
        BusylightError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_busylight())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → BusylightError */
/* -------------------------------------------------------------------------- */

impl IntoBusylightError for std::io::Error {
    fn into_busylight(self) -> BusylightError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => BusylightError::Config(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                BusylightError::Config(format!("permission denied: {self}"))
            }
            _ => BusylightError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_busylight())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
