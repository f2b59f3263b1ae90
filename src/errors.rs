use std::path::PathBuf;

/// Which logical field of a control a value belongs to
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Field {
    Cc,
    Channel,
    Mode,
    Color,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cc => "CC number",
            Self::Channel => "channel",
            Self::Mode => "mode",
            Self::Color => "LED color",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generator parameters that can never produce a valid template
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A byte blob that doesn't have the shape of a custom mode template
    #[error("malformed template at byte {offset}: {reason}")]
    MalformedTemplate { offset: usize, reason: String },

    /// A logical field violates its allowed range. Raised before any byte is written
    #[error(
        "template {template}, control {control}: {field} {} outside {allowed}",
        .value.map_or_else(|| "missing".to_owned(), |v| v.to_string())
    )]
    OutOfRangeValue {
        template: u8,
        control: u8,
        field: Field,
        /// `None` when the field is missing where it is required
        value: Option<u8>,
        allowed: &'static str,
    },

    #[error("couldn't access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interactive editor lost its terminal
    #[error("terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_the_culprit() {
        let err = Error::OutOfRangeValue {
            template: 3,
            control: 17,
            field: Field::Cc,
            value: Some(127),
            allowed: "13..=120",
        };
        let message = err.to_string();
        assert!(message.contains("template 3"));
        assert!(message.contains("control 17"));
        assert!(message.contains("CC number"));
        assert!(message.contains("127"));
    }
}
