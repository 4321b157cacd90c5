use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A code the active scheme does not know. `position` is the index of
    /// the code in the caller's input, when there is one.
    #[error("invalid code {code:?}{}", .position.map(|p| format!(" at position {p}")).unwrap_or_default())]
    InvalidCode {
        code: String,
        position: Option<usize>,
    },

    #[error("invalid {field}: {value}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
    },

    #[error("unknown scheme {name:?} (available: {})", .available.join(", "))]
    UnknownScheme {
        name: String,
        available: Vec<&'static str>,
    },
}

impl Error {
    pub(crate) fn invalid_code<S: Into<String>>(code: S, position: Option<usize>) -> Self {
        Self::InvalidCode {
            code: code.into(),
            position,
        }
    }

    pub(crate) fn invalid_parameter(field: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            field,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_code_message() {
        assert_eq!(Error::invalid_code("E", Some(3)).to_string(), "invalid code \"E\" at position 3");
        assert_eq!(Error::invalid_code("KP3", None).to_string(), "invalid code \"KP3\"");
    }

    #[test]
    fn unknown_scheme_message() {
        let e = Error::UnknownScheme { name: "r2".into(), available: vec!["dtmf", "mf"] };
        assert_eq!(e.to_string(), "unknown scheme \"r2\" (available: dtmf, mf)");
    }
}
