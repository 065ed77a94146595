use std::env;
use std::str::FromStr;

/// What a gl wrapper does when `glGetError` reports an error after the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCheck {
    /// `glGetError` is never called.
    Off,
    /// Keep the last error; see `Api::take_error`.
    Record,
    /// Record and `log::error!` it.
    Log,
    Panic,
}

impl ErrorCheck {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl FromStr for ErrorCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" | "false" => Ok(Self::Off),
            "record" => Ok(Self::Record),
            "log" => Ok(Self::Log),
            "panic" => Ok(Self::Panic),
            other => Err(format!(
                "invalid error check {other:?} (want off, record, log or panic)"
            )),
        }
    }
}

pub const ENV_LOG_CALLS: &str = "GL_LOG_CALLS";
pub const ENV_ERROR_CHECK: &str = "GL_ERROR_CHECK";

/// Runtime behavior of the generated wrappers, shared by gl, glx and wgl. glx and wgl only look
/// at `log_calls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Log every call with its arguments and result at trace level.
    pub log_calls: bool,
    pub errors: ErrorCheck,
}

impl Default for Config {
    fn default() -> Self {
        if cfg!(feature = "debug") {
            Self {
                log_calls: true,
                errors: ErrorCheck::Log,
            }
        } else {
            Self {
                log_calls: false,
                errors: ErrorCheck::Off,
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Starts from `Config::default()` and applies `GL_LOG_CALLS` and `GL_ERROR_CHECK`. Invalid
    /// values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_LOG_CALLS) {
            match parse_bool(&value) {
                Some(log_calls) => config.log_calls = log_calls,
                None => log::warn!("ignoring invalid {ENV_LOG_CALLS}={value:?}"),
            }
        }

        if let Some(value) = lookup(ENV_ERROR_CHECK) {
            match ErrorCheck::from_str(&value) {
                Ok(errors) => config.errors = errors,
                Err(err) => log::warn!("ignoring {ENV_ERROR_CHECK}: {err}"),
            }
        }

        config
    }
}
