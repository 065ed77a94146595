use std::str::FromStr;

use anyhow::{Context as _, bail};

mod ctype;
mod emit;
mod registry;
mod types;

pub use ctype::CType;
pub use emit::{emit_api, emit_enums, emit_extensions, emit_types};
pub use registry::*;

// registry schema:
// https://github.com/KhronosGroup/OpenGL-Registry/blob/8e772a3b0c9e8a85ccb6f471b4cdbf94c8bcd71d/xml/readme.pdf

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Gl,
    Glx,
    Wgl,
}

impl Api {
    /// Value of the `api` / `supported` attributes in the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gl => "gl",
            Self::Glx => "glx",
            Self::Wgl => "wgl",
        }
    }

    fn enum_prefix(&self) -> &'static str {
        match self {
            Self::Gl => "GL_",
            Self::Glx => "GLX_",
            Self::Wgl => "WGL_",
        }
    }

    fn command_prefix(&self) -> &'static str {
        match self {
            Self::Gl => "gl",
            Self::Glx => "glX",
            Self::Wgl => "wgl",
        }
    }

    /// Command that reports the error state of the previous call, if the api has one. glx and wgl
    /// report errors through x11 / win32 instead.
    fn error_command(&self) -> Option<&'static str> {
        match self {
            Self::Gl => Some("glGetError"),
            Self::Glx | Self::Wgl => None,
        }
    }

    /// Commands that open and close a primitive. The error query must not run in between.
    fn primitive_commands(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Gl => Some(("glBegin", "glEnd")),
            Self::Glx | Self::Wgl => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Core,
    Compatibility,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Compatibility => "compatibility",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Version(pub u32, pub u32);

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let major: u32 = parts.next().context("missing major")?.parse()?;
        let minor: u32 = parts.next().context("missing minor")?.parse()?;
        if parts.next().is_some() {
            bail!("unexpected trailing version part in {s:?}");
        }
        Ok(Version(major, minor))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.0).then(self.1.cmp(&other.1)))
    }
}

#[test]
fn test_version() {
    let a = Version(3, 0);
    let b = Version(4, 6);
    assert!(a < b);
    assert!(Version(1, 4) > Version(1, 3));
    assert!(Version::from_str("1.4").unwrap() == Version(1, 4));
    assert!(Version::from_str("1.4.1").is_err());
    assert!(Version::from_str("1").is_err());
}
