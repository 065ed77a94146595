//! Runtime-loaded OpenGL 3.2 (compatibility profile), GLX 1.4 and WGL 1.0 bindings generated
//! from the khronos registry at build time.
//!
//! Every command is a method on the `Api` of its module. Entry points are resolved once when the
//! `Api` is loaded; calling one that did not resolve panics. Use `EntryPoints::is_loaded` or
//! `Extension::is_loaded` first when a command may be missing.

mod config;
mod error;
mod extension;
mod libgl;
#[cfg(any(unix, windows))]
mod loader;

pub mod glx;
pub mod wgl;

pub use config::{Config, ENV_ERROR_CHECK, ENV_LOG_CALLS, ErrorCheck};
pub use error::{Error, error_code_name};
pub use extension::{EntryPoints, Extension, ExtensionSet, Version};
pub use libgl::*;
