//! GLX 1.4 and the GLX extensions enabled with cargo features.

use std::ffi::{CStr, c_int};
#[cfg(all(unix, not(target_vendor = "apple")))]
use std::ops::{Deref, DerefMut};

#[cfg(all(unix, not(target_vendor = "apple")))]
use crate::config::Config;
use crate::extension::{EntryPoints as _, ExtensionSet, Version};
#[cfg(all(unix, not(target_vendor = "apple")))]
use crate::loader::Library;

#[allow(non_camel_case_types)]
mod types {
    include!(concat!(env!("OUT_DIR"), "/glx_types_generated.rs"));
}

#[allow(non_upper_case_globals)]
mod enums {
    include!(concat!(env!("OUT_DIR"), "/glx_enums_generated.rs"));
}

#[allow(non_camel_case_types)]
#[allow(non_snake_case)]
#[allow(clippy::let_unit_value)]
mod api {
    use super::types::*;
    use crate::config::Config;
    use crate::extension::EntryPoints;

    include!(concat!(env!("OUT_DIR"), "/glx_api_generated.rs"));
}

#[allow(non_upper_case_globals)]
pub mod extensions {
    use crate::extension::Extension;

    include!(concat!(env!("OUT_DIR"), "/glx_extensions_generated.rs"));
}

pub use api::Api;
pub use enums::*;
pub use types::*;

impl Api {
    /// GLX version of the connection, from `glXQueryVersion`.
    ///
    /// # Safety
    ///
    /// `dpy` must be an open display connection.
    pub unsafe fn version(&self, dpy: *mut Display) -> Option<Version> {
        if !self.is_loaded("glXQueryVersion") {
            return None;
        }
        let (mut major, mut minor): (c_int, c_int) = (0, 0);
        if unsafe { self.QueryVersion(dpy, &mut major, &mut minor) } == 0 {
            return None;
        }
        Some(Version::new(
            u32::try_from(major).ok()?,
            u32::try_from(minor).ok()?,
        ))
    }

    /// Extensions supported by both the client library and the server for `screen`.
    ///
    /// # Safety
    ///
    /// `dpy` must be an open display connection.
    pub unsafe fn extensions(&self, dpy: *mut Display, screen: c_int) -> ExtensionSet {
        if !self.is_loaded("glXQueryExtensionsString") {
            return ExtensionSet::default();
        }
        let ptr = unsafe { self.QueryExtensionsString(dpy, screen) };
        let set = if ptr.is_null() {
            ExtensionSet::default()
        } else {
            ExtensionSet::from_space_separated(&unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
        };
        match unsafe { self.version(dpy) } {
            Some(version) => set.with_version("GLX_VERSION_", version),
            None => set,
        }
    }
}

/// GLX entry points resolved from the system `libGL.so.1`.
#[cfg(all(unix, not(target_vendor = "apple")))]
pub struct GlxApi {
    api: Api,
    _library: Library,
}

#[cfg(all(unix, not(target_vendor = "apple")))]
impl Deref for GlxApi {
    type Target = Api;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

#[cfg(all(unix, not(target_vendor = "apple")))]
impl DerefMut for GlxApi {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.api
    }
}

#[cfg(all(unix, not(target_vendor = "apple")))]
impl GlxApi {
    pub fn load(config: Config) -> Result<Self, dynlib::Error> {
        let library = Library::open()?;
        let api = unsafe { Api::load_with(config, |name| library.get_proc_address(name)) };
        Ok(Self {
            api,
            _library: library,
        })
    }
}
