//! WGL 1.0 and the WGL extensions enabled with cargo features.

use std::ffi::CStr;
#[cfg(windows)]
use std::ops::{Deref, DerefMut};

#[cfg(windows)]
use crate::config::Config;
use crate::extension::ExtensionSet;
#[cfg(any(
    feature = "WGL_ARB_extensions_string",
    feature = "WGL_EXT_extensions_string"
))]
use crate::extension::EntryPoints as _;
#[cfg(windows)]
use crate::loader::Library;

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
mod types {
    include!(concat!(env!("OUT_DIR"), "/wgl_types_generated.rs"));
}

#[allow(non_upper_case_globals)]
mod enums {
    include!(concat!(env!("OUT_DIR"), "/wgl_enums_generated.rs"));
}

#[allow(non_camel_case_types)]
#[allow(non_snake_case)]
#[allow(clippy::let_unit_value)]
mod api {
    use super::types::*;
    use crate::config::Config;
    use crate::extension::EntryPoints;

    include!(concat!(env!("OUT_DIR"), "/wgl_api_generated.rs"));
}

#[allow(non_upper_case_globals)]
pub mod extensions {
    use crate::extension::Extension;

    include!(concat!(env!("OUT_DIR"), "/wgl_extensions_generated.rs"));
}

pub use api::Api;
pub use enums::*;
pub use types::*;

#[allow(dead_code)]
unsafe fn extension_string(ptr: *const std::ffi::c_char) -> Option<ExtensionSet> {
    if ptr.is_null() {
        return None;
    }
    Some(ExtensionSet::from_space_separated(
        &unsafe { CStr::from_ptr(ptr) }.to_string_lossy(),
    ))
}

impl Api {
    /// Extensions of the device context, from `wglGetExtensionsStringARB` or, failing that,
    /// `wglGetExtensionsStringEXT`. Both are extensions themselves; resolving them requires a
    /// current context.
    ///
    /// # Safety
    ///
    /// `hdc` must be a valid device context.
    #[allow(unused_variables)]
    pub unsafe fn extensions(&self, hdc: HDC) -> ExtensionSet {
        #[cfg(feature = "WGL_ARB_extensions_string")]
        if self.is_loaded("wglGetExtensionsStringARB") {
            if let Some(set) = unsafe { extension_string(self.GetExtensionsStringARB(hdc)) } {
                return set;
            }
        }
        #[cfg(feature = "WGL_EXT_extensions_string")]
        if self.is_loaded("wglGetExtensionsStringEXT") {
            if let Some(set) = unsafe { extension_string(self.GetExtensionsStringEXT()) } {
                return set;
            }
        }
        ExtensionSet::default()
    }
}

/// WGL entry points resolved from `opengl32.dll`.
#[cfg(windows)]
pub struct WglApi {
    api: Api,
    _library: Library,
}

#[cfg(windows)]
impl Deref for WglApi {
    type Target = Api;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

#[cfg(windows)]
impl DerefMut for WglApi {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.api
    }
}

#[cfg(windows)]
impl WglApi {
    pub fn load(config: Config) -> Result<Self, dynlib::Error> {
        let library = Library::open()?;
        let api = unsafe { Api::load_with(config, |name| library.get_proc_address(name)) };
        Ok(Self {
            api,
            _library: library,
        })
    }
}
