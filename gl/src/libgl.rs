use std::ffi::CStr;
#[cfg(any(unix, windows))]
use std::ops::{Deref, DerefMut};

use crate::config::Config;
use crate::extension::{EntryPoints as _, ExtensionSet, Version};
#[cfg(any(unix, windows))]
use crate::loader::Library;

#[allow(non_camel_case_types)]
mod types {
    include!(concat!(env!("OUT_DIR"), "/gl_types_generated.rs"));
}

#[allow(non_upper_case_globals)]
mod enums {
    use super::types::*;

    include!(concat!(env!("OUT_DIR"), "/gl_enums_generated.rs"));
}

#[allow(non_camel_case_types)]
#[allow(non_snake_case)]
#[allow(clippy::let_unit_value)]
mod api {
    use std::cell::Cell;

    use super::enums::NO_ERROR;
    use super::types::*;
    use crate::config::{Config, ErrorCheck};
    use crate::error::Error;
    use crate::extension::EntryPoints;

    include!(concat!(env!("OUT_DIR"), "/gl_api_generated.rs"));

    #[derive(Default)]
    pub(crate) struct ErrorState {
        /// Between glBegin and glEnd glGetError itself is an error.
        in_primitive: Cell<bool>,
        last: Cell<Option<Error>>,
    }

    impl ErrorState {
        fn begin_primitive(&self) {
            self.in_primitive.set(true);
        }

        fn end_primitive(&self) {
            self.in_primitive.set(false);
        }
    }

    impl Api {
        /// Called after every command while error checking is enabled.
        unsafe fn check_error(&self, command: &'static str) {
            if self.errors.in_primitive.get() {
                return;
            }
            // errors raised by glBegin or inside the primitive can only be queried after glEnd.
            let command = if command == "glEnd" {
                "glBegin/glEnd"
            } else {
                command
            };

            if !self.GetError.is_loaded() {
                return;
            }
            type Dst = unsafe extern "system" fn() -> GLenum;
            let get_error =
                unsafe { std::mem::transmute::<*const std::ffi::c_void, Dst>(self.GetError.ptr) };
            let code = unsafe { get_error() };
            if code == NO_ERROR {
                return;
            }

            let error = Error { command, code };
            match self.config.errors {
                ErrorCheck::Off => {}
                ErrorCheck::Record => self.errors.last.set(Some(error)),
                ErrorCheck::Log => {
                    log::error!(target: "gl", "{error}");
                    self.errors.last.set(Some(error));
                }
                ErrorCheck::Panic => panic!("{error}"),
            }
        }

        /// The last error recorded by error checking, clearing it.
        pub fn take_error(&self) -> Option<Error> {
            self.errors.last.take()
        }
    }
}

#[allow(non_upper_case_globals)]
pub mod extensions {
    use crate::extension::Extension;

    include!(concat!(env!("OUT_DIR"), "/gl_extensions_generated.rs"));
}

pub use api::Api;
pub use enums::*;
pub use types::*;

unsafe fn gl_string(ptr: *const GLubyte) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr.cast()) }.to_string_lossy().into_owned())
}

impl Api {
    /// Version of the current context, from `glGetString(GL_VERSION)`.
    ///
    /// # Safety
    ///
    /// A context must be current on this thread.
    pub unsafe fn version(&self) -> Option<Version> {
        if !self.is_loaded("glGetString") {
            return None;
        }
        let version = unsafe { gl_string(self.GetString(VERSION)) }?;
        Version::parse_gl_version(&version)
    }

    /// Extensions the current context advertises. Uses `glGetStringi` on 3.0+ where the legacy
    /// `glGetString(GL_EXTENSIONS)` may be gone.
    ///
    /// # Safety
    ///
    /// A context must be current on this thread.
    pub unsafe fn extensions(&self) -> ExtensionSet {
        let version = unsafe { self.version() };

        let set = if version.is_some_and(|it| it >= Version::new(3, 0))
            && self.is_loaded("glGetStringi")
            && self.is_loaded("glGetIntegerv")
        {
            let mut count: GLint = 0;
            unsafe { self.GetIntegerv(NUM_EXTENSIONS, &mut count) };
            let count = GLuint::try_from(count).unwrap_or(0);
            ExtensionSet::from_names(
                (0..count).filter_map(|i| unsafe { gl_string(self.GetStringi(EXTENSIONS, i)) }),
            )
        } else if self.is_loaded("glGetString") {
            match unsafe { gl_string(self.GetString(EXTENSIONS)) } {
                Some(extensions) => ExtensionSet::from_space_separated(&extensions),
                None => ExtensionSet::default(),
            }
        } else {
            ExtensionSet::default()
        };

        match version {
            Some(version) => set.with_version("GL_VERSION_", version),
            None => set,
        }
    }
}

/// The system gl library with every entry point resolved from it.
#[cfg(any(unix, windows))]
pub struct GlApi {
    api: Api,
    _library: Library,
}

#[cfg(any(unix, windows))]
impl Deref for GlApi {
    type Target = Api;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

#[cfg(any(unix, windows))]
impl DerefMut for GlApi {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.api
    }
}

#[cfg(any(unix, windows))]
impl GlApi {
    /// Opens the system gl library (`libGL.so.1`, the OpenGL framework or `opengl32.dll`).
    ///
    /// On windows extension entry points only resolve while a context is current, so load after
    /// making one current.
    pub fn load(config: Config) -> Result<Self, dynlib::Error> {
        let library = Library::open()?;
        let api = unsafe { Api::load_with(config, |name| library.get_proc_address(name)) };
        Ok(Self {
            api,
            _library: library,
        })
    }
}
