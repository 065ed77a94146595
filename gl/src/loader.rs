//! Finds the system gl library and resolves entry points from it.
//!
//! Core entry points are exported by the library itself; extension entry points are usually only
//! reachable through the platform's `GetProcAddress`. Both are tried.

use std::ffi::{CStr, c_char, c_void};

use dynlib::DynLib;

#[cfg(all(unix, not(target_vendor = "apple")))]
const LIBRARY_NAMES: &[&CStr] = &[c"libGL.so.1", c"libGL.so"];
#[cfg(target_vendor = "apple")]
const LIBRARY_NAMES: &[&CStr] = &[c"/System/Library/Frameworks/OpenGL.framework/Versions/Current/OpenGL"];
#[cfg(windows)]
const LIBRARY_NAMES: &[&CStr] = &[c"opengl32.dll"];

#[cfg(all(unix, not(target_vendor = "apple")))]
type GetProcAddress = unsafe extern "C" fn(*const u8) -> Option<unsafe extern "C" fn()>;
#[cfg(windows)]
type GetProcAddress = unsafe extern "system" fn(*const c_char) -> Option<unsafe extern "system" fn() -> isize>;

pub(crate) struct Library {
    dynlib: DynLib,
    #[cfg(any(windows, all(unix, not(target_vendor = "apple"))))]
    get_proc_address: Option<GetProcAddress>,
}

impl Library {
    pub(crate) fn open() -> Result<Self, dynlib::Error> {
        let mut last_err: Option<dynlib::Error> = None;
        for name in LIBRARY_NAMES {
            match DynLib::open(name) {
                Ok(dynlib) => {
                    log::info!("loaded {name:?}");
                    return Ok(Self::new(dynlib));
                }
                Err(err) => {
                    log::debug!("{err}");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| dynlib::Error::Open("no library candidates".to_string())))
    }

    #[cfg(all(unix, not(target_vendor = "apple")))]
    fn new(dynlib: DynLib) -> Self {
        let get_proc_address = unsafe {
            dynlib
                .lookup::<GetProcAddress>(c"glXGetProcAddressARB")
                .or_else(|_| dynlib.lookup::<GetProcAddress>(c"glXGetProcAddress"))
        };
        let get_proc_address = match get_proc_address {
            Ok(it) => Some(it),
            Err(err) => {
                log::debug!("only exported symbols will be resolved: {err}");
                None
            }
        };
        Self {
            dynlib,
            get_proc_address,
        }
    }

    #[cfg(windows)]
    fn new(dynlib: DynLib) -> Self {
        let get_proc_address = match unsafe { dynlib.lookup::<GetProcAddress>(c"wglGetProcAddress") } {
            Ok(it) => Some(it),
            Err(err) => {
                log::debug!("only exported symbols will be resolved: {err}");
                None
            }
        };
        Self {
            dynlib,
            get_proc_address,
        }
    }

    #[cfg(target_vendor = "apple")]
    fn new(dynlib: DynLib) -> Self {
        Self { dynlib }
    }

    #[cfg(all(unix, not(target_vendor = "apple")))]
    fn platform_proc_address(&self, name: &CStr) -> *mut c_void {
        let Some(get_proc_address) = self.get_proc_address else {
            return std::ptr::null_mut();
        };
        match unsafe { get_proc_address(name.as_ptr().cast()) } {
            Some(f) => f as *mut c_void,
            None => std::ptr::null_mut(),
        }
    }

    #[cfg(windows)]
    fn platform_proc_address(&self, name: &CStr) -> *mut c_void {
        let Some(get_proc_address) = self.get_proc_address else {
            return std::ptr::null_mut();
        };
        let addr = match unsafe { get_proc_address(name.as_ptr()) } {
            Some(f) => f as usize as isize,
            None => 0,
        };
        // some drivers return small sentinels instead of null.
        if is_wgl_failure(addr) {
            std::ptr::null_mut()
        } else {
            addr as *mut c_void
        }
    }

    #[cfg(target_vendor = "apple")]
    fn platform_proc_address(&self, _name: &CStr) -> *mut c_void {
        std::ptr::null_mut()
    }

    /// Address of `name` or null. Suitable for `Api::load_with`.
    pub(crate) fn get_proc_address(&self, name: *const c_char) -> *mut c_void {
        // SAFETY: generated loaders pass nul-terminated literals.
        let name = unsafe { CStr::from_ptr(name) };

        // glXGetProcAddress returns non-null for any name, so exported symbols go first. on
        // windows wglGetProcAddress does not know about the gl 1.1 exports, the order is the same.
        let mut addr = self.dynlib.lookup_ptr(name);
        if addr.is_null() {
            addr = self.platform_proc_address(name);
        }
        if addr.is_null() {
            log::debug!("{name:?} is not available");
        }
        addr
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn is_wgl_failure(addr: isize) -> bool {
    matches!(addr, 0 | 1 | 2 | 3 | -1)
}

#[test]
fn test_is_wgl_failure() {
    for addr in [0, 1, 2, 3, -1] {
        assert!(is_wgl_failure(addr));
    }
    assert!(!is_wgl_failure(4));
    assert!(!is_wgl_failure(0x7ffe_1234));
}
