use std::ffi::{CStr, c_void};
use std::{error, fmt};

#[derive(Debug)]
pub enum Error {
    /// The library could not be opened; carries the loader's message.
    Open(String),
    /// The symbol could not be found; carries the loader's message.
    Lookup(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(msg) => f.write_fmt(format_args!("could not open library: {msg}")),
            Self::Lookup(msg) => f.write_fmt(format_args!("could not find symbol: {msg}")),
        }
    }
}

#[cfg(unix)]
mod sys {
    use std::ffi::{CStr, c_void};
    use std::ptr::NonNull;

    use libc::{dlclose, dlerror, dlopen, dlsym};

    use crate::Error;

    unsafe fn last_error() -> Option<String> {
        let err = unsafe { dlerror() };
        if err.is_null() {
            None
        } else {
            // the string is owned by libc and only valid until the next dl* call.
            Some(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
        }
    }

    pub struct Handle(NonNull<c_void>);

    impl Handle {
        pub fn open(filename: &CStr) -> Result<Self, Error> {
            unsafe {
                let handle = dlopen(filename.as_ptr(), libc::RTLD_LAZY | libc::RTLD_LOCAL);
                match NonNull::new(handle) {
                    Some(handle) => Ok(Self(handle)),
                    None => Err(Error::Open(
                        last_error().unwrap_or_else(|| format!("{filename:?}")),
                    )),
                }
            }
        }

        pub fn lookup(&self, name: &CStr) -> Result<*mut c_void, Error> {
            unsafe {
                _ = last_error();
                let addr = dlsym(self.0.as_ptr(), name.as_ptr());
                if let Some(err) = last_error() {
                    return Err(Error::Lookup(err));
                }
                if addr.is_null() {
                    return Err(Error::Lookup(format!("{name:?} is null")));
                }
                Ok(addr)
            }
        }
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            unsafe {
                dlclose(self.0.as_ptr());
            }
        }
    }
}

#[cfg(windows)]
mod sys {
    use std::ffi::{CStr, c_void};

    use windows::Win32::Foundation::HMODULE;
    use windows::Win32::System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryA};
    use windows::core::PCSTR;

    use crate::Error;

    pub struct Handle(HMODULE);

    impl Handle {
        pub fn open(filename: &CStr) -> Result<Self, Error> {
            unsafe { LoadLibraryA(PCSTR(filename.as_ptr().cast())) }
                .map(Self)
                .map_err(|err| Error::Open(format!("{filename:?}: {err}")))
        }

        pub fn lookup(&self, name: &CStr) -> Result<*mut c_void, Error> {
            match unsafe { GetProcAddress(self.0, PCSTR(name.as_ptr().cast())) } {
                Some(addr) => Ok(addr as *mut c_void),
                None => Err(Error::Lookup(format!(
                    "{name:?}: {}",
                    std::io::Error::last_os_error()
                ))),
            }
        }
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            unsafe {
                _ = FreeLibrary(self.0);
            }
        }
    }
}

/// A shared library, closed on drop. Symbols looked up from it must not outlive it.
pub struct DynLib(sys::Handle);

impl DynLib {
    pub fn open(filename: &CStr) -> Result<Self, Error> {
        sys::Handle::open(filename).map(Self)
    }

    /// Looks `name` up and reinterprets its address as `F`.
    ///
    /// # Safety
    ///
    /// `F` must be a (possibly `Option`-wrapped) function pointer type matching the symbol's
    /// actual signature.
    pub unsafe fn lookup<F: Copy>(&self, name: &CStr) -> Result<F, Error> {
        const {
            assert!(size_of::<F>() == size_of::<*mut c_void>());
        }
        let addr = self.0.lookup(name)?;
        Ok(unsafe { std::mem::transmute_copy::<*mut c_void, F>(&addr) })
    }

    /// Raw address of `name`, null when the library does not export it.
    pub fn lookup_ptr(&self, name: &CStr) -> *mut c_void {
        self.0.lookup(name).unwrap_or(std::ptr::null_mut())
    }
}

#[macro_export]
macro_rules! opaque_struct {
    ($name:ident) => {
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
        }
    };
}

#[cfg(target_os = "linux")]
#[test]
fn test_open_and_lookup() {
    let lib = DynLib::open(c"libc.so.6").unwrap();
    let strlen = unsafe {
        lib.lookup::<unsafe extern "C" fn(*const std::ffi::c_char) -> usize>(c"strlen")
    }
    .unwrap();
    assert_eq!(unsafe { strlen(c"hello".as_ptr()) }, 5);

    assert!(!lib.lookup_ptr(c"strlen").is_null());
    assert!(lib.lookup_ptr(c"definitely_not_a_libc_symbol").is_null());

    let err = unsafe { lib.lookup::<unsafe extern "C" fn()>(c"definitely_not_a_libc_symbol") };
    assert!(matches!(err, Err(Error::Lookup(_))));
}

#[cfg(unix)]
#[test]
fn test_open_missing() {
    let Err(err) = DynLib::open(c"libdoes-not-exist.so.42") else {
        panic!("opened a library that does not exist");
    };
    assert!(matches!(err, Error::Open(_)));
    assert!(err.to_string().starts_with("could not open library: "));
}

#[test]
fn test_opaque_struct() {
    opaque_struct!(Thing);
    assert_eq!(size_of::<Thing>(), 0);
}
