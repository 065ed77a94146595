use std::{error, fmt};

use crate::libgl::{self as gl, GLenum};

/// A non-`GL_NO_ERROR` code reported by `glGetError` right after `command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    pub command: &'static str,
    pub code: GLenum,
}

/// Registry name of a `glGetError` code.
pub fn error_code_name(code: GLenum) -> Option<&'static str> {
    let name = match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => return None,
    };
    Some(name)
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match error_code_name(self.code) {
            Some(name) => f.write_fmt(format_args!(
                "{}: {name} ({:#x})",
                self.command, self.code
            )),
            None => f.write_fmt(format_args!(
                "{}: unknown error ({:#x})",
                self.command, self.code
            )),
        }
    }
}

#[test]
fn test_display() {
    let err = Error {
        command: "glTexImage3DEXT",
        code: gl::INVALID_ENUM,
    };
    assert_eq!(err.to_string(), "glTexImage3DEXT: GL_INVALID_ENUM (0x500)");

    let err = Error {
        command: "glClear",
        code: 0x1234,
    };
    assert_eq!(err.to_string(), "glClear: unknown error (0x1234)");
}
