use std::fmt;

use anyhow::bail;

use crate::registry::CommandTypePart;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Base<'a> {
    Void,
    /// Rust spelling of a c primitive.
    Primitive(&'static str),
    /// A type the registry (and therefore the generated types module) defines.
    Defined(&'a str),
}

/// A c declaration specifier translated to its rust counterpart.
///
/// `pointers` holds one entry per `*`, from the innermost to the outermost, telling whether that
/// pointer is itself `const`. Rust encodes constness on the pointee, so `const void *const*`
/// becomes `*const *const c_void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CType<'a> {
    base: Base<'a>,
    base_const: bool,
    pointers: Vec<bool>,
}

fn primitive(words: &[&str]) -> Option<Base<'static>> {
    let base = match words {
        ["void"] => Base::Void,
        ["char"] => Base::Primitive("std::ffi::c_char"),
        ["signed", "char"] => Base::Primitive("std::ffi::c_schar"),
        ["unsigned", "char"] => Base::Primitive("std::ffi::c_uchar"),
        ["short"] | ["short", "int"] => Base::Primitive("std::ffi::c_short"),
        ["unsigned", "short"] | ["unsigned", "short", "int"] => {
            Base::Primitive("std::ffi::c_ushort")
        }
        ["int"] | ["signed"] | ["signed", "int"] => Base::Primitive("std::ffi::c_int"),
        ["unsigned"] | ["unsigned", "int"] => Base::Primitive("std::ffi::c_uint"),
        ["long"] | ["long", "int"] => Base::Primitive("std::ffi::c_long"),
        ["unsigned", "long"] | ["unsigned", "long", "int"] => Base::Primitive("std::ffi::c_ulong"),
        ["long", "long"] => Base::Primitive("std::ffi::c_longlong"),
        ["unsigned", "long", "long"] => Base::Primitive("std::ffi::c_ulonglong"),
        ["float"] => Base::Primitive("std::ffi::c_float"),
        ["double"] => Base::Primitive("std::ffi::c_double"),
        ["int32_t"] => Base::Primitive("i32"),
        ["uint32_t"] => Base::Primitive("u32"),
        ["int64_t"] => Base::Primitive("i64"),
        ["uint64_t"] => Base::Primitive("u64"),
        ["size_t"] => Base::Primitive("usize"),
        ["ptrdiff_t"] => Base::Primitive("isize"),
        _ => return None,
    };
    Some(base)
}

impl<'a> CType<'a> {
    pub fn parse(parts: &[CommandTypePart<'a>]) -> anyhow::Result<Self> {
        let mut defined: Option<&'a str> = None;
        let mut words: Vec<&'a str> = Vec::new();
        let mut base_const = false;
        let mut pointers: Vec<bool> = Vec::new();

        for part in parts {
            match *part {
                CommandTypePart::Defined(name) => {
                    if defined.is_some() || !words.is_empty() || !pointers.is_empty() {
                        bail!("unexpected type {name:?} in {parts:?}");
                    }
                    defined = Some(name);
                }
                CommandTypePart::Other(text) => {
                    for token in text.split_inclusive('*').flat_map(|chunk| {
                        let (head, star) = match chunk.strip_suffix('*') {
                            Some(head) => (head, Some("*")),
                            None => (chunk, None),
                        };
                        head.split_whitespace().chain(star)
                    }) {
                        match token {
                            "*" => pointers.push(false),
                            "const" => match pointers.last_mut() {
                                Some(last) => *last = true,
                                None => base_const = true,
                            },
                            "struct" => bail!("struct types are not supported: {parts:?}"),
                            word => {
                                if defined.is_some() || !pointers.is_empty() {
                                    bail!("unexpected word {word:?} in {parts:?}");
                                }
                                words.push(word);
                            }
                        }
                    }
                }
            }
        }

        let base = match (defined, words.is_empty()) {
            (Some(name), true) => Base::Defined(name),
            (None, false) => match primitive(&words) {
                Some(base) => base,
                None => bail!("unknown c type {words:?}"),
            },
            (None, true) => bail!("missing type in {parts:?}"),
            (Some(_), false) => bail!("unexpected type mix in {parts:?}"),
        };

        Ok(Self {
            base,
            base_const,
            pointers,
        })
    }

    /// `void` without any pointers; such return types are omitted.
    pub fn is_void(&self) -> bool {
        self.base == Base::Void && self.pointers.is_empty()
    }
}

impl fmt::Display for CType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // outermost pointer first; what counts for pointer i is the constness of what it points
        // at.
        for i in (0..self.pointers.len()).rev() {
            let points_at_const = match i {
                0 => self.base_const,
                _ => self.pointers[i - 1],
            };
            f.write_str(if points_at_const { "*const " } else { "*mut " })?;
        }
        match self.base {
            Base::Void if self.pointers.is_empty() => f.write_str("()"),
            Base::Void => f.write_str("std::ffi::c_void"),
            Base::Primitive(name) => f.write_str(name),
            Base::Defined(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandTypePart::*;

    fn rust(parts: &[CommandTypePart]) -> String {
        CType::parse(parts).unwrap().to_string()
    }

    #[test]
    fn test_defined() {
        assert_eq!(rust(&[Defined("GLenum")]), "GLenum");
        assert_eq!(rust(&[Defined("GLuint"), Other("*")]), "*mut GLuint");
        assert_eq!(
            rust(&[Other("const"), Defined("GLubyte"), Other("*")]),
            "*const GLubyte"
        );
        assert_eq!(
            rust(&[Other("const"), Defined("GLchar"), Other("*const*")]),
            "*const *const GLchar"
        );
        assert_eq!(
            rust(&[Other("const"), Defined("GLchar"), Other("**")]),
            "*mut *const GLchar"
        );
        assert_eq!(rust(&[Defined("Display"), Other("*")]), "*mut Display");
    }

    #[test]
    fn test_primitives() {
        assert_eq!(rust(&[Other("int")]), "std::ffi::c_int");
        assert_eq!(rust(&[Other("unsigned int")]), "std::ffi::c_uint");
        assert_eq!(rust(&[Other("int *")]), "*mut std::ffi::c_int");
        assert_eq!(rust(&[Other("const int *")]), "*const std::ffi::c_int");
        assert_eq!(rust(&[Other("const char *")]), "*const std::ffi::c_char");
        assert_eq!(rust(&[Other("unsigned long")]), "std::ffi::c_ulong");
        assert_eq!(rust(&[Other("int64_t *")]), "*mut i64");
    }

    #[test]
    fn test_void() {
        let void = CType::parse(&[Other("void")]).unwrap();
        assert!(void.is_void());
        assert_eq!(rust(&[Other("void *")]), "*mut std::ffi::c_void");
        assert_eq!(rust(&[Other("const void *")]), "*const std::ffi::c_void");
        assert_eq!(rust(&[Other("void **")]), "*mut *mut std::ffi::c_void");
        assert_eq!(
            rust(&[Other("const void **")]),
            "*mut *const std::ffi::c_void"
        );
        assert_eq!(
            rust(&[Other("const void *const*")]),
            "*const *const std::ffi::c_void"
        );
        assert!(!CType::parse(&[Other("void *")]).unwrap().is_void());
    }

    #[test]
    fn test_errors() {
        assert!(CType::parse(&[Other("struct _cl_context *")]).is_err());
        assert!(CType::parse(&[Other("quadruple")]).is_err());
        assert!(CType::parse(&[Other("*")]).is_err());
        assert!(CType::parse(&[Defined("GLenum"), Defined("GLenum")]).is_err());
    }
}
