use std::io;

use anyhow::{Context as _, bail};

use crate::types::{GL_TYPES, GLX_TYPES, WGL_TYPES};
use crate::{Api, CType, Command, Registry};

pub fn emit_types<W: io::Write>(w: &mut W, api: &Api) -> anyhow::Result<()> {
    let types = match api {
        Api::Gl => GL_TYPES,
        Api::Glx => GLX_TYPES,
        Api::Wgl => WGL_TYPES,
    };
    w.write_all(types.as_bytes())?;
    Ok(())
}

// enums

/// Strips the api prefix unless the result would not be a valid identifier.
fn normalize_enum_name<'a>(name: &'a str, api: &Api) -> &'a str {
    match name.strip_prefix(api.enum_prefix()) {
        Some(stripped) if stripped.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
            stripped
        }
        _ => name,
    }
}

fn normalize_enum_type(
    r#type: Option<&str>,
    normalized_name: &str,
    api: &Api,
) -> anyhow::Result<&'static str> {
    let ty = match (api, r#type) {
        (Api::Gl, Some("u")) => "GLuint",
        (Api::Gl, Some("ull")) => "GLuint64",
        (Api::Gl, Some("bitmask")) => "GLbitfield",
        (Api::Gl, None) if matches!(normalized_name, "TRUE" | "FALSE") => "GLboolean",
        (Api::Gl, None) => "GLenum",
        (Api::Glx | Api::Wgl, Some("u")) => "std::ffi::c_uint",
        (Api::Glx | Api::Wgl, Some("ull")) => "u64",
        (Api::Glx | Api::Wgl, Some("bitmask") | None) => "std::ffi::c_int",
        (_, Some(other)) => bail!("unknown enum type {other:?}"),
    };
    Ok(ty)
}

fn parse_enum_value(value: &str) -> anyhow::Result<i128> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => i128::from_str_radix(hex, 16),
        None => value.parse::<i128>(),
    };
    parsed.with_context(|| format!("invalid enum value {value:?}"))
}

/// Writes `value` as a literal of `ty`, keeping the registry spelling. Values that only fit the
/// unsigned counterpart of a signed type keep their bit pattern through a cast, and the other way
/// around for negative values of unsigned types.
fn emit_enum_value<W: io::Write>(w: &mut W, value: &str, ty: &str) -> anyhow::Result<()> {
    let n = parse_enum_value(value)?;
    let (min, max): (i128, i128) = match ty {
        "GLboolean" => (0, u8::MAX.into()),
        "GLenum" | "GLuint" | "GLbitfield" | "std::ffi::c_uint" => (0, u32::MAX.into()),
        "GLuint64" | "u64" => (0, u64::MAX.into()),
        "std::ffi::c_int" => (i32::MIN.into(), i32::MAX.into()),
        other => bail!("unexpected enum type {other}"),
    };
    if (min..=max).contains(&n) {
        write!(w, "{value}")?;
    } else if ty == "std::ffi::c_int" && n > max && n <= u32::MAX.into() {
        write!(w, "{value}u32 as {ty}")?;
    } else if min == 0 && n < 0 {
        let (signed, signed_min) = if max <= u32::MAX.into() {
            ("i32", i128::from(i32::MIN))
        } else {
            ("i64", i128::from(i64::MIN))
        };
        if n < signed_min {
            bail!("{value} does not fit {ty}");
        }
        write!(w, "{value}{signed} as {ty}")?;
    } else {
        bail!("{value} does not fit {ty}");
    }
    Ok(())
}

pub fn emit_enums<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    for e in registry.enums.iter() {
        let name = normalize_enum_name(e.name, api);
        let ty = normalize_enum_type(e.r#type, name, api)
            .with_context(|| format!("could not normalize type of {}", e.name))?;
        write!(w, "pub const {name}: {ty} = ")?;
        emit_enum_value(w, e.value, ty).with_context(|| format!("invalid value of {}", e.name))?;
        writeln!(w, ";")?;
    }
    writeln!(w)?;
    Ok(())
}

// api

fn normalize_command_name<'a>(name: &'a str, api: &Api) -> &'a str {
    // wgl 1.0 has a few commands without prefix (ChoosePixelFormat, SwapBuffers).
    name.strip_prefix(api.command_prefix()).unwrap_or(name)
}

fn normalize_command_param_name(name: &str) -> String {
    match name {
        "self" | "Self" | "super" | "crate" => format!("{name}_"),
        "as" | "break" | "const" | "continue" | "else" | "enum" | "extern" | "false" | "fn"
        | "for" | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move" | "mut"
        | "pub" | "ref" | "return" | "static" | "struct" | "trait" | "true" | "type"
        | "unsafe" | "use" | "where" | "while" | "async" | "await" | "dyn" | "abstract"
        | "become" | "box" | "do" | "final" | "macro" | "override" | "priv" | "typeof"
        | "unsized" | "virtual" | "yield" | "try" | "gen" => format!("r#{name}"),
        ok => ok.to_string(),
    }
}

struct Signature {
    /// `name: Type` pairs.
    params: Vec<(String, String)>,
    /// `None` for void.
    ret: Option<String>,
}

impl Signature {
    fn new(cmd: &Command) -> anyhow::Result<Self> {
        let mut params = Vec::with_capacity(cmd.params.len());
        for param in cmd.params.iter() {
            let ty = CType::parse(&param.type_parts)
                .with_context(|| format!("could not translate param {}", param.name))?;
            params.push((normalize_command_param_name(param.name), ty.to_string()));
        }
        let ret = CType::parse(&cmd.proto.type_parts).context("could not translate return type")?;
        Ok(Self {
            params,
            ret: (!ret.is_void()).then(|| ret.to_string()),
        })
    }
}

const FN_PTR: &str = "#[cold]
#[inline(never)]
fn not_loaded(name: &str) -> ! {
    panic!(\"function was not loaded: {name}\")
}

struct FnPtr {
    ptr: *const std::ffi::c_void,
}

impl FnPtr {
    fn new(ptr: *mut std::ffi::c_void) -> Self {
        Self { ptr: ptr.cast_const() }
    }

    #[inline]
    fn is_loaded(&self) -> bool {
        !self.ptr.is_null()
    }

    #[inline]
    fn get(&self, name: &str) -> *const std::ffi::c_void {
        if !self.is_loaded() {
            not_loaded(name);
        }
        self.ptr
    }
}

";

fn emit_api_struct<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    writeln!(w, "pub struct Api {{")?;
    for cmd in registry.commands.iter() {
        let name = normalize_command_name(cmd.proto.name, api);
        writeln!(w, "    {name}: FnPtr,")?;
    }
    writeln!(w, "    config: Config,")?;
    if api.error_command().is_some() {
        writeln!(w, "    errors: ErrorState,")?;
    }
    writeln!(w, "}}\n")?;
    Ok(())
}

fn emit_load_with<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    write!(
        w,
        "    /// Resolves every entry point through `get_proc_address`, which receives the
    /// nul-terminated command name and returns null when it is not available.
    ///
    /// # Safety
    ///
    /// Non-null pointers must be the entry points of the named commands.
    pub unsafe fn load_with<F>(config: Config, mut get_proc_address: F) -> Self
    where
        F: FnMut(*const std::ffi::c_char) -> *mut std::ffi::c_void,
    {{
        Self {{
"
    )?;
    for cmd in registry.commands.iter() {
        writeln!(
            w,
            "            {}: FnPtr::new(get_proc_address(c\"{}\".as_ptr())),",
            normalize_command_name(cmd.proto.name, api),
            cmd.proto.name,
        )?;
    }
    writeln!(w, "            config,")?;
    if api.error_command().is_some() {
        writeln!(w, "            errors: ErrorState::default(),")?;
    }
    write!(
        w,
        "        }}
    }}

    pub fn config(&self) -> &Config {{
        &self.config
    }}

    pub fn set_config(&mut self, config: Config) {{
        self.config = config;
    }}
"
    )?;
    Ok(())
}

fn emit_wrapper<W: io::Write>(w: &mut W, cmd: &Command, api: &Api) -> anyhow::Result<()> {
    let sig = Signature::new(cmd)
        .with_context(|| format!("invalid signature of {}", cmd.proto.name))?;
    let full_name = cmd.proto.name;
    let name = normalize_command_name(full_name, api);

    // signature
    write!(w, "\n    #[inline]\n    pub unsafe fn {name}(&self")?;
    for (param, ty) in sig.params.iter() {
        write!(w, ", {param}: {ty}")?;
    }
    write!(w, ")")?;
    if let Some(ret) = sig.ret.as_ref() {
        write!(w, " -> {ret}")?;
    }
    writeln!(w, " {{")?;

    // native type
    let param_types: Vec<&str> = sig.params.iter().map(|(_, ty)| ty.as_str()).collect();
    write!(
        w,
        "        type Dst = unsafe extern \"system\" fn({})",
        param_types.join(", ")
    )?;
    if let Some(ret) = sig.ret.as_ref() {
        write!(w, " -> {ret}")?;
    }
    writeln!(w, ";")?;

    // call
    let param_names: Vec<&str> = sig.params.iter().map(|(param, _)| param.as_str()).collect();
    writeln!(
        w,
        "        let f_ = unsafe {{ std::mem::transmute::<*const std::ffi::c_void, Dst>(self.{name}.get(\"{full_name}\")) }};"
    )?;
    writeln!(
        w,
        "        let ret_ = unsafe {{ f_({}) }};",
        param_names.join(", ")
    )?;

    // log
    let placeholders = vec!["{:?}"; param_names.len()].join(", ");
    writeln!(w, "        if self.config.log_calls {{")?;
    write!(
        w,
        "            log::trace!(target: \"{}\", \"{full_name}({placeholders}) -> {{:?}}\"",
        api.as_str()
    )?;
    for param in param_names.iter() {
        write!(w, ", {param}")?;
    }
    writeln!(w, ", ret_);")?;
    writeln!(w, "        }}")?;

    // tracked regardless of config; it can change inside a primitive.
    if let Some((begin, end)) = api.primitive_commands() {
        if full_name == begin {
            writeln!(w, "        self.errors.begin_primitive();")?;
        } else if full_name == end {
            writeln!(w, "        self.errors.end_primitive();")?;
        }
    }

    // error
    if let Some(error_command) = api.error_command() {
        if error_command != full_name {
            writeln!(w, "        if self.config.errors.is_enabled() {{")?;
            writeln!(w, "            unsafe {{ self.check_error(\"{full_name}\") }};")?;
            writeln!(w, "        }}")?;
        }
    }

    writeln!(w, "        ret_")?;
    writeln!(w, "    }}")?;
    Ok(())
}

fn emit_entry_points<W: io::Write>(
    w: &mut W,
    registry: &Registry,
    api: &Api,
) -> anyhow::Result<()> {
    write!(
        w,
        "impl EntryPoints for Api {{
    fn is_loaded(&self, name: &str) -> bool {{
        match name {{
"
    )?;
    for cmd in registry.commands.iter() {
        writeln!(
            w,
            "            \"{}\" => self.{}.is_loaded(),",
            cmd.proto.name,
            normalize_command_name(cmd.proto.name, api),
        )?;
    }
    write!(
        w,
        "            _ => false,
        }}
    }}
}}
"
    )?;
    Ok(())
}

/// Emits the `Api` struct. The including module must provide `Config`, `EntryPoints` and, for
/// apis with an error query, `ErrorState` (with `begin_primitive` and `end_primitive`) and
/// `Api::check_error`.
pub fn emit_api<W: io::Write>(w: &mut W, registry: &Registry, api: &Api) -> anyhow::Result<()> {
    w.write_all(FN_PTR.as_bytes())?;
    emit_api_struct(w, registry, api)?;

    writeln!(w, "impl Api {{")?;
    emit_load_with(w, registry, api)?;
    for cmd in registry.commands.iter() {
        emit_wrapper(w, cmd, api)?;
    }
    writeln!(w, "}}\n")?;

    emit_entry_points(w, registry, api)?;
    Ok(())
}

// extensions

/// Emits one `Extension` const per extension left in the (filtered) registry and an
/// `EXTENSIONS` slice with all of them. The including module must provide `Extension`.
pub fn emit_extensions<W: io::Write>(
    w: &mut W,
    registry: &Registry,
    api: &Api,
) -> anyhow::Result<()> {
    let mut idents: Vec<&str> = Vec::with_capacity(registry.extensions.len());
    for ext in registry.extensions.iter() {
        let ident = ext
            .name
            .strip_prefix(api.enum_prefix())
            .with_context(|| format!("{} does not start with {}", ext.name, api.enum_prefix()))?;
        idents.push(ident);

        writeln!(w, "pub const {ident}: Extension = Extension {{")?;
        writeln!(w, "    name: \"{}\",", ext.name)?;
        write!(w, "    enums: &[")?;
        for name in ext.requires.iter().flat_map(|it| it.enums.iter()) {
            write!(w, "\"{name}\", ")?;
        }
        writeln!(w, "],")?;
        write!(w, "    commands: &[")?;
        for name in ext.requires.iter().flat_map(|it| it.commands.iter()) {
            write!(w, "\"{name}\", ")?;
        }
        writeln!(w, "],")?;
        writeln!(w, "}};\n")?;
    }

    writeln!(w, "pub const EXTENSIONS: &[Extension] = &[{}];", idents.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TEST_REGISTRY;
    use crate::{Profile, Version, filter_registry, parse_registry};

    fn registry(profile: Profile, extensions: &[&str]) -> Registry<'static> {
        filter_registry(
            parse_registry(TEST_REGISTRY).unwrap(),
            &Api::Gl,
            &Version(3, 2),
            &profile,
            extensions,
        )
        .unwrap()
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn value(value: &str, ty: &str) -> anyhow::Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        emit_enum_value(&mut buf, value, ty)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_normalize_names() {
        assert_eq!(normalize_enum_name("GL_BGRA_EXT", &Api::Gl), "BGRA_EXT");
        assert_eq!(normalize_enum_name("GLX_RGBA", &Api::Glx), "RGBA");
        assert_eq!(
            normalize_enum_name("ERROR_INVALID_VERSION_ARB", &Api::Wgl),
            "ERROR_INVALID_VERSION_ARB"
        );
        assert_eq!(normalize_enum_name("GL_2D", &Api::Gl), "GL_2D");

        assert_eq!(normalize_command_name("glClear", &Api::Gl), "Clear");
        assert_eq!(normalize_command_name("glXSwapBuffers", &Api::Glx), "SwapBuffers");
        assert_eq!(normalize_command_name("wglMakeCurrent", &Api::Wgl), "MakeCurrent");
        assert_eq!(normalize_command_name("SwapBuffers", &Api::Wgl), "SwapBuffers");

        assert_eq!(normalize_command_param_name("type"), "r#type");
        assert_eq!(normalize_command_param_name("ref"), "r#ref");
        assert_eq!(normalize_command_param_name("self"), "self_");
        assert_eq!(normalize_command_param_name("mask"), "mask");
    }

    #[test]
    fn test_enum_values() {
        assert_eq!(value("0x0500", "GLenum").unwrap(), "0x0500");
        assert_eq!(value("0xFFFFFFFFFFFFFFFF", "GLuint64").unwrap(), "0xFFFFFFFFFFFFFFFF");
        assert_eq!(value("100001", "std::ffi::c_int").unwrap(), "100001");
        assert_eq!(
            value("0xFFFFFFFF", "std::ffi::c_int").unwrap(),
            "0xFFFFFFFFu32 as std::ffi::c_int"
        );
        assert_eq!(value("-1", "GLenum").unwrap(), "-1i32 as GLenum");
        assert_eq!(value("-1", "std::ffi::c_int").unwrap(), "-1");
        assert!(value("0x100000000", "GLenum").is_err());
        assert!(value("2", "GLboolean").is_ok());
        assert!(value("0x100", "GLboolean").is_err());
        assert!(value("EGL_CAST(EGLint,-1)", "GLenum").is_err());
    }

    #[test]
    fn test_emit_enums() {
        let out = to_string(|w| emit_enums(w, &registry(Profile::Compatibility, &[]), &Api::Gl));
        assert!(out.contains("pub const COLOR_BUFFER_BIT: GLbitfield = 0x00004000;\n"));
        assert!(out.contains("pub const NO_ERROR: GLenum = 0;\n"));
        assert!(out.contains("pub const QUADS: GLenum = 0x0007;\n"));
        assert!(out.contains("pub const TIMEOUT_IGNORED: GLuint64 = 0xFFFFFFFFFFFFFFFF;\n"));

        let out = to_string(|w| emit_enums(w, &registry(Profile::Core, &[]), &Api::Gl));
        assert!(!out.contains("QUADS"));
    }

    #[test]
    fn test_emit_api() {
        let out = to_string(|w| {
            emit_api(
                w,
                &registry(Profile::Compatibility, &["GL_EXT_x11_sync_object"]),
                &Api::Gl,
            )
        });

        assert!(out.contains("    Clear: FnPtr,\n"));
        assert!(out.contains("    errors: ErrorState,\n"));
        assert!(out.contains("Clear: FnPtr::new(get_proc_address(c\"glClear\".as_ptr())),"));
        assert!(out.contains("pub unsafe fn Clear(&self, mask: GLbitfield) {"));
        assert!(out.contains("type Dst = unsafe extern \"system\" fn(GLbitfield);"));
        assert!(out.contains(
            "pub unsafe fn ImportSyncEXT(&self, external_sync_type: GLenum, external_sync: GLintptr, flags: GLbitfield) -> GLsync {"
        ));
        assert!(out.contains("log::trace!(target: \"gl\", \"glClear({:?}) -> {:?}\", mask, ret_);"));
        assert!(out.contains("self.check_error(\"glClear\")"));
        assert!(out.contains("        self.errors.begin_primitive();\n        if self.config.errors.is_enabled() {"));
        // querying the error must not query the error.
        assert!(!out.contains("self.check_error(\"glGetError\")"));
        assert!(out.contains("\"glImportSyncEXT\" => self.ImportSyncEXT.is_loaded(),"));
    }

    #[test]
    fn test_emit_api_without_error_query() {
        const GLX: &str = r#"<registry>
    <commands namespace="GLX">
        <command>
            <proto>void <name>glXSwapBuffers</name></proto>
            <param><ptype>Display</ptype> *<name>dpy</name></param>
            <param><ptype>GLXDrawable</ptype> <name>drawable</name></param>
        </command>
    </commands>
    <feature api="glx" name="GLX_VERSION_1_0" number="1.0">
        <require>
            <command name="glXSwapBuffers"/>
        </require>
    </feature>
</registry>
"#;
        let registry = filter_registry(
            parse_registry(GLX).unwrap(),
            &Api::Glx,
            &Version(1, 0),
            &Profile::Compatibility,
            &[],
        )
        .unwrap();
        let out = to_string(|w| emit_api(w, &registry, &Api::Glx));
        assert!(out.contains("pub unsafe fn SwapBuffers(&self, dpy: *mut Display, drawable: GLXDrawable) {"));
        assert!(out.contains("log::trace!(target: \"glx\""));
        assert!(!out.contains("ErrorState"));
        assert!(!out.contains("check_error"));
        assert!(!out.contains("primitive"));
    }

    #[test]
    fn test_emit_extensions() {
        let out = to_string(|w| {
            emit_extensions(
                w,
                &registry(
                    Profile::Compatibility,
                    &["GL_EXT_x11_sync_object", "GL_EXT_separate_shader_objects"],
                ),
                &Api::Gl,
            )
        });
        assert!(out.contains("pub const EXT_x11_sync_object: Extension = Extension {"));
        assert!(out.contains("    name: \"GL_EXT_x11_sync_object\",\n"));
        assert!(out.contains("    enums: &[\"GL_SYNC_X11_FENCE_EXT\", ],\n"));
        assert!(out.contains("    commands: &[\"glImportSyncEXT\", ],\n"));
        // the gles2 require block is filtered out.
        assert!(!out.contains("glActiveShaderProgramEXT"));
        assert!(out.contains(
            "pub const EXTENSIONS: &[Extension] = &[EXT_x11_sync_object, EXT_separate_shader_objects];"
        ));
    }

    #[test]
    fn test_emit_types() {
        let out = to_string(|w| emit_types(w, &Api::Wgl));
        assert!(out.contains("pub type HGLRC = HANDLE;"));
        let out = to_string(|w| emit_types(w, &Api::Glx));
        assert!(out.contains("dynlib::opaque_struct!(Display);"));
        let out = to_string(|w| emit_types(w, &Api::Gl));
        assert!(out.contains("        user_param: *mut std::ffi::c_void,"));
    }

    #[test]
    fn test_window_system_enum_types_need_no_imports() {
        for api in [Api::Glx, Api::Wgl] {
            for ty in [None, Some("u"), Some("ull"), Some("bitmask")] {
                let ty = normalize_enum_type(ty, "RGBA", &api).unwrap();
                assert!(ty.starts_with("std::ffi::") || ty == "u64", "{ty}");
            }
        }
    }
}
