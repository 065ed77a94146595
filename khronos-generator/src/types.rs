// the registry describes types as c snippets; these are their hand-written rust counterparts.

pub(crate) const GL_TYPES: &str = "pub type GLbitfield = std::ffi::c_uint;
pub type GLboolean = std::ffi::c_uchar;
pub type GLbyte = std::ffi::c_schar;
pub type GLchar = std::ffi::c_char;
pub type GLclampd = std::ffi::c_double;
pub type GLclampf = std::ffi::c_float;
pub type GLdouble = std::ffi::c_double;
pub type GLenum = std::ffi::c_uint;
pub type GLfloat = std::ffi::c_float;
pub type GLint = std::ffi::c_int;
pub type GLint64 = i64;
pub type GLintptr = isize;
pub type GLshort = std::ffi::c_short;
pub type GLsizei = std::ffi::c_int;
pub type GLsizeiptr = isize;
pub type GLsync = *mut std::ffi::c_void;
pub type GLubyte = std::ffi::c_uchar;
pub type GLuint = std::ffi::c_uint;
pub type GLuint64 = u64;
pub type GLushort = std::ffi::c_ushort;

pub type GLDEBUGPROC = Option<
    unsafe extern \"system\" fn(
        source: GLenum,
        r#type: GLenum,
        id: GLuint,
        severity: GLenum,
        length: GLsizei,
        message: *const GLchar,
        user_param: *mut std::ffi::c_void,
    ),
>;
";

// https://registry.khronos.org/OpenGL/api/GL/glxext.h and <X11/Xlib.h>, <X11/Xutil.h>

pub(crate) const GLX_TYPES: &str = "pub type GLubyte = std::ffi::c_uchar;

pub type XID = std::ffi::c_ulong;
pub type Bool = std::ffi::c_int;
pub type Colormap = XID;
pub type Font = XID;
pub type Pixmap = XID;
pub type Window = XID;
pub type VisualID = std::ffi::c_ulong;

dynlib::opaque_struct!(Display);
dynlib::opaque_struct!(Visual);

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct XVisualInfo {
    pub visual: *mut Visual,
    pub visualid: VisualID,
    pub screen: std::ffi::c_int,
    pub depth: std::ffi::c_int,
    pub class: std::ffi::c_int,
    pub red_mask: std::ffi::c_ulong,
    pub green_mask: std::ffi::c_ulong,
    pub blue_mask: std::ffi::c_ulong,
    pub colormap_size: std::ffi::c_int,
    pub bits_per_rgb: std::ffi::c_int,
}

pub type GLXContext = *mut std::ffi::c_void;
pub type GLXFBConfig = *mut std::ffi::c_void;
pub type GLXContextID = XID;
pub type GLXDrawable = XID;
pub type GLXFBConfigID = XID;
pub type GLXPbuffer = XID;
pub type GLXPixmap = XID;
pub type GLXWindow = XID;

pub type __GLXextFuncPtr = Option<unsafe extern \"C\" fn()>;
";

// https://registry.khronos.org/OpenGL/api/GL/wglext.h and <windef.h>; sizes are the windows ones
// regardless of the host the bindings are generated on.

pub(crate) const WGL_TYPES: &str = "pub type BOOL = std::ffi::c_int;
pub type BYTE = u8;
pub type CHAR = std::ffi::c_char;
pub type DWORD = u32;
pub type FLOAT = f32;
pub type INT = i32;
pub type INT32 = i32;
pub type INT64 = i64;
pub type LONG = i32;
pub type UINT = u32;
pub type USHORT = u16;
pub type COLORREF = DWORD;

pub type HANDLE = *mut std::ffi::c_void;
pub type HDC = HANDLE;
pub type HENHMETAFILE = HANDLE;
pub type HGLRC = HANDLE;
pub type HPBUFFERARB = HANDLE;
pub type HPBUFFEREXT = HANDLE;

pub type LPCSTR = *const std::ffi::c_char;
pub type LPVOID = *mut std::ffi::c_void;
pub type PROC = Option<unsafe extern \"system\" fn() -> isize>;
";
