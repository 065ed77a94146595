use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::Context as _;
use khronos_generator::{Api, Profile, Version};

fn create(out_dir: &Path, api: &Api, what: &str) -> anyhow::Result<BufWriter<File>> {
    let path = out_dir.join(format!("{}_{what}_generated.rs", api.as_str()));
    let file = File::create(&path).with_context(|| format!("could not create {path:?}"))?;
    Ok(BufWriter::new(file))
}

fn generate(api: Api, version: Version, extensions: &[&str]) -> anyhow::Result<()> {
    let api_str = api.as_str();
    let out_dir = PathBuf::from(&env::var("OUT_DIR").context("out dir is missing")?);

    let path = format!("../khronos-registry/{api_str}.xml");
    let input = fs::read_to_string(&path).with_context(|| format!("could not read {path}"))?;
    let registry = khronos_generator::filter_registry(
        khronos_generator::parse_registry(input.as_str())
            .with_context(|| format!("could not parse {path}"))?,
        &api,
        &version,
        &Profile::Compatibility,
        extensions,
    )
    .with_context(|| format!("could not filter {path}"))?;

    let mut types_out = create(&out_dir, &api, "types")?;
    khronos_generator::emit_types(&mut types_out, &api).context("could not emit types")?;
    types_out.flush()?;

    let mut enums_out = create(&out_dir, &api, "enums")?;
    khronos_generator::emit_enums(&mut enums_out, &registry, &api)
        .context("could not emit enums")?;
    enums_out.flush()?;

    let mut api_out = create(&out_dir, &api, "api")?;
    khronos_generator::emit_api(&mut api_out, &registry, &api).context("could not emit api")?;
    api_out.flush()?;

    let mut extensions_out = create(&out_dir, &api, "extensions")?;
    khronos_generator::emit_extensions(&mut extensions_out, &registry, &api)
        .context("could not emit extensions")?;
    extensions_out.flush()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../khronos-generator");
    println!("cargo:rerun-if-changed=../khronos-registry");

    // glx and wgl are generated everywhere; only their loaders are platform specific.
    generate(
        Api::Gl,
        Version(3, 2),
        &[
            #[cfg(feature = "GL_EXT_abgr")]
            "GL_EXT_abgr",
            #[cfg(feature = "GL_EXT_bgra")]
            "GL_EXT_bgra",
            #[cfg(feature = "GL_EXT_blend_color")]
            "GL_EXT_blend_color",
            #[cfg(feature = "GL_EXT_blend_minmax")]
            "GL_EXT_blend_minmax",
            #[cfg(feature = "GL_EXT_blend_subtract")]
            "GL_EXT_blend_subtract",
            #[cfg(feature = "GL_EXT_debug_marker")]
            "GL_EXT_debug_marker",
            #[cfg(feature = "GL_EXT_draw_range_elements")]
            "GL_EXT_draw_range_elements",
            #[cfg(feature = "GL_EXT_framebuffer_sRGB")]
            "GL_EXT_framebuffer_sRGB",
            #[cfg(feature = "GL_EXT_packed_pixels")]
            "GL_EXT_packed_pixels",
            #[cfg(feature = "GL_EXT_polygon_offset")]
            "GL_EXT_polygon_offset",
            #[cfg(feature = "GL_EXT_stencil_wrap")]
            "GL_EXT_stencil_wrap",
            #[cfg(feature = "GL_EXT_texture3D")]
            "GL_EXT_texture3D",
            #[cfg(feature = "GL_EXT_texture_edge_clamp")]
            "GL_EXT_texture_edge_clamp",
            #[cfg(feature = "GL_EXT_texture_filter_anisotropic")]
            "GL_EXT_texture_filter_anisotropic",
            #[cfg(feature = "GL_EXT_texture_sRGB_decode")]
            "GL_EXT_texture_sRGB_decode",
            #[cfg(feature = "GL_EXT_x11_sync_object")]
            "GL_EXT_x11_sync_object",
        ],
    )?;
    generate(
        Api::Glx,
        Version(1, 4),
        &[
            #[cfg(feature = "GLX_ARB_create_context")]
            "GLX_ARB_create_context",
            #[cfg(feature = "GLX_ARB_create_context_profile")]
            "GLX_ARB_create_context_profile",
            #[cfg(feature = "GLX_ARB_framebuffer_sRGB")]
            "GLX_ARB_framebuffer_sRGB",
            #[cfg(feature = "GLX_ARB_get_proc_address")]
            "GLX_ARB_get_proc_address",
            #[cfg(feature = "GLX_ARB_multisample")]
            "GLX_ARB_multisample",
            #[cfg(feature = "GLX_EXT_framebuffer_sRGB")]
            "GLX_EXT_framebuffer_sRGB",
            #[cfg(feature = "GLX_EXT_swap_control")]
            "GLX_EXT_swap_control",
            #[cfg(feature = "GLX_EXT_swap_control_tear")]
            "GLX_EXT_swap_control_tear",
            #[cfg(feature = "GLX_EXT_texture_from_pixmap")]
            "GLX_EXT_texture_from_pixmap",
            #[cfg(feature = "GLX_EXT_visual_info")]
            "GLX_EXT_visual_info",
            #[cfg(feature = "GLX_MESA_swap_control")]
            "GLX_MESA_swap_control",
        ],
    )?;
    generate(
        Api::Wgl,
        Version(1, 0),
        &[
            #[cfg(feature = "WGL_ARB_create_context")]
            "WGL_ARB_create_context",
            #[cfg(feature = "WGL_ARB_create_context_profile")]
            "WGL_ARB_create_context_profile",
            #[cfg(feature = "WGL_ARB_extensions_string")]
            "WGL_ARB_extensions_string",
            #[cfg(feature = "WGL_ARB_framebuffer_sRGB")]
            "WGL_ARB_framebuffer_sRGB",
            #[cfg(feature = "WGL_ARB_multisample")]
            "WGL_ARB_multisample",
            #[cfg(feature = "WGL_ARB_pixel_format")]
            "WGL_ARB_pixel_format",
            #[cfg(feature = "WGL_EXT_extensions_string")]
            "WGL_EXT_extensions_string",
            #[cfg(feature = "WGL_EXT_framebuffer_sRGB")]
            "WGL_EXT_framebuffer_sRGB",
            #[cfg(feature = "WGL_EXT_swap_control")]
            "WGL_EXT_swap_control",
        ],
    )?;

    Ok(())
}
