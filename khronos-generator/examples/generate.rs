use std::io::stdout;
use std::{env, fs};

use anyhow::{Context as _, bail};
use khronos_generator::{Api, Profile, Version};

// example driven development: `cargo run -p khronos-generator --example generate -- glx`

fn main() -> anyhow::Result<()> {
    let command = env::args().nth(1);

    let all = [
        (Api::Gl, Version(3, 2)),
        (Api::Glx, Version(1, 4)),
        (Api::Wgl, Version(1, 0)),
    ];
    let args: &[(Api, Version)] = match command.as_deref() {
        Some("gl") => &all[0..1],
        Some("glx") => &all[1..2],
        Some("wgl") => &all[2..3],
        Some(other) => bail!("invalid command {other:?} (want gl, glx or wgl)"),
        None => &all,
    };

    for (api, version) in args {
        let path = format!("khronos-registry/{}.xml", api.as_str());
        let input = fs::read_to_string(&path).with_context(|| format!("could not read {path}"))?;
        let registry = khronos_generator::parse_registry(&input)?;
        let extensions: Vec<&str> = registry
            .extensions
            .iter()
            .filter(|ext| ext.is_supported_on(api))
            .map(|ext| ext.name)
            .collect();
        let registry = khronos_generator::filter_registry(
            registry,
            api,
            version,
            &Profile::Compatibility,
            &extensions,
        )?;

        let mut w = stdout();
        khronos_generator::emit_types(&mut w, api)?;
        khronos_generator::emit_enums(&mut w, &registry, api)?;
        khronos_generator::emit_api(&mut w, &registry, api)?;
        khronos_generator::emit_extensions(&mut w, &registry, api)?;
    }

    Ok(())
}
