use std::collections::HashSet;
use std::str::FromStr;

use anyhow::{Context as _, bail};
use xml::{Element, ElementIterator, StartTag};

use crate::{Api, Profile, Version};

#[derive(Debug)]
pub struct Enum<'a> {
    pub value: &'a str,
    pub name: &'a str,
    pub api: Option<&'a str>,
    pub r#type: Option<&'a str>,
    pub group: Option<&'a str>,
    pub alias: Option<&'a str>,
    pub comment: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTypePart<'a> {
    /// `<ptype>` - a type the registry defines (GLenum, Display, HDC, ...).
    Defined(&'a str),
    /// Free text around it: c types, qualifiers and pointers.
    Other(&'a str),
}

#[derive(Debug)]
pub struct CommandPart<'a> {
    pub type_parts: Vec<CommandTypePart<'a>>,
    pub name: &'a str,
}

#[derive(Debug)]
pub struct Command<'a> {
    pub proto: CommandPart<'a>,
    pub params: Vec<CommandPart<'a>>,
}

#[derive(Debug)]
pub struct Interface<'a> {
    pub api: Option<&'a str>,
    pub profile: Option<&'a str>,
    pub enums: Vec<&'a str>,
    pub commands: Vec<&'a str>,
}

impl Interface<'_> {
    fn applies_to(&self, api: &Api, profile: &Profile) -> bool {
        self.api.is_none_or(|it| it == api.as_str())
            && self.profile.is_none_or(|it| it == profile.as_str())
    }
}

#[derive(Debug)]
pub struct Feature<'a> {
    pub api: &'a str,
    pub name: &'a str,
    pub number: &'a str,
    pub requires: Vec<Interface<'a>>,
    pub removes: Vec<Interface<'a>>,
}

#[derive(Debug)]
pub struct Extension<'a> {
    pub name: &'a str,
    pub supported: &'a str,
    pub requires: Vec<Interface<'a>>,
}

impl Extension<'_> {
    pub fn is_supported_on(&self, api: &Api) -> bool {
        self.supported.split('|').any(|part| part == api.as_str())
    }
}

#[derive(Debug)]
pub struct Registry<'a> {
    pub enums: Vec<Enum<'a>>,
    pub commands: Vec<Command<'a>>,
    pub features: Vec<Feature<'a>>,
    pub extensions: Vec<Extension<'a>>,
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace())
}

fn expect_text<'a>(element_iterator: &mut ElementIterator<'a>) -> anyhow::Result<&'a str> {
    let Some(element) = element_iterator.next() else {
        bail!("unexpected eof");
    };
    let Element::Text(text) = element else {
        bail!("unexpected element (got {element:?}, want text)");
    };
    Ok(text)
}

fn expect_end_tag(element_iterator: &mut ElementIterator<'_>, name: &str) -> anyhow::Result<()> {
    let Some(element) = element_iterator.next() else {
        bail!("unexpected eof");
    };
    match element {
        Element::EndTag(end) if end.name == name => Ok(()),
        other => bail!("unexpected element (got {other:?}, want </{name}>)"),
    }
}

fn parse_enum_token_attrs<'a>(
    attrs: xml::AttributeIterator<'a>,
    block_type: Option<&'a str>,
) -> anyhow::Result<Enum<'a>> {
    let mut value: Option<&'a str> = None;
    let mut name: Option<&'a str> = None;
    let mut api: Option<&'a str> = None;
    let mut r#type: Option<&'a str> = None;
    let mut group: Option<&'a str> = None;
    let mut alias: Option<&'a str> = None;
    let mut comment: Option<&'a str> = None;
    for attr in attrs {
        let prev = match attr.key {
            "value" => value.replace(attr.value),
            "name" => name.replace(attr.value),
            "api" => api.replace(attr.value),
            "type" => r#type.replace(attr.value),
            "group" => group.replace(attr.value),
            "alias" => alias.replace(attr.value),
            "comment" => comment.replace(attr.value),
            other => bail!("unexpected attr: {other:?}"),
        };
        if prev.is_some() {
            bail!("duplicate attr: {:?}", attr.key);
        }
    }
    Ok(Enum {
        value: value.context("value is missing")?,
        name: name.context("name is missing")?,
        api,
        r#type: r#type.or(block_type),
        group,
        alias,
        comment,
    })
}

fn parse_enum_block_into<'a>(
    start_tag: StartTag<'a>,
    element_iterator: &mut ElementIterator<'a>,
    enums: &mut Vec<Enum<'a>>,
) -> anyhow::Result<()> {
    let block_type = start_tag.attr("type");
    while let Some(element) = element_iterator.next() {
        match element {
            Element::EmptyTag(empty) => match empty.name {
                "enum" => {
                    let token = parse_enum_token_attrs(empty.iter_attrs(), block_type)
                        .context("could not parse enum token attrs")?;
                    enums.push(token);
                }
                "unused" => {}
                other => bail!("unexpected empty: {other:?}"),
            },
            Element::Text(text) if is_whitespace(text) => {}
            Element::EndTag(end) if end.name == "enums" => break,
            Element::Comment(_) => {}
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(())
}

fn parse_command_part<'a>(
    tag_name: &str,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<CommandPart<'a>> {
    let mut type_parts: Vec<CommandTypePart<'a>> = Vec::new();
    let mut name: Option<&'a str> = None;
    while let Some(element) = element_iterator.next() {
        match element {
            Element::Text(text) => {
                if !is_whitespace(text) {
                    type_parts.push(CommandTypePart::Other(text.trim()));
                }
            }
            Element::StartTag(start) => match start.name {
                "name" => {
                    if name.is_some() {
                        bail!("duplicate name in {tag_name}");
                    }
                    name = Some(expect_text(element_iterator)?.trim());
                    expect_end_tag(element_iterator, "name")?;
                }
                "ptype" => {
                    type_parts.push(CommandTypePart::Defined(
                        expect_text(element_iterator)?.trim(),
                    ));
                    expect_end_tag(element_iterator, "ptype")?;
                }
                other => bail!("unexpected start: {other}"),
            },
            Element::EndTag(end) if end.name == tag_name => break,
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(CommandPart {
        type_parts,
        name: name.with_context(|| format!("{tag_name} name is missing"))?,
    })
}

fn parse_command<'a>(element_iterator: &mut ElementIterator<'a>) -> anyhow::Result<Command<'a>> {
    let mut proto: Option<CommandPart<'a>> = None;
    let mut params: Vec<CommandPart<'a>> = Vec::new();
    while let Some(element) = element_iterator.next() {
        match element {
            Element::StartTag(start) => match start.name {
                "proto" => {
                    if proto.is_some() {
                        bail!("duplicate proto");
                    }
                    proto = Some(
                        parse_command_part("proto", element_iterator)
                            .context("could not parse command proto")?,
                    );
                }
                "param" => {
                    params.push(
                        parse_command_part("param", element_iterator)
                            .context("could not parse command param")?,
                    );
                }
                other => bail!("unexpected start: {other}"),
            },
            Element::EndTag(end) => match end.name {
                "command" => break,
                other => bail!("unexpected end: {other}"),
            },
            Element::Text(text) if is_whitespace(text) => {}
            Element::EmptyTag(empty) if matches!(empty.name, "glx" | "alias" | "vecequiv") => {}
            Element::Comment(_) => {}
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(Command {
        proto: proto.context("proto is missing")?,
        params,
    })
}

fn parse_interface<'a>(
    start_tag: StartTag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Interface<'a>> {
    let mut interface = Interface {
        api: start_tag.attr("api"),
        profile: start_tag.attr("profile"),
        enums: Vec::new(),
        commands: Vec::new(),
    };
    while let Some(element) = element_iterator.next() {
        match element {
            Element::Text(text) if is_whitespace(text) => {}
            Element::EmptyTag(empty) => match empty.name {
                "type" => {}
                "enum" => {
                    let name = empty.attr("name").context("enum name is missing")?;
                    interface.enums.push(name);
                }
                "command" => {
                    let name = empty.attr("name").context("command name is missing")?;
                    interface.commands.push(name);
                }
                other => bail!("unexpected empty: {other}"),
            },
            Element::EndTag(end) if end.name == start_tag.name => break,
            Element::Comment(_) => {}
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(interface)
}

fn parse_feature_attrs<'a>(start_tag: &StartTag<'a>) -> anyhow::Result<Feature<'a>> {
    let mut api: Option<&'a str> = None;
    let mut name: Option<&'a str> = None;
    let mut number: Option<&'a str> = None;
    for attr in start_tag.iter_attrs() {
        let prev = match attr.key {
            "api" => api.replace(attr.value),
            "name" => name.replace(attr.value),
            "number" => number.replace(attr.value),
            "comment" | "protect" => None,
            other => bail!("unexpected attr: {other}"),
        };
        if prev.is_some() {
            bail!("duplicate attr: {:?}", attr.key);
        }
    }
    Ok(Feature {
        api: api.context("api is missing")?,
        name: name.context("name is missing")?,
        number: number.context("number is missing")?,
        requires: Vec::new(),
        removes: Vec::new(),
    })
}

fn parse_feature<'a>(
    start_tag: StartTag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Feature<'a>> {
    let mut feature = parse_feature_attrs(&start_tag).context("could not parse feature attrs")?;
    while let Some(element) = element_iterator.next() {
        match element {
            Element::Text(text) if is_whitespace(text) => {}
            Element::StartTag(start) => match start.name {
                "require" => {
                    let require = parse_interface(start, element_iterator)
                        .context("could not parse feature require")?;
                    feature.requires.push(require);
                }
                "remove" => {
                    let remove = parse_interface(start, element_iterator)
                        .context("could not parse feature remove")?;
                    feature.removes.push(remove);
                }
                other => bail!("unexpected start: {other}"),
            },
            Element::EmptyTag(empty) if matches!(empty.name, "require" | "remove") => {}
            Element::Comment(_) => {}
            Element::EndTag(end) if end.name == "feature" => break,
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(feature)
}

fn parse_extension_attrs<'a>(start_tag: &StartTag<'a>) -> anyhow::Result<Extension<'a>> {
    let mut name: Option<&'a str> = None;
    let mut supported: Option<&'a str> = None;
    for attr in start_tag.iter_attrs() {
        let prev = match attr.key {
            "name" => name.replace(attr.value),
            "supported" => supported.replace(attr.value),
            "comment" | "protect" | "ratified" | "depends" | "promotedto" => None,
            other => bail!("unexpected attr: {other}"),
        };
        if prev.is_some() {
            bail!("duplicate attr: {:?}", attr.key);
        }
    }
    Ok(Extension {
        name: name.context("name is missing")?,
        supported: supported.context("supported is missing")?,
        requires: Vec::new(),
    })
}

fn parse_extension<'a>(
    start_tag: StartTag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Extension<'a>> {
    let mut extension =
        parse_extension_attrs(&start_tag).context("could not parse extension attrs")?;
    while let Some(element) = element_iterator.next() {
        match element {
            Element::Text(text) if is_whitespace(text) => {}
            Element::StartTag(start) => match start.name {
                "require" => {
                    let require = parse_interface(start, element_iterator)
                        .context("could not parse extension require")?;
                    extension.requires.push(require);
                }
                other => bail!("unexpected start: {other}"),
            },
            Element::Comment(_) => {}
            Element::EndTag(end) if end.name == "extension" => break,
            other => bail!("unexpected element: {other:?}"),
        }
    }
    Ok(extension)
}

pub fn parse_registry(input: &str) -> anyhow::Result<Registry<'_>> {
    let mut enums: Vec<Enum> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();
    let mut features: Vec<Feature> = Vec::new();
    let mut extensions: Vec<Extension> = Vec::new();

    let mut element_iterator = ElementIterator::new(input);
    loop {
        let line = element_iterator.line();
        let Some(element) = element_iterator.next() else {
            break;
        };
        let Element::StartTag(start) = element else {
            continue;
        };
        match start.name {
            "enums" => {
                parse_enum_block_into(start, &mut element_iterator, &mut enums)
                    .with_context(|| format!("could not parse enum block at line {line}"))?;
            }
            "command" => {
                let command = parse_command(&mut element_iterator)
                    .with_context(|| format!("could not parse command at line {line}"))?;
                commands.push(command);
            }
            "feature" => {
                let feature = parse_feature(start, &mut element_iterator)
                    .with_context(|| format!("could not parse feature at line {line}"))?;
                features.push(feature);
            }
            "extension" => {
                let extension = parse_extension(start, &mut element_iterator)
                    .with_context(|| format!("could not parse extension at line {line}"))?;
                extensions.push(extension);
            }
            _ => {}
        }
    }

    Ok(Registry {
        enums,
        commands,
        features,
        extensions,
    })
}

/// Narrows the registry down to what `api` at `version` with `profile` provides plus the
/// requested `extensions`. Extensions that are kept in the result are exactly the requested ones.
pub fn filter_registry<'a>(
    mut registry: Registry<'a>,
    api: &Api,
    version: &Version,
    profile: &Profile,
    extensions: &[&str],
) -> anyhow::Result<Registry<'a>> {
    let mut wanted_enums: HashSet<&str> = HashSet::new();
    let mut wanted_commands: HashSet<&str> = HashSet::new();

    let mut found_feature = false;
    for feat in registry.features.iter() {
        if feat.api != api.as_str() {
            continue;
        }

        let feat_version = Version::from_str(feat.number)
            .with_context(|| format!("invalid version of {}", feat.name))?;
        if feat_version > *version {
            continue;
        }
        if feat_version == *version {
            found_feature = true;
        }

        for require in feat.requires.iter() {
            if !require.applies_to(api, profile) {
                continue;
            }
            wanted_enums.extend(require.enums.iter());
            wanted_commands.extend(require.commands.iter());
        }
        for remove in feat.removes.iter() {
            if !remove.applies_to(api, profile) {
                continue;
            }
            for it in remove.enums.iter() {
                wanted_enums.remove(it);
            }
            for it in remove.commands.iter() {
                wanted_commands.remove(it);
            }
        }
    }
    if !found_feature {
        bail!("could not find {api:?} {version:?}");
    }

    for name in extensions.iter() {
        let Some(ext) = registry.extensions.iter().find(|ext| ext.name == *name) else {
            bail!("unknown extension {name}");
        };
        if !ext.is_supported_on(api) {
            bail!("{name} is not supported on {api:?} {version:?}");
        }
        for require in ext.requires.iter() {
            if !require.applies_to(api, profile) {
                continue;
            }
            wanted_enums.extend(require.enums.iter());
            wanted_commands.extend(require.commands.iter());
        }
    }

    // some tokens are defined once per api with different values (gl vs gles2).
    let mut seen_enums: HashSet<&str> = HashSet::new();
    registry.enums.retain(|e| {
        wanted_enums.contains(e.name)
            && e.api.is_none_or(|it| it == api.as_str())
            && seen_enums.insert(e.name)
    });
    registry
        .commands
        .retain(|c| wanted_commands.contains(c.proto.name));
    registry
        .features
        .retain(|f| f.api == api.as_str() && Version::from_str(f.number).is_ok_and(|v| v <= *version));
    registry.extensions.retain(|e| extensions.contains(&e.name));
    for ext in registry.extensions.iter_mut() {
        ext.requires.retain(|it| it.applies_to(api, profile));
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry>
    <comment>test registry</comment>
    <enums namespace="GL" group="AttribMask" type="bitmask">
        <enum value="0x00004000" name="GL_COLOR_BUFFER_BIT"/>
    </enums>
    <enums namespace="GL" start="0x0000" end="0x7FFF" vendor="ARB">
        <enum value="0" name="GL_NO_ERROR"/>
        <enum value="0x0500" name="GL_INVALID_ENUM"/>
        <enum value="0x0007" name="GL_QUADS"/>
        <enum value="0x80E1" name="GL_BGRA_EXT"/>
        <enum value="0x90E1" name="GL_SYNC_X11_FENCE_EXT"/>
        <enum value="0x8259" name="GL_ACTIVE_PROGRAM_EXT" api="gles2"/>
        <enum value="0x8B8D" name="GL_ACTIVE_PROGRAM_EXT" api="gl"/>
        <enum value="0xFFFFFFFFFFFFFFFF" name="GL_TIMEOUT_IGNORED" type="ull"/>
        <unused start="0x9000" end="0x90FF"/>
    </enums>
    <commands namespace="GL">
        <command>
            <proto><ptype>GLenum</ptype> <name>glGetError</name></proto>
            <glx type="single" opcode="115"/>
        </command>
        <command>
            <proto>void <name>glBegin</name></proto>
            <param group="PrimitiveType"><ptype>GLenum</ptype> <name>mode</name></param>
        </command>
        <command>
            <proto>void <name>glClear</name></proto>
            <param group="ClearBufferMask"><ptype>GLbitfield</ptype> <name>mask</name></param>
        </command>
        <command>
            <proto><ptype>GLsync</ptype> <name>glImportSyncEXT</name></proto>
            <param><ptype>GLenum</ptype> <name>external_sync_type</name></param>
            <param><ptype>GLintptr</ptype> <name>external_sync</name></param>
            <param><ptype>GLbitfield</ptype> <name>flags</name></param>
        </command>
        <command>
            <proto>void <name>glActiveShaderProgramEXT</name></proto>
            <param><ptype>GLuint</ptype> <name>pipeline</name></param>
            <param><ptype>GLuint</ptype> <name>program</name></param>
        </command>
    </commands>
    <feature api="gl" name="GL_VERSION_1_0" number="1.0">
        <require>
            <enum name="GL_COLOR_BUFFER_BIT"/>
            <enum name="GL_NO_ERROR"/>
            <enum name="GL_INVALID_ENUM"/>
            <enum name="GL_QUADS"/>
            <command name="glGetError"/>
            <command name="glBegin"/>
            <command name="glClear"/>
        </require>
    </feature>
    <feature api="gl" name="GL_VERSION_3_2" number="3.2">
        <require>
            <enum name="GL_TIMEOUT_IGNORED"/>
        </require>
        <remove profile="core" comment="Compatibility-only GL 1.0 features removed from GL 3.2">
            <enum name="GL_QUADS"/>
            <command name="glBegin"/>
        </remove>
    </feature>
    <feature api="gles2" name="GL_ES_VERSION_2_0" number="2.0">
        <require>
            <command name="glClear"/>
        </require>
    </feature>
    <extensions>
        <extension name="GL_EXT_bgra" supported="gl">
            <require>
                <enum name="GL_BGRA_EXT"/>
            </require>
        </extension>
        <extension name="GL_EXT_x11_sync_object" supported="gl">
            <require>
                <enum name="GL_SYNC_X11_FENCE_EXT"/>
                <command name="glImportSyncEXT"/>
            </require>
        </extension>
        <extension name="GL_EXT_separate_shader_objects" supported="gl|glcore|gles2">
            <require api="gl" comment="Different set of functionality than ES">
                <enum name="GL_ACTIVE_PROGRAM_EXT"/>
            </require>
            <require api="gles2">
                <command name="glActiveShaderProgramEXT"/>
            </require>
        </extension>
        <extension name="GL_OES_only" supported="gles2">
            <require>
                <enum name="GL_INVALID_ENUM"/>
            </require>
        </extension>
    </extensions>
</registry>
"#;

    fn enum_names<'a>(registry: &Registry<'a>) -> Vec<&'a str> {
        registry.enums.iter().map(|e| e.name).collect()
    }

    fn command_names<'a>(registry: &Registry<'a>) -> Vec<&'a str> {
        registry.commands.iter().map(|c| c.proto.name).collect()
    }

    #[test]
    fn test_parse_registry() {
        let registry = parse_registry(REGISTRY).unwrap();
        assert_eq!(registry.enums.len(), 9);
        assert_eq!(registry.commands.len(), 5);
        assert_eq!(registry.features.len(), 3);
        assert_eq!(registry.extensions.len(), 4);

        let bit = &registry.enums[0];
        assert_eq!(bit.name, "GL_COLOR_BUFFER_BIT");
        assert_eq!(bit.value, "0x00004000");
        assert_eq!(bit.r#type, Some("bitmask"));

        let timeout = registry
            .enums
            .iter()
            .find(|e| e.name == "GL_TIMEOUT_IGNORED")
            .unwrap();
        assert_eq!(timeout.r#type, Some("ull"));

        let import = &registry.commands[3];
        assert_eq!(import.proto.name, "glImportSyncEXT");
        assert_eq!(
            import.proto.type_parts,
            vec![CommandTypePart::Defined("GLsync")]
        );
        assert_eq!(import.params.len(), 3);
        assert_eq!(import.params[1].name, "external_sync");

        let begin = &registry.commands[1];
        assert_eq!(begin.proto.type_parts, vec![CommandTypePart::Other("void")]);

        let v32 = &registry.features[1];
        assert_eq!(v32.removes.len(), 1);
        assert_eq!(v32.removes[0].profile, Some("core"));

        let sso = &registry.extensions[2];
        assert_eq!(sso.requires[0].api, Some("gl"));
        assert_eq!(sso.requires[1].api, Some("gles2"));
    }

    #[test]
    fn test_filter_compatibility_keeps_removed() {
        let registry = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(3, 2),
            &Profile::Compatibility,
            &[],
        )
        .unwrap();
        assert_eq!(
            enum_names(&registry),
            vec![
                "GL_COLOR_BUFFER_BIT",
                "GL_NO_ERROR",
                "GL_INVALID_ENUM",
                "GL_QUADS",
                "GL_TIMEOUT_IGNORED"
            ]
        );
        assert_eq!(
            command_names(&registry),
            vec!["glGetError", "glBegin", "glClear"]
        );
        assert!(registry.extensions.is_empty());
    }

    #[test]
    fn test_filter_core_drops_removed() {
        let registry = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(3, 2),
            &Profile::Core,
            &[],
        )
        .unwrap();
        assert!(!enum_names(&registry).contains(&"GL_QUADS"));
        assert_eq!(command_names(&registry), vec!["glGetError", "glClear"]);
    }

    #[test]
    fn test_filter_older_version_skips_newer_features() {
        let registry = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(1, 0),
            &Profile::Core,
            &[],
        )
        .unwrap();
        assert!(!enum_names(&registry).contains(&"GL_TIMEOUT_IGNORED"));
        // the removal lives in 3.2, so 1.0 still has it.
        assert!(command_names(&registry).contains(&"glBegin"));
        assert_eq!(registry.features.len(), 1);
    }

    #[test]
    fn test_filter_extensions() {
        let registry = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(1, 0),
            &Profile::Compatibility,
            &["GL_EXT_x11_sync_object", "GL_EXT_separate_shader_objects"],
        )
        .unwrap();
        let enums = enum_names(&registry);
        assert!(enums.contains(&"GL_SYNC_X11_FENCE_EXT"));
        assert!(!enums.contains(&"GL_BGRA_EXT"));
        let commands = command_names(&registry);
        assert!(commands.contains(&"glImportSyncEXT"));
        // gles2-only require block.
        assert!(!commands.contains(&"glActiveShaderProgramEXT"));

        let active: Vec<&Enum> = registry
            .enums
            .iter()
            .filter(|e| e.name == "GL_ACTIVE_PROGRAM_EXT")
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].value, "0x8B8D");

        let sso = &registry.extensions[1];
        assert_eq!(sso.requires.len(), 1);
        assert_eq!(sso.requires[0].api, Some("gl"));

        let extensions: Vec<&str> = registry.extensions.iter().map(|e| e.name).collect();
        assert_eq!(
            extensions,
            vec!["GL_EXT_x11_sync_object", "GL_EXT_separate_shader_objects"]
        );
    }

    #[test]
    fn test_filter_errors() {
        let err = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(4, 6),
            &Profile::Core,
            &[],
        )
        .unwrap_err();
        assert!(err.to_string().contains("could not find"));

        let err = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(1, 0),
            &Profile::Core,
            &["GL_EXT_does_not_exist"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown extension"));

        let err = filter_registry(
            parse_registry(REGISTRY).unwrap(),
            &Api::Gl,
            &Version(1, 0),
            &Profile::Core,
            &["GL_OES_only"],
        )
        .unwrap_err();
        assert!(err.to_string().contains("is not supported"));
    }

    #[test]
    fn test_parse_error_reports_line() {
        const BROKEN: &str = "<registry>\n<commands>\n<command>\n<proto>void</proto>\n</command>";
        let err = parse_registry(BROKEN).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"), "{err:#}");
    }

    #[test]
    fn test_parse_error_line_in_large_registry() {
        let mut input = String::from("<registry>\n<commands>\n");
        for i in 0..5000 {
            input.push_str(&format!(
                "<command>\n<proto>void <name>glCommand{i}</name></proto>\n</command>\n"
            ));
        }
        input.push_str("<command>\n<proto>void</proto>\n</command>");
        let err = parse_registry(&input).unwrap_err();
        let line = 3 + 5000 * 3;
        assert!(format!("{err:#}").contains(&format!("line {line}")), "{err:#}");
    }
}

#[cfg(test)]
pub(crate) use tests::REGISTRY as TEST_REGISTRY;
