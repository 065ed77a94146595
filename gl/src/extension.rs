use std::collections::HashSet;
use std::fmt;

/// Implemented by every generated `Api`.
pub trait EntryPoints {
    /// Whether the command (full registry name, `glBlendColorEXT`) resolved to an entry point.
    fn is_loaded(&self, name: &str) -> bool;
}

/// What an extension adds, as listed in the registry. One const per extension is generated into
/// the `extensions` module of each api.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub name: &'static str,
    pub enums: &'static [&'static str],
    pub commands: &'static [&'static str],
}

impl Extension {
    /// Every command of the extension resolved. Says nothing about whether the driver advertises
    /// it; check an `ExtensionSet` for that.
    pub fn is_loaded(&self, api: &impl EntryPoints) -> bool {
        self.commands.iter().all(|name| api.is_loaded(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses the `GL_VERSION` string. It starts with `major.minor[.release]` for desktop gl and
    /// with `OpenGL ES major.minor` for gles; vendor information follows after a space.
    pub fn parse_gl_version(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix("OpenGL ES-CM ")
            .or_else(|| s.strip_prefix("OpenGL ES-CL "))
            .or_else(|| s.strip_prefix("OpenGL ES "))
            .unwrap_or(s);
        let number = s.split_whitespace().next()?;
        let mut parts = number.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some(Self { major, minor })
    }

    /// `GL_VERSION_3_2` with prefix `GL_VERSION_` -> 3.2.
    fn from_feature_name(name: &str, prefix: &str) -> Option<Self> {
        let (major, minor) = name.strip_prefix(prefix)?.split_once('_')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}.{}", self.major, self.minor))
    }
}

/// Extensions advertised by the driver.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    names: HashSet<String>,
    /// Feature name prefix (`GL_VERSION_`, `GLX_VERSION_`) and the version it answers for.
    version: Option<(&'static str, Version)>,
}

impl ExtensionSet {
    /// From a space-separated list as returned by `glGetString(GL_EXTENSIONS)`,
    /// `glXQueryExtensionsString` or `wglGetExtensionsString{ARB,EXT}`.
    pub fn from_space_separated(s: &str) -> Self {
        Self::from_names(s.split_whitespace())
    }

    /// From one name per item, as returned by `glGetStringi(GL_EXTENSIONS, i)`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::<String>::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
            version: None,
        }
    }

    /// Version of the context the extensions were queried from; lets `contains` answer feature
    /// queries such as `GL_VERSION_3_0` when `feature_prefix` is `GL_VERSION_`. Feature names
    /// of other apis (`GLX_VERSION_1_3`, `GL_ES_VERSION_2_0`) are never contained.
    pub fn with_version(mut self, feature_prefix: &'static str, version: Version) -> Self {
        self.version = Some((feature_prefix, version));
        self
    }

    pub fn version(&self) -> Option<Version> {
        self.version.map(|(_, version)| version)
    }

    pub fn contains(&self, name: &str) -> bool {
        if name.contains("_VERSION_") {
            return self.version.is_some_and(|(prefix, version)| {
                Version::from_feature_name(name, prefix).is_some_and(|wanted| version >= wanted)
            });
        }
        self.names.contains(name)
    }

    /// Advertised by the driver and all of its commands are loaded.
    pub fn supports(&self, extension: &Extension, api: &impl EntryPoints) -> bool {
        self.contains(extension.name) && extension.is_loaded(api)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Loaded(&'static [&'static str]);

    impl EntryPoints for Loaded {
        fn is_loaded(&self, name: &str) -> bool {
            self.0.iter().any(|it| *it == name)
        }
    }

    const BLEND_COLOR: Extension = Extension {
        name: "GL_EXT_blend_color",
        enums: &["GL_BLEND_COLOR_EXT"],
        commands: &["glBlendColorEXT"],
    };

    const BGRA: Extension = Extension {
        name: "GL_EXT_bgra",
        enums: &["GL_BGRA_EXT"],
        commands: &[],
    };

    #[test]
    fn test_parse_gl_version() {
        assert_eq!(
            Version::parse_gl_version("4.6.0 NVIDIA 535.54.03"),
            Some(Version::new(4, 6))
        );
        assert_eq!(
            Version::parse_gl_version("3.2 Mesa 23.1.0"),
            Some(Version::new(3, 2))
        );
        assert_eq!(
            Version::parse_gl_version("OpenGL ES 3.2 Mesa 23.1.0"),
            Some(Version::new(3, 2))
        );
        assert_eq!(Version::parse_gl_version("2.1"), Some(Version::new(2, 1)));
        assert_eq!(Version::parse_gl_version("garbage"), None);
        assert_eq!(Version::parse_gl_version(""), None);
        assert!(Version::new(3, 2) > Version::new(3, 1));
        assert!(Version::new(4, 0) > Version::new(3, 3));
        assert_eq!(Version::new(3, 2).to_string(), "3.2");
    }

    #[test]
    fn test_extension_set() {
        let set = ExtensionSet::from_space_separated("GL_EXT_bgra  GL_EXT_abgr GL_ARB_sync ");
        assert_eq!(set.len(), 3);
        assert!(set.contains("GL_EXT_bgra"));
        assert!(set.contains("GL_ARB_sync"));
        assert!(!set.contains("GL_EXT_blend_color"));
        assert!(!set.contains("GL_EXT"));

        let set = ExtensionSet::from_names(["GLX_EXT_swap_control", ""]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_extension_set_versions() {
        let set = ExtensionSet::default();
        assert!(!set.contains("GL_VERSION_1_0"));

        let set = set.with_version("GL_VERSION_", Version::new(3, 2));
        assert_eq!(set.version(), Some(Version::new(3, 2)));
        assert!(set.contains("GL_VERSION_1_1"));
        assert!(set.contains("GL_VERSION_3_2"));
        assert!(!set.contains("GL_VERSION_3_3"));
        assert!(!set.contains("GL_VERSION_4_0"));
        assert!(!set.contains("GL_VERSION_3"));
    }

    #[test]
    fn test_extension_set_versions_of_other_apis() {
        let set = ExtensionSet::default().with_version("GL_VERSION_", Version::new(3, 2));
        assert!(!set.contains("GL_ES_VERSION_2_0"));
        assert!(!set.contains("GLX_VERSION_1_3"));

        let set = ExtensionSet::default().with_version("GLX_VERSION_", Version::new(1, 4));
        assert!(set.contains("GLX_VERSION_1_3"));
        assert!(!set.contains("GL_VERSION_1_2"));
        assert!(!set.contains("WGL_VERSION_1_0"));
    }

    #[test]
    fn test_extension_is_loaded() {
        assert!(BLEND_COLOR.is_loaded(&Loaded(&["glBlendColorEXT"])));
        assert!(!BLEND_COLOR.is_loaded(&Loaded(&[])));
        // nothing to load.
        assert!(BGRA.is_loaded(&Loaded(&[])));

        let set = ExtensionSet::from_space_separated("GL_EXT_blend_color");
        assert!(set.supports(&BLEND_COLOR, &Loaded(&["glBlendColorEXT"])));
        assert!(!set.supports(&BLEND_COLOR, &Loaded(&[])));
        assert!(!set.supports(&BGRA, &Loaded(&[])));
    }
}
