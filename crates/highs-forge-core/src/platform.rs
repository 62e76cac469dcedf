use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

pub const ANDROID_PREFIX: &str = "android-";
pub const IOS_PREFIX: &str = "ios-";

/// Prefixes that route a platform away from the standard desktop strategy.
pub const STRATEGY_PREFIXES: &[(&str, StrategyKind)] = &[
    (ANDROID_PREFIX, StrategyKind::AndroidCross),
    (IOS_PREFIX, StrategyKind::IosCross),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Standard,
    AndroidCross,
    IosCross,
}

impl StrategyKind {
    pub fn classify(platform: &str) -> Self {
        match (
            platform.strip_prefix(ANDROID_PREFIX),
            platform.strip_prefix(IOS_PREFIX),
        ) {
            (Some(_), _) => StrategyKind::AndroidCross,
            (None, Some(_)) => StrategyKind::IosCross,
            (None, None) => StrategyKind::Standard,
        }
    }

    pub fn requires_toolchain(self) -> bool {
        match self {
            StrategyKind::AndroidCross => true,
            StrategyKind::Standard | StrategyKind::IosCross => false,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            StrategyKind::Standard => "standard",
            StrategyKind::AndroidCross => "android",
            StrategyKind::IosCross => "ios",
        };
        f.write_str(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    SingleConfig,
    MultiConfig,
}

impl GeneratorKind {
    /// Classifies a CMake generator name. `None` means the preset declares none.
    pub fn from_generator(generator: Option<&str>) -> Option<Self> {
        let generator = generator?.trim();
        if generator.is_empty() {
            return None;
        }
        let lowered = generator.to_ascii_lowercase();
        if lowered.contains("visual studio")
            || lowered.contains("xcode")
            || lowered.contains("multi-config")
        {
            Some(GeneratorKind::MultiConfig)
        } else {
            Some(GeneratorKind::SingleConfig)
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuildType {
    #[default]
    Release,
    Debug,
}

impl BuildType {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Release => "Release",
            BuildType::Debug => "Debug",
        }
    }

    pub fn is_default(self) -> bool {
        self == BuildType::default()
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Release" => Ok(BuildType::Release),
            "Debug" => Ok(BuildType::Debug),
            other => Err(format!(
                "invalid build configuration '{}'; expected Release or Debug",
                other
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub name: String,
    /// Generator declared by the preset (after inheritance), if any.
    pub generator: Option<String>,
    /// Raw `binaryDir` template, e.g. `${sourceDir}/build/${presetName}`.
    pub binary_dir: Option<String>,
}

impl PlatformDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generator: None,
            binary_dir: None,
        }
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    pub fn with_binary_dir(mut self, binary_dir: impl Into<String>) -> Self {
        self.binary_dir = Some(binary_dir.into());
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        StrategyKind::classify(&self.name)
    }

    pub fn generator_kind(&self) -> Option<GeneratorKind> {
        GeneratorKind::from_generator(self.generator.as_deref())
    }

    pub fn output_dir(&self, project_dir: &Path) -> PathBuf {
        match &self.binary_dir {
            Some(template) => expand_binary_dir(template, project_dir, &self.name),
            None => default_output_dir(project_dir, &self.name),
        }
    }
}

pub fn default_output_dir(project_dir: &Path, platform: &str) -> PathBuf {
    project_dir.join("build").join(platform)
}

const SOURCE_DIR_VAR: &str = "${sourceDir}";

fn expand_binary_dir(template: &str, project_dir: &Path, preset_name: &str) -> PathBuf {
    let expanded = template.replace("${presetName}", preset_name);
    if let Some(rest) = expanded.strip_prefix(SOURCE_DIR_VAR) {
        let rest = rest.trim_start_matches(|c: char| c == '/' || c == '\\');
        return if rest.is_empty() {
            project_dir.to_path_buf()
        } else {
            project_dir.join(rest)
        };
    }
    let path = PathBuf::from(expanded.replace(SOURCE_DIR_VAR, &project_dir.to_string_lossy()));
    if path.is_absolute() {
        path
    } else {
        project_dir.join(path)
    }
}

/// Resolves `.` and `..` lexically, without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_prefixes_do_not_overlap() {
        for (index, (left, _)) in STRATEGY_PREFIXES.iter().enumerate() {
            for (other, (right, _)) in STRATEGY_PREFIXES.iter().enumerate() {
                if index == other {
                    continue;
                }
                assert!(
                    !left.starts_with(right),
                    "prefix '{}' overlaps '{}'",
                    left,
                    right
                );
            }
        }
    }

    #[test]
    fn classifies_by_prefix() {
        assert_eq!(StrategyKind::classify("android-arm64"), StrategyKind::AndroidCross);
        assert_eq!(StrategyKind::classify("ios-simulator-arm64"), StrategyKind::IosCross);
        assert_eq!(StrategyKind::classify("linux-x64"), StrategyKind::Standard);
        assert_eq!(StrategyKind::classify("windows-x64"), StrategyKind::Standard);
        assert_eq!(StrategyKind::classify("macos-ios-like"), StrategyKind::Standard);
    }

    #[test]
    fn every_known_name_has_exactly_one_strategy() {
        let names = [
            "linux-x64",
            "macos-arm64",
            "windows-x64",
            "android-arm64",
            "android-x86",
            "ios-arm64",
            "ios-simulator-arm64",
        ];
        for name in names {
            let matching = STRATEGY_PREFIXES
                .iter()
                .filter(|(prefix, _)| name.starts_with(prefix))
                .count();
            assert!(matching <= 1, "{} matched {} prefixes", name, matching);
        }
    }

    #[test]
    fn generator_kind_classification() {
        assert_eq!(
            GeneratorKind::from_generator(Some("Ninja")),
            Some(GeneratorKind::SingleConfig)
        );
        assert_eq!(
            GeneratorKind::from_generator(Some("Unix Makefiles")),
            Some(GeneratorKind::SingleConfig)
        );
        assert_eq!(
            GeneratorKind::from_generator(Some("Visual Studio 17 2022")),
            Some(GeneratorKind::MultiConfig)
        );
        assert_eq!(
            GeneratorKind::from_generator(Some("Xcode")),
            Some(GeneratorKind::MultiConfig)
        );
        assert_eq!(
            GeneratorKind::from_generator(Some("Ninja Multi-Config")),
            Some(GeneratorKind::MultiConfig)
        );
        assert_eq!(GeneratorKind::from_generator(Some("  ")), None);
        assert_eq!(GeneratorKind::from_generator(None), None);
    }

    #[test]
    fn build_type_parses_exact_names() {
        assert_eq!("Release".parse::<BuildType>(), Ok(BuildType::Release));
        assert_eq!("Debug".parse::<BuildType>(), Ok(BuildType::Debug));
        assert!("release".parse::<BuildType>().is_err());
        assert!(BuildType::Release.is_default());
        assert!(!BuildType::Debug.is_default());
    }

    #[test]
    fn output_dir_expands_template() {
        let project = Path::new("/work/highs");
        let descriptor =
            PlatformDescriptor::new("linux-x64").with_binary_dir("${sourceDir}/build/${presetName}");
        assert_eq!(
            descriptor.output_dir(project),
            PathBuf::from("/work/highs/build/linux-x64")
        );
        let relative = PlatformDescriptor::new("macos-arm64").with_binary_dir("out/${presetName}");
        assert_eq!(
            relative.output_dir(project),
            PathBuf::from("/work/highs/out/macos-arm64")
        );
        let bare = PlatformDescriptor::new("windows-x64");
        assert_eq!(
            bare.output_dir(project),
            PathBuf::from("/work/highs/build/windows-x64")
        );
    }

    #[test]
    fn relative_project_dir_is_joined_once() {
        let project = Path::new("./highs_patched");
        let descriptor =
            PlatformDescriptor::new("linux-x64").with_binary_dir("${sourceDir}/build/${presetName}");
        assert_eq!(
            descriptor.output_dir(project),
            PathBuf::from("./highs_patched/build/linux-x64")
        );
        let in_source = PlatformDescriptor::new("linux-x64").with_binary_dir("${sourceDir}");
        assert_eq!(in_source.output_dir(project), PathBuf::from("./highs_patched"));
    }

    #[test]
    fn normalize_resolves_dots_lexically() {
        assert_eq!(
            normalize_path(Path::new("/work/highs/./build/../build/linux-x64")),
            PathBuf::from("/work/highs/build/linux-x64")
        );
        assert_eq!(normalize_path(Path::new("/work/highs/..")), PathBuf::from("/work"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn classification_agrees_with_prefix_table() {
        for (prefix, kind) in STRATEGY_PREFIXES {
            assert_eq!(StrategyKind::classify(&format!("{}arm64", prefix)), *kind);
        }
    }
}
