use sketchpad_core::{color::Color, PaintConfig};

const DOCUMENTATION: &str = r##"# Sketchpad preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys take their default values.

# Colors are written "#RRGGBB", "#RRGGBBAA", or as a palette name like "red".
# Sizes are in logical pixels.

# Examples:
# [brush]
# color = "blue"
# width = 8.0
# [export]
# format = "jpeg"
# jpeg_quality = 85

"##;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// (De)serialize a [`Color`] through its human-readable string form.
mod color_string {
    use sketchpad_core::color::Color;
    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(color)
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map_err(serde::de::Error::custom)
    }
}
mod color_strings {
    use sketchpad_core::color::Color;
    pub fn serialize<S>(colors: &[Color], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(colors.iter().map(ToString::to_string))
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Color>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let strs = <Vec<String> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        strs.iter()
            .map(|str| str.parse().map_err(serde::de::Error::custom))
            .collect()
    }
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    strum::AsRefStr,
    strum::EnumString,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Lossy, and drops transparency.
    #[strum(serialize = "jpeg", serialize = "jpg")]
    Jpeg,
}
impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
    /// Guess from a path's extension.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CanvasPreferences {
    pub width: u32,
    pub height: u32,
    #[serde(with = "color_string")]
    pub background: Color,
}
impl Default for CanvasPreferences {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            background: Color::WHITE,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct BrushPresets {
    pub small: f32,
    pub medium: f32,
    pub large: f32,
}
impl Default for BrushPresets {
    fn default() -> Self {
        Self {
            small: 5.0,
            medium: 10.0,
            large: 20.0,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrushPreferences {
    #[serde(with = "color_string")]
    pub color: Color,
    pub width: f32,
    pub presets: BrushPresets,
}
impl Default for BrushPreferences {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            // Start out on the large brush.
            width: BrushPresets::default().large,
            presets: BrushPresets::default(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportPreferences {
    /// Where exports without an explicit path go. Defaults to the user's pictures directory.
    pub directory: Option<std::path::PathBuf>,
    pub format: ExportFormat,
    /// 1 to 100.
    pub jpeg_quality: u8,
}
impl Default for ExportPreferences {
    fn default() -> Self {
        Self {
            directory: None,
            format: ExportFormat::Png,
            jpeg_quality: 90,
        }
    }
}
impl ExportPreferences {
    /// The configured directory, or a default one.
    #[must_use]
    pub fn directory(&self) -> std::path::PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .map(|dir| dir.join(env!("CARGO_PKG_NAME")))
                .unwrap_or_else(|| std::path::PathBuf::from("."))
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Preferences {
    /// Colors offered by the toolbar palette, in order.
    #[serde(with = "color_strings")]
    pub palette: Vec<Color>,
    pub canvas: CanvasPreferences,
    pub brush: BrushPreferences,
    pub export: ExportPreferences,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Preferences {
    fn default() -> Self {
        use strum::IntoEnumIterator;
        Self {
            palette: sketchpad_core::color::NamedColor::iter()
                .map(Color::from)
                .collect(),
            canvas: CanvasPreferences::default(),
            brush: BrushPreferences::default(),
            export: ExportPreferences::default(),
            failed_to_load: false,
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    /// Shared global preferences, loaded from the user's preferences directory.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_PREFERENCES: std::sync::OnceLock<Preferences> = std::sync::OnceLock::new();

        GLOBAL_PREFERENCES.get_or_init(|| {
            let mut dir = preferences_dir();
            match dir.as_mut() {
                None => Self::no_path(),
                Some(dir) => {
                    dir.push(Self::FILENAME);
                    Self::load_or_default(dir)
                }
            }
        })
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Preferences weren't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let preferences: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences = Self::from_toml(&string)?;
            Ok(preferences)
        };

        match preferences {
            Ok(preferences) => preferences,
            Err(e) => {
                log::debug!("Loading {path:?} failed: {e:#}");
                Self::no_path()
            }
        }
    }
    /// Parse and validate.
    pub fn from_toml(string: &str) -> anyhow::Result<Self> {
        let preferences: Self = toml::from_str(string)?;
        preferences.validate()?;
        Ok(preferences)
    }
    fn validate(&self) -> anyhow::Result<()> {
        let BrushPresets {
            small,
            medium,
            large,
        } = self.brush.presets;
        for width in [self.brush.width, small, medium, large] {
            if !(width.is_finite() && width > 0.0) {
                anyhow::bail!("brush width {width} must be positive");
            }
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            anyhow::bail!("canvas must not be zero-sized");
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            anyhow::bail!("jpeg quality must be within 1 to 100");
        }
        Ok(())
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Paint for a fresh surface.
    pub fn initial_paint(&self) -> anyhow::Result<PaintConfig> {
        Ok(PaintConfig::default()
            .with_color(self.brush.color)
            .with_width(self.brush.width)?)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let mut string = toml::ser::to_string_pretty(self)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}
