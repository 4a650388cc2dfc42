//! Campaign configuration and poster composition.
//!
//! A campaign is immutable template data: named backgrounds with brand
//! colors, named output sizes with per-size slot geometry, optional
//! languages, and asset naming patterns. A [`Session`] holds what the user
//! picked and typed; [`compose`] turns campaign + session into the ordered
//! element list the renderers consume.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use affiche_core::{HorizontalAlign, LineDistribution, ScaleStrategy, VerticalAlign};

mod compose;
pub mod paths;

pub use compose::{compose, Session, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// Errors from configuration handling and composition preconditions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CampaignError {
    #[error("Failed to parse campaign configuration: {0}")]
    Parse(String),

    #[error("Selected {what} index {index} is out of range (have {len})")]
    SlotOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Background '{background}' has an unparsable color")]
    InvalidColor { background: String },
}

/// A campaign: everything the form offers, nothing the user typed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Base path/URL prefix for all campaign assets.
    pub asset_path: String,
    /// Campaign-wide asset naming pattern overrides, per slot kind.
    #[serde(default)]
    pub asset_paths: AssetPatterns,
    pub backgrounds: Vec<BackgroundSpec>,
    pub sizes: Vec<SizeSpec>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Campaign {
    pub fn from_json(json: &str) -> Result<Self, CampaignError> {
        serde_json::from_str(json).map_err(|err| CampaignError::Parse(err.to_string()))
    }
}

/// Campaign-wide naming patterns over the `{background}`/`{size}`/
/// `{language}` token set. Absent entries fall back to the built-in
/// defaults in [`paths`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatterns {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub header: Option<String>,
    pub default_picture: Option<String>,
    pub anti_default_picture: Option<String>,
}

/// A selectable background artwork and its brand color.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackgroundSpec {
    pub name: String,
    /// Hex color string, e.g. `#ffbd59`.
    pub color: String,
}

/// One output size: dimensions plus the slots this size offers.
///
/// A slot absent from a size simply means that visual element is omitted
/// for that size.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    pub name: String,
    pub label: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub header: Option<ImageSpec>,
    #[serde(default)]
    pub default_picture: Option<ImageSpec>,
    #[serde(default)]
    pub anti_default_picture: Option<ImageSpec>,
    #[serde(default)]
    pub foreground: Option<ImageSpec>,
    #[serde(default)]
    pub picture: Option<ImageSpec>,
    #[serde(default)]
    pub logo: Option<ImageSpec>,
    #[serde(default)]
    pub website: Option<TextSpec>,
    #[serde(default)]
    pub program_info: Option<TextSpec>,
    /// Hide the website line while the default picture is shown.
    #[serde(default)]
    pub default_picture_website_disabled: bool,
    /// Extra line appended to the website text while the default picture is
    /// shown.
    #[serde(default)]
    pub default_picture_website_extra_text: Option<String>,
}

/// Anchor geometry and placement defaults for one image slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Per-slot naming pattern, overriding the campaign-wide one.
    #[serde(default)]
    pub asset_path: Option<String>,
    #[serde(default)]
    pub horizontal_alignment: HorizontalAlign,
    #[serde(default)]
    pub vertical_alignment: VerticalAlign,
    #[serde(default)]
    pub include_background_fill: bool,
    #[serde(default)]
    pub scale_strategy: ScaleStrategy,
    /// Hint for the external crop dialog: lock the crop to this slot's
    /// aspect ratio. Composition itself does not consume it.
    #[serde(default)]
    pub enforce_aspect_ratio: bool,
}

/// Anchor point and layout defaults for one text slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_text_align")]
    pub horizontal_alignment: HorizontalAlign,
    #[serde(default)]
    pub line_distribution: LineDistribution,
    #[serde(default)]
    pub include_background_fill: bool,
}

fn default_text_align() -> HorizontalAlign {
    HorizontalAlign::Left
}
