//! Session state and the composition of the render element list.

use affiche_core::element::{ImageElement, ImageSource, RenderElement, TextContainer, TextLine};
use affiche_core::{Background, Color, Point, Rect};

use crate::paths::{
    expand_pattern, ANTI_DEFAULT_PICTURE_PATTERN, BACKGROUND_PATTERN, DEFAULT_PICTURE_PATTERN,
    FOREGROUND_PATTERN, HEADER_PATTERN,
};
use crate::{BackgroundSpec, Campaign, CampaignError, ImageSpec, SizeSpec, TextSpec};

pub const DEFAULT_FONT_FAMILY: &str = "Quicksand";
pub const DEFAULT_FONT_SIZE: f32 = 55.0;

/// Text backdrops get a little breathing room; image backdrops hug their
/// frame exactly.
const TEXT_BACKGROUND_PADDING: f32 = 5.0;
const IMAGE_BACKGROUND_PADDING: f32 = 0.0;

const PROGRAM_INFO_MAX_LINES: usize = 2;

/// What the user picked and typed. Created with form defaults, mutated on
/// every edit, reset on request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub background: usize,
    pub size: usize,
    pub language: usize,
    pub website: String,
    pub program_info: String,
    pub logo: Option<ImageSource>,
    pub picture: Option<ImageSource>,
    pub use_default_picture: bool,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            background: 0,
            size: 0,
            language: 0,
            website: String::new(),
            program_info: String::new(),
            logo: None,
            picture: None,
            use_default_picture: true,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to form-mount defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Update the program info, enforcing the two-line cap. Returns false
    /// (leaving the current text) when the edit exceeds the cap.
    pub fn set_program_info(&mut self, text: &str) -> bool {
        if text.split('\n').count() > PROGRAM_INFO_MAX_LINES {
            return false;
        }
        self.program_info = text.to_owned();
        true
    }

    /// Turning the default picture on discards any uploaded picture.
    pub fn set_use_default_picture(&mut self, use_default: bool) {
        self.use_default_picture = use_default;
        if use_default {
            self.picture = None;
        }
    }
}

/// Build the paint-ordered element list for the current selection.
///
/// Fixed z-order: background, header, default or user picture, the
/// anti-default overlay, logo, website, program info, and the foreground
/// overlay above everything.
pub fn compose(
    campaign: &Campaign,
    session: &Session,
) -> Result<Vec<RenderElement>, CampaignError> {
    let background = pick(&campaign.backgrounds, session.background, "background")?;
    let size = pick(&campaign.sizes, session.size, "size")?;
    let language = if campaign.languages.is_empty() {
        ""
    } else {
        pick(&campaign.languages, session.language, "language")?
    };
    let brand = Color::parse(&background.color).ok_or_else(|| CampaignError::InvalidColor {
        background: background.name.clone(),
    })?;

    let builder = Composer {
        campaign,
        background,
        size,
        session,
        brand,
        background_token: background.name.to_lowercase(),
        language_token: language.to_lowercase(),
    };
    Ok(builder.elements())
}

fn pick<'a, T>(items: &'a [T], index: usize, what: &'static str) -> Result<&'a T, CampaignError> {
    items.get(index).ok_or(CampaignError::SlotOutOfRange {
        what,
        index,
        len: items.len(),
    })
}

struct Composer<'a> {
    campaign: &'a Campaign,
    background: &'a BackgroundSpec,
    size: &'a SizeSpec,
    session: &'a Session,
    brand: Color,
    background_token: String,
    language_token: String,
}

impl Composer<'_> {
    fn elements(&self) -> Vec<RenderElement> {
        let size = self.size;
        let session = self.session;
        let mut elements = vec![self.backdrop()];

        if let Some(spec) = &size.header {
            let patterns = &self.campaign.asset_paths;
            let href = self.slot_asset(spec, patterns.header.as_deref(), HEADER_PATTERN);
            elements.push(self.image_slot("header", spec, ImageSource::Location(href)));
        }

        // The toggle makes the two picture kinds mutually exclusive.
        if session.use_default_picture {
            if let Some(spec) = &size.default_picture {
                let patterns = &self.campaign.asset_paths;
                let href = self.slot_asset(
                    spec,
                    patterns.default_picture.as_deref(),
                    DEFAULT_PICTURE_PATTERN,
                );
                elements.push(self.image_slot("defaultPicture", spec, ImageSource::Location(href)));
            }
        } else {
            if let (Some(spec), Some(picture)) = (&size.picture, &session.picture) {
                elements.push(self.image_slot("picture", spec, picture.clone()));
            }
            // The frame drawn around/behind a user picture, only meaningful
            // in user-picture mode.
            if let Some(spec) = &size.anti_default_picture {
                let patterns = &self.campaign.asset_paths;
                let href = self.slot_asset(
                    spec,
                    patterns.anti_default_picture.as_deref(),
                    ANTI_DEFAULT_PICTURE_PATTERN,
                );
                elements.push(self.image_slot("antiDefaultPicture", spec, ImageSource::Location(href)));
            }
        }

        if let (Some(spec), Some(logo)) = (&size.logo, &session.logo) {
            elements.push(self.image_slot("logo", spec, logo.clone()));
        }

        if let Some(spec) = &size.website {
            if let Some(text) = self.website_text() {
                elements.push(self.text_slot("website", spec, &text));
            }
        }

        if let Some(spec) = &size.program_info {
            if !session.program_info.is_empty() {
                elements.push(self.text_slot("programInfo", spec, &session.program_info));
            }
        }

        if let Some(spec) = &size.foreground {
            let patterns = &self.campaign.asset_paths;
            let href = self.slot_asset(spec, patterns.foreground.as_deref(), FOREGROUND_PATTERN);
            elements.push(self.image_slot("foreground", spec, ImageSource::Location(href)));
        }

        elements
    }

    /// The full-bleed background artwork.
    fn backdrop(&self) -> RenderElement {
        let pattern = self
            .campaign
            .asset_paths
            .background
            .as_deref()
            .unwrap_or(BACKGROUND_PATTERN);
        let href = self.asset_url(pattern);
        ImageElement::new(
            "background",
            Some(ImageSource::Location(href)),
            Rect::new(0.0, 0.0, self.size.width, self.size.height),
        )
        .into()
    }

    /// The website line, honoring the default-picture suppression and the
    /// extra-text supplement.
    fn website_text(&self) -> Option<String> {
        if self.session.website.is_empty() {
            return None;
        }
        let default_picture_active =
            self.session.use_default_picture && self.size.default_picture.is_some();
        if default_picture_active && self.size.default_picture_website_disabled {
            return None;
        }
        let mut text = self.session.website.clone();
        if default_picture_active {
            if let Some(extra) = &self.size.default_picture_website_extra_text {
                text.push('\n');
                text.push_str(extra);
            }
        }
        Some(text)
    }

    fn slot_asset(
        &self,
        spec: &ImageSpec,
        campaign_pattern: Option<&str>,
        default_pattern: &str,
    ) -> String {
        let pattern = spec
            .asset_path
            .as_deref()
            .or(campaign_pattern)
            .unwrap_or(default_pattern);
        self.asset_url(pattern)
    }

    fn asset_url(&self, pattern: &str) -> String {
        let name = expand_pattern(
            pattern,
            &self.background_token,
            &self.size.name,
            &self.language_token,
        );
        format!("{}/{}", self.campaign.asset_path, name)
    }

    fn image_slot(&self, key: &str, spec: &ImageSpec, source: ImageSource) -> RenderElement {
        let mut element = ImageElement::new(
            key,
            Some(source),
            Rect::new(spec.x, spec.y, spec.width, spec.height),
        )
        .with_alignment(spec.horizontal_alignment, spec.vertical_alignment)
        .with_scale(spec.scale_strategy);
        if spec.include_background_fill {
            element = element
                .with_background(Background::new(self.brand, IMAGE_BACKGROUND_PADDING));
        }
        element.into()
    }

    fn text_slot(&self, key: &str, spec: &TextSpec, text: &str) -> RenderElement {
        let lines = text
            .split('\n')
            .map(|line| {
                TextLine::new(
                    line,
                    self.session.font_family.clone(),
                    self.session.font_size,
                    Color::black(),
                )
            })
            .collect();
        let mut element = TextContainer::new(key, lines, Point::new(spec.x, spec.y))
            .with_alignment(spec.horizontal_alignment)
            .with_distribution(spec.line_distribution);
        if spec.include_background_fill {
            element =
                element.with_background(Background::new(self.brand, TEXT_BACKGROUND_PADDING));
        }
        element.into()
    }
}
