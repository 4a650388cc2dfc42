//! Font resolution for the Affiche pipeline.
//!
//! Families are names in a [`FontCatalog`]; the [`FontStore`] turns a name
//! into font bytes exactly once per process, no matter how many render
//! passes or concurrent requesters ask for it. Measurement against those
//! bytes lives in [`metrics`] and is what every backend feeds its layout
//! with, so the surfaces cannot disagree about text extents.

use std::collections::HashMap;

use affiche_core::error::FontError;

pub mod metrics;
mod store;

pub use store::{FontData, FontStore};

/// The campaign's selectable font families, in menu order.
pub const FAMILIES: [&str; 16] = [
    "Advent Pro",
    "Bebas Neue",
    "Caveat",
    "Dancing Script",
    "Gluten",
    "Gruppo",
    "Indie Flower",
    "Kalam",
    "Outfit",
    "Pacifico",
    "Questrial",
    "Quicksand",
    "Rampart One",
    "Red Hat Display",
    "Rock Salt",
    "Shalimar",
];

/// Family name -> font file location registry.
///
/// Immutable once handed to a [`FontStore`]; an unknown family is an
/// [`FontError::UnsupportedFamily`], surfaced by whichever backend needed
/// the bytes.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    locations: HashMap<String, String>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of hosted TTFs for the campaign's font menu.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (family, url) in [
            ("Advent Pro", "https://fonts.gstatic.com/s/adventpro/v11/V8mAoQfxVT4Dvddr_yOwhTqtLQ.ttf"),
            ("Bebas Neue", "https://fonts.gstatic.com/s/bebasneue/v2/JTUSjIg69CK48gW7PXoo9Wlhzg.ttf"),
            ("Caveat", "https://fonts.gstatic.com/s/caveat/v10/WnznHAc5bAfYB2QRah7pcpNvOx-pjfJ9eIWpZA.ttf"),
            ("Dancing Script", "https://fonts.gstatic.com/s/dancingscript/v19/If2cXTr6YS-zF4S-kcSWSVi_sxjsohD9F50Ruu7BMSo3Sup5.ttf"),
            ("Gluten", "https://fonts.gstatic.com/s/gluten/v1/HhyIU5gk9fW7OUdVIPh2wBPxSqQJ_zh2zDQhRg.ttf"),
            ("Gruppo", "https://fonts.gstatic.com/s/gruppo/v11/WwkfxPmzE06v_ZW1XnrE.ttf"),
            ("Indie Flower", "https://fonts.gstatic.com/s/indieflower/v12/m8JVjfNVeKWVnh3QMuKkFcZVaUuC.ttf"),
            ("Kalam", "https://fonts.gstatic.com/s/kalam/v11/YA9dr0Wd4kDdMthROCI.ttf"),
            ("Outfit", "https://fonts.gstatic.com/s/outfit/v1/QGYyz_MVcBeNP4NjuGObqx1XmO1I4TC1O4a0Fg.ttf"),
            ("Pacifico", "https://fonts.gstatic.com/s/pacifico/v17/FwZY7-Qmy14u9lezJ-6H6Mw.ttf"),
            ("Questrial", "https://fonts.gstatic.com/s/questrial/v13/QdVUSTchPBm7nuUeVf70viFg.ttf"),
            ("Quicksand", "https://fonts.gstatic.com/s/quicksand/v24/6xK-dSZaM9iE8KbpRA_LJ3z8mH9BOJvgkP8o58a-xw.ttf"),
            ("Rampart One", "https://fonts.gstatic.com/s/rampartone/v1/K2F1fZFGl_JSR1tAWNG9R5qnJyo.ttf"),
            ("Red Hat Display", "https://fonts.gstatic.com/s/redhatdisplay/v7/8vIf7wUr0m80wwYf0QCXZzYzUoTK8RZQvRd-D1NYbmyWQk8z_Q.ttf"),
            ("Rock Salt", "https://fonts.gstatic.com/s/rocksalt/v11/MwQ0bhv11fWD6QsAVOZrt0M_.ttf"),
            ("Shalimar", "https://fonts.gstatic.com/s/shalimar/v1/uU9MCBoE6I6iNWFUvQP2-vQ.ttf"),
        ] {
            catalog.locations.insert(family.to_owned(), url.to_owned());
        }
        catalog
    }

    /// Add or override a family -> location entry.
    pub fn with_font(mut self, family: impl Into<String>, location: impl Into<String>) -> Self {
        self.locations.insert(family.into(), location.into());
        self
    }

    /// Resolve a family to its font file location.
    pub fn locate(&self, family: &str) -> Result<&str, FontError> {
        self.locations
            .get(family)
            .map(String::as_str)
            .ok_or_else(|| FontError::UnsupportedFamily(family.to_owned()))
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }
}

/// Strip a CSS-style fallback list to its leading family.
///
/// Elements may carry `"Quicksand, sans-serif"`; only the first entry names
/// a fetchable font.
pub fn primary_family(family: &str) -> &str {
    family
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or(family)
}
