//! Asset naming patterns.
//!
//! Patterns are plain strings over a fixed token set; substitution is
//! case-preserving. Callers decide the casing of the values they pass in:
//! the composer lower-cases background and language names, while size names
//! pass through verbatim.

/// Default slot patterns, used when neither the campaign nor the slot
/// overrides them.
pub const BACKGROUND_PATTERN: &str = "{background}_{size}.png";
pub const HEADER_PATTERN: &str = "header_{language}.png";
pub const DEFAULT_PICTURE_PATTERN: &str = "{background}_defaultpicture_{language}.png";
pub const ANTI_DEFAULT_PICTURE_PATTERN: &str = "{background}_antidefaultpicture_{language}.png";
pub const FOREGROUND_PATTERN: &str = "{background}_foreground.png";

/// Substitute the `{background}`, `{size}` and `{language}` tokens.
///
/// Tokens the pattern does not mention are simply unused; anything else in
/// the pattern passes through untouched.
pub fn expand_pattern(pattern: &str, background: &str, size: &str, language: &str) -> String {
    pattern
        .replace("{background}", background)
        .replace("{size}", size)
        .replace("{language}", language)
}
