use std::fs;
use std::path::Path;

use ab_glyph::FontVec;

/// Load the first usable system TrueType font for annotation text.
///
/// No font is bundled with the application; when none of the well-known
/// locations yields a parseable font, annotations fall back to boxes only.
pub fn resolve_font() -> Option<FontVec> {
    for path in CANDIDATE_FONTS {
        if let Some(font) = load_font(Path::new(path)) {
            log::debug!("annotation font: {path}");
            return Some(font);
        }
    }
    log::warn!("no usable system font found; annotations will draw boxes without text");
    None
}

#[cfg(target_os = "macos")]
const CANDIDATE_FONTS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Verdana.ttf",
    "/Library/Fonts/Arial.ttf",
];

#[cfg(target_os = "windows")]
const CANDIDATE_FONTS: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\verdana.ttf",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATE_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

fn load_font(path: &Path) -> Option<FontVec> {
    let bytes = fs::read(path).ok()?;
    FontVec::try_from_vec(bytes).ok()
}
