//! Image reference handling.

use serde::Serialize;

const INLINE_PREFIX: &str = "data:image/";

/// An image reference as stored on a listing, classified but unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "src", rename_all = "lowercase")]
pub enum ImageSource {
    /// A `data:image/...` URI carrying the bytes inline.
    Inline(String),
    /// Anything else, passed to the image loader as-is.
    Remote(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::Inline(src) | ImageSource::Remote(src) => src,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageSource::Inline(_))
    }
}

/// Classify `reference` without rewriting it. Missing or blank references
/// yield `None`.
pub fn normalize_image_ref(reference: Option<&str>) -> Option<ImageSource> {
    let reference = reference.filter(|r| !r.trim().is_empty())?;
    if reference.starts_with(INLINE_PREFIX) {
        Some(ImageSource::Inline(reference.to_string()))
    } else {
        Some(ImageSource::Remote(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_reference() {
        let src = "data:image/png;base64,iVBORw0KGgo=";
        let image = normalize_image_ref(Some(src)).unwrap();
        assert!(image.is_inline());
        assert_eq!(image.as_str(), src);
    }

    #[test]
    fn test_remote_reference_unchanged() {
        let src = "https://cdn.example.com/bagels.jpg";
        assert_eq!(
            normalize_image_ref(Some(src)),
            Some(ImageSource::Remote(src.to_string()))
        );
        // Non-image data URIs are remote references too.
        assert!(!normalize_image_ref(Some("data:text/plain,hi")).unwrap().is_inline());
    }

    #[test]
    fn test_missing_reference() {
        assert_eq!(normalize_image_ref(None), None);
        assert_eq!(normalize_image_ref(Some("")), None);
        assert_eq!(normalize_image_ref(Some("   ")), None);
    }
}
