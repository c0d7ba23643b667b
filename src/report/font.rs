//! Chooses the font used for PDF reports.
//!
//! A font file with CJK glyphs is preferred. When it is missing or unusable
//! the report falls back to the built-in Helvetica font, which cannot draw
//! non-Latin text but always produces a valid document.

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Which font a PDF report was rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontTier {
    /// A TrueType/OpenType font loaded from disk.
    Embedded(PathBuf),
    /// The built-in Helvetica font, Latin text only.
    Builtin,
}

/// A font ready to be added to a PDF document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FontSource {
    /// The bytes of the font file at `path`.
    Embedded { path: PathBuf, data: Vec<u8> },
    /// The built-in Helvetica font.
    Builtin,
}

impl FontSource {
    /// The tier this source corresponds to.
    pub(crate) fn tier(&self) -> FontTier {
        match self {
            FontSource::Embedded { path, .. } => FontTier::Embedded(path.clone()),
            FontSource::Builtin => FontTier::Builtin,
        }
    }
}

/// Read the font file at `path`, or fall back to the built-in font if it is
/// missing, unreadable or not a font.
pub(crate) fn resolve_font(path: &Path) -> FontSource {
    if !path.is_file() {
        tracing::warn!(
            "font file {} not found, falling back to the built-in font",
            path.display()
        );
        return FontSource::Builtin;
    }

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(
                "could not read font file {}, falling back to the built-in font: {error}",
                path.display()
            );
            return FontSource::Builtin;
        }
    };

    if !has_font_signature(&data) {
        tracing::warn!(
            "{} is not a TrueType or OpenType font, falling back to the built-in font",
            path.display()
        );
        return FontSource::Builtin;
    }

    FontSource::Embedded {
        path: path.to_owned(),
        data,
    }
}

/// Check the sfnt version tag at the start of a font file.
fn has_font_signature(data: &[u8]) -> bool {
    matches!(
        data.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::report::font::{FontSource, FontTier, resolve_font};

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let source = resolve_font("does/not/exist/NotoSansTC-Regular.ttf".as_ref());

        assert_eq!(source, FontSource::Builtin);
        assert_eq!(source.tier(), FontTier::Builtin);
    }

    #[test]
    fn non_font_file_falls_back_to_builtin() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<html>not a font</html>").unwrap();

        let source = resolve_font(file.path());

        assert_eq!(source, FontSource::Builtin);
    }

    #[test]
    fn directory_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();

        let source = resolve_font(dir.path());

        assert_eq!(source, FontSource::Builtin);
    }

    #[test]
    fn truetype_file_is_embedded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x10]).unwrap();

        let source = resolve_font(file.path());

        assert_eq!(source.tier(), FontTier::Embedded(file.path().to_owned()));
    }
}
