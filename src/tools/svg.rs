//! SVG optimization via `usvg`.

use super::Transform;
use anyhow::{Context, Result};
use std::path::Path;

/// Parses the SVG into a normalized tree and writes it back without
/// indentation; editor metadata, comments and unused definitions are lost
/// on the way.
pub struct SvgOptimizer;

impl Transform for SvgOptimizer {
    fn name(&self) -> &'static str {
        "svg optimizer"
    }

    fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_data(input, &options).context("Failed to parse SVG")?;

        let write_options = usvg::WriteOptions {
            indent: usvg::Indent::None,
            ..Default::default()
        };

        Ok(tree.to_string(&write_options).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported by an editor -->
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">
    <metadata>editor junk</metadata>
    <rect x="0" y="0" width="10" height="10" fill="#ff0000"/>
</svg>
"##;

    #[test]
    fn test_optimize_strips_comments_and_metadata() {
        let out = SvgOptimizer.apply(Path::new("icon.svg"), ICON.as_bytes()).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("<svg"));
        assert!(!out.contains("exported by an editor"));
        assert!(!out.contains("editor junk"));
    }

    #[test]
    fn test_optimize_rejects_invalid_svg() {
        let result = SvgOptimizer.apply(Path::new("broken.svg"), b"<svg><rect");
        assert!(result.is_err());
    }
}
