//! Stylesheet prefixing and minification via `lightningcss`.

use super::Transform;
use crate::config::ConfigError;
use anyhow::{Context, Result, anyhow};
use lightningcss::{
    stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet},
    targets::{Browsers, Targets},
};
use std::path::Path;

/// Parse `"<browser> <major>"` entries into lightningcss targets.
///
/// ```ignore
/// parse_browsers(&["chrome 90".into(), "safari 13".into()])?;
/// ```
pub fn parse_browsers(entries: &[String]) -> Result<Browsers> {
    let mut browsers = Browsers::default();

    for entry in entries {
        let invalid = || ConfigError::Validation(format!("[tools.browsers] invalid entry `{entry}`"));

        let (name, version) = entry.trim().split_once(' ').ok_or_else(invalid)?;
        let major: u32 = version.trim().parse().map_err(|_| invalid())?;
        // lightningcss packs versions as major << 16 | minor << 8 | patch
        let packed = Some(major << 16);

        match name.to_ascii_lowercase().as_str() {
            "android" => browsers.android = packed,
            "chrome" => browsers.chrome = packed,
            "edge" => browsers.edge = packed,
            "firefox" => browsers.firefox = packed,
            "ie" => browsers.ie = packed,
            "ios" | "ios_saf" => browsers.ios_saf = packed,
            "opera" => browsers.opera = packed,
            "safari" => browsers.safari = packed,
            "samsung" => browsers.samsung = packed,
            _ => return Err(invalid().into()),
        }
    }

    Ok(browsers)
}

/// Run lightningcss over `input`; `minify` selects the compact printer.
fn process(input: &[u8], browsers: Browsers, minify: bool) -> Result<Vec<u8>> {
    let css = std::str::from_utf8(input).context("stylesheet is not valid UTF-8")?;
    let targets = Targets::from(browsers);

    let mut sheet =
        StyleSheet::parse(css, ParserOptions::default()).map_err(|e| anyhow!("{e}"))?;

    // Vendor prefixes are added by the minify pass, so it always runs
    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    let printed = sheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    Ok(printed.code.into_bytes())
}

/// Adds vendor prefixes for the configured browsers, keeping expanded output.
pub struct StylePrefixer {
    browsers: Browsers,
}

impl StylePrefixer {
    pub fn new(browsers: Browsers) -> Self {
        Self { browsers }
    }
}

impl Transform for StylePrefixer {
    fn name(&self) -> &'static str {
        "style prefixer"
    }

    fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = process(input, self.browsers, false)?;
        if !out.ends_with(b"\n") {
            out.push(b'\n');
        }
        Ok(out)
    }
}

/// Minifies a stylesheet; ordinary comments are dropped.
pub struct StyleMinifier {
    browsers: Browsers,
}

impl StyleMinifier {
    pub fn new(browsers: Browsers) -> Self {
        Self { browsers }
    }
}

impl Transform for StyleMinifier {
    fn name(&self) -> &'static str {
        "style minifier"
    }

    fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
        process(input, self.browsers, true)
    }
}
