//! Script minification via `minify_js`.

use super::Transform;
use anyhow::{Result, anyhow};
use minify_js::{Session, TopLevelMode, minify};
use std::path::Path;

pub struct ScriptMinifier;

impl Transform for ScriptMinifier {
    fn name(&self) -> &'static str {
        "script minifier"
    }

    fn apply(&self, _path: &Path, input: &[u8]) -> Result<Vec<u8>> {
        let session = Session::new();
        let mut output = Vec::with_capacity(input.len());

        // Sources are classic scripts: top-level names stay global
        minify(&session, TopLevelMode::Global, input, &mut output)
            .map_err(|err| anyhow!("syntax error: {err:?}"))?;

        Ok(output)
    }
}
