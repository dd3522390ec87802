//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [package] Section Defaults
// ============================================================================

pub mod package {
    pub fn name() -> String {
        "site".into()
    }

    pub fn version() -> String {
        "0.0.0".into()
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn license() -> String {
        "MIT".into()
    }
}

// ============================================================================
// [workspace] Section Defaults
// ============================================================================

pub mod workspace {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "websites".into()
    }

    pub fn default() -> String {
        "default".into()
    }
}

// ============================================================================
// [tools] Section Defaults
// ============================================================================

pub mod tools {
    pub fn lint() -> Vec<String> {
        vec!["jshint".into()]
    }

    pub fn styles() -> Vec<String> {
        vec![
            "sass".into(),
            "--no-source-map".into(),
            "--style=expanded".into(),
        ]
    }

    pub fn transpile() -> Vec<String> {
        vec![
            "babel".into(),
            "--plugins".into(),
            "@babel/plugin-transform-typescript".into(),
        ]
    }

    /// Oldest browser major versions the style prefixer targets.
    pub fn browsers() -> Vec<String> {
        vec![
            "chrome 90".into(),
            "firefox 88".into(),
            "safari 13".into(),
            "edge 90".into(),
        ]
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        3000
    }

    pub fn reload_port() -> u16 {
        3001
    }
}
