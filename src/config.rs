use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use vi_numeric::NumberStyle;

/// Builds the number style from an optional JSON file and the command-line switches.
pub fn load_style(path: Option<&Path>, no_auto_percent: bool) -> Result<NumberStyle> {
    let mut style = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read style file {}", path.display()))?;
            serde_json::from_str::<NumberStyle>(&raw)
                .with_context(|| format!("failed to parse style file {}", path.display()))?
        }
        None => NumberStyle::default(),
    };
    if no_auto_percent {
        style = style.with_auto_percent(false);
    }
    style.validate().context("invalid number style")?;
    debug!(?style, "number style");
    Ok(style)
}
