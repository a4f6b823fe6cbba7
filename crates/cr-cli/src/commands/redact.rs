use std::io::Read;

use anyhow::{Context, Result};
use cr_core::{RatingCode, Viewer, ViewerPermissions};

use super::Engine;

pub fn handle(
    engine: &Engine,
    input: &str,
    allow: &[String],
    anonymous: bool,
    report: bool,
) -> Result<()> {
    let text = read_input(input)?;
    let viewer = build_viewer(engine, allow, anonymous)?;

    let (redacted, infos) = engine.redact_with_report(&text, &viewer);
    print!("{}", redacted);

    if report {
        eprintln!("{}", serde_json::to_string_pretty(&infos)?);
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

/// Viewer allowing exactly the classified `allow` codes
fn build_viewer(engine: &Engine, allow: &[String], anonymous: bool) -> Result<Viewer> {
    if anonymous {
        return Ok(Viewer::anonymous());
    }

    let mut perms = ViewerPermissions::new();
    for raw in allow {
        let code = match engine.classify(raw) {
            Some(code) => code,
            None => RatingCode::new(raw).with_context(|| format!("unknown rating {:?}", raw))?,
        };
        perms.set(code, true);
    }
    Ok(Viewer::registered(perms))
}
