use std::path::Path;

use anyhow::{bail, Result};
use console::style;
use memref_core::decode;

use super::{load_manifest, parse_scope};

pub fn run(manifest: &Path, tokens: &[String], scope: Option<&str>) -> Result<()> {
    let info = load_manifest(manifest)?;
    let flags = parse_scope(scope)?;

    let mut stale = 0;
    for token in tokens {
        match decode(token, &info, flags) {
            Ok(_) => println!("{} {token}", style("ok").green()),
            Err(e) => {
                stale += 1;
                println!("{} {token}", style("stale").red());
                eprintln!("  {}", style(e).dim());
            }
        }
    }

    if stale > 0 {
        bail!("{stale} of {} token(s) no longer resolve against {}", tokens.len(), info.name());
    }

    Ok(())
}
