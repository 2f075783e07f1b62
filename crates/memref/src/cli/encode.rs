use std::path::Path;

use anyhow::{bail, Result};
use memref_core::{encode, introspect};

use super::parse_scope;

pub fn run(manifest: &Path, name: &str, scope: Option<&str>) -> Result<()> {
    let info = super::load_manifest(manifest)?;
    let flags = parse_scope(scope)?;

    let matching: Vec<_> = introspect::members(&info, flags)
        .into_iter()
        .filter(|entry| entry.descriptor.name() == name)
        .collect();

    if matching.is_empty() {
        bail!("no member named '{name}' in {}", info.name());
    }

    for entry in matching {
        println!("{}", encode(&entry.descriptor));
    }

    Ok(())
}
