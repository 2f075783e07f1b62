use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::{load_manifest, FilterArgs};

pub fn run(manifest: &Path, args: &FilterArgs) -> Result<()> {
    let info = load_manifest(manifest)?;
    let filter = args.resolve()?;
    debug!(?filter, type_name = info.name(), "listing members");

    for token in filter.candidates(&info) {
        println!("{token}");
    }

    Ok(())
}
