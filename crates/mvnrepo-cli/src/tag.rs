//! # Tag Subcommand
//!
//! Prints the integrity tag of a file in `sha1sum` layout. The `.sha1`
//! sidecar wins when present, as it does for the server's `ETag`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use mvnrepo_store::{integrity_tag_at, IntegrityTag, TagSource};

/// Arguments for the `mvnrepo tag` subcommand.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// File to tag.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the tag subcommand.
pub fn run_tag(args: &TagArgs) -> Result<u8> {
    let tag = crate::block_on(integrity_tag_at(&args.file))?
        .with_context(|| format!("cannot tag {}", args.file.display()))?;

    let source = match tag.source() {
        TagSource::Sidecar => "sidecar",
        TagSource::Computed => "computed",
    };
    tracing::info!(source, "integrity tag");
    println!("{}", tag_line(&tag, &args.file));
    Ok(0)
}

/// `{tag}  {file}`, the layout `sha1sum` prints and `sha1sum -c` reads.
pub fn tag_line(tag: &IntegrityTag, file: &Path) -> String {
    format!("{}  {}", tag.as_str().trim(), file.display())
}
