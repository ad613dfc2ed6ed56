//! Implementation of the assetmark command.
//!
//! `mod.rs` is a thin dispatcher; the run itself lives in `fingerprint`.

use crate::cli::Cli;
use crate::error::Result;

pub(crate) mod fingerprint;

pub use fingerprint::{Fingerprint, FingerprintBuilder};


/// Execute a fingerprint run based on the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    let quiet = cli.global_opts().quiet();
    let verbose = if quiet {
        0
    } else {
        cli.global_opts().verbose()
    };

    let source_dir = cli.get_source_dir();
    let dest_dir = cli.get_dest_dir();
    let manifest_path = cli.global_opts().get_manifest_path();

    Fingerprint::builder()
        .source_dir(&source_dir)
        .dest_dir(&dest_dir)
        .manifest_path(&manifest_path)
        .verbose(verbose)
        .quiet(quiet)
        .build()?
        .run()
        .map(|_| ())
}
