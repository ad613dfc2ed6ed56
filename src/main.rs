//! # assetmark CLI
//!
//! Copies a tree of static assets to a destination directory, embedding a
//! content hash in every file name, and rewrites relative `url(...)`
//! references in CSS files so they point at the hashed names.
//!
//! ## Quick Start
//!
//! ```bash
//! assetmark static/ dist/ --manifest dist/manifest.json
//! ```
//!
//! ## Environment Variables
//!
//! - `ASSETMARK_SOURCE` / `ASSETMARK_DEST`: Source and destination directories
//! - `ASSETMARK_MANIFEST`: Manifest location (default: ./manifest.json)
//! - `ASSETMARK_VERBOSE`: Enable verbose output
//! - `ASSETMARK_QUIET`: Silence all output except errors

use std::io::IsTerminal;

use assetmark::cli::Cli;

fn main() -> miette::Result<()> {
    // Install miette's fancy panic and error report handler
    miette::set_panic_hook();

    // Plain output for non-TTY environments (CI, logs, etc.)
    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();

    assetmark::commands::execute(&cli).map_err(Into::into)
}
