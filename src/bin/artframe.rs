//! Artwork frame removal CLI binary
//!
//! Thin entry point over the library's CLI module. The detection pipeline
//! is pure CPU-bound work, so the binary runs synchronously.

use anyhow::Result;

fn main() -> Result<()> {
    artframe::cli::main()
}
