//! I/O support for cbeam.
//!
//! This crate provides:
//! - **JSON beam decks**: geometry, section properties and model configuration
//! - **JSON modal reports**: nodes, frequencies, labels and normalized mode shapes
//!   of the identified modes, plus a plain-text frequency table

use std::fs;
use std::io;
use std::path::Path;

pub mod deck;
pub mod error;
pub mod report;

pub use deck::{BeamDeck, DECK_SCHEMA_VERSION, load_deck, parse_deck, save_deck};
pub use error::{IoError, Result};
pub use report::{ModalReport, ModeRecord, REPORT_SCHEMA_VERSION, load_report, write_report};

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
