//! Centroid (pick-and-place) file parsing.
//!
//! KiCad exports placement data as a `.pos` file: a block of `#`-prefixed
//! comment lines, the last of which declares the column names, followed by one
//! whitespace-separated row per placed component. The column set is
//! self-describing, so this crate stores each row as an ordered map keyed by
//! the header and only interprets the canonical columns (`Ref`, `Package`,
//! `PosX`, `PosY`, `Rot`, `Side`) on access.

mod designator;
mod error;
mod parse;
mod record;

pub use designator::designator_class;
pub use error::CentroidError;
pub use parse::{parse_file, parse_str};
pub use record::{distinct_packages, Field, PlacementRecord};
