//! Footprint geometry lookup for placement rendering.
//!
//! A library location is either a `.pretty`-style directory of `.kicad_mod`
//! files (a "container") or a parent directory of such containers. Resolution
//! walks an ordered location list, exhausting direct container loads across
//! all locations before falling back to one level of subdirectories, and
//! caches the result per distinct package.

mod kicad;
mod resolve;
mod sexpr;

pub use kicad::{FootprintGeometry, KicadLoader, LibraryError};
pub use resolve::{resolve, FootprintLoader};
pub use sexpr::{SExpr, SExprError};
