use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::kicad::{FootprintGeometry, LibraryError};

/// The seam between resolution and the CAD library on disk. `Ok(None)` means
/// the container holds no footprint with that name; `Err` means the container
/// could not be read, which resolution treats as "no match here".
pub trait FootprintLoader {
    fn load(
        &mut self,
        container: &Path,
        package: &str,
    ) -> Result<Option<FootprintGeometry>, LibraryError>;
}

/// Resolves each distinct package against the ordered library locations.
///
/// Packages that match nowhere are simply absent from the returned map; the
/// caller skips the affected components rather than failing the run. Taking
/// the packages as a set means each one goes through the search at most once,
/// no matter how many components share it.
pub fn resolve<L: FootprintLoader>(
    packages: &IndexSet<String>,
    locations: &[PathBuf],
    loader: &mut L,
) -> IndexMap<String, FootprintGeometry> {
    let mut resolved = IndexMap::new();
    for package in packages {
        match find_package(package, locations, loader) {
            Some(geometry) => {
                resolved.insert(package.clone(), geometry);
            }
            None => debug!(package = %package, "no footprint found in any library location"),
        }
    }
    resolved
}

/// First-match-wins search. Every location is tried as a direct container
/// before any location's subdirectories are considered, so a shallow match in
/// a later path always beats a nested match in an earlier one.
fn find_package<L: FootprintLoader>(
    package: &str,
    locations: &[PathBuf],
    loader: &mut L,
) -> Option<FootprintGeometry> {
    for location in locations {
        if let Some(geometry) = try_load(loader, location, package) {
            return Some(geometry);
        }
    }

    for location in locations {
        for subdirectory in subdirectories(location) {
            if let Some(geometry) = try_load(loader, &subdirectory, package) {
                return Some(geometry);
            }
        }
    }

    None
}

fn try_load<L: FootprintLoader>(
    loader: &mut L,
    container: &Path,
    package: &str,
) -> Option<FootprintGeometry> {
    match loader.load(container, package) {
        Ok(found) => found,
        Err(err) => {
            debug!(
                package,
                container = %container.display(),
                error = %err,
                "library load failed, treating as no match"
            );
            None
        }
    }
}

/// Immediate subdirectories of a location, in filesystem enumeration order.
/// Unreadable locations enumerate as empty.
fn subdirectories(location: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(location) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}
