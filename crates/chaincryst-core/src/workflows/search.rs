use crate::core::io::poscar::{PoscarError, PoscarFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::AtomicStructure;
use crate::engine::config::{DEFAULT_OUTPUT_EXTENSION, SearchConfig};
use crate::engine::error::EngineError;
use crate::engine::search::CrystalSearch;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Outcome of the crystal search for one polymer unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitResult {
    pub unit_id: String,
    /// Number of clash-free packings found (and attempted to write).
    pub accepted_count: usize,
    /// The planar radius actually used for this unit.
    pub radius: f64,
    pub evaluated: usize,
    /// Accepted packings whose file could not be written.
    pub failed_writes: usize,
}

/// Derives the unit identifier from an input path: the file name without `.vasp`.
pub fn unit_id_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!(".{}", DEFAULT_OUTPUT_EXTENSION);
    name.strip_suffix(&suffix).map(str::to_string).unwrap_or(name)
}

/// Resolves a unit path that may have been given without its `.vasp` extension.
pub fn resolve_input_path(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    let mut with_extension = path.as_os_str().to_owned();
    with_extension.push(".");
    with_extension.push(DEFAULT_OUTPUT_EXTENSION);
    let candidate = PathBuf::from(with_extension);
    if candidate.exists() {
        candidate
    } else {
        path.to_path_buf()
    }
}

/// Searches one already-loaded unit and writes every accepted crystal.
///
/// Files are written to `{out_dir}/{unit_id}/{t}_{r1}_{r2}.{ext}`. A failure to write
/// one file is logged and counted; it does not stop the remaining grid points.
///
/// # Errors
///
/// Returns an error if the grid is degenerate or the unit directory cannot be created.
#[instrument(skip(unit, config, out_dir), name = "unit_search")]
pub fn run(
    unit: &AtomicStructure,
    unit_id: &str,
    config: &SearchConfig,
    out_dir: &Path,
) -> Result<UnitResult, EngineError> {
    let search = CrystalSearch::new(unit, config)?;

    let unit_dir = out_dir.join(unit_id);
    std::fs::create_dir_all(&unit_dir).map_err(|e| EngineError::OutputDirectory {
        path: unit_dir.clone(),
        source: e,
    })?;

    info!(
        atoms = unit.atom_count(),
        radius = search.radius(),
        candidates = search.grid().len(),
        "Starting crystal search."
    );

    let stats = search.run(|point, crystal| -> Result<(), PoscarError> {
        let structure = crystal.into_structure(config.padding)?;
        let path = unit_dir.join(format!("{}.{}", point.key(), config.output_extension));
        PoscarFile::write_to_path(&structure, &path)?;
        debug!(path = %path.display(), "Wrote accepted crystal.");
        Ok(())
    })?;

    if stats.accepted == 0 {
        warn!("No clash-free packing found; no structure files were written.");
    } else {
        info!(
            accepted = stats.accepted,
            failed_writes = stats.failed,
            "Crystal search complete."
        );
    }

    Ok(UnitResult {
        unit_id: unit_id.to_string(),
        accepted_count: stats.accepted,
        radius: search.radius(),
        evaluated: stats.evaluated,
        failed_writes: stats.failed,
    })
}

/// Reads a unit from disk and searches it.
///
/// # Errors
///
/// Returns [`EngineError::MalformedInput`] if the file cannot be read or parsed, plus any
/// error of [`run`].
pub fn run_from_path(
    unit_path: &Path,
    config: &SearchConfig,
    out_dir: &Path,
) -> Result<UnitResult, EngineError> {
    let path = resolve_input_path(unit_path);
    let unit_id = unit_id_from_path(&path);
    let unit = PoscarFile::read_from_path(&path).map_err(|e| EngineError::MalformedInput {
        path: path.clone(),
        source: e,
    })?;
    run(&unit, &unit_id, config, out_dir)
}
