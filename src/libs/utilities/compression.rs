// Unpacking of downloaded release archives. Only gzipped tarballs are handled,
// since the release strategy never selects anything else.
use crate::log_debug;
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Extracts a `.tar.gz` archive into a new `extracted` subdirectory of `dest`.
///
/// # Arguments
/// * `src`: The archive file.
/// * `dest`: The parent directory; `dest/extracted` is created and filled.
///
/// # Returns
/// * `io::Result<PathBuf>`: The path of the `extracted` directory.
pub fn extract_tar_gz(src: &Path, dest: &Path) -> io::Result<PathBuf> {
    log_debug!(
        "[Archive] Extracting {} into {}",
        src.display().to_string().blue(),
        dest.display().to_string().cyan()
    );

    let extracted_path = dest.join("extracted");
    fs::create_dir_all(&extracted_path)?;

    let tar_gz = File::open(src)?;
    let mut archive = Archive::new(GzDecoder::new(tar_gz));
    // `unpack` refuses entries that would escape `extracted_path`.
    archive.unpack(&extracted_path)?;

    log_debug!(
        "[Archive] Contents available at {}",
        extracted_path.display().to_string().green()
    );
    Ok(extracted_path)
}
