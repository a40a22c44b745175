//! Font resolution for the report renderer.
//!
//! The report is set in Roboto.  Each candidate directory is tried in turn:
//! the `CAR_REPORT_FONTS_DIR` override, `assets/fonts` next to the running
//! executable, then this crate's own `assets/fonts`.  When no candidate holds
//! all four faces, the Windows system Arial family is used as a last resort.
//! A missing family is reported with every path that was checked so the error
//! message alone explains how to fix the installation.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::warn;

/// Name of the report font family.
pub const FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the font search path.
pub const FONTS_DIR_ENV: &str = "CAR_REPORT_FONTS_DIR";

/// Environment variable overriding the Windows fallback font directory.
pub const WINDOWS_FONTS_DIR_ENV: &str = "CAR_REPORT_WINDOWS_FONTS_DIR";

const FONT_FILES: [&str; 4] = [
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

/// Resolves the font family used for every report.
///
/// Load failures for faces that are present on disk surface immediately; only
/// a fully missing family falls through to the Arial fallback.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let mut attempts = Vec::new();

    for directory in candidate_directories() {
        match family_from_directory(&directory) {
            Ok(family) => return Ok(family),
            Err(Candidate::Incomplete(reason)) => attempts.push(reason),
            Err(Candidate::Unreadable(err)) => return Err(err),
        }
    }

    match arial_fallback() {
        Some(Ok(family)) => {
            warn!(
                "Roboto faces not found ({}); using the Windows Arial family instead.",
                attempts.join("; ")
            );
            Ok(family)
        }
        Some(Err(err)) => Err(err),
        None => Err(not_found(&attempts)),
    }
}

enum Candidate {
    /// The directory does not hold a complete family.
    Incomplete(String),
    /// The faces exist but could not be loaded.
    Unreadable(Error),
}

fn candidate_directories() -> Vec<PathBuf> {
    let mut directories = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        directories.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut directories, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(
        &mut directories,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    directories
}

fn push_unique(directories: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !directories.contains(&candidate) {
        directories.push(candidate);
    }
}

fn family_from_directory(directory: &Path) -> Result<FontFamily<FontData>, Candidate> {
    if !directory.is_dir() {
        return Err(Candidate::Incomplete(format!(
            "no directory at {}",
            directory.display()
        )));
    }

    let missing: Vec<&str> = FONT_FILES
        .iter()
        .copied()
        .filter(|name| !directory.join(name).is_file())
        .collect();
    if !missing.is_empty() {
        return Err(Candidate::Incomplete(format!(
            "{} lacks {}",
            directory.display(),
            missing.join(", ")
        )));
    }

    fonts::from_files(directory, FONT_FAMILY_NAME, None).map_err(|err| {
        Candidate::Unreadable(Error::new(
            format!(
                "failed to load the {} family from {}: {}",
                FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        ))
    })
}

fn arial_fallback() -> Option<Result<FontFamily<FontData>, Error>> {
    let directory = windows_font_directory()?;

    let load = |file: &str, face: &str| {
        FontData::load(&directory.join(file), None).map_err(|err| {
            Error::new(
                format!(
                    "failed to load the Arial {} face from {}: {}",
                    face,
                    directory.join(file).display(),
                    err
                ),
                io::Error::new(io::ErrorKind::NotFound, err.to_string()),
            )
        })
    };

    Some((|| {
        Ok(FontFamily {
            regular: load("arial.ttf", "regular")?,
            bold: load("arialbd.ttf", "bold")?,
            italic: load("ariali.ttf", "italic")?,
            bold_italic: load("arialbi.ttf", "bold italic")?,
        })
    })())
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        if value.is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        }
    })
}

fn not_found(attempts: &[String]) -> Error {
    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join("; ")
    };
    Error::new(
        format!(
            "No usable report fonts. Checked: {}. See assets/fonts/README.md or set {}.",
            summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "report fonts not found"),
    )
}
