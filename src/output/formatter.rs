use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::OutputError;
use crate::generator::schema_generator::SchemaFile;
use crate::output::template;

/// Program run by [`format_files`].
pub const GOFMT: &str = "gofmt";

/// Render and write one `<file_stem>.go` file per schema record.
///
/// Every stem is checked before anything is written: a stem must be a plain
/// file name and no two tables may share one. Returns the written paths in
/// input order.
pub fn write_schema_files(
    output_dir: &Path,
    files: &[SchemaFile],
) -> Result<Vec<PathBuf>, OutputError> {
    let mut stems = BTreeSet::new();
    for file in files {
        check_file_stem(&file.file_stem)?;
        if !stems.insert(file.file_stem.as_str()) {
            return Err(OutputError::DuplicateName {
                name: file.file_stem.clone(),
            });
        }
    }

    std::fs::create_dir_all(output_dir).map_err(|source| OutputError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(format!("{}.go", file.file_stem));
        std::fs::write(&path, template::render_schema(file)).map_err(|source| {
            OutputError::Write {
                path: path.clone(),
                source,
            }
        })?;
        written.push(path);
    }
    Ok(written)
}

/// Rewrite the given files in place with `gofmt -w`.
pub fn format_files(paths: &[PathBuf]) -> Result<(), OutputError> {
    run_formatter(GOFMT, paths)
}

fn run_formatter(program: &str, paths: &[PathBuf]) -> Result<(), OutputError> {
    if paths.is_empty() {
        return Ok(());
    }
    let output = Command::new(program)
        .arg("-w")
        .args(paths)
        .output()
        .map_err(|source| OutputError::FormatSpawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(OutputError::Format {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    debug!(program, files = paths.len(), "formatted schema files");
    Ok(())
}

/// Quoted table names can hold any character; the stem has to stay one file
/// inside the output directory.
fn check_file_stem(stem: &str) -> Result<(), OutputError> {
    let reason = if stem.is_empty() {
        "table name is empty"
    } else if stem == "." || stem == ".." {
        "table name is a directory reference"
    } else if stem.contains(['/', '\\']) {
        "table name contains a path separator"
    } else if stem.chars().any(char::is_control) {
        "table name contains control characters"
    } else {
        return Ok(());
    };
    Err(OutputError::InvalidName {
        name: stem.to_string(),
        reason,
    })
}
