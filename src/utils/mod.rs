// water-marker/src/utils/mod.rs
use crate::core::{OverlayError, Result};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The only variable recognised in output folder templates.
pub const INPUT_FOLDER_VARIABLE: &str = "input_folder";

/// A resolved input folder and the folder its results are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPair {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Canonical absolute form of `path`.
///
/// Paths that do not exist yet (typically output folders) are resolved
/// component by component: the existing prefix is canonicalized, `.` and `..`
/// in the remainder are folded lexically.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(std::fs::canonicalize(path)?);
    }

    let mut resolved = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => {
                resolved.push(other);
                if resolved.exists() {
                    resolved = std::fs::canonicalize(&resolved)?;
                }
            }
        }
    }

    Ok(resolved)
}

/// Substitutes `{input_folder}` in `template`. `{{` and `}}` are literal braces.
pub fn expand_output_template(template: &str, input_folder: &Path) -> Result<PathBuf> {
    let mut expanded = OsString::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(OverlayError::InvalidTemplate(format!(
                                "unclosed '{{' in '{}'",
                                template
                            )))
                        }
                    }
                }

                if name != INPUT_FOLDER_VARIABLE {
                    return Err(OverlayError::InvalidTemplate(format!(
                        "unknown variable '{{{}}}' in '{}'",
                        name, template
                    )));
                }

                expanded.push(std::mem::take(&mut literal));
                expanded.push(input_folder.as_os_str());
            }
            '}' => {
                return Err(OverlayError::InvalidTemplate(format!(
                    "single '}}' in '{}'",
                    template
                )))
            }
            _ => literal.push(c),
        }
    }

    expanded.push(literal);
    Ok(PathBuf::from(expanded))
}

/// Resolves every input folder and derives its output folder from the template.
pub fn build_folder_pairs(inputs: &[PathBuf], template: &str) -> Result<Vec<FolderPair>> {
    inputs
        .iter()
        .map(|input| {
            let input = resolve_path(input)?;
            let output = resolve_path(&expand_output_template(template, &input)?)?;
            Ok(FolderPair { input, output })
        })
        .collect()
}

/// Every entry directly inside `dir`, files and non-files alike, sorted by name.
/// A missing folder lists as empty.
pub fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::warn!("Input folder does not exist: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        entries.push(entry?.into_path());
    }

    Ok(entries)
}
