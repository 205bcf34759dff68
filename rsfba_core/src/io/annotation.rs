//! Module for reading functional role annotations
//!
//! Two inputs are supported:
//! - assigned functions files, with one `feature<TAB>function` line per feature
//! - roles files, with one function per line
//!
//! A function may encode several roles, joined by ` / `, ` @ ` or `; `, and may carry a
//! trailing `#` comment.
use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

const ROLE_SEPARATORS: [&str; 3] = [" / ", " @ ", "; "];

/// Split a function into the roles it is made of
///
/// # Examples
/// ```rust
/// use rsfba_core::io::annotation::roles_of_function;
/// let roles = roles_of_function("Thymidylate kinase (EC 2.7.4.9) / Uridylate kinase # putative");
/// assert_eq!(roles.len(), 2);
/// assert!(roles.contains("Uridylate kinase"));
/// ```
pub fn roles_of_function(function: &str) -> IndexSet<String> {
    let function = match function.find('#') {
        Some(comment) => &function[..comment],
        None => function,
    };
    let mut parts = vec![function.trim()];
    for separator in ROLE_SEPARATORS {
        parts = parts
            .into_iter()
            .flat_map(|p| p.split(separator))
            .map(str::trim)
            .collect();
    }
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the contents of an assigned functions file into a map of feature id to roles
pub fn parse_assigned_functions(
    contents: &str,
) -> Result<IndexMap<String, IndexSet<String>>, AnnotationError> {
    let mut assigned: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(feature), Some(function)) = (fields.next(), fields.next()) else {
            return Err(AnnotationError::MalformedLine {
                line: number + 1,
                content: line.to_string(),
            });
        };
        assigned
            .entry(feature.trim().to_string())
            .or_default()
            .extend(roles_of_function(function));
    }
    Ok(assigned)
}

/// Read an assigned functions file into a map of feature id to roles
pub fn read_assigned_functions<P: AsRef<Path>>(
    path: P,
) -> Result<IndexMap<String, IndexSet<String>>, AnnotationError> {
    let contents = fs::read_to_string(path)?;
    parse_assigned_functions(&contents)
}

/// Read a file of functions, one per line, into the set of roles they contain
pub fn read_roles_file<P: AsRef<Path>>(path: P) -> Result<IndexSet<String>, AnnotationError> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().flat_map(roles_of_function).collect())
}

/// Union of every feature's roles
pub fn all_roles(assigned: &IndexMap<String, IndexSet<String>>) -> IndexSet<String> {
    assigned.values().flatten().cloned().collect()
}

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Unable to read annotation file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Line {line} is not a feature and function separated by a tab: {content:?}")]
    MalformedLine { line: usize, content: String },
}
