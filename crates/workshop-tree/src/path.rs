//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use crate::error::{Result, TreeError};

/// Separator between names in a path.
pub const SEPARATOR: char = '/';

/// Split a path into its names.
///
/// Leading and trailing separators are ignored and the empty path yields no names
/// (the root). An empty name between two separators is rejected.
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let trimmed = path.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let names: Vec<&str> = trimmed.split(SEPARATOR).collect();
    if names.iter().any(|name| name.is_empty()) {
        return Err(TreeError::InvalidPath(path.to_owned()));
    }
    Ok(names)
}

/// Join a parent path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounding_separators_are_ignored() {
        assert_eq!(segments("/info/label/").unwrap(), vec!["info", "label"]);
        assert_eq!(segments("num_val").unwrap(), vec!["num_val"]);
        assert!(segments("").unwrap().is_empty());
        assert!(segments("/").unwrap().is_empty());
    }

    #[test]
    fn empty_inner_names_are_invalid() {
        assert_eq!(
            segments("info//label"),
            Err(TreeError::InvalidPath("info//label".into()))
        );
    }

    #[test]
    fn join_handles_root() {
        assert_eq!(join("", "info"), "info");
        assert_eq!(join("info", "label"), "info/label");
    }
}
