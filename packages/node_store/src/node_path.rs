//! Path syntax shared by the backends.

use coordstore_ll::LLError;

/// Split an absolute node path into its segments.
///
/// The root `/` has no segments. Anything else must start with `/`, must not
/// end with one, and every segment must be non-empty, free of NUL, and not
/// `.` or `..`.
pub(crate) fn segments(path: &str) -> Result<Vec<&str>, LLError> {
    if path == "/" {
        return Ok(Vec::new());
    }
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| LLError::invalid_path(format!("'{}' is not absolute", path)))?;
    if rest.ends_with('/') {
        return Err(LLError::invalid_path(format!(
            "'{}' has a trailing slash",
            path
        )));
    }

    let parts: Vec<&str> = rest.split('/').collect();
    for (position, part) in parts.iter().enumerate() {
        let problem = match *part {
            "" => Some("empty segment"),
            "." | ".." => Some("relative segment"),
            p if p.contains('\0') => Some("NUL character"),
            _ => None,
        };
        if let Some(problem) = problem {
            return Err(LLError::invalid_path(format!(
                "'{}': {} at position {}",
                path, problem, position
            )));
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_segments() {
        assert!(segments("/").unwrap().is_empty());
    }

    #[test]
    fn splits_absolute_paths() {
        assert_eq!(segments("/a/b/c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(segments("/with space").unwrap(), vec!["with space"]);
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", "a/b", "/a/", "/a//b", "/a/./b", "/..", "/a\0b"] {
            assert!(
                matches!(segments(bad), Err(LLError::InvalidPath { .. })),
                "accepted {:?}",
                bad
            );
        }
    }
}
