//! ``src/fs/path_utils.rs``
//!
//! # Path Utilities: POSIX-style helpers for gateway identifiers
//!
//! Gateway identifiers are slash-separated strings rooted at `/`, whatever the
//! storage behind them looks like. None of these helpers touch the disk and
//! none of them resolve `.` or `..`.

use compact_str::CompactString;

/// Identifier of the gateway root.
pub const ROOT: &str = "/";

const SEPARATOR: char = '/';

/// Last segment of `path`. The root is its own basename so it can be used as
/// a display label.
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed: &str = path.trim_end_matches(SEPARATOR);

    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { ROOT };
    }

    trimmed
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or(trimmed)
}

/// Join `dir` and `name`, collapsing runs of separators into one.
#[must_use]
pub fn join(dir: &str, name: &str) -> CompactString {
    let mut out = CompactString::with_capacity(dir.len() + name.len() + 1);

    let pieces = [dir, name];
    for (idx, piece) in pieces.iter().filter(|p| !p.is_empty()).enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(piece);
    }

    collapse_separators(&out)
}

/// Case-insensitive suffix match.
#[must_use]
pub fn has_extension(path: &str, suffix: &str) -> bool {
    if suffix.len() > path.len() {
        return false;
    }

    path.get(path.len() - suffix.len()..)
        .is_some_and(|tail: &str| tail.eq_ignore_ascii_case(suffix))
}

/// Append `suffix` unless `path` already ends with it (ignoring case).
#[must_use]
pub fn with_extension(path: &str, suffix: &str) -> CompactString {
    if has_extension(path, suffix) {
        CompactString::from(path)
    } else {
        let mut out = CompactString::with_capacity(path.len() + suffix.len());
        out.push_str(path);
        out.push_str(suffix);
        out
    }
}

/// Normalise a configured extension so it always carries its leading dot.
#[must_use]
pub fn normalize_suffix(extension: &str) -> CompactString {
    let bare: &str = extension.trim().trim_start_matches('.');
    let mut out = CompactString::with_capacity(bare.len() + 1);
    out.push('.');
    out.push_str(bare);
    out
}

/// True when `ancestor` lies strictly above `path` in the hierarchy.
#[must_use]
pub fn is_strict_ancestor(ancestor: &str, path: &str) -> bool {
    if ancestor == path {
        return false;
    }

    if ancestor == ROOT {
        return path.starts_with(SEPARATOR) && path != ROOT;
    }

    path.strip_prefix(ancestor)
        .is_some_and(|rest: &str| rest.starts_with(SEPARATOR) && rest.len() > 1)
}

fn collapse_separators(path: &str) -> CompactString {
    let mut out = CompactString::with_capacity(path.len());
    let mut last_was_sep = false;

    for ch in path.chars() {
        if ch == SEPARATOR {
            if last_was_sep {
                continue;
            }
            last_was_sep = true;
        } else {
            last_was_sep = false;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_of_root_is_root() {
        assert_eq!(basename("/"), "/");
        assert_eq!(basename("//"), "/");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn basename_takes_last_segment() {
        assert_eq!(basename("/home"), "home");
        assert_eq!(basename("/home/user/vault.bcup"), "vault.bcup");
        assert_eq!(basename("/home/user/"), "user");
        assert_eq!(basename("relative"), "relative");
    }

    #[test]
    fn join_collapses_redundant_separators() {
        assert_eq!(join("/", "home"), "/home");
        assert_eq!(join("/home/", "notes"), "/home/notes");
        assert_eq!(join("/home//user", "/notes"), "/home/user/notes");
        assert_eq!(join("", "notes"), "notes");
    }

    #[test]
    fn join_does_not_resolve_dots() {
        assert_eq!(join("/home", ".."), "/home/..");
        assert_eq!(join("/home", "./x"), "/home/./x");
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension("/a/notes.bcup", ".bcup"));
        assert!(has_extension("/a/NOTES.BCUP", ".bcup"));
        assert!(!has_extension("/a/notes.bcu", ".bcup"));
        assert!(!has_extension("cup", ".bcup"));
    }

    #[test]
    fn with_extension_never_doubles_suffix() {
        assert_eq!(with_extension("/home/mynotes", ".bcup"), "/home/mynotes.bcup");
        assert_eq!(with_extension("/home/mynotes.bcup", ".bcup"), "/home/mynotes.bcup");
        assert_eq!(with_extension("/home/Mine.BCUP", ".bcup"), "/home/Mine.BCUP");
    }

    #[test]
    fn suffix_gets_leading_dot() {
        assert_eq!(normalize_suffix("bcup"), ".bcup");
        assert_eq!(normalize_suffix(".bcup"), ".bcup");
        assert_eq!(normalize_suffix(" ..kdbx "), ".kdbx");
    }

    #[test]
    fn strict_ancestry() {
        assert!(is_strict_ancestor("/", "/home"));
        assert!(is_strict_ancestor("/home", "/home/user"));
        assert!(!is_strict_ancestor("/home", "/home"));
        assert!(!is_strict_ancestor("/home", "/homework"));
        assert!(!is_strict_ancestor("/", "/"));
    }
}
