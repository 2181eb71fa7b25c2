//! Dependency-reference resolution and snapshot id parsing.
//!
//! Both are pure functions: they collapse the two kinds of references found in a
//! lockfile (workspace `link:` paths and resolved registry versions) into the id
//! space used by [`crate::graph::Package`].

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Specifier prefix for a dependency on another workspace project.
pub const LINK_PREFIX: &str = "link:";

fn protocol_re() -> &'static Regex {
    static PROTOCOL_RE: OnceLock<Regex> = OnceLock::new();
    PROTOCOL_RE.get_or_init(|| Regex::new(r"^\w+:").expect("valid protocol regex"))
}

fn snapshot_id_re() -> &'static Regex {
    static SNAPSHOT_ID_RE: OnceLock<Regex> = OnceLock::new();
    SNAPSHOT_ID_RE.get_or_init(|| {
        Regex::new(r"^(?P<name>(?:@[^/@]+/)?[^@/()]+)@(?P<version>[^()]+)(?P<peers>\(.*\))?$")
            .expect("valid snapshot id regex")
    })
}

/// Resolve the dependency `name` at `version`, declared by package `from`, to the
/// id of the package it points at.
///
/// - `link:<path>` resolves to `<path>` joined onto `from` and normalized, which is
///   the id of the linked workspace project.
/// - Any other `scheme:` specifier is rejected with
///   [`Error::UnsupportedSpecifier`].
/// - Everything else resolves to `<name>@<version>` verbatim.
pub fn resolve(from: &str, name: &str, version: &str) -> Result<String> {
    if let Some(target) = version.strip_prefix(LINK_PREFIX) {
        return Ok(normalize_path(&Path::new(from).join(target)));
    }
    if protocol_re().is_match(version) {
        return Err(Error::UnsupportedSpecifier {
            from: from.to_string(),
            name: name.to_string(),
            specifier: version.to_string(),
        });
    }
    Ok(format!("{name}@{version}"))
}

/// Lexically normalize a workspace-relative path, always using `/` separators.
fn normalize_path(path: &Path) -> String {
    path_clean::clean(path).to_string_lossy().replace('\\', "/")
}

/// A parsed snapshot key such as `@scope/pkg@1.0.0(peer@2.0.0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotId<'a> {
    pub name: &'a str,
    pub version: &'a str,
    /// Parenthesized peer-dependency suffix, if any.
    pub peers: Option<&'a str>,
}

impl<'a> SnapshotId<'a> {
    pub fn parse(id: &'a str) -> Result<Self> {
        let caps = snapshot_id_re()
            .captures(id)
            .ok_or_else(|| Error::MalformedSnapshotId(id.to_string()))?;
        match (caps.name("name"), caps.name("version")) {
            (Some(name), Some(version)) => Ok(Self {
                name: name.as_str(),
                version: version.as_str(),
                peers: caps.name("peers").map(|m| m.as_str()),
            }),
            _ => Err(Error::MalformedSnapshotId(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link_to_sibling() {
        assert_eq!(
            resolve("packages/a", "sibling", "link:../sibling").unwrap(),
            "packages/sibling"
        );
    }

    #[test]
    fn test_resolve_link_from_root() {
        assert_eq!(resolve(".", "a", "link:packages/a").unwrap(), "packages/a");
        assert_eq!(resolve("packages/a", "root", "link:../..").unwrap(), ".");
    }

    #[test]
    fn test_resolve_external_passes_through_verbatim() {
        assert_eq!(resolve(".", "foo", "^1.2.3").unwrap(), "foo@^1.2.3");
        assert_eq!(
            resolve("react-dom@18.2.0(react@18.2.0)", "react", "18.2.0").unwrap(),
            "react@18.2.0"
        );
        assert_eq!(
            resolve(".", "@types/node", "20.1.0").unwrap(),
            "@types/node@20.1.0"
        );
    }

    #[test]
    fn test_resolve_keeps_peer_suffix() {
        assert_eq!(
            resolve(".", "react-dom", "18.2.0(react@18.2.0)").unwrap(),
            "react-dom@18.2.0(react@18.2.0)"
        );
    }

    #[test]
    fn test_resolve_rejects_other_protocols() {
        for spec in ["workspace:^", "file:../local", "npm:foo@1.0.0"] {
            match resolve("packages/a", "dep", spec).unwrap_err() {
                Error::UnsupportedSpecifier {
                    from,
                    name,
                    specifier,
                } => {
                    assert_eq!(from, "packages/a");
                    assert_eq!(name, "dep");
                    assert_eq!(specifier, spec);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_resolve_colon_after_non_word_prefix_is_external() {
        assert_eq!(resolve(".", "dep", "git+ssh:x").unwrap(), "dep@git+ssh:x");
    }

    #[test]
    fn test_parse_scoped_with_peers() {
        let id = SnapshotId::parse("@scope/pkg@1.0.0(peer@2.0.0)").unwrap();
        assert_eq!(id.name, "@scope/pkg");
        assert_eq!(id.version, "1.0.0");
        assert_eq!(id.peers, Some("(peer@2.0.0)"));
    }

    #[test]
    fn test_parse_plain() {
        let id = SnapshotId::parse("pkg@1.0.0").unwrap();
        assert_eq!(id.name, "pkg");
        assert_eq!(id.version, "1.0.0");
        assert_eq!(id.peers, None);
    }

    #[test]
    fn test_parse_multiple_peer_groups() {
        let id = SnapshotId::parse("ui@3.0.0(react-dom@18.2.0(react@18.2.0))(react@18.2.0)")
            .unwrap();
        assert_eq!(id.name, "ui");
        assert_eq!(id.version, "3.0.0");
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["pkg", "@scope/pkg", "pkg@", "@1.0.0", ""] {
            assert!(
                matches!(SnapshotId::parse(bad), Err(Error::MalformedSnapshotId(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
