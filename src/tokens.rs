//! Token substitution for menu record fields.
//!
//! Tokens start with a `@` followed by the token name, example: `@CWD`.
//! The two-character sequence `@@` escapes a literal `@` and never starts a
//! token. Unknown tokens are left untouched so substitution is partial and
//! non-failing.

/// Stand-in for `@@` while tokens are substituted. Contains NUL bytes so it
/// cannot occur in record content read from JSON text.
const ESCAPE_SENTINEL: &str = "\u{0}ESC\u{0}";

/// Replace every `@NAME` token in `source` with its value.
///
/// Token names are normalized to upper case before lookup, so callers may
/// supply lower-case keys. Values are inserted verbatim. The result must not
/// depend on the order of the `tokens` pairs; overlapping token names are not
/// supported.
pub fn resolve_tokens(source: &str, tokens: &[(&str, &str)]) -> String {
    let mut resolved = source.replace("@@", ESCAPE_SENTINEL);

    for (name, value) in tokens {
        let pattern = format!("@{}", name.to_uppercase());
        resolved = resolved.replace(&pattern, value);
    }

    resolved.replace(ESCAPE_SENTINEL, "@")
}

/// The tokens recognized inside a menu record, bound to one record file.
///
/// Values are prepared by the loader with backslashes doubled, so substituted
/// Windows paths survive the registry text format unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResolver {
    /// Parent directory of the record file.
    pub cwd: String,
    /// Top-level directory of the menu hierarchy.
    pub root: String,
}

impl TokenResolver {
    pub fn new(cwd: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            cwd: cwd.into(),
            root: root.into(),
        }
    }

    /// Replace all recognized tokens in the given string.
    pub fn resolve(&self, source: &str) -> String {
        resolve_tokens(
            source,
            &[("CWD", self.cwd.as_str()), ("ROOT", self.root.as_str())],
        )
    }
}
