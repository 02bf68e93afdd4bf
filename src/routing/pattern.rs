//! Path template compilation.
//!
//! A template is a `/`-separated path where every segment is either a literal or a
//! single `{name}` placeholder. Compiling it produces an anchored regular expression in
//! which each placeholder becomes a non-greedy named capture:
//!
//! ```text
//! /path/{foo}/{bar}   →   ^/path/(?P<foo>.+?)/(?P<bar>.+?)$
//! ```
//!
//! Templates are validated when they are compiled, so a malformed route is reported
//! at registration rather than on the first request that reaches it.

use {
    crate::{Error, Result},
    percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode},
    regex::Regex,
    std::{fmt, fmt::Write, sync::LazyLock},
};

/// Placeholder names must be usable as regex capture group names.
static PLACEHOLDER_NAME_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Characters that arrive percent-encoded in a request path.
const PATH_LITERAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// How literal segments are written into the compiled expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiteralMode {
    /// Literal segments are escaped and only ever match themselves, as they appear on
    /// the wire: `/café` matches `/caf%C3%A9`.
    #[default]
    Escaped,
    /// Literal segments are copied into the expression untouched, so regex
    /// metacharacters keep their meaning (`/v1.0` also matches `/v1x0`).
    ///
    /// A verbatim literal must be printable ASCII, balance its groups and may only use
    /// `|` inside a group, so it never reaches outside its own segment.
    Verbatim,
}

/// A compiled path template.
///
/// The `Display` implementation prints the compiled expression, which is also
/// available through [`Pattern::as_str`].
#[derive(Clone)]
pub struct Pattern {
    template: String,
    regex: Regex,
    names: Vec<String>,
}

impl Pattern {
    /// Compiles `template` with escaped literal segments.
    ///
    /// ```rust
    /// use pattern_router::Pattern;
    ///
    /// let pattern = Pattern::compile("/path/{foo}/{bar}").unwrap();
    /// assert_eq!(pattern.as_str(), "^/path/(?P<foo>.+?)/(?P<bar>.+?)$");
    /// ```
    pub fn compile(template: &str) -> Result<Self> {
        Self::compile_with(template, LiteralMode::default())
    }

    /// Compiles `template`, writing literal segments according to `literals`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern) error if:
    /// - the template does not start with `/`
    /// - a segment has unbalanced or nested braces
    /// - a placeholder does not occupy a whole segment (`/file.{ext}`)
    /// - a placeholder name is empty, not an identifier, or used twice
    /// - in [`LiteralMode::Verbatim`], a literal is not printable ASCII, has a top-level
    ///   `|`, unbalanced groups, or is otherwise not a valid regex fragment
    pub fn compile_with(template: &str, literals: LiteralMode) -> Result<Self> {
        if !template.starts_with('/') {
            return Err(Error::invalid_pattern(format!(
                "path template \"{template}\" must start with '/'"
            )));
        }

        let mut source = String::with_capacity(template.len() + 16);
        let mut names: Vec<String> = Vec::new();
        source.push('^');

        for (i, segment) in template.split('/').enumerate() {
            if i > 0 {
                source.push('/');
            }
            match placeholder_name(template, segment)? {
                Some(name) => {
                    if names.iter().any(|n| n == name) {
                        return Err(Error::invalid_pattern(format!(
                            "placeholder {{{name}}} appears more than once in \"{template}\""
                        )));
                    }
                    // Writing into a String cannot fail.
                    let _ = write!(source, "(?P<{name}>.+?)");
                    names.push(name.to_string());
                }
                None => match literals {
                    LiteralMode::Escaped => push_escaped_literal(&mut source, segment),
                    LiteralMode::Verbatim => {
                        check_verbatim_literal(template, segment)?;
                        source.push_str(segment);
                    }
                },
            }
        }
        source.push('$');

        let regex = Regex::new(&source)?;

        Ok(Self {
            template: template.to_string(),
            regex,
            names,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The compiled, anchored expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholder names in the order they appear in the template.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns true if `path` matches the whole pattern.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and returns the `(name, value)` pair of every placeholder,
    /// or `None` if the path does not match.
    ///
    /// Values are returned exactly as they appear in `path`; no decoding happens here.
    ///
    /// ```rust
    /// use pattern_router::Pattern;
    ///
    /// let pattern = Pattern::compile("/book/{isbn}").unwrap();
    /// let captures = pattern.captures("/book/978-0316371247").unwrap();
    /// assert_eq!(captures, vec![("isbn", "978-0316371247")]);
    /// assert!(pattern.captures("/book/").is_none());
    /// ```
    pub fn captures<'a>(&'a self, path: &'a str) -> Option<Vec<(&'a str, &'a str)>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .filter_map(|name| caps.name(name).map(|m| (name.as_str(), m.as_str())))
                .collect(),
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Writes `segment` the way it appears in a request path. Characters a client has to
/// percent-encode are encoded first, and the hex digits of every escape match in either
/// case.
fn push_escaped_literal(source: &mut String, segment: &str) {
    let encoded = utf8_percent_encode(segment, PATH_LITERAL).to_string();
    let mut rest = encoded.as_str();

    while let Some(pos) = rest.find('%') {
        source.push_str(&regex::escape(&rest[..pos]));
        source.push('%');

        let hex = rest[pos + 1..]
            .get(..2)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()));
        match hex {
            Some(hex) => {
                for digit in hex.chars() {
                    if digit.is_ascii_digit() {
                        source.push(digit);
                    } else {
                        let _ = write!(
                            source,
                            "[{}{}]",
                            digit.to_ascii_uppercase(),
                            digit.to_ascii_lowercase()
                        );
                    }
                }
                rest = &rest[pos + 3..];
            }
            None => rest = &rest[pos + 1..],
        }
    }
    source.push_str(&regex::escape(rest));
}

/// Verbatim literals may use regex syntax, but only within their own segment.
fn check_verbatim_literal(template: &str, segment: &str) -> Result<()> {
    if let Some(c) = segment.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(Error::invalid_pattern(format!(
            "literal segment \"{segment}\" of \"{template}\" contains {c:?}; verbatim literals must be printable ASCII"
        )));
    }

    let mut depth = 0usize;
    let mut in_class = false;
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return Err(Error::invalid_pattern(format!(
                        "literal segment \"{segment}\" of \"{template}\" ends with an escape"
                    )));
                }
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::invalid_pattern(format!(
                        "unbalanced ')' in literal segment \"{segment}\" of \"{template}\""
                    ))
                })?;
            }
            '|' if !in_class && depth == 0 => {
                return Err(Error::invalid_pattern(format!(
                    "literal segment \"{segment}\" of \"{template}\" has a top-level '|'; wrap the alternatives in a group such as (?:a|b)"
                )));
            }
            _ => {}
        }
    }

    if depth != 0 || in_class {
        return Err(Error::invalid_pattern(format!(
            "unclosed group in literal segment \"{segment}\" of \"{template}\""
        )));
    }
    Ok(())
}

/// Returns the placeholder name if `segment` is a `{name}` placeholder, `None` if it is
/// a plain literal, and an error for anything else containing braces.
fn placeholder_name<'s>(template: &str, segment: &'s str) -> Result<Option<&'s str>> {
    let opens = segment.matches('{').count();
    let closes = segment.matches('}').count();

    if opens == 0 && closes == 0 {
        return Ok(None);
    }
    if opens != closes {
        return Err(Error::invalid_pattern(format!(
            "unbalanced braces in segment \"{segment}\" of \"{template}\""
        )));
    }
    if opens > 1 {
        return Err(Error::invalid_pattern(format!(
            "segment \"{segment}\" of \"{template}\" holds more than one placeholder"
        )));
    }

    let name = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| {
            Error::invalid_pattern(format!(
                "placeholder in \"{template}\" must occupy a whole segment, found \"{segment}\""
            ))
        })?;

    if name.is_empty() {
        return Err(Error::invalid_pattern(format!(
            "empty placeholder name in \"{template}\""
        )));
    }
    if !PLACEHOLDER_NAME_REGEXP.is_match(name) {
        return Err(Error::invalid_pattern(format!(
            "invalid placeholder name \"{name}\" in \"{template}\""
        )));
    }
    Ok(Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_compile_two_placeholders() {
        let pattern = Pattern::compile("/path/{foo}/{bar}").unwrap();
        assert_eq!(pattern.as_str(), "^/path/(?P<foo>.+?)/(?P<bar>.+?)$");
        assert_eq!(pattern.to_string(), "^/path/(?P<foo>.+?)/(?P<bar>.+?)$");
        assert_eq!(pattern.names().collect::<Vec<_>>(), vec!["foo", "bar"]);
        assert_eq!(pattern.template(), "/path/{foo}/{bar}");
    }

    #[test]
    fn test_compile_root() {
        let pattern = Pattern::compile("/").unwrap();
        assert_eq!(pattern.as_str(), "^/$");
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/x"));
        assert!(pattern.captures("/").unwrap().is_empty());
    }

    #[test]
    fn test_literals_are_escaped_by_default() {
        let pattern = Pattern::compile("/v1.0/{id}").unwrap();
        assert_eq!(pattern.as_str(), r"^/v1\.0/(?P<id>.+?)$");
        assert!(pattern.is_match("/v1.0/7"));
        assert!(!pattern.is_match("/v1x0/7"));
    }

    #[test]
    fn test_verbatim_literals_keep_metacharacters() {
        let pattern = Pattern::compile_with("/v1.0/{id}", LiteralMode::Verbatim).unwrap();
        assert_eq!(pattern.as_str(), "^/v1.0/(?P<id>.+?)$");
        assert!(pattern.is_match("/v1.0/7"));
        assert!(pattern.is_match("/v1x0/7"));
    }

    #[test]
    fn test_verbatim_literal_that_is_not_a_regex_fails() {
        for template in ["/a(b/{id}", "/[z-a]/{id}", "/*a/{id}"] {
            let err = Pattern::compile_with(template, LiteralMode::Verbatim).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPattern, "{template}");
            assert_eq!(err.error_code(), "INVALID_PATTERN");
            assert!(Pattern::compile(template).is_ok(), "{template}");
        }
    }

    #[test]
    fn test_verbatim_alternation_is_rejected() {
        for template in ["/a|b/{x}", "/a/b|/{x}", "/(a)|b/{x}"] {
            let err = Pattern::compile_with(template, LiteralMode::Verbatim).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPattern, "{template}");
            assert!(err.to_string().contains("top-level '|'"), "{template}: {err}");
        }

        let grouped = Pattern::compile_with("/(?:a|b)/{x}", LiteralMode::Verbatim).unwrap();
        assert!(grouped.is_match("/a/1"));
        assert!(grouped.is_match("/b/1"));
        assert!(!grouped.is_match("/admin/secret/anything"));

        let in_class = Pattern::compile_with("/[a|b]/{x}", LiteralMode::Verbatim).unwrap();
        assert!(in_class.is_match("/|/1"));
        assert!(!in_class.is_match("/ab/1"));
    }

    #[test]
    fn test_verbatim_groups_must_stay_in_their_segment() {
        for template in [
            "/a)b/{x}",
            "/(a/b)/{x}",
            r"/a\/{x}",
            "/hello world/{x}",
            "/café/{x}",
        ] {
            let err = Pattern::compile_with(template, LiteralMode::Verbatim).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPattern, "{template}");
        }
    }

    #[test]
    fn test_escaped_literals_match_their_encoded_form() {
        let pattern = Pattern::compile("/café/{x}").unwrap();
        assert_eq!(pattern.as_str(), "^/caf%[Cc]3%[Aa]9/(?P<x>.+?)$");
        assert!(pattern.is_match("/caf%C3%A9/1"));
        assert!(pattern.is_match("/caf%c3%a9/1"));
        assert!(!pattern.is_match("/cafe/1"));

        let pattern = Pattern::compile("/hello world/{x}").unwrap();
        assert_eq!(pattern.as_str(), "^/hello%20world/(?P<x>.+?)$");
        assert!(pattern.is_match("/hello%20world/1"));

        let pattern = Pattern::compile("/already%2fencoded/{x}").unwrap();
        assert!(pattern.is_match("/already%2Fencoded/1"));
    }

    #[test]
    fn test_match_is_anchored() {
        let pattern = Pattern::compile("/book/{isbn}").unwrap();
        assert!(pattern.is_match("/book/1"));
        assert!(!pattern.is_match("/api/book/1"));
        assert!(!pattern.is_match("/book/"));
        assert!(!pattern.is_match("book/1"));
    }

    #[test]
    fn test_last_placeholder_extends_to_end_of_path() {
        let pattern = Pattern::compile("/path/{foo}/{bar}").unwrap();
        let captures = pattern.captures("/path/a/b/c").unwrap();
        assert_eq!(captures, vec![("foo", "a"), ("bar", "b/c")]);
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        for template in ["/path/{foo", "/path/foo}", "/{a}}", "/{{a}"] {
            let err = Pattern::compile(template).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPattern, "{template}");
            assert!(err.to_string().contains("unbalanced"), "{template}: {err}");
        }
    }

    #[test]
    fn test_partial_segment_placeholder_fails() {
        let err = Pattern::compile("/files/report.{ext}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
        assert!(err.to_string().contains("whole segment"));
    }

    #[test]
    fn test_two_placeholders_in_one_segment_fail() {
        let err = Pattern::compile("/{a}{b}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_bad_placeholder_names_fail() {
        for template in ["/{}", "/{1abc}", "/{a-b}", "/{a b}"] {
            let err = Pattern::compile(template).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPattern, "{template}");
        }
    }

    #[test]
    fn test_duplicate_placeholder_fails() {
        let err = Pattern::compile("/{id}/child/{id}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_template_must_be_absolute() {
        let err = Pattern::compile("path/{id}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
        assert!(Pattern::compile("").is_err());
    }

    proptest! {
        /// The compiled text is the template with every placeholder replaced in place.
        #[test]
        fn compiled_text_replaces_placeholders_in_place(
            segments in prop::collection::vec(
                prop_oneof![
                    "[a-z0-9_]{1,8}".prop_map(|s| (s, false)),
                    "[a-z][a-z0-9_]{0,6}".prop_map(|s| (s, true)),
                ],
                0..6,
            )
        ) {
            let mut template = String::new();
            let mut expected = String::from("^");
            let mut seen = std::collections::HashSet::new();
            for (i, (text, is_placeholder)) in segments.iter().enumerate() {
                template.push('/');
                expected.push('/');
                if *is_placeholder && seen.insert(text.clone()) {
                    template.push_str(&format!("{{{text}}}"));
                    expected.push_str(&format!("(?P<{text}>.+?)"));
                } else {
                    let literal = format!("s{i}{text}");
                    template.push_str(&literal);
                    expected.push_str(&literal);
                }
            }
            if template.is_empty() {
                template.push('/');
                expected.push('/');
            }
            expected.push('$');

            let pattern = Pattern::compile(&template).unwrap();
            prop_assert_eq!(pattern.as_str(), expected.as_str());
        }

        /// A single placeholder captures any non-empty, newline-free value.
        #[test]
        fn single_placeholder_captures_value(value in "[^\n]{1,40}") {
            let pattern = Pattern::compile("/item/{value}").unwrap();
            let path = format!("/item/{value}");
            let captures = pattern.captures(&path).unwrap();
            prop_assert_eq!(captures, vec![("value", value.as_str())]);
        }

        /// Compilation never panics, whatever the input.
        #[test]
        fn compile_never_panics(template in ".*") {
            let _ = Pattern::compile(&template);
            let _ = Pattern::compile_with(&template, LiteralMode::Verbatim);
        }
    }
}
