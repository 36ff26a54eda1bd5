//! `{{path}}` file inclusion.
//!
//! A line that consists of nothing but `{{path}}` is replaced by the
//! contents of `path` before the Markdown is parsed. Relative paths resolve
//! against the directory of the including file, and included files may
//! include further files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ParseError, ParserConfig};

/// An include directive found at the start of some input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include<'s> {
    /// The path between the braces, as written.
    pub path: &'s str,
    /// Bytes taken by the directive, braces included.
    pub consumed: usize,
}

/// Recognizes a `{{path}}` directive at the start of `input`.
///
/// ```rust
/// use marktree_parser::parse_include;
///
/// let include = parse_include("{{foo}} tail").unwrap();
/// assert_eq!(include.path, "foo");
/// assert_eq!(include.consumed, 7);
///
/// assert!(parse_include("{{foo}").is_none());
/// assert!(parse_include("{foo}").is_none());
/// ```
pub fn parse_include(input: &str) -> Option<Include<'_>> {
    let rest = input.strip_prefix("{{")?;
    let end = rest.find("}}")?;
    let path = &rest[..end];
    if path.is_empty() || path.contains(['\n', '{']) {
        return None;
    }
    Some(Include {
        path,
        consumed: end + 4,
    })
}

/// Returns the working directory for files included from `path`, where
/// `path` was itself included from `wd`.
pub fn update_wd(wd: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    if path.is_absolute() {
        dir.to_path_buf()
    } else if dir.as_os_str().is_empty() {
        wd.to_path_buf()
    } else {
        wd.join(dir)
    }
}

/// Replaces include lines in `source` with the (recursively expanded)
/// contents of the named files.
///
/// Include lines inside fenced code blocks are left alone.
///
/// # Errors
///
/// - [`ParseError::Io`] when an included file cannot be read
/// - [`ParseError::IncludeDepth`] when includes nest deeper than
///   `config.max_include_depth`
/// - [`ParseError::IncludeCycle`] when a file ends up including itself
pub fn expand_includes(
    source: &str,
    wd: &Path,
    config: &ParserConfig,
) -> Result<String, ParseError> {
    let mut stack = Vec::new();
    expand(source, wd, config, &mut stack)
}

fn expand(
    source: &str,
    wd: &Path,
    config: &ParserConfig,
    stack: &mut Vec<PathBuf>,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(source.len());
    let mut fence: Option<(u8, usize)> = None;

    for line in source.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let trimmed = body.trim_start_matches(' ');

        if let Some((open_char, open_len)) = fence {
            let closes = fence_run(body).is_some_and(|(c, len, rest)| {
                c == open_char && len >= open_len && rest.trim().is_empty()
            });
            if closes {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if let Some((c, len, _)) = fence_run(body) {
            fence = Some((c, len));
            out.push_str(line);
            continue;
        }

        let include = match parse_include(trimmed) {
            Some(include) if trimmed[include.consumed..].trim().is_empty() => include,
            _ => {
                out.push_str(line);
                continue;
            }
        };

        let target = wd.join(include.path);
        if stack.len() >= config.max_include_depth {
            return Err(ParseError::IncludeDepth {
                path: target,
                limit: config.max_include_depth,
            });
        }
        let canonical = fs::canonicalize(&target).map_err(|e| ParseError::io(&target, e))?;
        if stack.contains(&canonical) {
            return Err(ParseError::IncludeCycle { path: target });
        }
        let contents = fs::read_to_string(&canonical).map_err(|e| ParseError::io(&target, e))?;
        debug!(path = %target.display(), depth = stack.len() + 1, "expanding include");

        stack.push(canonical);
        let expanded = expand(&contents, &update_wd(wd, include.path), config, stack)?;
        stack.pop();

        out.push_str(&expanded);
        if line.ends_with('\n') && !expanded.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok(out)
}

/// Reads a code fence at the start of `line`: up to three spaces, then
/// three or more backticks or tildes. Returns the fence character, the run
/// length and what follows the run.
fn fence_run(line: &str) -> Option<(u8, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let c = *trimmed.as_bytes().first().filter(|c| matches!(c, b'`' | b'~'))?;
    let len = trimmed.bytes().take_while(|&b| b == c).count();
    (len >= 3).then(|| (c, len, &trimmed[len..]))
}
