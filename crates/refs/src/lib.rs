//! Struct field type renaming for generated Go sources
//!
//! Code generators emit `Reference` for fields that should use the richer
//! `ReferenceObject` type. Only lines inside `type X struct { ... }` blocks
//! are rewritten; type declarations, comments and everything outside structs
//! stay as generated.

use anyhow::{anyhow, Context, Result};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Type name replaced by default
pub const DEFAULT_FROM: &str = "Reference";

/// Replacement type name used by default
pub const DEFAULT_TO: &str = "ReferenceObject";

static STRUCT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type\s+\w+\s+struct\b").unwrap());

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

/// Replace whole-word `from` with `to` on field lines of struct blocks
pub fn replace_reference_fields(source: &str, from: &str, to: &str) -> Result<String> {
    if !IDENTIFIER.is_match(from) {
        return Err(anyhow!("'{}' is not a valid type name", from));
    }
    let word = Regex::new(&format!(r"\b{}\b", regex::escape(from)))?;

    let mut within_struct = false;
    let mut brace_depth: i64 = 0;
    let mut lines: Vec<Cow<'_, str>> = Vec::new();

    for line in source.lines() {
        let stripped = line.trim();

        if !within_struct {
            if STRUCT_HEADER.is_match(stripped) {
                brace_depth = brace_delta(stripped);
                within_struct = brace_depth > 0;
            }
            lines.push(Cow::Borrowed(line));
            continue;
        }

        brace_depth += brace_delta(stripped);

        if is_field_line(stripped) {
            lines.push(word.replace_all(line, NoExpand(to)));
        } else {
            lines.push(Cow::Borrowed(line));
        }

        if brace_depth <= 0 {
            within_struct = false;
        }
    }

    let mut rewritten = lines.join("\n");
    rewritten.push('\n');
    Ok(rewritten)
}

/// Rewrite the file at `path` in place. Returns true if its content changed.
pub fn rewrite_file(path: &Path, from: &str, to: &str) -> Result<bool> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rewritten = replace_reference_fields(&source, from, to)?;

    if rewritten == source {
        debug!("No struct fields to rewrite in {}", path.display());
        return Ok(false);
    }

    std::fs::write(path, rewritten)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Rewrote {} -> {} in {}", from, to, path.display());
    Ok(true)
}

fn brace_delta(line: &str) -> i64 {
    line.matches('{').count() as i64 - line.matches('}').count() as i64
}

fn is_field_line(stripped: &str) -> bool {
    !(stripped.starts_with("//") || stripped.is_empty() || stripped == "union" || stripped == "}")
}
