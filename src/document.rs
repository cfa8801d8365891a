//! Read-modify-write plumbing for configurator JSON documents.
//!
//! Documents are kept as `serde_json::Value` with insertion-ordered maps so
//! entries the patchers do not own are written back exactly as they were
//! read. Writes are staged in a temporary file next to the target and then
//! persisted over it; a failed run leaves the target untouched.

use crate::schema::{DocumentKind, validate_document};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Knobs shared by both patchers.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatchOptions {
    /// Render the patched document without writing it back.
    pub dry_run: bool,
}

/// Outcome of patching one file.
#[derive(Debug)]
pub struct Patched<R> {
    pub report: R,
    /// The exact bytes written (or that would have been written).
    pub rendered: String,
    pub written: bool,
}

/// Load, validate, transform and (unless dry-run) rewrite one document.
pub fn patch_file<R>(
    path: &Path,
    kind: DocumentKind,
    indent: usize,
    options: &PatchOptions,
    transform: impl FnOnce(&mut Value) -> Result<R>,
) -> Result<Patched<R>> {
    let mut doc = load_document(path)?;
    validate_document(kind, &doc).with_context(|| format!("validating {}", path.display()))?;
    let report = transform(&mut doc).with_context(|| format!("patching {}", path.display()))?;
    let rendered = render_document(&doc, indent)?;

    if options.dry_run {
        debug!(path = %path.display(), "dry run, leaving file untouched");
        return Ok(Patched {
            report,
            rendered,
            written: false,
        });
    }

    write_rendered(path, &rendered)?;
    info!(path = %path.display(), bytes = rendered.len(), "wrote {}", kind.label());
    Ok(Patched {
        report,
        rendered,
        written: true,
    })
}

/// Read and parse a JSON document from disk.
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.is_file() {
        bail!("document not found: {}", path.display());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(doc)
}

/// Detach the top-level array stored under `key`.
///
/// The key keeps its position in the root object; `put_array` fills it again.
pub fn take_array(doc: &mut Value, key: &str) -> Result<Vec<Value>> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| anyhow!("document root must be a JSON object"))?;
    match root.get_mut(key) {
        Some(Value::Array(items)) => Ok(std::mem::take(items)),
        Some(other) => bail!("'{key}' must be an array, found {}", type_label(other)),
        None => bail!("document has no '{key}' array"),
    }
}

/// Store `items` under `key`, keeping the key's original position.
pub fn put_array(doc: &mut Value, key: &str, items: Vec<Value>) -> Result<()> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| anyhow!("document root must be a JSON object"))?;
    root.insert(key.to_string(), Value::Array(items));
    Ok(())
}

/// Borrow a required string field from an array entry.
pub fn string_field<'a>(record: &'a Value, key: &str) -> Result<&'a str> {
    match record.get(key) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => bail!("'{key}' must be a string, found {}", type_label(other)),
        None => bail!("entry is missing '{key}'"),
    }
}

/// Pretty-print with `indent` spaces per level and no trailing newline.
///
/// Non-ASCII characters are written as `\uXXXX` escapes, the form the
/// configurator files have always been stored in.
pub fn render_document(doc: &Value, indent: usize) -> Result<String> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    {
        let formatter = AsciiFormatter {
            pretty: PrettyFormatter::with_indent(&indent),
        };
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut serializer)
            .context("serializing document")?;
    }
    let rendered = String::from_utf8(buf).context("serialized document is not UTF-8")?;
    Ok(rendered)
}

/// Render and persist `doc` over `path`.
pub fn write_document(path: &Path, doc: &Value, indent: usize) -> Result<()> {
    let rendered = render_document(doc, indent)?;
    write_rendered(path, &rendered)
}

/// `PrettyFormatter` layout with every non-ASCII character escaped.
struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut ascii_start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[ascii_start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            ascii_start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[ascii_start..])
    }
}

fn write_rendered(path: &Path, rendered: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("staging write in {}", dir.display()))?;
    staged
        .write_all(rendered.as_bytes())
        .with_context(|| format!("writing staged copy of {}", path.display()))?;
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("flushing staged copy of {}", path.display()))?;

    // Temp files are created owner-only; carry over the target's mode.
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(staged.path(), meta.permissions())
            .with_context(|| format!("copying permissions of {}", path.display()))?;
    }

    staged
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
