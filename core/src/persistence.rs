//! Whole-file JSON reads and writes for scene files.
//!
//! Scene files are UTF-8 JSON written in compact form (no whitespace between tokens,
//! non-ASCII text written as-is), which is how the host application writes them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, instrument};

use crate::scene::{LoadError, SaveError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Deepest array/object nesting accepted in a scene file. Every hierarchy group costs two
/// levels (the node object and its `children` array), so this allows trees a little over
/// 250 groups deep.
pub const MAX_NESTING: usize = 512;

/// Reads and parses the JSON file at `path`.
///
/// A leading UTF-8 byte-order mark is skipped. Files nested deeper than [`MAX_NESTING`]
/// are rejected before parsing.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn read_json(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read(path)
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::FileNotFound(path.to_path_buf())
            } else {
                LoadError::Io { path: path.to_path_buf(), source: e }
            }
        })?;
    debug!("Read {} bytes", content.len());

    let content = match content.strip_prefix(UTF8_BOM) {
        Some(rest) => {
            debug!("Skipping UTF-8 byte-order mark");
            rest
        }
        None => &content[..],
    };

    if exceeds_nesting(content, MAX_NESTING) {
        return Err(LoadError::TooDeep { path: path.to_path_buf(), limit: MAX_NESTING });
    }

    // serde_json's own limit of 128 is far below MAX_NESTING; the stacker grows the stack
    // as the parser descends instead.
    let mut deserializer = serde_json::Deserializer::from_slice(content);
    deserializer.disable_recursion_limit();
    let parsed = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .and_then(|value| deserializer.end().map(|()| value));
    parsed.map_err(|e| LoadError::Json { path: path.to_path_buf(), source: e })
}

/// Returns true if arrays and objects in `content` nest more than `limit` levels deep.
/// Brackets inside strings are not counted. Malformed input is left to the parser.
fn exceeds_nesting(content: &[u8], limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in content {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

/// Serializes `value` compactly and replaces the file at `path` with it.
#[instrument(skip(path, value), fields(path = %path.display()))]
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SaveError> {
    let content = to_compact_json(value)?;
    fs::write(path, &content)
        .await
        .map_err(|e| SaveError::Io { path: path.to_path_buf(), source: e })?;
    debug!("Wrote {} bytes", content.len());
    Ok(())
}

/// Encodes `value` the way scene files are stored on disk.
pub fn to_compact_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, SaveError> {
    Ok(serde_json::to_vec(value)?)
}
