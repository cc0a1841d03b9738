use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::error::FilesError;

/// Read a UTF-8 JSON document.
pub fn import_json(path: &Path) -> Result<Value, FilesError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// `<dir>/<stem>_minify.json` for `<dir>/<stem>.<ext>`.
pub fn minified_path(path: &Path) -> Result<PathBuf, FilesError> {
    let stem = path
        .file_stem()
        .ok_or_else(|| FilesError::InvalidPath(path.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push("_minify.json");
    Ok(path.with_file_name(name))
}

/// Rewrite the JSON document at `path` without whitespace into a sibling
/// `_minify.json` file. Key order is kept. Returns the new path.
pub fn minify_json(path: &Path) -> Result<PathBuf, FilesError> {
    tracing::info!(path = %path.display(), "Minifying JSON file");

    let value = import_json(path)?;
    let target = minified_path(path)?;
    fs::write(&target, serde_json::to_vec(&value)?)?;
    Ok(target)
}

/// Write `value` to `path` indented by four spaces, object keys sorted at
/// every level.
pub fn dump_json(value: &Value, path: &Path) -> Result<(), FilesError> {
    tracing::info!(path = %path.display(), "Writing JSON file");

    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    sorted(value).serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.clone(), sorted(value)))
                .collect();
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
