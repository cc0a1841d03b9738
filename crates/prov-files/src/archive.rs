use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Component, Path},
};

use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::FilesError;

/// Sub-directories with this name are left out of archives.
pub const SKIPPED_DIR_NAME: &str = "small";

/// Archive every file below `src_dir` into a DEFLATE zip at `dest`.
///
/// Entry names are relative to the parent of `src_dir`, so they start with
/// the directory's own name. Directories named [`SKIPPED_DIR_NAME`] are
/// pruned at any depth below the root. Returns the number of files written.
pub fn zip_dir(src_dir: &Path, dest: &Path) -> Result<usize, FilesError> {
    let base = src_dir.parent().unwrap_or_else(|| Path::new(""));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(BufWriter::new(File::create(dest)?));
    let mut files = 0;

    let walker = WalkDir::new(src_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir() && entry.file_name() == SKIPPED_DIR_NAME)
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
        let name = entry_name(relative);
        writer.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(entry.path())?, &mut writer)?;
        files += 1;

        tracing::trace!(entry = %name, "Added file to archive");
    }

    writer.finish()?;

    tracing::info!(
        src = %src_dir.display(),
        dest = %dest.display(),
        files = files,
        "Created zip archive"
    );
    Ok(files)
}

/// Zip entry name with `/` separators and no `.`/`..`/root components.
fn entry_name(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{fs, io::Read};

    use tempfile::TempDir;
    use zip::ZipArchive;

    use super::*;

    fn entries(archive_path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn skips_small_directories_and_prefixes_root_name() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output");
        fs::create_dir_all(output.join("br").join("small")).unwrap();
        fs::create_dir_all(output.join("small")).unwrap();
        fs::write(output.join("index.json"), "{}").unwrap();
        fs::write(output.join("br").join("1.json"), "[]").unwrap();
        fs::write(output.join("br").join("small").join("1.json"), "[]").unwrap();
        fs::write(output.join("small").join("x.json"), "[]").unwrap();
        let dest = temp_dir.path().join("output.zip");

        let files = zip_dir(&output, &dest).unwrap();

        assert_eq!(files, 2);
        assert_eq!(
            entries(&dest),
            vec!["output/br/1.json".to_string(), "output/index.json".to_string()]
        );
    }

    #[test]
    fn root_named_small_is_archived() {
        let temp_dir = TempDir::new().unwrap();
        let small = temp_dir.path().join("small");
        fs::create_dir_all(&small).unwrap();
        fs::write(small.join("a.txt"), "a").unwrap();
        let dest = temp_dir.path().join("small.zip");

        zip_dir(&small, &dest).unwrap();

        assert_eq!(entries(&dest), vec!["small/a.txt".to_string()]);
    }

    #[test]
    fn entries_are_deflated_and_intact() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        let contents = "provenance ".repeat(200);
        fs::write(data.join("prov.txt"), &contents).unwrap();
        let dest = temp_dir.path().join("data.zip");

        zip_dir(&data, &dest).unwrap();

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut entry = archive.by_name("data/prov.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut read_back = String::new();
        entry.read_to_string(&mut read_back).unwrap();
        assert_eq!(read_back, contents);
    }

    #[test]
    fn missing_source_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let error = zip_dir(
            &temp_dir.path().join("absent"),
            &temp_dir.path().join("out.zip"),
        )
        .unwrap_err();
        assert!(matches!(error, FilesError::WalkDir(_)));
    }

    #[test]
    fn entry_names_drop_dot_components() {
        assert_eq!(entry_name(Path::new("./out/a/b.json")), "out/a/b.json");
    }
}
