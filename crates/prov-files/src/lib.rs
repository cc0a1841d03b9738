mod archive;
mod error;
mod json;

pub use archive::{SKIPPED_DIR_NAME, zip_dir};
pub use error::FilesError;
pub use json::{dump_json, import_json, minify_json, minified_path};
