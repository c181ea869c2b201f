//! Model loading: raw text acquisition and OBJ parsing.
//!
//! The two failure classes mirror the load pipeline: a [`SourceError`] means
//! the bytes never arrived (missing file, network failure), a [`ParseError`]
//! means they arrived but are not a usable mesh. Either one is terminal for
//! that load attempt; the viewer logs it and keeps its prior state.

pub mod obj;
pub mod source;

pub use obj::{parse_obj, MeshData, ParseError};
pub use source::{ModelSource, SourceError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fetches and parses a model in one step. Used by the synchronous (local
/// asset) load path; the remote path splits the two stages across threads.
pub fn load_model(source: &ModelSource) -> Result<Vec<MeshData>, LoadError> {
    let raw = source.fetch()?;
    Ok(parse_obj(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_is_a_source_error() {
        let source = ModelSource::Asset("/definitely/not/here.obj".into());
        match load_model(&source) {
            Err(LoadError::Source(_)) => {}
            other => panic!("expected source error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_asset_is_a_parse_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("meshview_garbage_test.obj");
        std::fs::write(&path, "this is not an obj file\nat all\n").unwrap();

        let source = ModelSource::Asset(path.clone());
        let result = load_model(&source);
        std::fs::remove_file(&path).ok();

        match result {
            Err(LoadError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
