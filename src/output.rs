use crate::errors::ChpDefaultsError;
use anyhow::{anyhow, Context};
use formatx::formatx;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes each document to its own file in a directory, named by filling the location key into
/// the file template.
#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }

    /// A JSON file output into the given directory, e.g. `chp_default_data.json`.
    pub fn json(directory_path: PathBuf) -> Self {
        Self::new(directory_path, "{}.json".to_string())
    }

    pub fn path_for_location_key(&self, location_key: &str) -> anyhow::Result<PathBuf> {
        let file_name = formatx!(&self.file_template, location_key).map_err(|error| {
            anyhow!(
                "Could not fill file template {:?}: {error:?}",
                self.file_template
            )
        })?;
        Ok(self.directory_path.join(file_name))
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        let path = self.path_for_location_key(location_key)?;
        info!("writing out to {}", path.display());
        let file = File::create(&path).map_err(|source| ChpDefaultsError::WriteFailure {
            path: path.clone(),
            source,
        })?;

        Ok(PathAnnotatedWriter {
            path,
            inner: BufWriter::new(file),
        })
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Adds the destination path to any I/O error raised while writing.
struct PathAnnotatedWriter<W: Write> {
    path: PathBuf,
    inner: W,
}

impl<W: Write> PathAnnotatedWriter<W> {
    fn annotate(&self, error: io::Error) -> io::Error {
        io::Error::new(
            error.kind(),
            format!("could not write to {}: {error}", self.path.display()),
        )
    }
}

impl<W: Write> Write for PathAnnotatedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).map_err(|error| self.annotate(error))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().map_err(|error| self.annotate(error))
    }
}

/// Serializes a document as JSON to the output location for the given key.
pub fn write_document(
    output: &impl Output,
    location_key: &str,
    document: &impl Serialize,
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    let mut writer = output.writer_for_location_key(location_key)?;
    serde_json::to_writer(&mut writer, document)
        .with_context(|| format!("Could not serialize the {location_key} document"))?;
    writer
        .flush()
        .with_context(|| format!("Could not write the {location_key} document"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;

    #[fixture]
    fn output_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chp_defaults_output_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[rstest]
    fn test_path_for_location_key() {
        let output = FileOutput::json(PathBuf::from("defaults"));
        assert_eq!(
            output.path_for_location_key("chp_default_data").unwrap(),
            PathBuf::from("defaults").join("chp_default_data.json")
        );
    }

    #[rstest]
    fn test_write_document_to_file(output_dir: PathBuf) {
        let output = FileOutput::json(output_dir.clone());
        let document =
            IndexMap::from([("fuel_cell", IndexMap::from([("max_kw", vec![5000.; 2])]))]);

        write_document(&output, "output_test", &document).unwrap();

        let written = fs::read_to_string(output_dir.join("output_test.json")).unwrap();
        assert_eq!(written, r#"{"fuel_cell":{"max_kw":[5000.0,5000.0]}}"#);
    }

    #[rstest]
    fn test_write_failure_names_path() {
        let output = FileOutput::json(PathBuf::from("no/such/directory"));

        let error = write_document(&output, "chp_default_data", &vec![1.0]).unwrap_err();

        assert!(error.to_string().contains("chp_default_data.json"));
        assert!(matches!(
            error.downcast_ref::<ChpDefaultsError>(),
            Some(ChpDefaultsError::WriteFailure { .. })
        ));
    }

    #[rstest]
    fn test_sink_output_is_noop() {
        assert!(SinkOutput.is_noop());
        assert!(write_document(&SinkOutput, "chp_default_data", &vec![f64::NAN]).is_ok());
    }
}
