use anyhow::anyhow;
use formatx::formatx;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Destination of the exported tables, one writer per file.
pub trait Output: Debug {
    fn writer_for_file(&self, file_stem: &str, extension: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes files into a directory, naming them with a template taking the file stem and extension.
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

    /// Plain `<stem>.<extension>` file names.
    pub fn in_directory(directory_path: PathBuf) -> Self {
        Self::new(directory_path, "{}.{}".to_string())
    }

    pub(crate) fn file_name(&self, file_stem: &str, extension: &str) -> anyhow::Result<String> {
        formatx!(&self.file_template, file_stem, extension)
            .map_err(|_| anyhow!("invalid output file template '{}'", self.file_template))
    }
}

impl Output for FileOutput {
    fn writer_for_file(&self, file_stem: &str, extension: &str) -> anyhow::Result<impl Write> {
        Ok(BufWriter::new(File::create(
            self.directory_path
                .join(self.file_name(file_stem, extension)?),
        )?))
    }
}

impl Output for &FileOutput {
    fn writer_for_file(&self, file_stem: &str, extension: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_file(self, file_stem, extension)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_file(&self, _file_stem: &str, _extension: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}
