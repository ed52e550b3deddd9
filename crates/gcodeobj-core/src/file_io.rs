//! File I/O for embedded meshes
//!
//! Handles the file-level variants of the codec:
//! - appending a tagged OBJ document to a gcode file
//! - extracting the payload of a gcode file into memory
//! - extracting into the derived sibling file (`print.gcode` -> `print.obj`)
//!
//! Every handle is scoped to the call that opens it, and every I/O failure is
//! reported as `FileAccess` with the path it happened on.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::{Extraction, ObjCodec};
use crate::error::{CodecError, Result};

/// Buffer size for reading gcode files (256 KB)
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// How an extracted payload is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Return the OBJ text in memory, source untouched
    #[default]
    Inline,
    /// Write the OBJ text to the derived sibling path
    DerivedFile,
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline => write!(f, "inline"),
            Self::DerivedFile => write!(f, "derived_file"),
        }
    }
}

/// Outcome of writing the payload to the derived path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedObj {
    /// Where the OBJ text was written
    pub path: PathBuf,
    /// Number of tagged lines it was assembled from
    pub tagged_lines: usize,
    /// Bytes written
    pub bytes: u64,
    /// The OBJ text that was written
    pub text: String,
}

fn open_for_read(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| CodecError::file_access(path, e))?;
    Ok(BufReader::with_capacity(READ_BUFFER_SIZE, file))
}

/// Whether two paths name the same existing file
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Replace `path` with `contents` through a sibling temp file
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".gcodeobj-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Whether a non-empty file lacks a trailing newline
fn needs_separator(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl ObjCodec {
    /// Append the OBJ document at `obj_path` to the gcode file at `gcode_path`
    ///
    /// The OBJ file is read in full before the gcode file is opened, and the
    /// tagged text goes out in a single write. The gcode file is created when
    /// missing. When it does not end with a newline one is written first, so
    /// the last gcode line stays intact. Returns the number of tagged lines
    /// appended.
    ///
    /// # Errors
    /// Returns `FileAccess` on the OBJ path if it cannot be read (including
    /// invalid UTF-8), leaving the gcode file untouched, and `FileAccess` on
    /// the gcode path if that cannot be written.
    pub fn embed_file(&self, obj_path: impl AsRef<Path>, gcode_path: impl AsRef<Path>) -> Result<usize> {
        let obj_path = obj_path.as_ref();
        let gcode_path = gcode_path.as_ref();

        let obj = fs::read_to_string(obj_path).map_err(|e| CodecError::file_access(obj_path, e))?;
        let (tagged, written) = self.tag_lines(&obj);

        let mut target = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(gcode_path)
            .map_err(|e| CodecError::file_access(gcode_path, e))?;

        let separator = needs_separator(&mut target).map_err(|e| CodecError::file_access(gcode_path, e))?;
        if separator {
            debug!("{} has no trailing newline, adding one", gcode_path.display());
        }

        let mut out = String::with_capacity(tagged.len() + 1);
        if separator {
            out.push('\n');
        }
        out.push_str(&tagged);
        target
            .write_all(out.as_bytes())
            .and_then(|_| target.flush())
            .map_err(|e| CodecError::file_access(gcode_path, e))?;

        info!(
            "Embedded {} lines from {} into {}",
            written,
            obj_path.display(),
            gcode_path.display()
        );
        Ok(written)
    }

    /// Scan the gcode file at `gcode_path` for tagged lines
    ///
    /// The source file is only read.
    pub fn extract_file(&self, gcode_path: impl AsRef<Path>) -> Result<Extraction> {
        let gcode_path = gcode_path.as_ref();
        let reader = open_for_read(gcode_path)?;
        self.extract(reader).map_err(|e| match e {
            CodecError::Io(source) => CodecError::file_access(gcode_path, source),
            other => other,
        })
    }

    /// Extract the OBJ text of the gcode file at `gcode_path`
    ///
    /// # Errors
    /// Returns `PayloadAbsent` when the file has no tagged line, `FileAccess`
    /// when it cannot be read.
    pub fn extract_obj(&self, gcode_path: impl AsRef<Path>) -> Result<String> {
        self.extract_file(gcode_path)?.into_payload()
    }

    /// Extract the payload into the derived sibling path
    ///
    /// Every call truncates and rewrites the same derived path. Nothing is
    /// written when no tagged line is found.
    pub fn extract_to_derived(&self, gcode_path: impl AsRef<Path>) -> Result<DerivedObj> {
        let gcode_path = gcode_path.as_ref();
        let output = self.marker().derived_path(gcode_path);
        self.extract_to(gcode_path, output)
    }

    /// Extract the payload of `gcode_path` into `output`, replacing its contents
    ///
    /// The text is written to a temporary file next to `output` and renamed
    /// over it, so readers never see a truncated file.
    pub fn extract_to(&self, gcode_path: impl AsRef<Path>, output: impl Into<PathBuf>) -> Result<DerivedObj> {
        let gcode_path = gcode_path.as_ref();
        let output = output.into();

        if is_same_file(&output, gcode_path) {
            return Err(CodecError::DerivedPathConflict { path: output });
        }

        let extraction = self.extract_file(gcode_path)?;
        let tagged_lines = extraction.tagged_lines;
        let text = extraction.into_payload()?;

        write_atomic(&output, text.as_bytes()).map_err(|e| CodecError::file_access(&output, e))?;

        info!(
            "Wrote {} tagged lines from {} to {}",
            tagged_lines,
            gcode_path.display(),
            output.display()
        );

        Ok(DerivedObj {
            path: output,
            tagged_lines,
            bytes: text.len() as u64,
            text,
        })
    }
}
