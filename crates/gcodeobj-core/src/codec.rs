//! OBJ-in-gcode codec
//!
//! Encoding prefixes every OBJ line with the marker token. Decoding keeps
//! only the tagged lines of a gcode document, wherever they appear, strips
//! one marker from each and concatenates the remainders. Line endings are
//! carried through untouched, so `decode(encode(obj)) == obj` byte for byte.

use std::io::{self, BufRead, Read, Write};

use tracing::{debug, warn};

use crate::error::{CodecError, Result};
use crate::marker::MarkerConfig;

/// Result of scanning a gcode document for tagged lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Reassembled OBJ text
    pub text: String,
    /// Number of tagged lines found
    pub tagged_lines: usize,
    /// Number of lines scanned in total
    pub lines_scanned: usize,
}

impl Extraction {
    /// Whether at least one tagged line was found
    pub fn is_found(&self) -> bool {
        self.tagged_lines > 0
    }

    /// The OBJ text, or `PayloadAbsent` when nothing was tagged
    pub fn into_payload(self) -> Result<String> {
        if self.is_found() {
            Ok(self.text)
        } else {
            Err(CodecError::PayloadAbsent)
        }
    }

    /// OBJ records, trimmed of surrounding whitespace
    ///
    /// `text` keeps whatever followed the marker, so `;obj v 0 0 0` leaves
    /// `" v 0 0 0"` there. OBJ readers ignore that whitespace and so does this.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim)
    }
}

/// Encoder/decoder bound to one marker configuration
#[derive(Debug, Clone, Default)]
pub struct ObjCodec {
    marker: MarkerConfig,
}

impl ObjCodec {
    /// Create a codec, rejecting unusable marker configurations
    pub fn new(marker: MarkerConfig) -> Result<Self> {
        marker.validate()?;
        Ok(Self { marker })
    }

    /// Marker configuration in use
    pub fn marker(&self) -> &MarkerConfig {
        &self.marker
    }

    /// Tag every line of `obj` with the marker
    pub fn encode_str(&self, obj: &str) -> String {
        self.tag_lines(obj).0
    }

    /// Tagged text plus the number of lines it holds
    pub(crate) fn tag_lines(&self, obj: &str) -> (String, usize) {
        let token = &self.marker.token;
        let mut out = String::with_capacity(obj.len() + obj.lines().count() * token.len());
        let mut count = 0usize;

        for line in obj.split_inclusive('\n') {
            count += 1;
            if self.marker.is_tagged(line) {
                warn!(
                    "OBJ line {} already starts with '{}', it will be tagged twice",
                    count, token
                );
            }
            out.push_str(token);
            out.push_str(line);
        }
        (out, count)
    }

    /// Collect the tagged lines of an in-memory gcode document
    pub fn scan_str(&self, gcode: &str) -> Extraction {
        let mut extraction = Extraction::default();
        for line in gcode.split_inclusive('\n') {
            self.accept(line, &mut extraction);
        }
        extraction
    }

    /// Decode an in-memory gcode document into OBJ text
    ///
    /// # Errors
    /// Returns `PayloadAbsent` when no line carries the marker
    pub fn decode_str(&self, gcode: &str) -> Result<String> {
        self.scan_str(gcode).into_payload()
    }

    /// Read all OBJ text from `reader`, then write it tagged to `writer`
    ///
    /// Nothing reaches `writer` when `reader` fails. Returns the number of
    /// lines written.
    pub fn embed<R, W>(&self, mut reader: R, mut writer: W) -> Result<usize>
    where
        R: Read,
        W: Write,
    {
        let mut obj = String::new();
        reader.read_to_string(&mut obj)?;

        let (tagged, written) = self.tag_lines(&obj);
        writer.write_all(tagged.as_bytes())?;
        writer.flush()?;
        debug!("Embedded {} OBJ lines", written);
        Ok(written)
    }

    /// Scan a gcode stream for tagged lines
    ///
    /// Lines are read as raw bytes; only tagged lines must be valid UTF-8.
    ///
    /// # Errors
    /// Returns an `InvalidData` I/O error naming the line when a tagged line
    /// is not UTF-8.
    pub fn extract<R: BufRead>(&self, mut reader: R) -> Result<Extraction> {
        let token = self.marker.token.as_bytes();
        let mut line = Vec::new();
        let mut extraction = Extraction::default();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            extraction.lines_scanned += 1;

            let Some(payload) = line.strip_prefix(token) else {
                continue;
            };
            let payload = std::str::from_utf8(payload).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "tagged line {} is not valid UTF-8: {}",
                        extraction.lines_scanned, e
                    ),
                )
            })?;
            extraction.text.push_str(payload);
            extraction.tagged_lines += 1;
        }

        debug!(
            "Scanned {} lines, {} tagged",
            extraction.lines_scanned, extraction.tagged_lines
        );
        Ok(extraction)
    }

    fn accept(&self, line: &str, extraction: &mut Extraction) {
        extraction.lines_scanned += 1;
        if let Some(payload) = self.marker.strip(line) {
            extraction.text.push_str(payload);
            extraction.tagged_lines += 1;
        }
    }
}
