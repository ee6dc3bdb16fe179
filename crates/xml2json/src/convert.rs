//! Conversion entry points tying the pipeline together.

use std::io::{BufRead, Write};

use quick_xml::Reader;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::json::JsonWriter;
use crate::{group, ser, tree};

/// XML to JSON converter sharing one immutable grouping [`Config`].
///
/// Each conversion call owns its tree and output state and takes the
/// converter by shared reference, so one converter may serve any number of
/// conversions concurrently.
#[derive(Debug, Default)]
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads one whole XML document from `xml` and writes it as indented
    /// JSON to `json`.
    ///
    /// The input is fully parsed and the tree fully grouped before any output
    /// is written; the sink is flushed once at the end of a successful
    /// conversion. On failure the sink may hold a partial document.
    pub fn convert<R: BufRead, W: Write>(&self, xml: R, json: W) -> Result<()> {
        let mut reader = Reader::from_reader(xml);
        let mut root = tree::build(&mut reader)?;
        group::arrange(&mut root, &self.config);

        let mut out = JsonWriter::new(json);
        ser::emit_document(&root, &mut out)?;
        out.flush().map_err(|source| Error::Io {
            path: "/".to_string(),
            source,
        })
    }

    /// Converts an XML string, returning the JSON output as a string.
    pub fn convert_str(&self, xml: &str) -> Result<String> {
        let bytes = self.convert_slice(xml.as_bytes())?;
        String::from_utf8(bytes).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Converts XML bytes, returning the JSON output as a byte vector.
    pub fn convert_slice(&self, xml: &[u8]) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.convert(xml, &mut buf)?;
        Ok(buf)
    }
}
