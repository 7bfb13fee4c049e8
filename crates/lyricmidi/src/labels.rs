//! Label serialization.
//!
//! The tab-separated form (`start\tend\ttext`, seconds to three decimals)
//! is what alignment tools such as Audacity label tracks read.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::schedule::Label;
use crate::{Error, Result};

/// Something that can serialize a label list.
pub trait LabelWriter {
    fn write_labels(&self, labels: &[Label], out: &mut dyn Write) -> Result<()>;
}

/// Tab-separated lines, one per label.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvLabels;

impl LabelWriter for TsvLabels {
    fn write_labels(&self, labels: &[Label], out: &mut dyn Write) -> Result<()> {
        out.write_all(to_tsv(labels).as_bytes())?;
        Ok(())
    }
}

/// A pretty-printed JSON array of `{start, end, text}` objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLabels;

impl LabelWriter for JsonLabels {
    fn write_labels(&self, labels: &[Label], out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, labels)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Render labels as TSV. Lines are joined with `\n`, no trailing newline.
pub fn to_tsv(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| format!("{:.3}\t{:.3}\t{}", l.start, l.end, l.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Label file format, parsed from config or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFormat {
    #[default]
    Tsv,
    Json,
}

impl LabelFormat {
    pub fn writer(self) -> Box<dyn LabelWriter> {
        match self {
            LabelFormat::Tsv => Box::new(TsvLabels),
            LabelFormat::Json => Box::new(JsonLabels),
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFormat::Tsv => f.write_str("tsv"),
            LabelFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LabelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" | "txt" => Ok(LabelFormat::Tsv),
            "json" => Ok(LabelFormat::Json),
            other => Err(Error::UnknownLabelFormat(other.to_string())),
        }
    }
}

/// Write labels to `path` in the given format.
pub fn write_labels(labels: &[Label], format: LabelFormat, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    format.writer().write_labels(labels, &mut file)?;
    file.flush()?;
    Ok(())
}
