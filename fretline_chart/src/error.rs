use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartErrorKind {
    Signature,
    Truncated,
    Header,
    Io,
}

impl ChartErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            // Signature
            "M1001" | "M2001" => Self::Signature,

            // Truncated
            "M1002" | "M2002" => Self::Truncated,

            // Header
            "M1003" => Self::Header,

            // IO
            "M3001" => Self::Io,

            _ => Self::Truncated,
        }
    }
}

impl fmt::Display for ChartErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Signature => "signature",
            Self::Truncated => "truncated",
            Self::Header => "header",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

/// Failure to decode a chart. Every kind except [`ChartErrorKind::Io`] means the
/// bytes were read but are not a usable chart.
#[derive(Debug, Error, Clone)]
#[error("{code}: {message}{}", offset_suffix(.offset))]
pub struct ChartError {
    pub code: &'static str,
    pub kind: ChartErrorKind,
    pub message: String,
    pub offset: Option<usize>,
    pub file: Option<String>,
}

fn offset_suffix(offset: &Option<usize>) -> String {
    match offset {
        Some(offset) => format!(" (offset {offset})"),
        None => String::new(),
    }
}

impl ChartError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ChartErrorKind::from_code(code),
            message: message.into(),
            offset: None,
            file: None,
        }
    }

    pub fn missing_file(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new("M3001", format!("chart file not found: {path}")).with_file(path)
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_format_error(&self) -> bool {
        self.kind != ChartErrorKind::Io
    }
}
