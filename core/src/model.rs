use serde::Serialize;

/// One recognized TODO/FIXME annotation, as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub file_path: String,
    /// 1-based line number within the file content as of the last scan.
    pub line: usize,
    /// Trimmed free text following the keyword and its separator.
    pub text: String,
}

/// Extractor output before an owning file path is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarker {
    pub line: usize,
    pub text: String,
}

impl LineMarker {
    pub fn into_marker(self, file_path: &str) -> Marker {
        Marker {
            file_path: file_path.to_string(),
            line: self.line,
            text: self.text,
        }
    }
}
