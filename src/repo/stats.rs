//! Aggregate statistics and content classification.

use serde::Serialize;

/// Content category buckets for aggregate statistics.
///
/// Categories are not exhaustive: a file whose MIME type cannot be
/// inferred, or whose type matches none of the buckets, contributes to
/// the totals only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Image,
    Video,
    Pdf,
    Spreadsheet,
    Document,
    Presentation,
}

impl ContentCategory {
    /// Classify a filename by the MIME type inferred from its extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let mime = mime_guess::from_path(name).first()?;

        match mime.type_().as_str() {
            "image" => return Some(ContentCategory::Image),
            "video" => return Some(ContentCategory::Video),
            _ => {}
        }

        match mime.essence_str() {
            "application/pdf" => Some(ContentCategory::Pdf),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(ContentCategory::Spreadsheet)
            }
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(ContentCategory::Document)
            }
            "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some(ContentCategory::Presentation)
            }
            _ => None,
        }
    }
}

/// Summary counts and sizes over all files in the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total size of all files in bytes.
    pub total_size: u64,
    /// Number of image files.
    pub image_files: u64,
    /// Number of video files.
    pub video_files: u64,
    /// Number of PDF files.
    pub pdf_files: u64,
    /// Number of spreadsheet files.
    pub excel_files: u64,
    /// Number of word-processing documents.
    pub word_files: u64,
    /// Number of presentation files.
    pub powerpoint_files: u64,
}

impl RepositoryStats {
    /// Account for one file: always counted in the totals, and in at
    /// most one category bucket.
    pub fn record(&mut self, name: &str, size: u64) {
        self.total_files += 1;
        self.total_size += size;

        match ContentCategory::from_name(name) {
            Some(ContentCategory::Image) => self.image_files += 1,
            Some(ContentCategory::Video) => self.video_files += 1,
            Some(ContentCategory::Pdf) => self.pdf_files += 1,
            Some(ContentCategory::Spreadsheet) => self.excel_files += 1,
            Some(ContentCategory::Document) => self.word_files += 1,
            Some(ContentCategory::Presentation) => self.powerpoint_files += 1,
            None => {}
        }
    }
}
