//! Message types posted from worker threads back to the UI thread

use std::path::PathBuf;

use crate::upload::UploadOutcome;
use crate::vision::DocumentScan;

/// Events produced by background jobs. The UI drains these once per
/// frame; workers never touch UI state directly.
#[derive(Debug)]
pub enum WorkerEvent {
    /// OCR pipeline finished for the saved image at `source_path`
    ScanFinished {
        scan: DocumentScan,
        source_path: PathBuf,
    },
    /// OCR pipeline failed; the saved image is kept for another attempt
    ScanFailed {
        error: String,
        source_path: PathBuf,
    },
    /// Upload attempt completed, successfully or not
    UploadDone(UploadOutcome),
    /// Upload could not even be attempted (local encoding/runtime error)
    UploadFailed(String),
}
