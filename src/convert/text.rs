use super::scratch::Scratch;
use crate::error::{ConvertError, ConvertResult};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Extracts the text of every page, concatenated with no page delimiter.
///
/// `pdf-extract` panics on some malformed inputs; a panic is reported as an
/// extraction failure.
pub fn pdf_to_text(input: &[u8], scratch: &Scratch) -> ConvertResult<String> {
    let staged = scratch.write(".pdf", input)?;
    let path = staged.path();

    let extracted = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match extracted {
        Ok(Ok(text)) => {
            debug!("Extracted {} chars of text", text.len());
            Ok(text)
        }
        Ok(Err(e)) => Err(ConvertError::Extraction(e.to_string())),
        Err(_) => {
            warn!("PDF text extraction panicked");
            Err(ConvertError::Extraction(
                "malformed PDF structure".to_string(),
            ))
        }
    }
}
