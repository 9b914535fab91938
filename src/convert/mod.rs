mod dispatch;
mod document;
mod format;
pub mod pdf;
pub mod raster;
mod scratch;
pub mod spreadsheet;
pub mod text;

pub use dispatch::{ConversionRequest, Converted, Dispatcher, Payload, Route};
pub use document::DocumentTool;
pub use format::{SourceKind, TargetFormat};
pub use scratch::{Scratch, ScratchFile};

use crate::config::ConversionConfig;
use crate::error::{ConvertError, ConvertResult};
use async_trait::async_trait;

/// One routine per supported (source kind, target format) pair.
#[async_trait]
pub trait Converters: Send + Sync {
    async fn image_to_image(&self, input: Vec<u8>, target: TargetFormat)
    -> ConvertResult<Vec<u8>>;

    async fn image_to_pdf(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>>;

    async fn document_to_pdf(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>>;

    async fn spreadsheet_to_csv(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>>;

    async fn pdf_to_text(&self, input: Vec<u8>) -> ConvertResult<String>;
}

/// The library-backed converters. CPU-bound work runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct Toolkit {
    scratch: Scratch,
    document_tool: DocumentTool,
}

impl Toolkit {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            scratch: Scratch::new(config.scratch_dir()),
            document_tool: DocumentTool::new(&config.document_tool),
        }
    }

    pub fn with_parts(scratch: Scratch, document_tool: DocumentTool) -> Self {
        Self {
            scratch,
            document_tool,
        }
    }
}

async fn blocking<T, F>(work: F) -> ConvertResult<T>
where
    F: FnOnce() -> ConvertResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ConvertError::Internal(format!("conversion task failed: {}", e)))?
}

#[async_trait]
impl Converters for Toolkit {
    async fn image_to_image(
        &self,
        input: Vec<u8>,
        target: TargetFormat,
    ) -> ConvertResult<Vec<u8>> {
        blocking(move || raster::image_to_image(&input, target)).await
    }

    async fn image_to_pdf(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        let scratch = self.scratch.clone();
        blocking(move || pdf::image_to_pdf(&input, &scratch)).await
    }

    async fn document_to_pdf(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        self.document_tool
            .document_to_pdf(input, &self.scratch)
            .await
    }

    async fn spreadsheet_to_csv(&self, input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        blocking(move || spreadsheet::spreadsheet_to_csv(&input)).await
    }

    async fn pdf_to_text(&self, input: Vec<u8>) -> ConvertResult<String> {
        let scratch = self.scratch.clone();
        blocking(move || text::pdf_to_text(&input, &scratch)).await
    }
}
