use super::Converters;
use super::format::{SourceKind, TargetFormat};
use crate::error::{ConvertError, ConvertResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One upload to convert. Lives for a single call.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub format: Option<String>,
}

/// The converter chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ImageToImage(TargetFormat),
    ImageToPdf,
    DocumentToPdf,
    SpreadsheetToCsv,
    PdfToText,
}

impl Route {
    /// Picks the converter for a source kind and target format. `None` as the
    /// source means no filename was supplied, so the upload is taken to be an
    /// image.
    pub fn select(source: Option<SourceKind>, target: TargetFormat) -> Option<Route> {
        use SourceKind as S;
        use TargetFormat as T;

        match (source, target) {
            (None | Some(S::Image), T::Png | T::Jpg | T::Webp) => Some(Route::ImageToImage(target)),
            (None | Some(S::Image | S::Spreadsheet | S::Pdf | S::Other), T::Pdf) => {
                Some(Route::ImageToPdf)
            }
            (Some(S::Document), T::Pdf) => Some(Route::DocumentToPdf),
            (Some(S::Spreadsheet), T::Csv) => Some(Route::SpreadsheetToCsv),
            (Some(S::Pdf), T::Txt) => Some(Route::PdfToText),

            (None | Some(S::Image), T::Csv | T::Txt)
            | (Some(S::Document), T::Png | T::Jpg | T::Webp | T::Csv | T::Txt)
            | (Some(S::Spreadsheet), T::Png | T::Jpg | T::Webp | T::Txt)
            | (Some(S::Pdf), T::Png | T::Jpg | T::Webp | T::Csv)
            | (Some(S::Other), T::Png | T::Jpg | T::Webp | T::Csv | T::Txt) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageToImage(target) => write!(f, "image-to-{}", target),
            Self::ImageToPdf => f.write_str("image-to-pdf"),
            Self::DocumentToPdf => f.write_str("document-to-pdf"),
            Self::SpreadsheetToCsv => f.write_str("spreadsheet-to-csv"),
            Self::PdfToText => f.write_str("pdf-to-text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    Text(String),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

/// Successful outcome of one conversion.
#[derive(Debug, Clone)]
pub struct Converted {
    pub route: Route,
    pub format: TargetFormat,
    pub payload: Payload,
}

impl Converted {
    pub fn message(&self) -> String {
        format!("File converted to {} successfully", self.format)
    }
}

/// Validates the requested format, picks a [`Route`] and runs exactly one
/// converter. Failures come back as [`ConvertError`] values, never panics.
#[derive(Clone)]
pub struct Dispatcher {
    converters: Arc<dyn Converters>,
}

impl Dispatcher {
    pub fn new(converters: Arc<dyn Converters>) -> Self {
        Self { converters }
    }

    pub async fn convert(&self, request: ConversionRequest) -> ConvertResult<Converted> {
        let ConversionRequest {
            data,
            filename,
            format,
        } = request;

        let format: TargetFormat = format
            .as_deref()
            .ok_or_else(|| ConvertError::invalid_format("<missing>"))?
            .parse()?;

        let source = filename.as_deref().map(SourceKind::from_filename);
        let route = Route::select(source, format).ok_or_else(|| {
            let kind = source.map_or_else(|| "unnamed upload".to_string(), |k| k.to_string());
            warn!("No converter for {} -> {}", kind, format);
            ConvertError::unsupported(kind, format.to_string())
        })?;

        info!(
            "Converting {} ({} bytes) via {}",
            filename.as_deref().unwrap_or("<unnamed>"),
            data.len(),
            route
        );

        let payload = match route {
            Route::ImageToImage(target) => {
                Payload::Bytes(self.converters.image_to_image(data, target).await?)
            }
            Route::ImageToPdf => Payload::Bytes(self.converters.image_to_pdf(data).await?),
            Route::DocumentToPdf => Payload::Bytes(self.converters.document_to_pdf(data).await?),
            Route::SpreadsheetToCsv => {
                Payload::Bytes(self.converters.spreadsheet_to_csv(data).await?)
            }
            Route::PdfToText => Payload::Text(self.converters.pdf_to_text(data).await?),
        };

        debug!("{} produced {} bytes", route, payload.len());
        Ok(Converted {
            route,
            format,
            payload,
        })
    }
}
