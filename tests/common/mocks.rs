use async_trait::async_trait;
use file_converter::{
    ConvertError, ConvertResult,
    convert::{Converters, TargetFormat},
};
use std::sync::{Arc, Mutex};

/// Converter set that records which routine was called and returns canned
/// output.
#[derive(Debug, Default)]
pub struct RecordingConverters {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
}

impl RecordingConverters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> ConvertResult<Vec<u8>> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(ref error) = self.error {
            return Err(ConvertError::Decode(error.clone()));
        }
        Ok(format!("converted:{}", call).into_bytes())
    }
}

#[async_trait]
impl Converters for RecordingConverters {
    async fn image_to_image(
        &self,
        _input: Vec<u8>,
        target: TargetFormat,
    ) -> ConvertResult<Vec<u8>> {
        self.record(format!("image_to_image:{}", target))
    }

    async fn image_to_pdf(&self, _input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        self.record("image_to_pdf".to_string())
    }

    async fn document_to_pdf(&self, _input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        self.record("document_to_pdf".to_string())
    }

    async fn spreadsheet_to_csv(&self, _input: Vec<u8>) -> ConvertResult<Vec<u8>> {
        self.record("spreadsheet_to_csv".to_string())
    }

    async fn pdf_to_text(&self, _input: Vec<u8>) -> ConvertResult<String> {
        self.record("pdf_to_text".to_string())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
