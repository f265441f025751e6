//! Medical-record extraction.

use std::sync::Arc;

use petbook_common::{AppError, AppResult};
use petbook_db::documents::MedicalExtraction;

use crate::client::{Attachment, GenerationRequest, TextGenerator, strip_code_fence};

const EXTRACTION_SYSTEM_INSTRUCTION: &str = r#"You are an AI Medical Assistant for veterinary records.
Extract the following information from the provided medical record (PDF or image).

Return a JSON object with these exact keys:
- petName (string or null)
- dateOfVisit (string in ISO 8601 format YYYY-MM-DD, or null)
- diagnosis (string or null)
- medications (array of strings, empty array if none)
- nextVaccinationDate (string in ISO 8601 format YYYY-MM-DD, or null)
- suggestedReminderDate (string in ISO 8601 format YYYY-MM-DD, calculated as
  2 weeks before nextVaccinationDate, or null)

If a field is not found, return null. Return STRICT JSON."#;

const EXTRACTION_PROMPT: &str = "Extract the medical data from this document.";

/// Extracts structured data from scanned medical records.
#[derive(Clone)]
pub struct MedicalExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl MedicalExtractor {
    /// Create a new extractor.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Extract medical fields from a document.
    ///
    /// Unlike answers there is no raw-text fallback here: output that is not
    /// the agreed JSON shape is an external-service failure.
    pub async fn extract(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> AppResult<MedicalExtraction> {
        if data.is_empty() {
            return Err(AppError::Validation("No document data provided".to_string()));
        }

        let text = self
            .generator
            .generate(GenerationRequest {
                system_instruction: EXTRACTION_SYSTEM_INSTRUCTION.to_string(),
                prompt: EXTRACTION_PROMPT.to_string(),
                attachment: Some(Attachment {
                    data,
                    content_type: content_type.to_string(),
                }),
            })
            .await?;

        serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            AppError::ExternalService(format!("Malformed extraction output: {e}"))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubGenerator {
        reply: String,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait::async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn extractor(reply: &str) -> (MedicalExtractor, Arc<StubGenerator>) {
        let generator = Arc::new(StubGenerator {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        });
        (MedicalExtractor::new(generator.clone()), generator)
    }

    #[tokio::test]
    async fn test_extract_parses_structured_output() {
        let (extractor, generator) = extractor(
            r#"{"petName": "Buddy", "dateOfVisit": "2024-03-01", "diagnosis": null,
                "medications": ["Rabies"], "nextVaccinationDate": "2025-03-01",
                "suggestedReminderDate": "2025-02-15"}"#,
        );

        let extraction = extractor
            .extract(b"%PDF-1.4 ...".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(extraction.pet_name.as_deref(), Some("Buddy"));
        assert_eq!(extraction.medications, vec!["Rabies".to_string()]);
        assert!(extraction.diagnosis.is_none());

        let request = generator.requests.lock().unwrap().remove(0);
        let attachment = request.attachment.unwrap();
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(!attachment.data.is_empty());
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_document() {
        let (extractor, _) = extractor("{}");
        let result = extractor.extract(Vec::new(), "application/pdf").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_json_output() {
        let (extractor, _) = extractor("The record mentions Buddy.");
        let result = extractor.extract(b"bytes".to_vec(), "application/pdf").await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_extract_tolerates_code_fence() {
        let (extractor, _) = extractor("```json\n{\"petName\": \"Momo\"}\n```");
        let extraction = extractor
            .extract(b"bytes".to_vec(), "image/png")
            .await
            .unwrap();
        assert_eq!(extraction.pet_name.as_deref(), Some("Momo"));
    }
}
