//! `generateContent` request and response shapes

use base64::Engine;
use serde::Serialize;

use super::error::AnalysisError;

/// MIME type announced for every uploaded image
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Where the generated text lives in a successful response
const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";
const TEXT_PATH: &str = "candidates[0].content.parts[0].text";

/// Top-level request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One part of a multimodal prompt
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

/// Base64 encoded binary attachment
#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Encode raw image bytes with the standard padded base64 alphabet
pub fn encode_image(image: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(image)
}

/// Assemble the request body from a prompt and an already encoded image
pub fn build_request(prompt: &str, encoded_image: String) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: IMAGE_MIME_TYPE.to_string(),
                        data: encoded_image,
                    },
                },
            ],
        }],
    }
}

/// Pull the generated text out of a parsed response
pub fn extract_text(body: &serde_json::Value) -> Result<String, AnalysisError> {
    body.pointer(TEXT_POINTER)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or(AnalysisError::MissingField(TEXT_PATH))
}

/// Parse a 200 response body and extract the generated text
pub fn parse_response(body: &[u8]) -> Result<String, AnalysisError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(AnalysisError::Decode)?;
    extract_text(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_image() {
        assert_eq!(encode_image(b"hello"), "aGVsbG8=");
        assert_eq!(encode_image(&[]), "");
    }

    #[test]
    fn test_request_body_shape() {
        let request = build_request("What is this?", encode_image(&[0xFF, 0xD8, 0xFF]));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "What is this?" },
                        { "inline_data": { "mime_type": "image/jpeg", "data": "/9j/" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_extract_text() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "A red bicycle" }, { "text": "ignored" }] }
            }]
        });
        assert_eq!(extract_text(&body).unwrap(), "A red bicycle");
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_text(&body).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField(_)));
    }

    #[test]
    fn test_extract_text_non_string() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert!(extract_text(&body).is_err());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = parse_response(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn test_parse_response() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"A dog"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "A dog");
    }
}
