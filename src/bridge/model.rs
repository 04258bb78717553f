use crate::video::VideoMetadata;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request sent from the requesting context to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BridgeRequest {
    #[serde(rename = "getVideoData")]
    GetVideoData,
}

/// The page's single reply to a [`BridgeRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VideoMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok(data: VideoMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The page could not be reached or never answered
    #[error("could not reach the page: {0}")]
    Transport(String),
    /// The page answered, but extraction failed there
    #[error("{0}")]
    Extraction(String),
    #[error("page replied without video data")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_action_tag() {
        assert_eq!(
            serde_json::to_value(BridgeRequest::GetVideoData).unwrap(),
            json!({ "action": "getVideoData" })
        );
        let parsed: BridgeRequest =
            serde_json::from_value(json!({ "action": "getVideoData" })).unwrap();
        assert_eq!(parsed, BridgeRequest::GetVideoData);
    }

    #[test]
    fn failed_reply_omits_data() {
        assert_eq!(
            serde_json::to_value(BridgeResponse::failed("boom")).unwrap(),
            json!({ "success": false, "error": "boom" })
        );
    }

    #[test]
    fn successful_reply_carries_camel_case_record() {
        let data = VideoMetadata {
            title: "Hip Tips".to_string(),
            is_short: true,
            has_transcript: true,
            ..Default::default()
        };
        let value = serde_json::to_value(BridgeResponse::ok(data)).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"]["title"], json!("Hip Tips"));
        assert_eq!(value["data"]["isShort"], json!(true));
        assert_eq!(value["data"]["hasTranscript"], json!(true));
        assert!(value.get("error").is_none());
    }
}
