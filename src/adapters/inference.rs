use crate::core::{ConfigProvider, GenerationError, ModelLoader, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL_ID: &str = "google/flan-t5-large";

const WARM_UP_PROMPT: &str = "Say OK.";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: usize,
    num_return_sequences: usize,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedSequence {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Sequences(Vec<GeneratedSequence>),
    Single(GeneratedSequence),
    Error(ErrorBody),
}

/// 透過 hosted inference API 建構 text2text 模型 handle
#[derive(Debug, Clone)]
pub struct InferenceApiLoader {
    endpoint: String,
    model_id: String,
    api_token: Option<String>,
    warm_up: bool,
    request_timeout: Option<Duration>,
}

impl InferenceApiLoader {
    pub fn new(endpoint: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            api_token: None,
            warm_up: false,
            request_timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
            model_id: config.model_id().to_string(),
            api_token: config.api_token().map(str::to_string),
            warm_up: config.warm_up(),
            request_timeout: config.timeout_secs().map(Duration::from_secs),
        }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    pub fn with_warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }

    pub fn model_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model_id)
    }

    fn load_error(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::Load {
            model_id: self.model_id.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl ModelLoader for InferenceApiLoader {
    type Model = InferenceApiModel;

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn load(&self) -> Result<InferenceApiModel, GenerationError> {
        let mut builder = Client::builder().connect_timeout(Duration::from_secs(30));
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| self.load_error(format!("could not build HTTP client: {}", e)))?;

        let model = InferenceApiModel {
            client,
            url: self.model_url(),
            api_token: self.api_token.clone(),
        };

        if self.warm_up {
            tracing::debug!("Warming up {} at {}", self.model_id, model.url);
            match model.generate(WARM_UP_PROMPT, 1).await {
                Ok(_) | Err(GenerationError::EmptyOutput) => {}
                Err(e) => return Err(self.load_error(e.to_string())),
            }
        }

        Ok(model)
    }
}

pub struct InferenceApiModel {
    client: Client,
    url: String,
    api_token: Option<String>,
}

#[async_trait]
impl TextGenerator for InferenceApiModel {
    async fn generate(&self, prompt: &str, max_new_tokens: usize) -> Result<String, GenerationError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens,
                num_return_sequences: 1,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("POST {} (max_new_tokens={})", self.url, max_new_tokens);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("Backend response status: {}", status);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        parse_generated_text(&text)
    }
}

/// 只取第一個序列
fn parse_generated_text(body: &str) -> Result<String, GenerationError> {
    let response: InferenceResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse {
            message: e.to_string(),
        })?;

    match response {
        InferenceResponse::Sequences(sequences) => sequences
            .into_iter()
            .next()
            .map(|s| s.generated_text)
            .ok_or(GenerationError::EmptyOutput),
        InferenceResponse::Single(sequence) => Ok(sequence.generated_text),
        InferenceResponse::Error(body) => Err(GenerationError::Backend {
            status: 200,
            message: body.error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const MODEL_PATH: &str = "/google/flan-t5-large";

    fn loader_for(server: &MockServer) -> InferenceApiLoader {
        InferenceApiLoader::new(server.base_url(), DEFAULT_MODEL_ID)
    }

    #[test]
    fn test_model_url_joins_endpoint_and_model() {
        let loader = InferenceApiLoader::new("https://example.com/models/", "google/flan-t5-large");
        assert_eq!(loader.model_url(), "https://example.com/models/google/flan-t5-large");
    }

    #[test]
    fn test_parse_generated_text_variants() {
        assert_eq!(
            parse_generated_text(r#"[{"generated_text": "Scenario 1"}, {"generated_text": "x"}]"#)
                .unwrap(),
            "Scenario 1"
        );
        assert_eq!(
            parse_generated_text(r#"{"generated_text": "Scenario 1"}"#).unwrap(),
            "Scenario 1"
        );
        assert!(matches!(
            parse_generated_text("[]"),
            Err(GenerationError::EmptyOutput)
        ));
        assert!(matches!(
            parse_generated_text(r#"{"error": "OOM"}"#),
            Err(GenerationError::Backend { message, .. }) if message == "OOM"
        ));
        assert!(matches!(
            parse_generated_text("not json"),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_sends_expected_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .header("Authorization", "Bearer hf_test")
                .json_body(serde_json::json!({
                    "inputs": "write tests",
                    "parameters": {"max_new_tokens": 700, "num_return_sequences": 1},
                    "options": {"wait_for_model": true}
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"generated_text": "Scenario 1: ..."}]));
        });

        let loader = loader_for(&server).with_api_token(Some("hf_test".to_string()));
        let model = loader.load().await.unwrap();
        let text = model.generate("write tests", 700).await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Scenario 1: ...");
    }

    #[tokio::test]
    async fn test_generate_maps_error_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(500)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"error": "CUDA out of memory (OOM)"}));
        });

        let model = loader_for(&server).load().await.unwrap();
        let err = model.generate("write tests", 700).await.unwrap_err();

        api_mock.assert();
        match err {
            GenerationError::Backend { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("OOM"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_plain_text_error_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(502).body("Bad Gateway");
        });

        let model = loader_for(&server).load().await.unwrap();
        let err = model.generate("write tests", 700).await.unwrap_err();

        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_generate_empty_sequence_list() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(serde_json::json!([]));
        });

        let model = tokio_test::assert_ok!(loader_for(&server).load().await);
        let err = tokio_test::assert_err!(model.generate("write tests", 700).await);
        assert!(matches!(err, GenerationError::EmptyOutput));
    }

    #[tokio::test]
    async fn test_warm_up_hits_backend_during_load() {
        let server = MockServer::start();
        let warm_up_mock = server.mock(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .body_contains("\"max_new_tokens\":1");
            then.status(200)
                .json_body(serde_json::json!([{"generated_text": "OK"}]));
        });

        let loader = loader_for(&server).with_warm_up(true);
        assert!(loader.load().await.is_ok());
        warm_up_mock.assert();
    }

    #[tokio::test]
    async fn test_warm_up_failure_is_load_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(404)
                .json_body(serde_json::json!({"error": "Model not found"}));
        });

        let loader = loader_for(&server).with_warm_up(true);
        match loader.load().await {
            Err(GenerationError::Load { model_id, message }) => {
                assert_eq!(model_id, DEFAULT_MODEL_ID);
                assert!(message.contains("Model not found"));
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("warm-up failure should fail the load"),
        }
    }
}
