#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mcp_mixmaster::client::{
    AiTransport, CallError, CocktailDetails, Difficulty, GenerateContentRequest,
    GenerateContentResponse, ImagePredictRequest, ImagePredictResponse, Ingredient,
};
use mcp_mixmaster::connectivity::StaticConnectivity;
use mcp_mixmaster::gateway::AiGateway;

/// A transport that replays scripted replies in order and records every request.
///
/// When a script runs dry the call fails with a network error.
#[derive(Default)]
pub struct ScriptedTransport {
    text_replies: Mutex<VecDeque<Result<GenerateContentResponse, CallError>>>,
    image_replies: Mutex<VecDeque<Result<ImagePredictResponse, CallError>>>,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
    text_requests: Mutex<Vec<GenerateContentRequest>>,
    image_requests: Mutex<Vec<ImagePredictRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) {
        self.text_replies
            .lock()
            .unwrap()
            .push_back(Ok(GenerateContentResponse::from_text(text)));
    }

    pub fn push_text_error(&self, error: CallError) {
        self.text_replies.lock().unwrap().push_back(Err(error));
    }

    pub fn push_image(&self, base64: &str) {
        self.image_replies
            .lock()
            .unwrap()
            .push_back(Ok(ImagePredictResponse::from_base64(base64)));
    }

    pub fn push_empty_image(&self) {
        self.image_replies
            .lock()
            .unwrap()
            .push_back(Ok(ImagePredictResponse::default()));
    }

    pub fn push_image_error(&self, error: CallError) {
        self.image_replies.lock().unwrap().push_back(Err(error));
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn text_requests(&self) -> Vec<GenerateContentRequest> {
        self.text_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<ImagePredictRequest> {
        self.image_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiTransport for ScriptedTransport {
    async fn generate_content(
        &self,
        _model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CallError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.text_requests.lock().unwrap().push(request.clone());
        self.text_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CallError::Network("script exhausted".to_string())))
    }

    async fn predict_image(
        &self,
        _model: &str,
        request: &ImagePredictRequest,
    ) -> Result<ImagePredictResponse, CallError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_requests.lock().unwrap().push(request.clone());
        self.image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CallError::Network("script exhausted".to_string())))
    }
}

pub fn gateway(transport: &Arc<ScriptedTransport>) -> AiGateway {
    AiGateway::new(transport.clone())
}

pub fn offline_gateway(transport: &Arc<ScriptedTransport>) -> AiGateway {
    AiGateway::new(transport.clone()).with_connectivity(Arc::new(StaticConnectivity(false)))
}

pub fn invalid_key_error() -> CallError {
    CallError::from_response(
        400,
        r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
    )
}

pub fn quota_error() -> CallError {
    CallError::from_response(
        429,
        r#"{"error":{"code":429,"message":"You exceeded your current quota.","status":"RESOURCE_EXHAUSTED"}}"#,
    )
}

pub fn server_error() -> CallError {
    CallError::from_response(503, r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#)
}

pub fn sample_details(name: &str) -> CocktailDetails {
    CocktailDetails {
        cocktail_name: name.to_string(),
        description: format!("A bright and fizzy {}", name),
        ingredients: vec![
            Ingredient {
                quantity: "2 oz".to_string(),
                name: "Vodka".to_string(),
                is_garnish: None,
            },
            Ingredient {
                quantity: "1/2 oz".to_string(),
                name: "Lime Juice".to_string(),
                is_garnish: None,
            },
            Ingredient {
                quantity: "1 wedge".to_string(),
                name: "Lime".to_string(),
                is_garnish: Some(true),
            },
        ],
        instructions: vec![
            "Fill a glass with ice.".to_string(),
            "Add vodka and lime juice.".to_string(),
            "Top with ginger beer.".to_string(),
        ],
        prep_time: "5 minutes".to_string(),
        difficulty: Difficulty::Easy,
        glassware: "Copper mug".to_string(),
        garnish: "Lime wedge".to_string(),
        flavor_profile: "Spicy & Citrus".to_string(),
    }
}

/// JSON for `names.len()` recipes, as the model would return it.
pub fn recipes_json(names: &[&str]) -> String {
    let recipes: Vec<CocktailDetails> = names.iter().map(|n| sample_details(n)).collect();
    serde_json::to_string(&recipes).unwrap()
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
