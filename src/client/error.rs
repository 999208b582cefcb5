//! Error kinds surfaced by the gateway and the stores, and the transport-level
//! failures they are classified from.

use thiserror::Error;

use crate::client::types::{ApiErrorEnvelope, Language};

/// Errors surfaced to callers of the gateway, stores and session.
///
/// Exhausted-retry kinds carry no detail from individual attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("at least one ingredient or image is required")]
    EmptyInput,

    #[error("the API key is missing or not valid")]
    InvalidCredential,

    #[error("image generation quota exceeded")]
    QuotaExceeded,

    #[error("cocktail generation failed")]
    GenerationFailed,

    #[error("image generation failed")]
    ImageGenerationFailed,

    #[error("ingredient identification failed")]
    IdentificationFailed,

    #[error("shared cocktail not found")]
    NotFound,

    #[error("no network connectivity")]
    OfflineUnavailable,

    #[error("storage error: {0}")]
    Storage(String),
}

impl AiError {
    /// Stable machine-readable code, e.g. `"API_KEY_INVALID"`.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::EmptyInput => "EMPTY_INPUT",
            AiError::InvalidCredential => "API_KEY_INVALID",
            AiError::QuotaExceeded => "QUOTA_EXCEEDED",
            AiError::GenerationFailed => "GENERATION_FAILED",
            AiError::ImageGenerationFailed => "IMAGE_GENERATION_FAILED",
            AiError::IdentificationFailed => "IDENTIFICATION_FAILED",
            AiError::NotFound => "NOT_FOUND",
            AiError::OfflineUnavailable => "OFFLINE",
            AiError::Storage(_) => "STORAGE",
        }
    }

    /// Whether the caller should offer a retry action.
    pub fn retryable(&self) -> bool {
        matches!(self, AiError::GenerationFailed)
    }

    /// Localized message for end users.
    pub fn user_message(&self, language: Language) -> &'static str {
        match (self, language) {
            (AiError::EmptyInput, Language::En) => {
                "Please add at least one ingredient to generate a cocktail."
            }
            (AiError::EmptyInput, Language::Es) => {
                "Por favor, añade al menos un ingrediente para generar un cóctel."
            }
            (AiError::InvalidCredential, Language::En) => {
                "The application is not configured correctly. Please contact the administrator."
            }
            (AiError::InvalidCredential, Language::Es) => {
                "La aplicación no está configurada correctamente. Por favor, contacta al administrador."
            }
            (AiError::QuotaExceeded, Language::En) => {
                "Image generation quota exceeded. Please check your plan and billing details."
            }
            (AiError::QuotaExceeded, Language::Es) => {
                "Se ha excedido la cuota de generación de imágenes. Revisa tu plan y detalles de facturación."
            }
            (AiError::GenerationFailed, Language::En) => {
                "Failed to generate cocktails. The mixologist might be on a break. Please check your ingredients and try again."
            }
            (AiError::GenerationFailed, Language::Es) => {
                "No se pudieron generar los cócteles. El mixólogo podría estar en un descanso. Revisa tus ingredientes e inténtalo de nuevo."
            }
            (AiError::ImageGenerationFailed, Language::En) => {
                "Failed to create an image for the cocktail. Please try again."
            }
            (AiError::ImageGenerationFailed, Language::Es) => {
                "No se pudo crear una imagen para el cóctel. Por favor, inténtalo de nuevo."
            }
            (AiError::IdentificationFailed, Language::En) => {
                "Failed to identify ingredients from the image. Please try another photo."
            }
            (AiError::IdentificationFailed, Language::Es) => {
                "No se pudieron identificar los ingredientes de la imagen. Por favor, intenta con otra foto."
            }
            (AiError::NotFound, Language::En) => {
                "The shared cocktail could not be found or has expired."
            }
            (AiError::NotFound, Language::Es) => {
                "El cóctel compartido no se pudo encontrar o ha expirado."
            }
            (AiError::OfflineUnavailable, Language::En) => {
                "You appear to be offline. Please check your internet connection."
            }
            (AiError::OfflineUnavailable, Language::Es) => {
                "Parece que no tienes conexión. Por favor, revisa tu conexión a internet."
            }
            (AiError::Storage(_), Language::En) => "An unknown error occurred.",
            (AiError::Storage(_), Language::Es) => "Ocurrió un error desconocido.",
        }
    }
}

/// Failure of a single remote invocation, before call-site classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("credential rejected ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("quota exhausted: {message}")]
    Quota { message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl CallError {
    /// Classifies a non-success HTTP reply from its status and body.
    ///
    /// A body mentioning `API key not valid` or `API_KEY_INVALID` is a rejected
    /// credential, as are 401/403. 429, `RESOURCE_EXHAUSTED` or any message
    /// mentioning "quota" is quota exhaustion.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
        let message = if envelope.error.message.is_empty() {
            body.to_string()
        } else {
            envelope.error.message.clone()
        };

        if mentions_invalid_key(body) || matches!(status, 401 | 403) {
            return CallError::Unauthorized { status, message };
        }
        if status == 429
            || envelope.error.status == "RESOURCE_EXHAUSTED"
            || message.to_lowercase().contains("quota")
        {
            return CallError::Quota { message };
        }
        CallError::Api { status, message }
    }

    pub fn is_invalid_credential(&self) -> bool {
        match self {
            CallError::Unauthorized { .. } => true,
            CallError::Api { message, .. } => mentions_invalid_key(message),
            _ => false,
        }
    }

    pub fn is_quota(&self) -> bool {
        match self {
            CallError::Quota { .. } => true,
            CallError::Api { message, .. } => message.to_lowercase().contains("quota"),
            _ => false,
        }
    }
}

fn mentions_invalid_key(text: &str) -> bool {
    text.contains("API key not valid") || text.contains("API_KEY_INVALID")
}
