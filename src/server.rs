use std::future::Future;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::client::{AiError, Language, Recipe};
use crate::session::MixSession;

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AddIngredientsParams {
    #[serde(default)]
    pub items: Option<Vec<String>>,
    /// Comma-separated ingredient names
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RemoveIngredientParams {
    pub name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct IdentifyIngredientsParams {
    /// Base64-encoded photo bytes
    pub image_base64: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GenerateCocktailsParams {
    /// Replaces the current ingredient list when given
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CocktailIdParams {
    pub id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetCocktailParams {
    pub id: String,
    #[serde(default)]
    pub include_image: bool,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SetLanguageParams {
    /// "en" or "es"
    pub language: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct OpenSharedParams {
    /// Share link, `#/share/<id>` fragment or bare id
    pub link: String,
}

#[derive(Clone)]
pub struct MixMasterMcpServer {
    session: Arc<Mutex<MixSession>>,
    tool_router: ToolRouter<MixMasterMcpServer>,
}

#[tool_router]
impl MixMasterMcpServer {
    pub fn new(session: MixSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }

    /// Shared handle to the session, for embedding and tests.
    pub fn session(&self) -> Arc<Mutex<MixSession>> {
        self.session.clone()
    }

    // Ingredient tools
    #[tool(description = "Add bar ingredients, either as a list or a comma-separated line")]
    async fn add_ingredients(
        &self,
        Parameters(params): Parameters<AddIngredientsParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let ingredients = session.ingredients_mut();

        let mut added = Vec::new();
        if let Some(items) = params.items {
            added.extend(ingredients.add_many(items));
        }
        if let Some(input) = params.input {
            added.extend(ingredients.add_input(&input));
        }

        json_success(json!({
            "added": added,
            "ingredients": session.ingredients().as_slice(),
        }))
    }

    #[tool(description = "Remove a bar ingredient")]
    async fn remove_ingredient(
        &self,
        Parameters(params): Parameters<RemoveIngredientParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let removed = session.ingredients_mut().remove(&params.name);

        json_success(json!({
            "removed": removed,
            "ingredients": session.ingredients().as_slice(),
        }))
    }

    #[tool(description = "List the current bar ingredients")]
    async fn list_ingredients(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        json_success(json!({
            "ingredients": session.ingredients().as_slice(),
            "language": session.language(),
        }))
    }

    #[tool(description = "Identify cocktail ingredients in a photo and add them to the bar")]
    async fn identify_ingredients(
        &self,
        Parameters(params): Parameters<IdentifyIngredientsParams>,
    ) -> Result<CallToolResult, McpError> {
        let image = match BASE64.decode(params.image_base64.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = json!({
                    "error": "Image is not valid base64",
                    "details": e.to_string()
                });
                return Ok(CallToolResult::error(vec![Content::text(error.to_string())]));
            }
        };

        let mut session = self.session.lock().await;
        match session.identify_from_photo(&image, &params.mime_type).await {
            Ok(detected) => json_success(json!({
                "detected": detected,
                "ingredients": session.ingredients().as_slice(),
            })),
            Err(e) => Ok(error_result(&e, session.language())),
        }
    }

    // Cocktail tools
    #[tool(description = "Generate three cocktail recipes with images from the bar ingredients")]
    async fn generate_cocktails(
        &self,
        Parameters(params): Parameters<GenerateCocktailsParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;

        if let Some(items) = params.ingredients {
            let ingredients = session.ingredients_mut();
            ingredients.clear();
            ingredients.add_many(items);
        }

        match session.generate().await {
            Ok(report) => {
                let language = session.language();
                let image_error = report.images.surfaced_error().map(|e| {
                    json!({
                        "code": e.code(),
                        "message": e.user_message(language),
                    })
                });
                json_success(json!({
                    "cocktails": report.recipes.iter().map(|r| recipe_summary(r, language)).collect::<Vec<_>>(),
                    "images_generated": report.images.succeeded.len(),
                    "images_failed": report.images.failed.len(),
                    "image_error": image_error,
                }))
            }
            Err(e) => Ok(error_result(&e, session.language())),
        }
    }

    #[tool(description = "List the cocktails from the last generation")]
    async fn list_cocktails(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let language = session.language();
        json_success(json!({
            "cocktails": session.recipes().iter().map(|r| recipe_summary(r, language)).collect::<Vec<_>>(),
        }))
    }

    #[tool(description = "Get the full recipe of a cocktail")]
    async fn get_cocktail(
        &self,
        Parameters(params): Parameters<GetCocktailParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let language = session.language();
        match session.find(&params.id) {
            Some(recipe) => {
                let mut result = recipe_detail(recipe, language);
                if params.include_image {
                    result["image_url"] = json!(recipe.image_url());
                }
                json_success(result)
            }
            None => Ok(error_result(&AiError::NotFound, language)),
        }
    }

    #[tool(description = "Switch the language (en or es) and translate every cocktail")]
    async fn set_language(
        &self,
        Parameters(params): Parameters<SetLanguageParams>,
    ) -> Result<CallToolResult, McpError> {
        let language: Language = match params.language.parse() {
            Ok(language) => language,
            Err(e) => {
                let error = json!({ "error": "Unsupported language", "details": e });
                return Ok(CallToolResult::error(vec![Content::text(error.to_string())]));
            }
        };

        let mut session = self.session.lock().await;
        session.set_language(language).await;

        json_success(json!({
            "language": session.language(),
            "ingredients": session.ingredients().as_slice(),
            "cocktails": session.recipes().iter().map(|r| recipe_summary(r, language)).collect::<Vec<_>>(),
        }))
    }

    // Favorites and sharing
    #[tool(description = "Add a cocktail to favorites, or remove it if already favorited")]
    async fn toggle_favorite(
        &self,
        Parameters(params): Parameters<CocktailIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        match session.toggle_favorite(&params.id) {
            Ok(favorited) => json_success(json!({
                "id": params.id,
                "favorited": favorited,
                "total_favorites": session.favorites().len(),
            })),
            Err(e) => Ok(error_result(&e, session.language())),
        }
    }

    #[tool(description = "List favorite cocktails")]
    async fn list_favorites(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let language = session.language();
        json_success(json!({
            "favorites": session.favorites().recipes().iter().map(|r| recipe_summary(r, language)).collect::<Vec<_>>(),
        }))
    }

    #[tool(description = "Publish a cocktail and get a share link fragment")]
    async fn share_cocktail(
        &self,
        Parameters(params): Parameters<CocktailIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        match session.share(&params.id) {
            Ok(link) => json_success(json!({
                "share_id": link.id,
                "fragment": link.fragment,
            })),
            Err(e) => Ok(error_result(&e, session.language())),
        }
    }

    #[tool(description = "Open a shared cocktail from a share link")]
    async fn open_shared_cocktail(
        &self,
        Parameters(params): Parameters<OpenSharedParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        let language = session.language();
        match session.open_shared(&params.link) {
            Ok(recipe) => json_success(recipe_detail(&recipe, language)),
            Err(e) => Ok(error_result(&e, language)),
        }
    }
}

fn recipe_summary(recipe: &Recipe, language: Language) -> serde_json::Value {
    json!({
        "id": recipe.id(),
        "name": recipe.details.cocktail_name,
        "description": recipe.details.description,
        "difficulty": recipe.details.difficulty.label(language),
        "prep_time": recipe.details.prep_time,
        "image_state": recipe.image_status(),
        "has_image": recipe.image_url().is_some(),
    })
}

fn recipe_detail(recipe: &Recipe, language: Language) -> serde_json::Value {
    let details = &recipe.details;
    json!({
        "id": recipe.id(),
        "name": details.cocktail_name,
        "description": details.description,
        "ingredients": details.ingredients.iter().map(|i| json!({
            "quantity": i.quantity,
            "name": i.name,
            "is_garnish": i.is_garnish.unwrap_or(false),
        })).collect::<Vec<_>>(),
        "instructions": details.instructions,
        "prep_time": details.prep_time,
        "difficulty": details.difficulty.label(language),
        "glassware": details.glassware,
        "garnish": details.garnish,
        "flavor_profile": details.flavor_profile,
        "image_state": recipe.image_status(),
        "has_image": recipe.image_url().is_some(),
    })
}

fn json_success(value: serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn error_result(error: &AiError, language: Language) -> CallToolResult {
    let body = json!({
        "error": error.code(),
        "message": error.user_message(language),
        "details": error.to_string(),
        "retryable": error.retryable(),
    });
    CallToolResult::error(vec![Content::text(body.to_string())])
}

#[tool_handler]
impl ServerHandler for MixMasterMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server crafts cocktails from the ingredients you have. Add bar ingredients (or identify them from a photo), generate three AI cocktail recipes with images, switch between English and Spanish, keep favorites and share cocktails through links.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
