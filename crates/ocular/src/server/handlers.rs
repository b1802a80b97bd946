//! Request handlers for the three routes.

use super::error::ApiError;
use super::AppState;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use ocular_core::llm::GenerationResult;
use ocular_core::{upload, ImageInput};
use serde_json::{json, Value};

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// Minimal HTML escaping for text interpolated into the index page.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `GET /` — the upload form, listing the selectable models.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut options = format!(
        "<option value=\"local\">本地模型 ({})</option>",
        escape_html(&state.config.model.name)
    );
    if state.config.openrouter.enabled {
        for model in &state.config.openrouter.models {
            options.push_str(&format!(
                "<option value=\"openrouter:{}\">{}</option>",
                escape_html(&model.name),
                escape_html(&model.display_name)
            ));
        }
    }

    let page = INDEX_TEMPLATE
        .replace("{{title}}", &escape_html(&state.config.app.title))
        .replace("{{version}}", &escape_html(&state.config.app.version))
        .replace(
            "{{default_prompt}}",
            &escape_html(&state.config.model.default_prompt),
        )
        .replace("{{model_options}}", &options);

    Html(page)
}

/// One uploaded file part.
struct Upload {
    bytes: axum::body::Bytes,
    content_type: Option<String>,
    filename: Option<String>,
}

/// `POST /api/generate` — validate the upload, dispatch one backend
/// call, and return `{content, usage, latency}`.
pub async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerationResult>, ApiError> {
    let mut prompt: Option<String> = None;
    let mut model: Option<String> = None;
    let mut file: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("无效的表单数据: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                prompt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("无效的表单数据: {e}")))?,
                );
            }
            Some("model") => {
                model = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("无效的表单数据: {e}")))?,
                );
            }
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("无效的表单数据: {e}")))?;
                file = Some(Upload {
                    bytes,
                    content_type,
                    filename,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("缺少上传文件"))?;
    let allowed = &state.config.model.allowed_mime_types;

    upload::check_declared_media_type(file.content_type.as_deref(), allowed)?;
    upload::check_payload(&file.bytes)?;
    let mime_type =
        upload::resolve_media_type(file.content_type.as_deref(), file.filename.as_deref(), allowed)?;

    let prompt = prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(&state.config.model.default_prompt)
        .to_string();
    let selector = model.as_deref().unwrap_or("local");

    tracing::info!(
        "generation request: model={selector}, file_size={} bytes, mime_type={mime_type}",
        file.bytes.len()
    );

    let image = ImageInput::from_bytes(&file.bytes, &mime_type);
    let call = state.dispatcher.resolve(selector)?;
    let result = call.run(&prompt, &image).await?;

    tracing::info!(
        "generation finished: model={}, latency={:.2}s, content_len={}",
        call.model(),
        result.latency,
        result.content.len()
    );

    Ok(Json(result))
}

/// `GET /health` — liveness plus backend availability.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "local_model": state.config.model.name,
        "openrouter_enabled": state.config.openrouter.enabled,
    }))
}
