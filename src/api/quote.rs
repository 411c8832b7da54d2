//! Instant quote for an uploaded model.

use super::{AppState, upload::read_form};
use crate::{
    core::{
        catalog::format_currency,
        mesh::{self, ModelFormat},
        pricing::{self, PrintConfig, Quote},
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

/// Quote plus display strings for the storefront
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub file_name: String,
    /// True when the model could not be measured and a 50 mm cube was assumed
    pub placeholder: bool,
    pub triangle_count: usize,
    #[serde(flatten)]
    pub quote: Quote,
    pub formatted_unit_price: String,
    pub formatted_total: String,
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("Field '{name}' must be a number, got '{value}'")))
}

/// Applies the submitted form fields over the default print settings.
fn config_from_fields(fields: Vec<(String, String)>) -> Result<PrintConfig> {
    let mut config = PrintConfig::default();
    for (name, value) in fields {
        match name.as_str() {
            "material" => config.material = value.trim().to_ascii_lowercase(),
            "quality" => config.quality = value.trim().to_ascii_lowercase(),
            "infill" => config.infill = parse_number(&name, &value)?,
            "scale" => config.scale = parse_number(&name, &value)?,
            "quantity" => config.quantity = parse_number(&name, &value)?,
            other => tracing::debug!(field = other, "Ignoring unknown quote field"),
        }
    }
    Ok(config)
}

/// `POST /api/boxprint/quote`
pub async fn quote(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuoteResponse>> {
    let (file, fields) = read_form(multipart).await?;
    let config = config_from_fields(fields)?;
    pricing::validate_config(&config)?;

    // formats the inspector cannot read are quoted as the placeholder box
    let extension = ModelFormat::extension_of(&file.file_name).unwrap_or_default();

    let strategy = state.volume.clone();
    let bytes = file.bytes;
    let model = tokio::task::spawn_blocking(move || {
        mesh::inspect_model(&bytes, &extension, strategy.as_ref())
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e)))??;

    let quote = pricing::quote(&model, &config)?;
    Ok(Json(QuoteResponse {
        file_name: file.file_name,
        placeholder: model.placeholder,
        triangle_count: model.triangle_count,
        formatted_unit_price: format_currency(quote.breakdown.unit_price),
        formatted_total: format_currency(quote.breakdown.total_price),
        quote,
    }))
}
