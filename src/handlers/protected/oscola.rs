// handlers/protected/oscola.rs - /api/oscola citation tools
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::handlers::validate::optional_text;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, SessionUser};
use crate::services::oscola::{
    format_reference, guidance, parse_citation, validate_bibliography, BibliographyReport, CitationKind,
    ReferenceFields,
};

pub const MAX_BIBLIOGRAPHY: usize = 200;

#[derive(Debug, Deserialize)]
pub struct FormatBody {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub fields: Option<ReferenceFields>,
    pub citation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateBody {
    pub citations: Option<Vec<String>>,
}

/// `None` for an absent or `auto` type
fn citation_kind(raw: Option<String>) -> Result<Option<CitationKind>, ApiError> {
    match optional_text(raw).map(|k| k.to_ascii_lowercase()).as_deref() {
        None | Some("auto") => Ok(None),
        Some("case") => Ok(Some(CitationKind::Case)),
        Some("statute") => Ok(Some(CitationKind::Statute)),
        Some("book") => Ok(Some(CitationKind::Book)),
        Some("article") => Ok(Some(CitationKind::Article)),
        Some("website") => Ok(Some(CitationKind::Website)),
        Some(_) => Err(ApiError::invalid_field(
            "type",
            "Must be auto, case, statute, book, article or website",
        )),
    }
}

/// POST /api/oscola/format
///
/// `{type, fields}` builds a citation from parts; `{citation, type?}` normalises free text.
pub async fn format(user: SessionUser, ApiJson(body): ApiJson<FormatBody>) -> Result<Response, ApiError> {
    let kind = citation_kind(body.kind)?;

    if let Some(fields) = body.fields {
        let kind = kind.ok_or_else(|| ApiError::missing_field("type"))?;
        let formatted = format_reference(kind, &fields);
        tracing::debug!(user_id = %user.id, kind = kind.as_str(), "Formatted OSCOLA reference");
        return Ok(ApiResponse::success(formatted).into_response());
    }

    let citation = optional_text(body.citation)
        .ok_or_else(|| ApiError::bad_request("Send { type, fields } to build a citation or { citation } to check one"))?;
    let parsed = parse_citation(&citation, kind).map_err(ApiError::bad_request)?;
    tracing::debug!(user_id = %user.id, valid = parsed.valid, "Parsed OSCOLA citation");
    Ok(ApiResponse::success(parsed).into_response())
}

/// POST /api/oscola/validate
pub async fn validate(_user: SessionUser, ApiJson(body): ApiJson<ValidateBody>) -> ApiResult<BibliographyReport> {
    let citations = body.citations.ok_or_else(|| ApiError::missing_field("citations"))?;
    if citations.is_empty() || citations.len() > MAX_BIBLIOGRAPHY {
        return Err(ApiError::invalid_field(
            "citations",
            format!("Must hold between 1 and {} citations", MAX_BIBLIOGRAPHY),
        ));
    }
    Ok(ApiResponse::success(validate_bibliography(&citations)))
}

/// GET /api/oscola/examples
pub async fn examples(_user: SessionUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(guidance()))
}
