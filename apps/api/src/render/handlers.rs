//! Axum route handlers for the CV form and document download.

use anyhow::Context;
use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::{render, DOCX_MIME_TYPE};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
///
/// Serves the CV form. The page posts its fields as JSON to `/create-cv`.
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /create-cv
///
/// Renders the submitted résumé and returns it as a DOCX attachment.
/// Missing identity or contact fields are rejected with 400 before any rendering.
/// Bodies that are not a JSON résumé get the same JSON error envelope.
pub async fn handle_create_cv(
    payload: Result<Json<ResumeRecord>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(record) = payload?;
    let (first_name, last_name) = (record.first_name.clone(), record.last_name.clone());

    let document = tokio::task::spawn_blocking(move || render(&record))
        .await
        .context("CV render task failed to complete")??;

    let filename = download_filename(&first_name, &last_name, Local::now().naive_local());

    info!(filename = %filename, bytes = document.len(), "Generated CV document");

    let headers = [
        (header::CONTENT_TYPE, DOCX_MIME_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, document))
}

/// `CV_<First>_<Last>_<YYYYmmdd_HHMMSS>.docx`
pub fn download_filename(first_name: &str, last_name: &str, at: NaiveDateTime) -> String {
    format!(
        "CV_{}_{}_{}.docx",
        filename_part(first_name),
        filename_part(last_name),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Keeps ASCII alphanumerics, `-` and `_`; anything else becomes `_`.
fn filename_part(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_download_filename_pattern() {
        assert_eq!(
            download_filename("Ada", "Lovelace", at()),
            "CV_Ada_Lovelace_20240309_140507.docx"
        );
    }

    #[test]
    fn test_download_filename_replaces_unsafe_characters() {
        assert_eq!(
            download_filename("Jean Luc", "O\"Brien/é", at()),
            "CV_Jean_Luc_O_Brien___20240309_140507.docx"
        );
    }

    #[test]
    fn test_index_page_posts_to_create_cv() {
        assert!(INDEX_HTML.contains("/create-cv"));
    }
}
