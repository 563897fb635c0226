use crate::args::BatchArgs;
use crate::data::csv_template;
use crate::label::{self, LabelRecord, OutputMode};
use crate::tool::{Output, Tool};
use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use clap::{Command, CommandFactory, Parser};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "serve",
    about = "Serve a label batch to a browser for printing or saving as PDF"
)]
pub struct ServeTool {
    #[command(flatten)]
    batch: BatchArgs,

    /// Port number the server should listen to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address the server should bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

// Everything is composed once at startup, the batch never changes afterwards.
#[derive(Debug)]
struct Batch {
    print: String,
    export: String,
    records: Vec<LabelRecord>,
}

impl Tool for ServeTool {
    fn cli() -> Command {
        ServeTool::command()
    }

    fn execute(&self) -> anyhow::Result<Option<Output>> {
        tokio::runtime::Runtime::new()
            .context("Could not create tokio runtime")?
            .block_on(self.run())
            .context("Could not run server")?;

        Ok(None)
    }
}

impl ServeTool {
    async fn run(&self) -> anyhow::Result<()> {
        let (settings, records) = self.batch.records()?;
        let batch = Batch {
            print: label::compose(&records, &settings, OutputMode::Print).to_html(),
            export: label::compose(&records, &settings, OutputMode::Export).to_html(),
            records,
        };
        tracing::debug!(labels = batch.records.len(), "label batch ready");

        let listener = tokio::net::TcpListener::bind(format!("{}:{}", self.host, self.port))
            .await
            .context("Could not setup listener")?;

        tracing::info!("labels available on http://{}:{}/", self.host, self.port);
        axum::serve(listener, router(batch))
            .await
            .context("Could not serve")?;

        Ok(())
    }
}

fn router(batch: Batch) -> Router {
    Router::new()
        .route("/", get(print_document))
        .route("/export", get(export_document))
        .route("/labels.json", get(records))
        .route("/template.csv", get(template_csv))
        .with_state(Arc::new(batch))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

async fn print_document(State(batch): State<Arc<Batch>>) -> Html<String> {
    Html(batch.print.clone())
}

async fn export_document(State(batch): State<Arc<Batch>>) -> Html<String> {
    Html(batch.export.clone())
}

async fn records(State(batch): State<Arc<Batch>>) -> Json<Vec<LabelRecord>> {
    Json(batch.records.clone())
}

async fn template_csv() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", csv_template::FILE_NAME),
            ),
        ],
        csv_template::render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tests::batch;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let (settings, records) = batch().records().unwrap();
        router(Batch {
            print: label::compose(&records, &settings, OutputMode::Print).to_html(),
            export: label::compose(&records, &settings, OutputMode::Export).to_html(),
            records,
        })
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_print_document() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches(r#"<div class="label standard">"#).count(), 3);
        assert!(!body.contains("@page"));
    }

    #[tokio::test]
    async fn test_export_document() {
        let (status, body) = get_body("/export").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("@page { size: A4; margin: 10mm; }"));
    }

    #[tokio::test]
    async fn test_records() {
        let (status, body) = get_body("/labels.json").await;
        assert_eq!(status, StatusCode::OK);

        let records: Vec<LabelRecord> = serde_json::from_str(&body).unwrap();
        let codes: Vec<_> = records.iter().map(|record| record.code.as_str()).collect();
        assert_eq!(codes, ["NB001", "MN001", "CD001"]);
    }

    #[tokio::test]
    async fn test_template_csv() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/template.csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_body("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
