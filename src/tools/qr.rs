use crate::label::qr::{DEFAULT_QR_SIZE, payload};
use crate::label::{QrGenerator, QrSource};
use crate::tool::{Output, Tool};
use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser};
use qrcode::QrCode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qr", about = "Build the QR code reference for a label")]
pub struct QRTool {
    /// Item code, or the full text to encode when --name is omitted
    text: String,

    /// Item name, encoded as "<code> - <name>"
    #[arg(short, long)]
    name: Option<String>,

    /// Embed the QR code as an SVG data URI instead of the image service URL
    #[arg(long)]
    inline: bool,

    /// Image size in pixels
    #[arg(short, long, default_value_t = DEFAULT_QR_SIZE)]
    size: u32,

    /// Render the QR code locally and save it to a file (PNG format)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl QRTool {
    fn payload(&self) -> String {
        match &self.name {
            Some(name) => payload(&self.text, name),
            None => self.text.clone(),
        }
    }
}

impl Tool for QRTool {
    fn cli() -> Command {
        QRTool::command()
    }

    fn execute(&self) -> Result<Option<Output>> {
        let text = self.payload();

        if let Some(output_path) = &self.output {
            let code = QrCode::new(&text).context("Failed to generate QR code")?;
            let image = code
                .render::<image::Luma<u8>>()
                .min_dimensions(self.size, self.size)
                .build();

            image
                .save(output_path)
                .context("Failed to save QR code image")?;

            return Ok(None);
        }

        let source = if self.inline {
            QrSource::Inline
        } else {
            QrSource::Remote
        };
        let reference = QrGenerator::new(source, self.size).reference(&text);

        Ok(Some(Output::JsonValue(serde_json::json!(reference))))
    }
}
