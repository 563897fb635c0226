use qrcode::QrCode;
use qrcode::render::svg;

pub const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrSource {
    /// Image URL on the hosted QR rendering service.
    #[default]
    Remote,
    /// SVG encoded locally and embedded as a data URI.
    Inline,
}

/// Produces references to scannable code images. Nothing is fetched here,
/// the reference is resolved by whatever ends up displaying the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrGenerator {
    pub source: QrSource,
    pub size_px: u32,
}

impl Default for QrGenerator {
    fn default() -> Self {
        QrGenerator {
            source: QrSource::Remote,
            size_px: DEFAULT_QR_SIZE,
        }
    }
}

impl QrGenerator {
    pub fn new(source: QrSource, size_px: u32) -> Self {
        QrGenerator { source, size_px }
    }

    pub fn reference(&self, text: &str) -> String {
        match self.source {
            QrSource::Remote => self.remote(text),
            QrSource::Inline => match self.inline(text) {
                Ok(uri) => uri,
                Err(err) => {
                    tracing::warn!(%err, "could not encode QR locally, using the remote service");
                    self.remote(text)
                }
            },
        }
    }

    fn remote(&self, text: &str) -> String {
        format!(
            "{}?size={}x{}&data={}",
            QR_SERVICE_URL,
            self.size_px,
            self.size_px,
            urlencoding::encode(text)
        )
    }

    fn inline(&self, text: &str) -> anyhow::Result<String> {
        let code = QrCode::new(text.as_bytes())?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.size_px, self.size_px)
            .build();

        Ok(format!(
            "data:image/svg+xml;utf8,{}",
            urlencoding::encode(&image)
        ))
    }
}

/// The text a label's QR code carries for an item.
pub fn payload(code: &str, name: &str) -> String {
    format!("{} - {}", code, name)
}
