//! Label generation: template registry, QR references, record building,
//! per-label rendering and print document composition.

pub mod print;
pub mod qr;
pub mod record;
pub mod render;
pub mod template;

pub use print::{OutputMode, PrintDocument, compose};
pub use qr::{QrGenerator, QrSource};
pub use record::{LabelBuilder, LabelRecord, LabelSettings};
pub use template::TemplateId;
