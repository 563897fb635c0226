//! Batches rendered labels into a standalone printable HTML document.
//!
//! Both output modes carry the same cells; they only differ in the
//! [`LayoutProfile`] used to lay the grid out. Neither mode produces a binary
//! file: the export profile is tuned for an A4 sheet so the browser's own
//! "save as PDF" produces a paginated document.

use html_escape::encode_text;

use crate::label::record::{LabelRecord, LabelSettings};
use crate::label::render::{self, Include, LabelCell};
use crate::label::template::{TEMPLATES, TemplateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Loose grid for immediate printing
    #[default]
    Print,
    /// Up to four columns on A4 pages, meant to be saved as a file
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Columns {
    /// As many columns of at least this width as fit.
    AutoFit { min_mm: f32 },
    Fixed(u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub size: &'static str,
    pub width_mm: f32,
    pub margin_mm: f32,
}

impl Page {
    pub const A4: Page = Page {
        size: "A4",
        width_mm: 210.0,
        margin_mm: 10.0,
    };

    pub fn printable_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }
}

const EXPORT_COLUMNS: u8 = 4;
const EXPORT_GAP_MM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProfile {
    pub columns: Columns,
    pub gap_mm: f32,
    pub padding_mm: f32,
    pub border: &'static str,
    pub page: Option<Page>,
}

impl OutputMode {
    pub fn profile(&self, active: TemplateId) -> LayoutProfile {
        match self {
            OutputMode::Print => LayoutProfile {
                columns: Columns::AutoFit {
                    min_mm: active.template().width_mm,
                },
                gap_mm: 2.0,
                padding_mm: 5.0,
                border: "1px dashed #999",
                page: None,
            },
            OutputMode::Export => LayoutProfile {
                columns: Columns::Fixed(fitting_columns(
                    active.template().width_mm,
                    Page::A4.printable_width_mm(),
                )),
                gap_mm: EXPORT_GAP_MM,
                padding_mm: 0.0,
                border: "1px solid #000",
                page: Some(Page::A4),
            },
        }
    }
}

// Fixed width labels cannot shrink, so a row never holds more than fit
// between the page margins. Always at least one column.
fn fitting_columns(label_mm: f32, printable_mm: f32) -> u8 {
    let fit = ((printable_mm + EXPORT_GAP_MM) / (label_mm + EXPORT_GAP_MM)).floor();
    (fit.max(1.0) as u8).min(EXPORT_COLUMNS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintDocument {
    pub title: String,
    pub profile: LayoutProfile,
    pub cells: Vec<LabelCell>,
    /// Open the print dialog once the document has loaded.
    pub auto_print: bool,
}

/// Lay out a batch. Every record is rendered under its own template; the
/// active template only names the document and sizes auto-fit columns.
pub fn compose(
    records: &[LabelRecord],
    settings: &LabelSettings,
    mode: OutputMode,
) -> PrintDocument {
    let include = Include::from(settings);
    let cells = records
        .iter()
        .map(|record| render::render(record, record.template, include))
        .collect();

    PrintDocument {
        title: format!("Etiquetas - {}", settings.template.template().name),
        profile: mode.profile(settings.template),
        cells,
        auto_print: true,
    }
}

impl PrintDocument {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn to_html(&self) -> String {
        let cells: String = self.cells.iter().map(LabelCell::to_html).collect();
        let script = if self.auto_print {
            "<script>window.addEventListener('load', () => window.print());</script>"
        } else {
            ""
        };

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n<div class=\"labels\">{}</div>\n{}\n</body>\n</html>\n",
            encode_text(&self.title),
            stylesheet(&self.profile),
            cells,
            script,
        )
    }
}

fn stylesheet(profile: &LayoutProfile) -> String {
    let mut css = String::new();

    if let Some(page) = &profile.page {
        css.push_str(&format!(
            "@page {{ size: {}; margin: {}mm; }}\n",
            page.size, page.margin_mm
        ));
    }

    let columns = match profile.columns {
        Columns::AutoFit { min_mm } => {
            format!("repeat(auto-fill, minmax({}mm, max-content))", min_mm)
        }
        Columns::Fixed(count) => format!("repeat({}, 1fr)", count),
    };

    css.push_str(&format!(
        "body {{ margin: 0; padding: {}mm; font-family: Arial, sans-serif; }}\n",
        profile.padding_mm
    ));
    css.push_str(&format!(
        ".labels {{ display: grid; grid-template-columns: {}; gap: {}mm; }}\n",
        columns, profile.gap_mm
    ));
    css.push_str(&format!(
        ".label {{ box-sizing: border-box; border: {}; padding: 1.5mm; overflow: hidden; display: flex; flex-direction: column; justify-content: center; align-items: center; text-align: center; page-break-inside: avoid; break-inside: avoid; }}\n",
        profile.border
    ));

    for template in &TEMPLATES {
        css.push_str(&format!(
            ".label.{} {{ width: {}mm; height: {}mm; }}\n",
            template.id.tag(),
            template.width_mm,
            template.height_mm
        ));
    }

    css.push_str(".label-code { font-weight: bold; font-size: 10pt; }\n");
    css.push_str(
        ".label-name { font-size: 8pt; max-width: 100%; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }\n",
    );
    css.push_str(".label-qr { width: 15mm; height: 15mm; margin: 1mm 0; }\n");
    css.push_str(".label.qrOnly { padding: 0.5mm; }\n");
    css.push_str(".label.qrOnly .label-qr { width: 100%; height: 100%; margin: 0; object-fit: contain; }\n");
    css.push_str(".label-location, .label-date { font-size: 7pt; color: #333; }\n");

    css
}
