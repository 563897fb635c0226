use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::label::record::{LabelRecord, LabelSettings};
use crate::label::template::TemplateId;

/// Which optional fields a template may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include {
    pub qr: bool,
    pub location: bool,
    pub date: bool,
}

impl From<&LabelSettings> for Include {
    fn from(settings: &LabelSettings) -> Self {
        Include {
            qr: settings.include_qr,
            location: settings.include_location,
            date: settings.include_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelField {
    Code(String),
    Name(String),
    Qr(String),
    Location(String),
    Date(String),
}

/// A rendered label, independent of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCell {
    pub template: TemplateId,
    pub fields: Vec<LabelField>,
}

pub fn render(record: &LabelRecord, template: TemplateId, include: Include) -> LabelCell {
    let code = || LabelField::Code(record.code.clone());
    let name = || LabelField::Name(record.name.clone());
    let qr = || LabelField::Qr(record.qr.clone());

    let fields = match template {
        TemplateId::QrOnly => vec![qr()],
        TemplateId::Compact => vec![code()],
        TemplateId::Standard => {
            let mut fields = vec![code(), name()];
            if include.qr {
                fields.push(qr());
            }
            fields
        }
        TemplateId::Detailed => {
            let mut fields = vec![code(), name()];
            if include.qr {
                fields.push(qr());
            }
            if include.location {
                fields.push(LabelField::Location(record.location.clone()));
            }
            if include.date {
                fields.push(LabelField::Date(record.date.clone()));
            }
            fields
        }
    };

    LabelCell { template, fields }
}

impl LabelCell {
    pub fn to_html(&self) -> String {
        let mut html = format!(r#"<div class="label {}">"#, self.template.tag());

        for field in &self.fields {
            match field {
                LabelField::Code(code) => html.push_str(&format!(
                    r#"<div class="label-code">{}</div>"#,
                    encode_text(code)
                )),
                LabelField::Name(name) => html.push_str(&format!(
                    r#"<div class="label-name" title="{}">{}</div>"#,
                    encode_double_quoted_attribute(name),
                    encode_text(name)
                )),
                LabelField::Qr(src) => html.push_str(&format!(
                    r#"<img class="label-qr" src="{}" alt="QR Code">"#,
                    encode_double_quoted_attribute(src)
                )),
                LabelField::Location(location) => html.push_str(&format!(
                    r#"<div class="label-location">{}</div>"#,
                    encode_text(location)
                )),
                LabelField::Date(date) => html.push_str(&format!(
                    r#"<div class="label-date">{}</div>"#,
                    encode_text(date)
                )),
            }
        }

        html.push_str("</div>");
        html
    }
}
