use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The closed set of label layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateId {
    #[default]
    Standard,
    Compact,
    Detailed,
    QrOnly,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Standard,
        TemplateId::Compact,
        TemplateId::Detailed,
        TemplateId::QrOnly,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            TemplateId::Standard => "standard",
            TemplateId::Compact => "compact",
            TemplateId::Detailed => "detailed",
            TemplateId::QrOnly => "qrOnly",
        }
    }

    /// Lenient lookup used wherever a bad tag must not abort a batch.
    /// Anything unknown is treated as the standard layout.
    pub fn from_tag(tag: &str) -> TemplateId {
        match tag.parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(tag, "unknown label template, using standard");
                TemplateId::Standard
            }
        }
    }

    pub fn template(&self) -> &'static Template {
        match self {
            TemplateId::Standard => &TEMPLATES[0],
            TemplateId::Compact => &TEMPLATES[1],
            TemplateId::Detailed => &TEMPLATES[2],
            TemplateId::QrOnly => &TEMPLATES[3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown template '{}', expected one of standard, compact, detailed, qrOnly",
            self.0
        )
    }
}

impl std::error::Error for UnknownTemplate {}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.tag() == s)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for TemplateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for TemplateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(TemplateId::from_tag(&tag))
    }
}

/// Physical label definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: &'static str,
    pub width_mm: f32,
    pub height_mm: f32,
    pub description: &'static str,
}

pub static TEMPLATES: [Template; 4] = [
    Template {
        id: TemplateId::Standard,
        name: "Padrão (50x30mm)",
        width_mm: 50.0,
        height_mm: 30.0,
        description: "Código, nome e QR Code",
    },
    Template {
        id: TemplateId::Compact,
        name: "Compacta (40x20mm)",
        width_mm: 40.0,
        height_mm: 20.0,
        description: "Apenas o código",
    },
    Template {
        id: TemplateId::Detailed,
        name: "Detalhada (70x40mm)",
        width_mm: 70.0,
        height_mm: 40.0,
        description: "Código, nome, QR Code, localização e data",
    },
    Template {
        id: TemplateId::QrOnly,
        name: "Apenas QR (25x25mm)",
        width_mm: 25.0,
        height_mm: 25.0,
        description: "Somente o QR Code",
    },
];

/// Strict registry lookup.
pub fn resolve(tag: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id.tag() == tag)
}
