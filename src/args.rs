use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

use crate::inventory::{Directory, Inventory};
use crate::label::qr::DEFAULT_QR_SIZE;
use crate::label::{LabelBuilder, LabelRecord, LabelSettings, QrGenerator, QrSource, TemplateId};

/// Contents of a file argument. "-" reads from stdin.
#[derive(Debug, Clone)]
pub struct InputFile(pub String);

impl FromStr for InputFile {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(InputFile(buffer))
        } else {
            fs::read_to_string(s).map(InputFile)
        }
    }
}

impl AsRef<str> for InputFile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Arguments shared by every tool that builds a label batch.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Inventory file (JSON, or CSV with --csv). Use "-" to read from stdin
    #[arg(short, long)]
    pub inventory: Option<InputFile>,

    /// Read the inventory as a bulk import CSV
    #[arg(long)]
    pub csv: bool,

    /// Floors and rooms (JSON) used to resolve the Andar and Sala columns of a CSV import
    #[arg(long, requires = "csv")]
    pub directory: Option<InputFile>,

    /// Comma separated item ids in print order (defaults to every item)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<u64>,

    /// Label settings file (JSON)
    #[arg(long)]
    pub settings: Option<InputFile>,

    /// Label template: standard, compact, detailed or qrOnly
    #[arg(short, long)]
    pub template: Option<String>,

    /// Leave the QR code off the label
    #[arg(long)]
    pub no_qr: bool,

    /// Leave the location off the label
    #[arg(long)]
    pub no_location: bool,

    /// Leave the date off the label
    #[arg(long)]
    pub no_date: bool,

    /// Embed QR codes as SVG instead of linking the QR image service
    #[arg(long)]
    pub inline_qr: bool,

    /// QR image size in pixels
    #[arg(long, default_value_t = DEFAULT_QR_SIZE)]
    pub qr_size: u32,

    /// Date printed on the labels, as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

// Matches the clap defaults.
impl Default for BatchArgs {
    fn default() -> Self {
        BatchArgs {
            inventory: None,
            csv: false,
            directory: None,
            select: Vec::new(),
            settings: None,
            template: None,
            no_qr: false,
            no_location: false,
            no_date: false,
            inline_qr: false,
            qr_size: DEFAULT_QR_SIZE,
            date: None,
        }
    }
}

impl BatchArgs {
    pub fn inventory(&self) -> anyhow::Result<Inventory> {
        let Some(input) = &self.inventory else {
            return Ok(Inventory::default());
        };

        if self.csv {
            let directory = match &self.directory {
                Some(directory) => serde_json::from_str::<Directory>(directory.as_ref())
                    .context("Could not parse directory JSON")?,
                None => Directory::default(),
            };
            Inventory::from_csv(input.as_ref(), directory).context("Could not import CSV")
        } else {
            Inventory::from_json(input.as_ref())
        }
    }

    // Flags given on the command line win over the settings file.
    pub fn settings(&self) -> anyhow::Result<LabelSettings> {
        let mut settings = match &self.settings {
            Some(input) => serde_json::from_str::<LabelSettings>(input.as_ref())
                .context("Could not parse label settings")?,
            None => LabelSettings::default(),
        };

        if let Some(tag) = &self.template {
            settings.template = TemplateId::from_tag(tag);
        }
        if self.no_qr {
            settings.include_qr = false;
        }
        if self.no_location {
            settings.include_location = false;
        }
        if self.no_date {
            settings.include_date = false;
        }

        Ok(settings)
    }

    pub fn builder(&self) -> LabelBuilder {
        let source = if self.inline_qr {
            QrSource::Inline
        } else {
            QrSource::Remote
        };

        let builder = LabelBuilder::new().with_qr(QrGenerator::new(source, self.qr_size));
        match self.date {
            Some(date) => builder.on(date),
            None => builder,
        }
    }

    /// Build the batch for the selected items.
    pub fn records(&self) -> anyhow::Result<(LabelSettings, Vec<LabelRecord>)> {
        let settings = self.settings()?;
        let inventory = self.inventory()?;
        let items = inventory
            .select(&self.select)
            .context("Could not select items")?;

        let records = self
            .builder()
            .build(items, &settings, &inventory.directory);

        Ok((settings, records))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const INVENTORY: &str = r#"{
        "floors": [{"id": 2, "name": "11º Andar - Tecnologia"}],
        "rooms": [{"id": 7, "floorId": 2, "name": "Sala de TI"}],
        "items": [
            {"id": 1, "code": "NB001", "name": "Notebook Dell Inspiron", "category": "Informática", "floorId": 2, "roomId": 7},
            {"id": 2, "code": "MN001", "name": "Monitor LG", "category": "Informática", "floorId": 2},
            {"id": 3, "code": "CD001", "name": "Cadeira", "category": "Mobiliário"}
        ]
    }"#;

    pub(crate) fn batch() -> BatchArgs {
        BatchArgs {
            inventory: Some(InputFile(INVENTORY.to_string())),
            ..BatchArgs::default()
        }
    }

    #[test]
    fn test_records_follow_selection() {
        let args = BatchArgs {
            select: vec![3, 1],
            ..batch()
        };
        let (_, records) = args.records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "CD001");
        assert_eq!(records[0].location, " - ");
        assert_eq!(records[1].code, "NB001");
        assert_eq!(records[1].location, "11º Andar - Tecnologia - Sala de TI");
    }

    #[test]
    fn test_records_without_inventory() {
        let (_, records) = BatchArgs::default().records().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_default_matches_command_line() {
        #[derive(clap::Parser)]
        struct Cli {
            #[command(flatten)]
            batch: BatchArgs,
        }

        let parsed = <Cli as clap::Parser>::parse_from(["assetlabel"]).batch;
        let default = BatchArgs::default();
        assert_eq!(default.qr_size, DEFAULT_QR_SIZE);
        assert_eq!(parsed.qr_size, default.qr_size);
        assert_eq!(parsed.select, default.select);
        assert!(!parsed.csv && !parsed.no_qr && !parsed.inline_qr);

        let placeholder = default.builder().placeholder(&default.settings().unwrap());
        assert!(placeholder.qr.contains("size=100x100"));
    }

    #[test]
    fn test_unknown_selection() {
        let args = BatchArgs {
            select: vec![42],
            ..batch()
        };
        assert!(args.records().is_err());
    }

    #[test]
    fn test_flags_override_settings_file() {
        let args = BatchArgs {
            settings: Some(InputFile(
                r#"{"template": "detailed", "includeQR": true, "includeDate": true}"#.to_string(),
            )),
            template: Some("compact".to_string()),
            no_date: true,
            ..batch()
        };
        let settings = args.settings().unwrap();

        assert_eq!(settings.template, TemplateId::Compact);
        assert!(settings.include_qr);
        assert!(!settings.include_date);
    }

    #[test]
    fn test_unknown_template_flag() {
        let args = BatchArgs {
            template: Some("bogus".to_string()),
            ..batch()
        };
        assert_eq!(args.settings().unwrap().template, TemplateId::Standard);
    }

    #[test]
    fn test_fixed_date() {
        let args = BatchArgs {
            date: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..batch()
        };
        let (_, records) = args.records().unwrap();
        assert!(records.iter().all(|record| record.date == "31/01/2025"));
    }

    #[test]
    fn test_csv_inventory() {
        let args = BatchArgs {
            inventory: Some(InputFile(
                "Nome,Código,Andar,Sala\nNotebook,NB001,11º Andar - Tecnologia,Sala de TI\n"
                    .to_string(),
            )),
            csv: true,
            directory: Some(InputFile(INVENTORY.to_string())),
            ..batch()
        };
        let (_, records) = args.records().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, "11º Andar - Tecnologia - Sala de TI");
    }
}
