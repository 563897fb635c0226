use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::inventory::{Directory, InventoryItem};
use crate::label::qr::{self, QrGenerator};
use crate::label::template::TemplateId;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

const PLACEHOLDER_CODE: &str = "EXEMPLO001";
const PLACEHOLDER_NAME: &str = "Item de Exemplo";
const PLACEHOLDER_CATEGORY: &str = "Categoria";
const PLACEHOLDER_LOCATION: &str = "1º Andar - Sala 101";

/// User choices for one labelling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSettings {
    pub template: TemplateId,
    #[serde(rename = "includeQR")]
    pub include_qr: bool,
    pub include_location: bool,
    pub include_date: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        LabelSettings {
            template: TemplateId::Standard,
            include_qr: true,
            include_location: true,
            include_date: true,
        }
    }
}

/// Turns an item's floor and room references into a display string.
pub trait LocationResolver {
    fn resolve(&self, floor_id: Option<u64>, room_id: Option<u64>) -> String;
}

impl<F> LocationResolver for F
where
    F: Fn(Option<u64>, Option<u64>) -> String,
{
    fn resolve(&self, floor_id: Option<u64>, room_id: Option<u64>) -> String {
        self(floor_id, room_id)
    }
}

impl LocationResolver for Directory {
    // A missing floor or room becomes an empty segment, the separator stays.
    fn resolve(&self, floor_id: Option<u64>, room_id: Option<u64>) -> String {
        format!(
            "{} - {}",
            self.floor_name(floor_id).unwrap_or_default(),
            self.room_name(room_id).unwrap_or_default()
        )
    }
}

/// Snapshot of one item as it will be printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRecord {
    pub code: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub qr: String,
    pub date: String,
    pub template: TemplateId,
}

#[derive(Debug, Clone)]
pub struct LabelBuilder {
    qr: QrGenerator,
    today: NaiveDate,
}

impl Default for LabelBuilder {
    fn default() -> Self {
        LabelBuilder::new()
    }
}

impl LabelBuilder {
    pub fn new() -> Self {
        LabelBuilder {
            qr: QrGenerator::default(),
            today: Local::now().date_naive(),
        }
    }

    pub fn with_qr(mut self, qr: QrGenerator) -> Self {
        self.qr = qr;
        self
    }

    /// Stamp labels with `date` instead of today.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.today = date;
        self
    }

    /// One record per item, in the order given.
    pub fn build<'a, I, R>(
        &self,
        items: I,
        settings: &LabelSettings,
        resolver: &R,
    ) -> Vec<LabelRecord>
    where
        I: IntoIterator<Item = &'a InventoryItem>,
        R: LocationResolver + ?Sized,
    {
        let date = self.today.format(DATE_FORMAT).to_string();

        let records: Vec<LabelRecord> = items
            .into_iter()
            .map(|item| LabelRecord {
                code: item.code.clone(),
                name: item.name.clone(),
                category: item.category.clone(),
                location: resolver.resolve(item.floor_id, item.room_id),
                qr: self.qr.reference(&qr::payload(&item.code, &item.name)),
                date: date.clone(),
                template: settings.template,
            })
            .collect();

        tracing::debug!(
            records = records.len(),
            template = %settings.template,
            "built label batch"
        );

        records
    }

    /// Record shown in the preview while nothing is selected.
    pub fn placeholder(&self, settings: &LabelSettings) -> LabelRecord {
        LabelRecord {
            code: PLACEHOLDER_CODE.to_string(),
            name: PLACEHOLDER_NAME.to_string(),
            category: PLACEHOLDER_CATEGORY.to_string(),
            location: PLACEHOLDER_LOCATION.to_string(),
            qr: self
                .qr
                .reference(&qr::payload(PLACEHOLDER_CODE, PLACEHOLDER_NAME)),
            date: self.today.format(DATE_FORMAT).to_string(),
            template: settings.template,
        }
    }
}
