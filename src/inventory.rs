//! Inventory snapshot consumed by the label engine.
//!
//! Items reference floors and rooms by id; the [`Directory`] turns those
//! references into display names. A snapshot is loaded either from JSON or
//! from a bulk import CSV laid out like [`crate::data::csv_template`].

use anyhow::{Context, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: u64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub floor_id: Option<u64>,
    #[serde(default)]
    pub room_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u64,
    #[serde(default)]
    pub floor_id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub floors: Vec<Floor>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Directory {
    pub fn floor_name(&self, id: Option<u64>) -> Option<&str> {
        let id = id?;
        self.floors
            .iter()
            .find(|floor| floor.id == id)
            .map(|floor| floor.name.as_str())
    }

    pub fn room_name(&self, id: Option<u64>) -> Option<&str> {
        let id = id?;
        self.rooms
            .iter()
            .find(|room| room.id == id)
            .map(|room| room.name.as_str())
    }

    fn floor_by_name(&self, name: &str) -> Option<&Floor> {
        self.floors
            .iter()
            .find(|floor| same_name(&floor.name, name))
    }

    // Prefer a room on the given floor when two floors share a room name.
    fn room_by_name(&self, name: &str, floor_id: Option<u64>) -> Option<&Room> {
        let mut matches = self
            .rooms
            .iter()
            .filter(|room| same_name(&room.name, name));
        let first = matches.next()?;
        if floor_id.is_none() || first.floor_id == floor_id {
            return Some(first);
        }

        matches.find(|room| room.floor_id == floor_id).or(Some(first))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(flatten)]
    pub directory: Directory,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let inventory: Inventory =
            serde_json::from_str(text).context("Could not parse inventory JSON")?;
        inventory.validate()?;
        Ok(inventory)
    }

    /// Build an inventory from a bulk import file. Floor and room cells hold
    /// names and are matched against `directory`; unmatched names leave the
    /// reference empty.
    pub fn from_csv(text: &str, directory: Directory) -> anyhow::Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().context("CSV file is empty")?;
        let header: Vec<String> = split_record(header.trim_start_matches('\u{feff}'))
            .context("Could not read CSV header")?
            .into_iter()
            .map(|column| column.trim().to_lowercase())
            .collect();
        let column = |name: &str| header.iter().position(|column| column == name);

        let code_column = column("código").context("CSV header has no 'Código' column")?;
        let name_column = column("nome").context("CSV header has no 'Nome' column")?;
        let category_column = column("categoria");
        let floor_column = column("andar");
        let room_column = column("sala");

        let mut items = Vec::new();
        for (index, line) in lines {
            let fields =
                split_record(line).with_context(|| format!("Could not read line {}", index + 1))?;
            let field = |column: Option<usize>| {
                column
                    .and_then(|column| fields.get(column))
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default()
            };

            let code = field(Some(code_column));
            if code.is_empty() {
                bail!("Line {} has no item code", index + 1);
            }

            let floor_id = Some(field(floor_column))
                .filter(|name| !name.is_empty())
                .and_then(|name| directory.floor_by_name(&name))
                .map(|floor| floor.id);
            let room_id = Some(field(room_column))
                .filter(|name| !name.is_empty())
                .and_then(|name| directory.room_by_name(&name, floor_id))
                .map(|room| room.id);

            items.push(InventoryItem {
                id: items.len() as u64 + 1,
                code,
                name: field(Some(name_column)),
                category: field(category_column),
                floor_id,
                room_id,
            });
        }

        let inventory = Inventory { directory, items };
        inventory.validate()?;
        tracing::debug!(items = inventory.items.len(), "imported inventory from CSV");

        Ok(inventory)
    }

    /// Item codes are unique regardless of case.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.code.to_lowercase()) {
                bail!("Duplicate item code '{}'", item.code);
            }
        }

        Ok(())
    }

    /// Items for the given ids, in the order the ids were given. An empty
    /// selection means every item.
    pub fn select(&self, ids: &[u64]) -> anyhow::Result<Vec<&InventoryItem>> {
        if ids.is_empty() {
            return Ok(self.items.iter().collect());
        }

        ids.iter()
            .map(|id| {
                self.items
                    .iter()
                    .find(|item| item.id == *id)
                    .ok_or_else(|| anyhow!("No item with id {}", id))
            })
            .collect()
    }
}

// Case-insensitive over the whole of Unicode, names carry accents.
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

// Split one CSV line, honouring double quoted fields. A quoted field may not
// continue on the next line.
fn split_record(line: &str) -> anyhow::Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if quoted {
        bail!("Quoted field is not closed before the end of the line");
    }
    fields.push(current);

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Directory {
        Directory {
            floors: vec![
                Floor {
                    id: 2,
                    name: "11º Andar - Tecnologia".to_string(),
                },
                Floor {
                    id: 5,
                    name: "5º Andar".to_string(),
                },
            ],
            rooms: vec![
                Room {
                    id: 7,
                    floor_id: Some(2),
                    name: "Sala de TI".to_string(),
                },
                Room {
                    id: 8,
                    floor_id: Some(5),
                    name: "Sala 501".to_string(),
                },
                Room {
                    id: 9,
                    floor_id: Some(5),
                    name: "Sala de TI".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_from_json() {
        let inventory = Inventory::from_json(
            r#"{
                "floors": [{"id": 2, "name": "11º Andar"}],
                "rooms": [{"id": 7, "floorId": 2, "name": "Sala de TI"}],
                "items": [
                    {"id": 1, "code": "NB001", "name": "Notebook", "category": "Informática", "floorId": 2, "roomId": 7},
                    {"id": 2, "code": "MN001", "name": "Monitor"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(inventory.items.len(), 2);
        assert_eq!(inventory.items[0].room_id, Some(7));
        assert_eq!(inventory.items[1].floor_id, None);
        assert_eq!(inventory.items[1].category, "");
        assert_eq!(inventory.directory.floor_name(Some(2)), Some("11º Andar"));
    }

    #[test]
    fn test_duplicate_codes_are_case_insensitive() {
        let result = Inventory::from_json(
            r#"{"items": [
                {"id": 1, "code": "NB001", "name": "A"},
                {"id": 2, "code": "nb001", "name": "B"}
            ]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_select_preserves_order() {
        let inventory = Inventory::from_json(
            r#"{"items": [
                {"id": 1, "code": "A", "name": "A"},
                {"id": 2, "code": "B", "name": "B"},
                {"id": 3, "code": "C", "name": "C"}
            ]}"#,
        )
        .unwrap();

        let codes: Vec<_> = inventory
            .select(&[3, 1, 2])
            .unwrap()
            .iter()
            .map(|item| item.code.as_str())
            .collect();
        assert_eq!(codes, ["C", "A", "B"]);

        assert_eq!(inventory.select(&[]).unwrap().len(), 3);
        assert!(inventory.select(&[4]).is_err());
    }

    #[test]
    fn test_from_csv() {
        let csv = "Nome,Código,Categoria,Descrição,Valor,Status,Andar,Sala,Fornecedor,Garantia,Número de Série\n\
            \"Notebook Dell, Inspiron\",NB001,Informática,,3500,Ativo,11º andar - tecnologia,Sala de TI,Dell,,\n\
            \n\
            \"Cadeira \"\"Gamer\"\"\",CD001,Mobiliário,,,Ativo,5º Andar,Sala de TI,,,\n\
            Mesa,MS001,Mobiliário,,,Ativo,Subsolo,Sala 501,,,\n";

        let inventory = Inventory::from_csv(csv, directory()).unwrap();
        assert_eq!(inventory.items.len(), 3);

        let notebook = &inventory.items[0];
        assert_eq!(notebook.id, 1);
        assert_eq!(notebook.name, "Notebook Dell, Inspiron");
        assert_eq!(notebook.code, "NB001");
        assert_eq!((notebook.floor_id, notebook.room_id), (Some(2), Some(7)));

        let chair = &inventory.items[1];
        assert_eq!(chair.name, "Cadeira \"Gamer\"");
        assert_eq!((chair.floor_id, chair.room_id), (Some(5), Some(9)));

        let desk = &inventory.items[2];
        assert_eq!((desk.floor_id, desk.room_id), (None, Some(8)));
    }

    #[test]
    fn test_from_csv_requires_code_column() {
        assert!(Inventory::from_csv("Nome,Categoria\nMesa,Mobiliário\n", directory()).is_err());
        assert!(Inventory::from_csv("", directory()).is_err());
    }

    #[test]
    fn test_from_csv_rejects_duplicate_codes() {
        let csv = "Nome,Código\nA,X1\nB,x1\n";
        assert!(Inventory::from_csv(csv, directory()).is_err());
    }

    #[test]
    fn test_from_csv_matches_accented_names_in_any_case() {
        let directory = Directory {
            floors: vec![Floor {
                id: 1,
                name: "Térreo".to_string(),
            }],
            rooms: vec![Room {
                id: 2,
                floor_id: Some(1),
                name: "Recepção".to_string(),
            }],
        };
        let csv = "Nome,Código,Andar,Sala\nMesa,MS1,TÉRREO,RECEPÇÃO\n";

        let inventory = Inventory::from_csv(csv, directory).unwrap();
        let desk = &inventory.items[0];
        assert_eq!((desk.floor_id, desk.room_id), (Some(1), Some(2)));
    }

    #[test]
    fn test_from_csv_rejects_multiline_field() {
        let csv = "Nome,Código\n\"Mesa\nde canto\",MS1\n";
        let error = Inventory::from_csv(csv, directory()).unwrap_err();
        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_split_record() {
        assert_eq!(split_record("a,b,,c").unwrap(), ["a", "b", "", "c"]);
        assert_eq!(split_record("\"a,b\",c").unwrap(), ["a,b", "c"]);
        assert_eq!(split_record("\"say \"\"hi\"\"\"").unwrap(), ["say \"hi\""]);
        assert!(split_record("a,\"open").is_err());
    }
}
