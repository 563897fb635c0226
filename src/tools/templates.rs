use crate::label::template::{self, TEMPLATES};
use crate::tool::{Output, Tool};
use anyhow::anyhow;
use clap::{Command, CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(name = "templates", about = "List the available label templates")]
pub struct TemplatesTool {
    /// Show a single template (standard, compact, detailed or qrOnly)
    template: Option<String>,
}

impl Tool for TemplatesTool {
    fn cli() -> Command {
        TemplatesTool::command()
    }

    fn execute(&self) -> anyhow::Result<Option<Output>> {
        let value = match &self.template {
            Some(tag) => {
                let template = template::resolve(tag)
                    .ok_or_else(|| anyhow!("Unknown template '{}'", tag))?;
                serde_json::to_value(template)?
            }
            None => serde_json::to_value(&TEMPLATES)?,
        };

        Ok(Some(Output::JsonValue(value)))
    }
}
