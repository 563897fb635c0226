use crate::data::csv_template;
use crate::tool::{Output, Tool};
use anyhow::Context;
use clap::{Command, CommandFactory, Parser};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "csv-template",
    about = "Write the CSV template used for bulk inventory imports"
)]
pub struct CsvTemplateTool {
    /// Save the template to a file, or to template_importacao.csv when given without a value
    #[arg(short, long, num_args = 0..=1, default_missing_value = csv_template::FILE_NAME)]
    output: Option<PathBuf>,
}

impl Tool for CsvTemplateTool {
    fn cli() -> Command {
        CsvTemplateTool::command()
    }

    fn execute(&self) -> anyhow::Result<Option<Output>> {
        let body = csv_template::render();

        match &self.output {
            Some(path) => {
                fs::write(path, body).context("Could not write CSV template")?;
                Ok(None)
            }
            None => Ok(Some(Output::Bytes(body.into_bytes()))),
        }
    }
}
