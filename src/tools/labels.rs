use crate::args::BatchArgs;
use crate::label::{self, OutputMode, PrintDocument};
use crate::tool::{Output, Tool};
use anyhow::Context;
use clap::{Command, CommandFactory, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "labels", about = "Generate, preview and print asset labels")]
pub struct LabelsTool {
    #[command(subcommand)]
    command: LabelsCommand,
}

#[derive(Subcommand, Debug)]
enum LabelsCommand {
    /// Build the label records for the selected items
    Generate {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Compose the printable document for the selected items
    Print {
        #[command(flatten)]
        batch: BatchArgs,

        /// Layout of the document
        #[arg(short, long, value_enum, default_value_t = OutputMode::Print)]
        mode: OutputMode,

        /// Save the document to a file instead of printing it to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the print dialog when the document loads
        #[arg(long)]
        no_dialog: bool,
    },
    /// Render a single label, using an example item when nothing is selected
    Preview {
        #[command(flatten)]
        batch: BatchArgs,
    },
}

impl Tool for LabelsTool {
    fn cli() -> Command {
        LabelsTool::command()
    }

    fn execute(&self) -> anyhow::Result<Option<Output>> {
        match &self.command {
            LabelsCommand::Generate { batch } => {
                let (_, records) = batch.records()?;
                Ok(Some(Output::JsonValue(serde_json::to_value(records)?)))
            }
            LabelsCommand::Print {
                batch,
                mode,
                output,
                no_dialog,
            } => {
                let (settings, records) = batch.records()?;
                let mut document = label::compose(&records, &settings, *mode);
                document.auto_print = !no_dialog;

                write_document(&document, output.as_ref())
            }
            LabelsCommand::Preview { batch } => {
                let (settings, records) = batch.records()?;
                let record = records
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| batch.builder().placeholder(&settings));

                let mut document = label::compose(&[record], &settings, OutputMode::Print);
                document.auto_print = false;

                Ok(Some(Output::Text(document.to_html())))
            }
        }
    }
}

fn write_document(
    document: &PrintDocument,
    output: Option<&PathBuf>,
) -> anyhow::Result<Option<Output>> {
    let html = document.to_html();
    tracing::debug!(cells = document.cell_count(), "composed print document");

    match output {
        Some(path) => {
            fs::write(path, html).context("Could not write print document")?;
            Ok(None)
        }
        None => Ok(Some(Output::Text(html))),
    }
}
