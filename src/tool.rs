// Represents a tool under assetlabel. Each tool contributes one subcommand.
pub trait Tool {
    // The clap::Command returned here is registered as a subcommand on the
    // assetlabel binary.
    fn cli() -> clap::Command;

    // Run the tool with the context parsed from the cli above.
    fn execute(&self) -> anyhow::Result<Option<Output>>;
}

#[derive(Debug)]
pub enum Output {
    Bytes(Vec<u8>),
    Text(String),
    JsonValue(serde_json::Value),
}
