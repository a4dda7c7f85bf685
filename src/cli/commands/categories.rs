use crate::cli::OutputFormat;
use crate::types::Category;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&Category::ALL)?),
        OutputFormat::Text => {
            for category in Category::ALL {
                println!("{}", category);
            }
        }
    }
    Ok(())
}
