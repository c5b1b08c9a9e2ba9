use std::path::PathBuf;

use clap::Args;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use fsplug_core::FileSystem;

#[derive(Args)]
pub struct SearchArgs {
    /// Root directory of the search
    pub directory: PathBuf,
    /// File name pattern (* and ?), e.g. "*.log"
    pub pattern: String,
    /// Only files whose content contains this text (case-insensitive)
    #[arg(long)]
    pub content: Option<String>,
    /// Maximum directory depth
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_depth: Option<u64>,
}

pub async fn run(fs: &FileSystem, args: SearchArgs, json: bool) -> anyhow::Result<()> {
    let max_depth = args
        .max_depth
        .map(|d| usize::try_from(d).unwrap_or(usize::MAX));
    let results = fs
        .search(&args.directory, &args.pattern, args.content.as_deref(), max_depth)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "searchResults": results,
                "total": results.len(),
            }))?
        );
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Path", "Size", "Modified"]);
        for r in &results {
            table.add_row(vec![
                r.path.display().to_string(),
                r.size.to_string(),
                r.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]);
        }
        println!("{table}");
        println!("{} match(es)", results.len());
    }
    Ok(())
}
