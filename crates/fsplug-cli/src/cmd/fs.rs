use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use fsplug_core::listing::ListingNode;
use fsplug_core::ops::Encoding;
use fsplug_core::FileSystem;

#[derive(Subcommand)]
pub enum FsCommands {
    /// List directory contents
    Ls {
        /// Directory path
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Include entries starting with '.'
        #[arg(short, long)]
        all: bool,
        /// Descend into subdirectories (at most five levels)
        #[arg(short, long)]
        recursive: bool,
    },
    /// Print file contents
    Cat {
        /// File path
        path: PathBuf,
        /// utf8 or base64
        #[arg(long, default_value = "utf8")]
        encoding: String,
    },
    /// Write data to a file
    Write {
        /// File path
        path: PathBuf,
        /// Content to write (use - for stdin)
        content: String,
        /// Do not create missing parent directories
        #[arg(long)]
        no_parents: bool,
    },
    /// Create a directory and any missing parents
    Mkdir {
        /// Directory path
        path: PathBuf,
    },
    /// Remove a file
    Rm {
        /// File path
        path: PathBuf,
    },
    /// Remove a directory
    Rmdir {
        /// Directory path
        path: PathBuf,
        /// Remove contents as well
        #[arg(short, long)]
        recursive: bool,
    },
    /// Copy a file
    Cp {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Replace an existing destination
        #[arg(long)]
        overwrite: bool,
    },
    /// Move/rename a file
    Mv {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Replace an existing destination
        #[arg(long)]
        overwrite: bool,
    },
    /// Show file/directory metadata
    Stat {
        /// Path to stat
        path: PathBuf,
    },
}

pub async fn run(fs: &FileSystem, cmd: FsCommands, json: bool) -> anyhow::Result<()> {
    match cmd {
        FsCommands::Ls {
            path,
            all,
            recursive,
        } => {
            let nodes = fs.list_directory(&path, all, recursive).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else if recursive {
                println!("{}", path.display());
                print_forest(&nodes, "");
            } else {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL_CONDENSED);
                table.set_header(vec!["Name", "Type", "Size", "Mode", "Modified"]);
                for node in &nodes {
                    let e = &node.entry;
                    table.add_row(vec![
                        e.name.clone(),
                        e.kind.to_string(),
                        e.size.to_string(),
                        e.permissions.clone(),
                        e.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ]);
                }
                println!("{table}");
            }
        }
        FsCommands::Cat { path, encoding } => {
            let encoding: Encoding = encoding.parse()?;
            let file = fs.read_file(&path, encoding).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                print!("{}", file.content);
            }
        }
        FsCommands::Write {
            path,
            content,
            no_parents,
        } => {
            let data = if content == "-" {
                use std::io::Read;
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("reading content from stdin")?;
                buf
            } else {
                content
            };
            let receipt = fs
                .write_file(&path, &data, Encoding::Utf8, !no_parents)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!("Wrote {} bytes to {}", receipt.size, path.display());
            }
        }
        FsCommands::Mkdir { path } => {
            fs.create_directory(&path, true).await?;
            if json {
                println!("{}", serde_json::json!({ "created": path }));
            } else {
                println!("Created directory {}", path.display());
            }
        }
        FsCommands::Rm { path } => {
            fs.delete_file(&path).await?;
            if json {
                println!("{}", serde_json::json!({ "removed": path }));
            } else {
                println!("Removed {}", path.display());
            }
        }
        FsCommands::Rmdir { path, recursive } => {
            fs.delete_directory(&path, recursive).await?;
            if json {
                println!("{}", serde_json::json!({ "removed": path, "recursive": recursive }));
            } else {
                println!("Removed directory {}", path.display());
            }
        }
        FsCommands::Cp {
            from,
            to,
            overwrite,
        } => {
            let receipt = fs.copy_file(&from, &to, overwrite).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!(
                    "Copied {} → {} ({} bytes)",
                    from.display(),
                    to.display(),
                    receipt.size
                );
            }
        }
        FsCommands::Mv {
            from,
            to,
            overwrite,
        } => {
            let receipt = fs.move_file(&from, &to, overwrite).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                println!("Moved {} → {}", from.display(), to.display());
            }
        }
        FsCommands::Stat { path } => {
            let st = fs.stat(&path).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&st)?);
            } else {
                let flag = |b: bool| if b { "yes" } else { "no" };
                println!("  Path:        {}", st.path.display());
                println!("  Type:        {}", st.kind);
                println!("  Size:        {}", st.size);
                println!("  Mode:        {}", st.permissions);
                match st.created {
                    Some(created) => println!("  Created:     {created}"),
                    None => println!("  Created:     -"),
                }
                println!("  Modified:    {}", st.modified);
                println!("  Accessed:    {}", st.accessed);
                println!(
                    "  r/w/x:       {}/{}/{}",
                    flag(st.is_readable),
                    flag(st.is_writable),
                    flag(st.is_executable)
                );
            }
        }
    }
    Ok(())
}

fn print_forest(nodes: &[ListingNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let connector = if last { "└── " } else { "├── " };
        let type_indicator = if node.entry.kind.is_dir() { "/" } else { "" };
        match &node.error {
            Some(err) => println!("{prefix}{connector}{}{type_indicator}  [{err}]", node.name()),
            None => println!("{prefix}{connector}{}{type_indicator}", node.name()),
        }

        if let Some(children) = &node.children {
            let child_prefix = if last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            print_forest(children, &child_prefix);
        }
    }
}
