use std::path::PathBuf;

use clap::Subcommand;
use formsync_core::store::jsonl;
use formsync_core::{CampaignRecord, Config};

#[derive(Subcommand)]
pub enum RecordsAction {
    /// Print all records, one JSON object per line
    List {
        /// Stream the file instead of loading it whole
        #[arg(long)]
        lazy: bool,
    },
    /// Merge a directory of .json files into the records file
    Combine {
        /// Directory containing .json files
        dir: PathBuf,
        /// Output file (defaults to the configured records file)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(action: RecordsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        RecordsAction::List { lazy } => {
            let path = config.records_file()?;
            if !path.exists() {
                println!("No records yet.");
                return Ok(());
            }
            if lazy {
                for record in jsonl::load_lazy::<CampaignRecord>(&path)? {
                    println!("{}", serde_json::to_string(&record?)?);
                }
            } else {
                for record in jsonl::load_all::<CampaignRecord>(&path)? {
                    println!("{}", serde_json::to_string(&record)?);
                }
            }
        }
        RecordsAction::Combine { dir, out } => {
            let out = match out {
                Some(path) => path,
                None => config.records_file()?,
            };
            combine(&dir, &out)?;
        }
    }
    Ok(())
}

/// Combine every .json file in `dir` into `out`, one line per file.
///
/// The output file is cleared first. Files that fail to parse are skipped
/// with a warning rather than aborting the merge.
fn combine(dir: &PathBuf, out: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut json_files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    json_files.sort();

    jsonl::reset(out)?;

    let mut added = 0usize;
    for file in &json_files {
        let content = std::fs::read_to_string(file)?;
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => {
                jsonl::append(&value, out)?;
                added += 1;
            }
            Err(e) => {
                log::warn!("skipping invalid JSON file {}: {e}", file.display());
            }
        }
    }

    println!("{added} files combined into {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_merges_valid_files_and_skips_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"id": 1}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"id": 2}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{oops").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let out = dir.path().join("combined.jsonl");
        combine(&dir.path().to_path_buf(), &out).unwrap();

        let values: Vec<serde_json::Value> = jsonl::load_all(&out).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["id"], 1);
        assert_eq!(values[1]["id"], 2);
    }
}
