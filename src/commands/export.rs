//! Export command handler.

use crate::args::ExportArgs;
use crate::book::Mode;
use crate::commands::Out;
use crate::model::{BookData, Expense, Investment, Items, Medicine};
use crate::store::{Collection, RecordStore};
use crate::{utils, Config, Result};
use anyhow::Context;

/// Writes Expenses, Medicines and Investments (header row plus every current record each) to a
/// single JSON book file. Without `--out`, the file lands under `$PAISA_HOME/exports` with a
/// date-sequence name and old exports are rotated away.
pub async fn export(config: Config, mode: Mode, args: ExportArgs) -> Result<Out<String>> {
    let mut store = RecordStore::open(&config, mode).await?;

    let data = BookData {
        expenses: Items::<Expense>::from_table(&store.read_all(Collection::Expenses).await?)?,
        medicines: Items::<Medicine>::from_table(&store.read_all(Collection::Medicines).await?)?,
        investments: Items::<Investment>::from_table(
            &store.read_all(Collection::Investments).await?,
        )?,
    };

    let path = match args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    utils::make_dir(parent).await?;
                }
            }
            let json = serde_json::to_string_pretty(&data)
                .context("Failed to serialize BookData to JSON")?;
            utils::write(&path, json).await?;
            path
        }
        None => config.export().save_json(&data).await?,
    };

    let display = path.display().to_string();
    Ok(Out::new(format!("Wrote {display}"), display))
}
