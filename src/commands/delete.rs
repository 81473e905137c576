//! Delete command handler.

use crate::args::DeleteArgs;
use crate::book::Mode;
use crate::commands::{row_index, Out};
use crate::store::RecordStore;
use crate::{Config, Result};

/// Deletes one row of a record collection by its row number. Like edits, a deletion rewrites the
/// full collection; the remaining rows keep their relative order and their row numbers shift up.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<String>> {
    let mut store = RecordStore::open(&config, mode).await?;
    let collection = args.entity.collection();
    let table = store.read_all(collection).await?;
    let ix = row_index(args.row, table.rows.len())?;
    store.delete_at(collection, ix).await?;
    Ok(Out::new_message(format!(
        "Deleted {} row {}",
        args.entity, args.row
    )))
}
