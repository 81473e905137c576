//! Init command handler.

use crate::args::InitArgs;
use crate::book::Mode;
use crate::commands::Out;
use crate::store::{Collection, RecordStore};
use crate::{Config, Result};
use std::path::Path;
use tracing::debug;

/// Creates the paisa home directory, writes the initial configuration, and initializes every
/// collection in the backing book with its header row. Safe to run again on an existing home:
/// collections that already exist are left alone.
pub async fn init(home: &Path, args: InitArgs, mode: Mode) -> Result<Out<String>> {
    let config = Config::create(
        home,
        args.backend,
        args.sheet_url.as_deref(),
        args.book_dir,
        args.strict_duplicate_check,
    )
    .await?;

    let mut store = RecordStore::open(&config, mode).await?;
    for collection in Collection::ALL {
        debug!("ensuring collection {collection}");
        store.ensure_collection(collection).await?;
    }

    let root = config.root().display().to_string();
    Ok(Out::new(
        format!("Initialized paisa home at {root} with the {} backend", config.backend()),
        root,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::error::StoreError;
    use tempfile::TempDir;

    fn init_args() -> InitArgs {
        InitArgs {
            backend: Backend::Csv,
            sheet_url: None,
            book_dir: None,
            strict_duplicate_check: None,
        }
    }

    #[tokio::test]
    async fn test_init_creates_all_collections() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("paisa");

        let out = init(&home, init_args(), Mode::Live).await.unwrap();
        assert!(out.message().contains("Initialized paisa home"));

        let config = Config::load(&home).await.unwrap();
        let mut store = RecordStore::open(&config, Mode::Live).await.unwrap();
        for collection in Collection::ALL {
            let table = store.read_all(collection).await.unwrap();
            assert_eq!(
                table.headers,
                collection
                    .headers()
                    .iter()
                    .map(|h| h.to_string())
                    .collect::<Vec<String>>()
            );
            assert!(table.is_empty());
        }
    }

    #[tokio::test]
    async fn test_init_leaves_existing_data_alone() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("paisa");

        init(&home, init_args(), Mode::Live).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        let mut store = RecordStore::open(&config, Mode::Live).await.unwrap();
        store
            .append(
                Collection::Medicines,
                vec!["2024-01-05".into(), "Crocin".into(), "1".into(), "30".into(), "".into()],
            )
            .await
            .unwrap();

        init(&home, init_args(), Mode::Live).await.unwrap();
        let mut store = RecordStore::open(&config, Mode::Live).await.unwrap();
        assert_eq!(store.read_all(Collection::Medicines).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collections_missing_before_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("paisa");
        let config = Config::create(&home, Backend::Csv, None, None, None)
            .await
            .unwrap();
        let mut store = RecordStore::open(&config, Mode::Live).await.unwrap();
        let err = store.read_all(Collection::Expenses).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::CollectionNotFound(_))
        ));
    }
}
