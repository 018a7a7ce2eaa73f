//! End-to-end integration tests

use std::path::PathBuf;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::table::FILENAME;
use crate::index::{build_index, IndexCache, IndexTable};
use crate::integration::fixtures::{ResultTree, TestRun};
use crate::integration::ScenarioResult;
use crate::query::{search, FilterSpec};
use crate::{run, Args};

fn filenames(table: &IndexTable) -> Vec<String> {
    table
        .rows
        .iter()
        .map(|r| table.get(r, FILENAME).to_string())
        .collect()
}

fn args_for(tree: &ResultTree) -> Args {
    Args {
        path: Some(tree.root().to_path_buf()),
        ..Default::default()
    }
}

/// Index a two-run tree and query it by codec, bitrate range and with no filters
pub fn test_query_scenario() -> ScenarioResult {
    let tree = ResultTree::standard();
    let vp9 = tree.files[0].to_string_lossy().into_owned();
    let avc = tree.files[1].to_string_lossy().into_owned();

    let mut cache = IndexCache::new(tree.root(), SearchConfig::default(), true);
    let table = match cache.load() {
        Ok(table) => table.clone(),
        Err(e) => return ScenarioResult::fail(format!("load failed: {e}")),
    };

    let mut result = ScenarioResult::success();
    result.check(table.len() == 2, format!("expected 2 rows, got {}", table.len()));

    let query = |codec: Option<&str>, bitrate: Option<&str>| -> Result<Vec<String>> {
        let spec = FilterSpec::from_tokens(codec, bitrate, None, None, None)?;
        search(&table, &spec).map(|t| filenames(&t))
    };

    match query(Some("vp9"), None) {
        Ok(found) => result.check(found == vec![vp9.clone()], format!("codec=vp9 gave {found:?}")),
        Err(e) => result.check(false, format!("codec query failed: {e}")),
    }
    match query(None, Some("200000-500000")) {
        Ok(found) => result.check(
            found == vec![vp9.clone()],
            format!("bitrate range gave {found:?}"),
        ),
        Err(e) => result.check(false, format!("bitrate query failed: {e}")),
    }
    match query(None, Some("1.2M")) {
        Ok(found) => result.check(found == vec![avc.clone()], format!("bitrate=1.2M gave {found:?}")),
        Err(e) => result.check(false, format!("bitrate query failed: {e}")),
    }
    match query(None, None) {
        // Same model, so codec decides: avc before vp9.
        Ok(found) => result.check(found == vec![avc, vp9], format!("unfiltered order {found:?}")),
        Err(e) => result.check(false, format!("unfiltered query failed: {e}")),
    }
    result
}

/// Delete the index and load again: exactly one rebuild, then success
pub fn test_self_healing_load() -> ScenarioResult {
    let tree = ResultTree::standard();
    let config = SearchConfig::default();
    if let Err(e) = build_index(tree.root(), &config, true) {
        return ScenarioResult::fail(format!("initial build failed: {e}"));
    }
    if let Err(e) = std::fs::remove_file(tree.index_path()) {
        return ScenarioResult::fail(format!("could not remove index: {e}"));
    }

    let mut cache = IndexCache::new(tree.root(), config, true);
    let mut result = ScenarioResult::success();
    match cache.load() {
        Ok(table) => result.check(table.len() == 2, format!("expected 2 rows, got {}", table.len())),
        Err(e) => result.check(false, format!("load failed: {e}")),
    }
    result.check(cache.rebuilds() == 1, format!("rebuilds = {}", cache.rebuilds()));
    result.check(tree.index_path().exists(), "index file was not recreated");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_scenario_e2e() {
        let result = test_query_scenario();
        assert!(result.is_valid, "Query scenario failed: {:?}", result.errors);
    }

    #[test]
    fn test_self_healing_load_e2e() {
        let result = test_self_healing_load();
        assert!(result.is_valid, "Self-healing load failed: {:?}", result.errors);
    }

    #[test]
    fn test_run_summary() {
        let tree = ResultTree::standard();
        let args = Args {
            codec: Some("avc".to_string()),
            print_data: true,
            ..args_for(&tree)
        };
        let lines = run(&args, &SearchConfig::default()).unwrap();
        assert_eq!(
            lines,
            vec![format!(
                "{},encapp_avc.mp4,avc,60,60,1280,720,1200000,1195000",
                tree.files[1].display()
            )]
        );
    }

    #[test]
    fn test_run_media_paths() {
        let tree = ResultTree::standard();
        let args = Args {
            size: Some("1080".to_string()),
            video: true,
            ..args_for(&tree)
        };
        let lines = run(&args, &SearchConfig::default()).unwrap();
        let expected: PathBuf = tree.root().join("encapp_vp9").join("encapp_vp9.mp4");
        assert_eq!(lines, vec![expected.to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_run_gop_and_fps() {
        let tree = ResultTree::standard();
        let args = Args {
            gop: Some(60),
            fps: Some(60.0),
            ..args_for(&tree)
        };
        assert_eq!(run(&args, &SearchConfig::default()).unwrap().len(), 1);

        let args = Args {
            gop: Some(60),
            fps: Some(30.0),
            ..args_for(&tree)
        };
        assert!(run(&args, &SearchConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_run_rejects_bad_bitrate() {
        let tree = ResultTree::standard();
        let args = Args {
            bitrate: Some("300q".to_string()),
            ..args_for(&tree)
        };
        assert!(matches!(
            run(&args, &SearchConfig::default()),
            Err(SearchError::Parse { .. })
        ));
        // Input is validated before touching the index.
        assert!(!tree.index_path().exists());
    }

    #[test]
    fn test_run_no_recursion() {
        let tree = ResultTree::standard();
        TestRun {
            name: "encapp_top",
            ..TestRun::vp9_1080p()
        }
        .write(tree.root());

        let args = Args {
            no_rec: true,
            ..args_for(&tree)
        };
        let lines = run(&args, &SearchConfig::default()).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("encapp_top.json"));
    }

    #[test]
    fn test_run_force_reindex() {
        let tree = ResultTree::new(&[TestRun::vp9_1080p()]);
        let args = args_for(&tree);
        assert_eq!(run(&args, &SearchConfig::default()).unwrap().len(), 1);

        TestRun::avc_720p().write(&tree.root().join("later"));
        // The stale index is reused until a reindex is requested.
        assert_eq!(run(&args, &SearchConfig::default()).unwrap().len(), 1);

        let args = Args {
            index: true,
            ..args_for(&tree)
        };
        assert_eq!(run(&args, &SearchConfig::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_filename_after_load() {
        let tree = ResultTree::standard();
        let mut cache = IndexCache::new(tree.root(), SearchConfig::default(), true);
        let table = cache.load().unwrap();
        let rows = table.find_by_filename("encapp_avc.json");
        assert_eq!(rows.len(), 1);
        assert_eq!(table.get(rows[0], "model").to_string(), "Pixel6");
        assert_eq!(table.get(rows[0], "serial").to_string(), "SER-encapp_avc");
    }
}
