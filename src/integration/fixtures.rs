//! Test fixtures for integration tests
//!
//! Writes encapp result trees (result files plus device descriptors) into
//! temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

/// One encoding run to write as a result file
#[derive(Debug, Clone)]
pub struct TestRun {
    pub name: &'static str,
    pub model: &'static str,
    pub codec: &'static str,
    pub bitrate: serde_json::Value,
    pub gop: i64,
    pub fps: f64,
    pub resolution: &'static str,
    pub meanbitrate: i64,
}

impl TestRun {
    /// VP9 1080p30 at 300 kbps on a Pixel6
    pub fn vp9_1080p() -> Self {
        Self {
            name: "encapp_vp9",
            model: "Pixel6",
            codec: "vp9",
            bitrate: json!(300000),
            gop: 30,
            fps: 30.0,
            resolution: "1920x1080",
            meanbitrate: 301_500,
        }
    }

    /// AVC 720p60 at 1.2 Mbps on a Pixel6, bitrate stored with a suffix
    pub fn avc_720p() -> Self {
        Self {
            name: "encapp_avc",
            model: "Pixel6",
            codec: "avc",
            bitrate: json!("1200k"),
            gop: 60,
            fps: 60.0,
            resolution: "1280x720",
            meanbitrate: 1_195_000,
        }
    }

    fn result_json(&self) -> serde_json::Value {
        json!({
            "encodedfile": format!("{}.mp4", self.name),
            "meanbitrate": self.meanbitrate,
            "test": {
                "common": {"id": self.name, "description": "fixture"},
                "input": {"filepath": "/sdcard/input.yuv", "resolution": "1920x1080"},
                "configure": {
                    "codec": self.codec,
                    "bitrate": self.bitrate,
                    "iFrameInterval": self.gop,
                    "framerate": self.fps,
                    "resolution": self.resolution,
                },
            },
        })
    }

    /// Write the result file and the directory's device descriptor.
    pub fn write(&self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let device = json!({
            "props": {
                "ro.product.model": self.model,
                "ro.board.platform": "gs101",
                "ro.serialno": format!("SER-{}", self.name),
            }
        });
        fs::write(dir.join("device.json"), device.to_string()).unwrap();

        let path = dir.join(format!("{}.json", self.name));
        fs::write(&path, self.result_json().to_string()).unwrap();
        path
    }
}

/// A temporary result tree
pub struct ResultTree {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl ResultTree {
    /// Each run in its own subdirectory of a fresh temp dir
    pub fn new(runs: &[TestRun]) -> Self {
        let dir = TempDir::new().unwrap();
        let files = runs
            .iter()
            .map(|run| run.write(&dir.path().join(run.name)))
            .collect();
        Self { dir, files }
    }

    /// The two-run tree used by most scenarios
    pub fn standard() -> Self {
        Self::new(&[TestRun::vp9_1080p(), TestRun::avc_720p()])
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn index_path(&self) -> PathBuf {
        self.root().join(crate::config::INDEX_FILE_NAME)
    }
}
