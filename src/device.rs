//! Test application lifecycle on Android devices
//!
//! Thin wrapper around `adb` for installing, checking, stopping and
//! removing the encapp application. The search pipeline does not use it.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, SearchError};

/// Package name of the test application
pub const APP_PACKAGE: &str = "com.facebook.encapp";

const STORAGE_PERMISSIONS: [&str; 2] = [
    "android.permission.READ_EXTERNAL_STORAGE",
    "android.permission.WRITE_EXTERNAL_STORAGE",
];

/// Runs a command and returns its stdout
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs commands as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::debug!("Running {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(SearchError::Device(format!(
                "{} {} failed ({}): {}",
                program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Application lifecycle operations for one device
pub trait AppManager {
    /// Install the app, grant its permissions and leave it stopped
    fn install(&self, serial: &str) -> Result<()>;
    fn is_installed(&self, serial: &str) -> Result<bool>;
    fn uninstall(&self, serial: &str) -> Result<()>;
    fn force_stop(&self, serial: &str) -> Result<()>;
}

/// `AppManager` backed by `adb`
#[derive(Debug, Clone)]
pub struct AdbAppManager<R: CommandRunner = ProcessRunner> {
    pub apk_path: PathBuf,
    pub package: String,
    runner: R,
}

impl AdbAppManager<ProcessRunner> {
    pub fn new(apk_path: impl Into<PathBuf>) -> Self {
        Self::with_runner(apk_path, ProcessRunner)
    }
}

impl<R: CommandRunner> AdbAppManager<R> {
    pub fn with_runner(apk_path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            apk_path: apk_path.into(),
            package: APP_PACKAGE.to_string(),
            runner,
        }
    }

    fn adb(&self, serial: &str, args: &[&str]) -> Result<String> {
        let mut full = vec!["-s".to_string(), serial.to_string()];
        full.extend(args.iter().map(|a| a.to_string()));
        self.runner.run("adb", &full)
    }

    fn grant(&self, serial: &str, permission: &str) -> Result<()> {
        self.adb(serial, &["shell", "pm", "grant", self.package.as_str(), permission])?;
        Ok(())
    }
}

impl<R: CommandRunner> AppManager for AdbAppManager<R> {
    fn install(&self, serial: &str) -> Result<()> {
        let apk = self.apk_path.to_string_lossy();
        tracing::info!("Installing {} on {}", apk, serial);
        self.adb(serial, &["install", "-r", &*apk])?;
        self.grant(serial, "android.permission.CAMERA")?;
        for permission in STORAGE_PERMISSIONS {
            self.grant(serial, permission)?;
        }
        self.force_stop(serial)
    }

    fn is_installed(&self, serial: &str) -> Result<bool> {
        let packages = self.adb(serial, &["shell", "pm", "list", "packages"])?;
        Ok(packages
            .lines()
            .filter_map(|l| l.trim().strip_prefix("package:"))
            .any(|p| p == self.package))
    }

    fn uninstall(&self, serial: &str) -> Result<()> {
        tracing::info!("Uninstalling {} from {}", self.package, serial);
        self.adb(serial, &["uninstall", self.package.as_str()])?;
        Ok(())
    }

    fn force_stop(&self, serial: &str) -> Result<()> {
        self.adb(serial, &["shell", "am", "force-stop", self.package.as_str()])?;
        Ok(())
    }
}
