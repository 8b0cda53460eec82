use std::path::{Path, PathBuf};

const APP_DIR: &str = "ufw-manager";

/// Locations and programs used by every component, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where snapshot files are written and looked up.
    pub rules_dir: PathBuf,
    /// Where `operations.log` and `errors.log` are appended.
    pub log_dir: PathBuf,
    pub ufw_program: String,
    pub sudo_program: String,
    pub sshd_config: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_dir: default_dir("rules"),
            log_dir: default_dir("logs"),
            ufw_program: "ufw".to_string(),
            sudo_program: "sudo".to_string(),
            sshd_config: PathBuf::from("/etc/ssh/sshd_config"),
        }
    }
}

/// `<data_local_dir>/ufw-manager/<leaf>`, or `./<leaf>` when there is no data dir.
pub fn default_dir(leaf: &str) -> PathBuf {
    dirs::data_local_dir()
        .map(|base| base.join(APP_DIR).join(leaf))
        .unwrap_or_else(|| PathBuf::from(".").join(leaf))
}

impl AppConfig {
    pub fn operations_log(&self) -> PathBuf {
        self.log_dir.join("operations.log")
    }

    pub fn error_log(&self) -> PathBuf {
        self.log_dir.join("errors.log")
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.rules_dir, &self.log_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        std::io::Error::new(e.kind(), format!("{}: {}", dir.display(), e))
    })
}
