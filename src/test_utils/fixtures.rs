use std::path::PathBuf;

use tempfile::TempDir;

/// Test fixture providing isolated filesystem environment.
pub struct DatasetFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for DatasetFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a JSONL dataset, one object per line.
    #[must_use]
    pub fn create_jsonl(&self, name: &str, rows: &[serde_json::Value]) -> PathBuf {
        let lines: Vec<String> = rows.iter().map(ToString::to_string).collect();
        self.create_file(name, &format!("{}\n", lines.join("\n")))
    }
}

impl Drop for DatasetFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
