use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::schema::SessionRecord;

const SESSION_FILE: &str = "session.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubetimer");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// `None` when there is no file or it cannot be parsed; both mean
    /// "not logged in".
    pub fn load_session(&self) -> Option<SessionRecord> {
        let content = fs::read_to_string(self.file_path(SESSION_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save_session(&self, record: &SessionRecord) -> Result<()> {
        let path = self.file_path(SESSION_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(record)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = self.file_path(SESSION_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::UserProfile;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn record() -> SessionRecord {
        SessionRecord {
            user: UserProfile {
                name: Some("Ada".to_string()),
                username: Some("ada".to_string()),
                ..Default::default()
            },
            token: "secret-token".to_string(),
        }
    }

    #[test]
    fn test_missing_file_means_logged_out() {
        let (_dir, store) = make_test_store();
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = make_test_store();
        store.save_session(&record()).unwrap();
        assert_eq!(store.load_session(), Some(record()));
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_session(&record()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_corrupt_file_means_logged_out() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SESSION_FILE), "{not json").unwrap();
        assert!(store.load_session().is_none());
    }

    #[test]
    fn test_clear_removes_file_and_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.save_session(&record()).unwrap();
        store.clear_session().unwrap();
        assert!(store.load_session().is_none());
        assert!(!store.file_path(SESSION_FILE).exists());
        store.clear_session().unwrap();
    }
}
