use super::types::{restore_course, CourseSnapshot, SavedCourse};
use crate::components::ComponentStore;
use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const KEY_PREFIX: &str = "gradecalc_";

/// Slot key for a course name: trimmed and case-insensitive.
///
/// ASCII letters, digits, `-` and `_` are kept; every other byte of the
/// lowercased name is written as `%XX`, so distinct names never share a slot.
pub fn storage_key(course: &str) -> String {
    let mut key = String::from(KEY_PREFIX);
    for byte in course.trim().to_lowercase().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            key.push(char::from(byte));
        } else {
            key.push_str(&format!("%{:02X}", byte));
        }
    }
    key
}

/// Path of the JSON slot for a course
pub fn course_path(dir: &Path, course: &str) -> PathBuf {
    dir.join(format!("{}.json", storage_key(course)))
}

fn require_name(course: &str) -> Result<&str> {
    let course = course.trim();
    if course.is_empty() {
        bail!("Type a course name first.");
    }
    Ok(course)
}

/// Load a course from its slot
///
/// Returns `Ok(None)` if nothing was saved under this name. Returns an error
/// if the slot exists but cannot be parsed; nothing in memory is touched.
pub fn load_course(dir: &Path, course: &str) -> Result<Option<SavedCourse>> {
    let course = require_name(course)?;
    let path = course_path(dir, course);
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(&path)
        .with_context(|| format!("Failed to open saved course at {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_reader(file)
        .with_context(|| format!("Saved data was corrupted ({})", path.display()))?;

    let saved = restore_course(&value)
        .with_context(|| format!("Saved data was corrupted ({})", path.display()))?;

    Ok(Some(saved))
}

/// Save a course to its slot atomically
///
/// Refuses a blank course name or an empty store. Creates the storage
/// directory if it doesn't exist.
pub fn save_course(dir: &Path, course: &str, store: &ComponentStore) -> Result<PathBuf> {
    let course = require_name(course)?;
    if store.is_empty() {
        bail!("No components to save yet.");
    }

    crate::config::ensure_dir(dir)?;
    let path = course_path(dir, course);

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    let snapshot = CourseSnapshot::from_store(store).stamped(Utc::now());
    serde_json::to_writer_pretty(&mut file, &snapshot).context("Failed to serialize course")?;

    file.commit().context("Failed to save course")?;

    Ok(path)
}

/// Remove a course's slot. Returns false if nothing was saved.
pub fn clear_course(dir: &Path, course: &str) -> Result<bool> {
    let course = require_name(course)?;
    let path = course_path(dir, course);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentId};
    use std::env;

    fn test_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("grade_calc_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_store() -> ComponentStore {
        let mut store = ComponentStore::from_components(vec![
            Component::new(ComponentId::new("c-0"), "Labs", 40.0).with_grade(95.0),
            Component::new(ComponentId::new("c-1"), "Exam", 60.0),
        ]);
        store.set_final(&ComponentId::new("c-1"));
        store
    }

    #[test]
    fn test_storage_key_case_insensitive() {
        assert_eq!(storage_key("MATH 101"), storage_key("  math 101 "));
        assert_eq!(storage_key("CS/61a"), "gradecalc_cs%2F61a");
        assert_eq!(storage_key("Écon"), "gradecalc_%C3%A9con");
    }

    #[test]
    fn test_storage_key_keeps_names_apart() {
        let names = ["CS 61A", "CS/61A", "CS.61A", "CS_61A", "CS%2061A", "CS%61A"];
        let keys: std::collections::HashSet<String> = names.iter().map(|n| storage_key(n)).collect();
        assert_eq!(keys.len(), names.len());
    }

    #[test]
    fn test_similar_names_do_not_overwrite_each_other() {
        let dir = test_dir("similar");
        let other = ComponentStore::from_components(vec![Component::new(
            ComponentId::new("c-0"),
            "Project",
            100.0,
        )]);

        save_course(&dir, "CS 61A", &sample_store()).unwrap();
        save_course(&dir, "CS/61A", &other).unwrap();

        assert_eq!(load_course(&dir, "cs 61a").unwrap().unwrap().store, sample_store());
        assert_eq!(load_course(&dir, "CS/61A").unwrap().unwrap().store, other);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = test_dir("missing");
        assert!(load_course(&dir, "Biology").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = test_dir("roundtrip");
        let store = sample_store();

        save_course(&dir, "Physics 2", &store).unwrap();
        let loaded = load_course(&dir, "PHYSICS 2").unwrap().unwrap();

        assert_eq!(loaded.store, store);
        assert!(loaded.saved_at.is_some());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_rejects_empty_store_and_blank_name() {
        let dir = test_dir("rejects");
        let err = save_course(&dir, "Chem", &ComponentStore::new()).unwrap_err();
        assert!(err.to_string().contains("No components"));
        assert!(save_course(&dir, "   ", &sample_store()).is_err());
    }

    #[test]
    fn test_corrupted_slot_errors() {
        let dir = test_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(course_path(&dir, "History"), "{ not json").unwrap();

        let err = load_course(&dir, "History").unwrap_err();
        assert!(err.to_string().contains("corrupted"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_clear_course() {
        let dir = test_dir("clear");
        save_course(&dir, "Art", &sample_store()).unwrap();

        assert!(clear_course(&dir, "art").unwrap());
        assert!(!clear_course(&dir, "art").unwrap());
        assert!(load_course(&dir, "Art").unwrap().is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
