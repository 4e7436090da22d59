use crate::components::{ComponentId, ComponentStore, FieldEdit};
use crate::courses::{load_course, save_course};
use crate::grading::{weight_total_mismatch, weighted_average_so_far};
use crate::output;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// One user edit to the open course
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Add {
        name: Option<String>,
        weight: Option<f64>,
        grade: Option<f64>,
    },
    Set {
        index: usize,
        edit: FieldEdit,
    },
    MarkFinal(usize),
    ClearFinal,
    Remove(usize),
    Replace(ComponentStore),
}

/// The course being edited: its name, its slot directory and the live store.
///
/// Every edit goes through `apply`; callers then save and re-render, which
/// recomputes the engine outputs from the fresh store.
#[derive(Debug, Clone)]
pub struct CourseSession {
    pub name: String,
    pub store: ComponentStore,
    pub saved_at: Option<DateTime<Utc>>,
    dir: PathBuf,
}

impl CourseSession {
    /// Open a course, starting empty if nothing is saved under its name
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        let saved = load_course(dir, name)?;
        let (store, saved_at) = match saved {
            Some(saved) => (saved.store, saved.saved_at),
            None => (ComponentStore::new(), None),
        };
        Ok(Self {
            name: name.trim().to_string(),
            store,
            saved_at,
            dir: dir.to_path_buf(),
        })
    }

    /// Resolve a 1-based display index to a component id
    pub fn resolve_index(&self, index: usize) -> Result<ComponentId> {
        match self.store.id_at(index) {
            Some(id) => Ok(id.clone()),
            None if self.store.is_empty() => bail!("No components yet. Add one first."),
            None => bail!(
                "Invalid index {}. Must be between 1 and {}.",
                index,
                self.store.len()
            ),
        }
    }

    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        match edit {
            Edit::Add { name, weight, grade } => {
                let id = self.store.append(name);
                if let Some(weight) = weight {
                    self.store.upsert_field(&id, FieldEdit::Weight(weight));
                }
                if grade.is_some() {
                    self.store.upsert_field(&id, FieldEdit::Grade(grade));
                }
            }
            Edit::Set { index, edit } => {
                let id = self.resolve_index(index)?;
                self.store.upsert_field(&id, edit);
            }
            Edit::MarkFinal(index) => {
                let id = self.resolve_index(index)?;
                self.store.set_final(&id);
            }
            Edit::ClearFinal => self.store.clear_final(),
            Edit::Remove(index) => {
                let id = self.resolve_index(index)?;
                self.store.remove(&id);
            }
            Edit::Replace(store) => self.store = store,
        }
        Ok(())
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let path = save_course(&self.dir, &self.name, &self.store)?;
        self.saved_at = Some(Utc::now());
        Ok(path)
    }

    /// Table, running average and any weight warning
    pub fn render(&self, use_colors: bool) -> String {
        let mut lines = vec![
            output::format_component_table(&self.store, use_colors),
            String::new(),
            output::format_average(weighted_average_so_far(self.store.components()), use_colors),
        ];
        if let Some(total) = weight_total_mismatch(self.store.components()) {
            lines.push(output::format_weight_note(total));
        }
        lines.join("\n")
    }
}
