use super::types::{
    normalize_grade, normalize_weight, placeholder_name, Component, ComponentId, FieldEdit,
};
use std::collections::HashSet;

/// Ordered set of grading components plus the single final selection.
///
/// The final component is tracked by id rather than by a per-row flag, so at
/// most one component can ever be marked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentStore {
    components: Vec<Component>,
    final_id: Option<ComponentId>,
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from components, clearing any duplicate ids
    pub fn from_components(components: Vec<Component>) -> Self {
        let mut store = Self::new();
        store.replace_all(components);
        store
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Id of the component at a 1-based display index
    pub fn id_at(&self, index: usize) -> Option<&ComponentId> {
        index
            .checked_sub(1)
            .and_then(|i| self.components.get(i))
            .map(|c| &c.id)
    }

    pub fn final_id(&self) -> Option<&ComponentId> {
        self.final_id.as_ref()
    }

    pub fn final_component(&self) -> Option<&Component> {
        self.final_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_final(&self, id: &ComponentId) -> bool {
        self.final_id.as_ref() == Some(id)
    }

    /// Replace every component at once (new import, new load).
    ///
    /// The final selection is cleared. Names are trimmed, blank names get a
    /// placeholder, and duplicate ids are reassigned so ids stay unique.
    pub fn replace_all(&mut self, components: Vec<Component>) {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(components.len());
        let mut pending = Vec::new();

        for (idx, mut component) in components.into_iter().enumerate() {
            component.weight = normalize_weight(component.weight);
            component.grade = normalize_grade(component.grade);
            let name = component.name.trim();
            component.name = if name.is_empty() {
                placeholder_name(idx)
            } else {
                name.to_string()
            };
            if seen.insert(component.id.clone()) {
                deduped.push(component);
            } else {
                pending.push(deduped.len());
                deduped.push(component);
            }
        }

        for pos in pending {
            let id = fresh_id(&seen, pos);
            seen.insert(id.clone());
            deduped[pos].id = id;
        }

        self.components = deduped;
        self.final_id = None;
    }

    /// Append an empty row (weight 0, ungraded) and return its id
    pub fn append(&mut self, name: Option<String>) -> ComponentId {
        let seen: HashSet<ComponentId> = self.components.iter().map(|c| c.id.clone()).collect();
        let id = fresh_id(&seen, self.components.len());
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| placeholder_name(self.components.len()));
        self.components.push(Component::new(id.clone(), name, 0.0));
        id
    }

    /// Apply a single field edit. Returns false if `id` is not in the store.
    pub fn upsert_field(&mut self, id: &ComponentId, edit: FieldEdit) -> bool {
        let Some(pos) = self.components.iter().position(|c| &c.id == id) else {
            return false;
        };
        let component = &mut self.components[pos];
        match edit {
            FieldEdit::Name(name) => {
                let name = name.trim();
                component.name = if name.is_empty() {
                    placeholder_name(pos)
                } else {
                    name.to_string()
                };
            }
            FieldEdit::Weight(weight) => component.weight = normalize_weight(weight),
            FieldEdit::Grade(grade) => component.grade = normalize_grade(grade),
        }
        true
    }

    /// Mark `id` as the final component, unmarking any other.
    /// Does nothing and returns false if `id` is not in the store.
    pub fn set_final(&mut self, id: &ComponentId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.final_id = Some(id.clone());
        true
    }

    pub fn clear_final(&mut self) {
        self.final_id = None;
    }

    /// Remove a component; clears the final selection if it pointed there
    pub fn remove(&mut self, id: &ComponentId) -> Option<Component> {
        let pos = self.components.iter().position(|c| &c.id == id)?;
        if self.is_final(id) {
            self.final_id = None;
        }
        Some(self.components.remove(pos))
    }
}

/// First positional id at or after `start` that is not taken
fn fresh_id(taken: &HashSet<ComponentId>, start: usize) -> ComponentId {
    (start..)
        .map(ComponentId::positional)
        .find(|id| !taken.contains(id))
        .unwrap_or_else(|| ComponentId::positional(start))
}
