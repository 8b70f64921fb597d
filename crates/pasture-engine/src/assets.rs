//! Catalog of loaded models, keyed by name.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::info;

use pasture_core::external::SkinnedModel;

use crate::EngineError;

/// Name -> model catalog shared by every component that instantiates skins.
///
/// Loading is the host's business; the library only holds what was loaded.
#[derive(Debug, Default)]
pub struct ModelLibrary {
    models: BTreeMap<String, Rc<dyn SkinnedModel>>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own name, replacing any previous entry.
    pub fn insert(&mut self, model: Rc<dyn SkinnedModel>) {
        self.models.insert(model.name().to_owned(), model);
    }

    /// Look a model up by name.
    pub fn get(&self, name: &str) -> Result<Rc<dyn SkinnedModel>, EngineError> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownModel {
                name: name.to_owned(),
                available: self.names().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Model names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Log every model and its animation clips once loading has finished.
    pub fn log_catalog(&self) {
        for (name, model) in &self.models {
            let clips = model.clip_names();
            info!(model = %name, clip_count = clips.len(), "model ready");
            for clip in &clips {
                info!(model = %name, clip = %clip, "animation clip");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessModel;

    #[test]
    fn unknown_model_lists_available_names() {
        let mut library = ModelLibrary::new();
        library.insert(Rc::new(HeadlessModel::new("pig", &[("Idle", 1.0)])));
        library.insert(Rc::new(HeadlessModel::new("cow", &[("Idle", 1.0)])));

        let err = library.get("sheep").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown model 'sheep'. Available models: [cow, pig]"
        );
        assert!(library.contains("pig"));
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut library = ModelLibrary::new();
        library.insert(Rc::new(HeadlessModel::new("pig", &[("Idle", 1.0)])));
        library.insert(Rc::new(HeadlessModel::new("pig", &[("Walk", 1.0)])));
        assert_eq!(library.len(), 1);
        assert!(library.get("pig").unwrap().has_clip("Walk"));
    }
}
