//! Scene: a named, ordered batch of actions replayed on activation.

mod action;

pub use action::{Action, ActionKind, LightAction, MediaAction, RawAction, RawParams};

use serde::{Deserialize, Serialize};

use crate::error::{HestiaError, ValidationError};
use crate::time::{Timestamp, now};

/// A named scene. Empty action lists are allowed and activate as a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub actions: Vec<Action>,
    #[serde(default = "now")]
    pub created_at: Timestamp,
}

impl Scene {
    /// Create a builder for constructing a [`Scene`].
    #[must_use]
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), HestiaError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

/// Step-by-step builder for [`Scene`].
#[derive(Debug, Default)]
pub struct SceneBuilder {
    name: Option<String>,
    actions: Vec<Action>,
    created_at: Option<Timestamp>,
}

impl SceneBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one action; order is preserved on activation.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Scene`].
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] if `name` is missing or blank.
    pub fn build(self) -> Result<Scene, HestiaError> {
        let scene = Scene {
            name: self.name.unwrap_or_default().trim().to_string(),
            actions: self.actions,
            created_at: self.created_at.unwrap_or_else(now),
        };
        scene.validate()?;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::device::Level;

    #[test]
    fn should_build_scene_with_ordered_actions() {
        let scene = Scene::builder()
            .name("reading")
            .action(Action::light(LightAction::On))
            .action(Action::light(LightAction::Color(Color::Yellow)))
            .build()
            .unwrap();

        assert_eq!(scene.action_count(), 2);
        assert_eq!(scene.actions[0], Action::light(LightAction::On));
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Scene::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(HestiaError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_allow_empty_scene() {
        let scene = Scene::builder().name("nothing").build().unwrap();
        assert_eq!(scene.action_count(), 0);
    }

    #[test]
    fn should_deserialize_scene_without_timestamp() {
        let scene: Scene = toml::from_str(
            r#"
            name = "party"
            actions = [
                { type = "light", command = "color", color = "purple" },
                { type = "media", command = "volume", level = 90 },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(scene.name, "party");
        assert_eq!(
            scene.actions[1],
            Action::media(MediaAction::Volume(Level::clamped(90)))
        );
    }
}
