//! Scene engine: stores named scenes and replays them through the dispatcher.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use hestia_domain::color::Color;
use hestia_domain::device::Level;
use hestia_domain::error::HestiaError;
use hestia_domain::scene::{Action, LightAction, MediaAction, Scene};

use crate::dispatcher::{ControlReport, ControlStatus, Dispatcher};
use crate::ports::{BridgeClient, MediaKeys};

/// Outcome of one replayed action.
#[derive(Debug)]
pub struct SceneStep {
    pub action: Action,
    pub result: Result<ControlReport, HestiaError>,
}

impl SceneStep {
    fn succeeded(&self) -> bool {
        matches!(
            &self.result,
            Ok(report) if matches!(report.status(), ControlStatus::Confirmed | ControlStatus::Attempted)
        )
    }
}

/// Every step of a scene activation, in stored order.
#[derive(Debug)]
pub struct SceneReport {
    pub scene: String,
    pub steps: Vec<SceneStep>,
}

impl SceneReport {
    /// Whether every action reached every selected device.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(SceneStep::succeeded)
    }
}

impl fmt::Display for SceneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene '{}' activated:", self.scene)?;
        for step in &self.steps {
            match &step.result {
                Ok(report) => write!(f, "\n{report}")?,
                Err(err) => write!(f, "\n✗ {}: {err}", step.action)?,
            }
        }
        Ok(())
    }
}

/// The scenes every home starts with.
#[must_use]
pub fn builtin_scenes() -> Vec<Scene> {
    let define = |name: &str, actions: Vec<Action>| Scene {
        name: name.to_string(),
        actions,
        created_at: hestia_domain::time::now(),
    };
    vec![
        define(
            "movie_mode",
            vec![
                Action::light(LightAction::Brightness(Level::clamped(20))),
                Action::light(LightAction::Color(Color::Blue)),
                Action::media(MediaAction::Volume(Level::clamped(70))),
            ],
        ),
        define(
            "relax_mode",
            vec![
                Action::light(LightAction::Brightness(Level::clamped(60))),
                Action::light(LightAction::Color(Color::Yellow)),
                Action::media(MediaAction::Volume(Level::clamped(40))),
            ],
        ),
        define(
            "work_mode",
            vec![
                Action::light(LightAction::On),
                Action::light(LightAction::Color(Color::White)),
                Action::light(LightAction::Brightness(Level::clamped(90))),
            ],
        ),
    ]
}

/// Named scenes for the lifetime of the process.
#[derive(Default)]
pub struct SceneEngine {
    scenes: RwLock<HashMap<String, Scene>>,
}

impl SceneEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine preloaded with [`builtin_scenes`].
    #[must_use]
    pub fn with_builtin() -> Self {
        let engine = Self::new();
        for scene in builtin_scenes() {
            engine.insert(scene);
        }
        engine
    }

    /// Create a scene, replacing any scene with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] when `name` is blank.
    #[tracing::instrument(skip(self, actions), fields(actions = actions.len()))]
    pub fn create(&self, name: &str, actions: Vec<Action>) -> Result<Scene, HestiaError> {
        let scene = Scene::builder().name(name).actions(actions).build()?;
        self.insert(scene.clone());
        Ok(scene)
    }

    /// Store an already validated scene, replacing any with the same name.
    pub fn insert(&self, scene: Scene) {
        let replaced = self
            .scenes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scene.name.clone(), scene)
            .is_some();
        if replaced {
            tracing::info!("scene replaced");
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Scene> {
        self.scenes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// All scenes, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<Scene> {
        let mut scenes: Vec<Scene> = self
            .scenes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        scenes.sort_by(|a, b| a.name.cmp(&b.name));
        scenes
    }

    /// Replay every action of `name` in order through `dispatcher`.
    ///
    /// A failing action is recorded and the sequence carries on.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::SceneNotFound`] when no such scene exists.
    #[tracing::instrument(skip(self, dispatcher))]
    pub async fn activate<B: BridgeClient, M: MediaKeys>(
        &self,
        name: &str,
        dispatcher: &Dispatcher<B, M>,
    ) -> Result<SceneReport, HestiaError> {
        let scene = self
            .get(name)
            .ok_or_else(|| HestiaError::SceneNotFound(name.to_string()))?;

        let mut steps = Vec::with_capacity(scene.action_count());
        for action in scene.actions {
            let result = dispatcher.control(&action.command(), action.target()).await;
            if let Err(err) = &result {
                tracing::warn!(action = %action, error = %err, "scene action failed");
            }
            steps.push(SceneStep { action, result });
        }

        let report = SceneReport {
            scene: scene.name,
            steps,
        };
        tracing::info!(complete = report.is_complete(), "scene activated");
        Ok(report)
    }
}
