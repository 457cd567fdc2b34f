use bevy::prelude::*;

use super::filter::{Predicate, PredicateFilter};
use super::raycast::RayHit;
use super::state::{SelectionEvent, SelectionState};
use super::SelectorError;
use crate::input::PointerReleases;

/// Which pointer channels a selector listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Mouse,
    Touch,
    Both,
}

impl InputMode {
    pub fn polls_touch(self) -> bool {
        matches!(self, InputMode::Touch | InputMode::Both)
    }

    pub fn polls_mouse(self) -> bool {
        matches!(self, InputMode::Mouse | InputMode::Both)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorConfig {
    /// Tag a touch hit must carry to be considered.
    pub selectable_tag: String,
    pub input_mode: InputMode,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            selectable_tag: "Selectable".into(),
            input_mode: InputMode::Mouse,
        }
    }
}

/// Turns a screen position into a world-space ray.
pub trait CameraProvider {
    fn screen_point_to_ray(&self, position: Vec2) -> Option<Ray3d>;
}

/// The scene as seen by a selector.
pub trait SceneQuery {
    fn cast_ray(&self, ray: Ray3d, max_distance: f32) -> Option<RayHit>;
    fn has_tag(&self, entity: Entity, tag: &str) -> bool;
    /// Entity carrying the selectable capability for a hit collider, if any.
    fn resolve_selectable(&self, entity: Entity) -> Option<Entity>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Touch,
    Mouse,
}

/// Selects entities on pointer release.
#[derive(Component, Debug)]
pub struct PointerSelector {
    config: SelectorConfig,
    active: bool,
    filter: PredicateFilter,
    state: SelectionState,
}

impl Default for PointerSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl PointerSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            active: true,
            filter: PredicateFilter::default(),
            state: SelectionState::default(),
        }
    }

    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&RayHit) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn inject_predicates<I>(&mut self, predicates: I)
    where
        I: IntoIterator<Item = Predicate>,
    {
        self.filter.inject(predicates);
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current(&self) -> Option<Entity> {
        self.state.current()
    }

    pub fn current_hit(&self) -> Option<&RayHit> {
        self.state.current_hit()
    }

    pub fn satisfies(&self, hit: &RayHit) -> bool {
        self.filter.satisfies(hit)
    }

    pub fn select(&mut self, hit: RayHit, scene: &impl SceneQuery) -> Vec<SelectionEvent> {
        let selectable = scene.resolve_selectable(hit.entity);
        self.state.select(hit, selectable)
    }

    /// Clears the selection. The returned events still have to be dispatched,
    /// see [`super::dispatch_selection_events`] or trigger [`super::ResetSelection`].
    pub fn reset_selection(&mut self) -> Vec<SelectionEvent> {
        self.state.reset_selection()
    }

    /// Runs one tick. Touch is evaluated before mouse, so in `InputMode::Both`
    /// a mouse release decides the final state of the tick.
    pub fn poll<C, S>(
        &mut self,
        releases: &PointerReleases,
        over_ui: bool,
        camera: Option<&C>,
        scene: &S,
    ) -> Result<Vec<SelectionEvent>, SelectorError>
    where
        C: CameraProvider,
        S: SceneQuery,
    {
        let camera = camera.ok_or(SelectorError::MissingCamera)?;
        let mut events = Vec::new();
        if !self.active {
            return Ok(events);
        }

        let mode = self.config.input_mode;
        if mode.polls_touch() {
            if let Some(position) = releases.touch {
                self.on_release(Channel::Touch, position, over_ui, camera, scene, &mut events);
            }
        }
        if mode.polls_mouse() {
            if let Some(position) = releases.mouse {
                self.on_release(Channel::Mouse, position, over_ui, camera, scene, &mut events);
            }
        }
        Ok(events)
    }

    fn on_release<C, S>(
        &mut self,
        channel: Channel,
        position: Vec2,
        over_ui: bool,
        camera: &C,
        scene: &S,
        events: &mut Vec<SelectionEvent>,
    ) where
        C: CameraProvider,
        S: SceneQuery,
    {
        if over_ui {
            debug!("{channel:?} release at {position} consumed by UI");
            return;
        }
        let Some(ray) = camera.screen_point_to_ray(position) else {
            debug!("{channel:?} release at {position} is outside the viewport");
            return;
        };

        let Some(hit) = scene.cast_ray(ray, f32::MAX) else {
            events.extend(self.state.reset_selection());
            events.push(SelectionEvent::Missed);
            return;
        };

        // only the touch channel is tag-gated
        let tagged = match channel {
            Channel::Touch => scene.has_tag(hit.entity, &self.config.selectable_tag),
            Channel::Mouse => true,
        };
        if tagged && self.filter.satisfies(&hit) {
            events.extend(self.select(hit, scene));
        }
    }
}
