//! Pointer and touch driven selection of scene entities.
//!
//! A [`PointerSelector`] polls the frame's pointer releases, casts a ray from
//! the [`MainCamera`] into the scene's [`Collider`]s and tracks at most one
//! [`Selectable`] entity. Transitions are delivered as observer triggers:
//! [`OnSelect`] and [`OnDeselect`] target the selectable entity,
//! [`SelectionMissed`] targets the selector entity.

mod filter;
mod poller;
mod raycast;
mod state;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use thiserror::Error;

use crate::input::{InputPlugin, PointerOverUi, PointerReleases, PointerSet};

pub use filter::{Predicate, PredicateFilter};
pub use poller::{CameraProvider, InputMode, PointerSelector, SceneQuery, SelectorConfig};
pub use raycast::{cast_ray, Collider, RayHit};
pub use state::{SelectionEvent, SelectionState};

pub struct SelectionPlugin;
impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<InputPlugin>() {
            app.add_plugins(InputPlugin);
        }
        app.add_systems(PostStartup, resolve_selector_camera)
            .add_systems(Update, poll_selectors.in_set(PointerSet::Select))
            .observe(reset_on_request)
            .observe(release_removed_selectable);
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectorError {
    #[error("no camera tagged MainCamera is available to cast selection rays")]
    MissingCamera,
}

/// Marks the camera selection rays are cast from.
#[derive(Component)]
pub struct MainCamera;

/// The camera resolved at startup.
#[derive(Resource, Clone, Copy, Debug, Deref)]
pub struct SelectorCamera(pub Entity);

/// Capability marker. Entities without it are never selected.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Selectable;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct EntityTag(pub String);

impl EntityTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Triggered on a selectable entity when it becomes the selection.
#[derive(Event, Clone, Copy, Debug)]
pub struct OnSelect {
    pub selector: Entity,
}

/// Triggered on a selectable entity when it stops being the selection.
#[derive(Event, Clone, Copy, Debug)]
pub struct OnDeselect {
    pub selector: Entity,
}

/// Triggered on a selector entity when a release hit nothing.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct SelectionMissed;

/// Trigger on a selector entity to clear its selection.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ResetSelection;

pub struct ViewportCamera<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
}

impl CameraProvider for ViewportCamera<'_> {
    fn screen_point_to_ray(&self, position: Vec2) -> Option<Ray3d> {
        self.camera.viewport_to_world(self.transform, position)
    }
}

/// Overrides how the [`MainCamera`] turns screen positions into rays, for
/// cameras whose viewport is not driven by a render target.
#[derive(Component)]
pub struct ScreenRays(Box<dyn CameraProvider + Send + Sync>);

impl ScreenRays {
    pub fn new(provider: impl CameraProvider + Send + Sync + 'static) -> Self {
        Self(Box::new(provider))
    }
}

enum SelectorRays<'a> {
    Viewport(ViewportCamera<'a>),
    Custom(&'a (dyn CameraProvider + Send + Sync)),
}

impl CameraProvider for SelectorRays<'_> {
    fn screen_point_to_ray(&self, position: Vec2) -> Option<Ray3d> {
        match self {
            SelectorRays::Viewport(camera) => camera.screen_point_to_ray(position),
            SelectorRays::Custom(provider) => provider.screen_point_to_ray(position),
        }
    }
}

#[derive(SystemParam)]
pub struct SelectionScene<'w, 's> {
    colliders: Query<'w, 's, (Entity, &'static Collider, &'static GlobalTransform)>,
    tags: Query<'w, 's, &'static EntityTag>,
    selectables: Query<'w, 's, (), With<Selectable>>,
    parents: Query<'w, 's, &'static Parent>,
}

impl SceneQuery for SelectionScene<'_, '_> {
    fn cast_ray(&self, ray: Ray3d, max_distance: f32) -> Option<RayHit> {
        cast_ray(ray, max_distance, self.colliders.iter())
    }

    fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tags.get(entity).is_ok_and(|t| t.0 == tag)
    }

    fn resolve_selectable(&self, entity: Entity) -> Option<Entity> {
        let mut current = entity;
        loop {
            if self.selectables.contains(current) {
                return Some(current);
            }
            current = self.parents.get(current).ok()?.get();
        }
    }
}

fn find_main_camera(mut cameras: impl Iterator<Item = Entity>) -> Result<Entity, SelectorError> {
    let camera = cameras.next().ok_or(SelectorError::MissingCamera)?;
    if cameras.next().is_some() {
        warn!("several MainCamera entities found, selecting through {camera:?}");
    }
    Ok(camera)
}

pub fn resolve_selector_camera(
    mut commands: Commands,
    cameras: Query<Entity, (With<Camera>, With<MainCamera>)>,
    mut exit: EventWriter<AppExit>,
) {
    match find_main_camera(cameras.iter()) {
        Ok(camera) => {
            info!("selection rays cast from {camera:?}");
            commands.insert_resource(SelectorCamera(camera));
        }
        Err(err) => {
            error!("{err}");
            exit.send(AppExit::error());
        }
    }
}

pub fn poll_selectors(
    mut commands: Commands,
    mut selectors: Query<(Entity, &mut PointerSelector)>,
    releases: Res<PointerReleases>,
    over_ui: Res<PointerOverUi>,
    selector_camera: Option<Res<SelectorCamera>>,
    cameras: Query<(&Camera, &GlobalTransform, Option<&ScreenRays>)>,
    scene: SelectionScene,
    mut exit: EventWriter<AppExit>,
) {
    let camera = selector_camera
        .and_then(|c| cameras.get(c.0).ok())
        .map(|(camera, transform, custom)| match custom {
            Some(rays) => SelectorRays::Custom(&*rays.0),
            None => SelectorRays::Viewport(ViewportCamera { camera, transform }),
        });

    for (entity, mut selector) in &mut selectors {
        match selector.poll(&releases, **over_ui, camera.as_ref(), &scene) {
            Ok(events) => dispatch_selection_events(&mut commands, entity, &events),
            Err(err) => {
                error!("selector {entity:?}: {err}");
                exit.send(AppExit::error());
                return;
            }
        }
    }
}

pub fn reset_on_request(
    trigger: Trigger<ResetSelection>,
    mut commands: Commands,
    mut selectors: Query<&mut PointerSelector>,
) {
    let selector = trigger.entity();
    let Ok(mut state) = selectors.get_mut(selector) else {
        warn!("ResetSelection sent to {selector:?}, which has no PointerSelector");
        return;
    };
    let events = state.reset_selection();
    dispatch_selection_events(&mut commands, selector, &events);
}

/// Deselects an entity that loses its `Selectable` capability, despawns
/// included, on every selector holding it.
pub fn release_removed_selectable(
    trigger: Trigger<OnRemove, Selectable>,
    mut commands: Commands,
    mut selectors: Query<(Entity, &mut PointerSelector)>,
) {
    let removed = trigger.entity();
    for (selector, mut state) in &mut selectors {
        if state.current() == Some(removed) {
            let events = state.reset_selection();
            dispatch_selection_events(&mut commands, selector, &events);
        }
    }
}

/// Queues the observer triggers for `events`, in order.
pub fn dispatch_selection_events(
    commands: &mut Commands,
    selector: Entity,
    events: &[SelectionEvent],
) {
    for event in events {
        match *event {
            SelectionEvent::Selected(entity) => {
                debug!("{selector:?} selected {entity:?}");
                commands.trigger_targets(OnSelect { selector }, entity);
            }
            SelectionEvent::Deselected(entity) => {
                debug!("{selector:?} deselected {entity:?}");
                commands.trigger_targets(OnDeselect { selector }, entity);
            }
            SelectionEvent::Missed => {
                debug!("{selector:?} missed");
                commands.trigger_targets(SelectionMissed, selector);
            }
        }
    }
}
