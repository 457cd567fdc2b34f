//! Gameplay utilities for Bevy: pointer/touch selection of scene entities,
//! smooth follow, slice helpers for scored and weighted picks, and object pool
//! configuration.

pub mod collections;
pub mod follow;
pub mod input;
pub mod pool;
pub mod selection;
pub mod ui;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Input sampling, selection and follow. Add [`ui::UiPlugin`] as well when
/// egui windows should block selection.
pub struct PlaykitPlugins;
impl PluginGroup for PlaykitPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(input::InputPlugin)
            .add(selection::SelectionPlugin)
            .add(follow::FollowPlugin)
    }
}

pub mod prelude {
    pub use crate::collections::{ProbSelectable, ScoredSliceExt, WeightedSliceExt};
    pub use crate::follow::{FollowPlugin, SmoothFollow};
    pub use crate::input::{InputPlugin, PointerOverUi, PointerReleases, PointerSet};
    pub use crate::pool::{Pool, PoolCatalog};
    pub use crate::selection::{
        CameraProvider, Collider, EntityTag, InputMode, MainCamera, OnDeselect, OnSelect,
        PointerSelector, RayHit, ResetSelection, ScreenRays, Selectable, SelectionMissed,
        SelectionPlugin, SelectorConfig,
    };
    pub use crate::ui::UiPlugin;
    pub use crate::PlaykitPlugins;
}
