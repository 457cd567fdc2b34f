use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use crate::input::{detect_ui_hover, PointerOverUi, PointerSet};

/// Lets egui windows occlude pointer releases.
pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        app.init_resource::<PointerOverUi>().add_systems(
            Update,
            detect_egui_hover
                .in_set(PointerSet::Sample)
                .after(detect_ui_hover),
        );
    }
}

pub fn detect_egui_hover(mut contexts: EguiContexts, mut over_ui: ResMut<PointerOverUi>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    if ctx.is_pointer_over_area() || ctx.wants_pointer_input() {
        **over_ui = true;
    }
}
