use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerReleases>()
            .init_resource::<PointerOverUi>()
            .configure_sets(Update, (PointerSet::Sample, PointerSet::Select).chain())
            .add_systems(
                Update,
                (sample_pointer_releases, detect_ui_hover).in_set(PointerSet::Sample),
            );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerSet {
    /// Input and UI occlusion for this frame are recorded.
    Sample,
    /// Selectors consume what `Sample` recorded.
    Select,
}

/// Screen positions of pointer releases seen this frame.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq)]
pub struct PointerReleases {
    pub touch: Option<Vec2>,
    pub mouse: Option<Vec2>,
}

impl PointerReleases {
    pub fn is_empty(&self) -> bool {
        self.touch.is_none() && self.mouse.is_none()
    }
}

/// Whether the pointer is over any interactive UI element this frame.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct PointerOverUi(pub bool);

pub fn sample_pointer_releases(
    mut releases: ResMut<PointerReleases>,
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    releases.touch = touches.iter_just_released().next().map(|t| t.position());
    releases.mouse = if buttons.just_released(MouseButton::Left) {
        windows.get_single().ok().and_then(Window::cursor_position)
    } else {
        None
    };
}

pub fn detect_ui_hover(mut over_ui: ResMut<PointerOverUi>, interactions: Query<&Interaction>) {
    **over_ui = interactions
        .iter()
        .any(|i| matches!(i, Interaction::Hovered | Interaction::Pressed));
}
