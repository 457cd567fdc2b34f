use bevy::prelude::*;

pub struct FollowPlugin;
impl Plugin for FollowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, smooth_follow);
    }
}

/// Eases the entity toward `target`'s position plus `offset`.
#[derive(Component, Clone, Debug)]
pub struct SmoothFollow {
    pub target: Option<Entity>,
    pub offset: Vec3,
    /// How quickly the gap closes, per second.
    pub hardness: f32,
    active: bool,
}

impl Default for SmoothFollow {
    fn default() -> Self {
        Self {
            target: None,
            offset: Vec3::ZERO,
            hardness: 5.0,
            active: true,
        }
    }
}

impl SmoothFollow {
    pub fn new(target: Entity, offset: Vec3) -> Self {
        Self {
            target: Some(target),
            offset,
            ..default()
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Position after one step of `dt` seconds from `current`.
    pub fn step(&self, current: Vec3, target: Vec3, dt: f32) -> Vec3 {
        let t = (self.hardness * dt).clamp(0.0, 1.0);
        current.lerp(target + self.offset, t)
    }
}

pub fn smooth_follow(
    time: Res<Time>,
    mut followers: Query<(&mut Transform, &SmoothFollow)>,
    targets: Query<&GlobalTransform>,
) {
    let dt = time.delta_seconds();
    for (mut transform, follow) in &mut followers {
        if !follow.active {
            continue;
        }
        let Some(target) = follow.target.and_then(|e| targets.get(e).ok()) else {
            continue;
        };
        transform.translation = follow.step(transform.translation, target.translation(), dt);
    }
}
