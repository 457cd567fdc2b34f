use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use playkit::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TILE: f32 = 48.0;
const GRID: i32 = 7;
const HIGHLIGHT: Color = Color::srgb(1.0, 0.85, 0.3);

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        .init_resource::<DemoSettings>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "playkit: click or tap a crate".into(),
                        resolution: (1200., 800.).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,playkit=debug".into(),
                    ..default()
                }),
        )
        .add_plugins((PlaykitPlugins, UiPlugin))
        .add_systems(Startup, (setup_camera, spawn_board, spawn_selector))
        .add_systems(Update, (inspector_ui, apply_settings))
        .observe(highlight_selected)
        .observe(clear_highlight)
        .observe(follow_selection)
        .run();
}

#[derive(Resource)]
struct DemoSettings {
    seed: u64,
    selector_active: bool,
    follow_selection: bool,
    follow_hardness: f32,
    max_distance: f32,
    show_help: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            selector_active: true,
            follow_selection: true,
            follow_hardness: 5.0,
            max_distance: 5000.0,
            show_help: true,
        }
    }
}

#[derive(Component)]
struct Tile {
    base: Color,
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2dBundle::default(),
        MainCamera,
        {
            let mut follow = SmoothFollow::default();
            follow.offset = Vec3::new(0.0, 0.0, 999.0);
            follow
        },
    ));
}

fn tile_catalog() -> PoolCatalog {
    PoolCatalog::new(vec![
        Pool::new("Target", "tiles/crate.png", 16).with_spawn_probability(0.5),
        Pool::new("Scenery", "tiles/rock.png", 16).with_spawn_probability(0.3),
        Pool::new("Wall", "tiles/wall.png", 16).with_spawn_probability(0.2),
    ])
}

fn tile_color(tag: &str) -> Color {
    match tag {
        "Target" => Color::srgb(0.55, 0.35, 0.2),
        "Scenery" => Color::srgb(0.45, 0.45, 0.5),
        _ => Color::srgb(0.2, 0.2, 0.25),
    }
}

fn spawn_board(mut commands: Commands, settings: Res<DemoSettings>) {
    let catalog = tile_catalog();
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let mut cells: Vec<IVec2> = (-GRID / 2..=GRID / 2)
        .flat_map(|x| (-GRID / 2..=GRID / 2).map(move |y| IVec2::new(x, y)))
        .collect();
    cells.shuffle_seeded(settings.seed);
    // leave a few holes so releases can miss
    let holes = cells.len() / 6;

    for (i, cell) in cells.iter().skip(holes).enumerate() {
        let Some(pool) = catalog.pick(&mut rng) else {
            continue;
        };
        let base = tile_color(&pool.tag);
        let mut tile = commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: base,
                    custom_size: Some(Vec2::splat(TILE - 4.0)),
                    ..default()
                },
                transform: Transform::from_translation((cell.as_vec2() * TILE).extend(0.0)),
                ..default()
            },
            Collider::cuboid(Vec3::new(TILE * 0.5, TILE * 0.5, 1.0)),
            EntityTag::new(pool.tag.clone()),
            Tile { base },
            Name::new(format!("{} #{i}", pool.tag)),
        ));
        if pool.tag != "Wall" {
            tile.insert(Selectable);
        }
    }
    info!("board spawned from {} pools", catalog.pools().len());
}

fn spawn_selector(mut commands: Commands, settings: Res<DemoSettings>) {
    let max_distance = settings.max_distance;
    commands
        .spawn((
            PointerSelector::new(SelectorConfig {
                selectable_tag: "Target".into(),
                input_mode: InputMode::Both,
            })
            .with_predicate(move |hit| hit.distance < max_distance),
            Name::new("selector"),
        ))
        .observe(|_: Trigger<SelectionMissed>| info!("release missed every tile"));
}

fn highlight_selected(trigger: Trigger<OnSelect>, mut tiles: Query<&mut Sprite, With<Tile>>) {
    if let Ok(mut sprite) = tiles.get_mut(trigger.entity()) {
        sprite.color = HIGHLIGHT;
    }
}

fn clear_highlight(trigger: Trigger<OnDeselect>, mut tiles: Query<(&mut Sprite, &Tile)>) {
    if let Ok((mut sprite, tile)) = tiles.get_mut(trigger.entity()) {
        sprite.color = tile.base;
    }
}

fn follow_selection(
    trigger: Trigger<OnSelect>,
    mut cameras: Query<&mut SmoothFollow, With<MainCamera>>,
) {
    for mut follow in &mut cameras {
        follow.target = Some(trigger.entity());
    }
}

fn inspector_ui(
    mut contexts: EguiContexts,
    mut settings: ResMut<DemoSettings>,
    selectors: Query<&PointerSelector>,
    names: Query<&Name>,
) {
    egui::Window::new("Selection").show(contexts.ctx_mut(), |ui| {
        for selector in &selectors {
            match selector.current() {
                Some(entity) => ui.label(format!(
                    "Selected: {}",
                    names
                        .get(entity)
                        .map(|n| n.as_str().to_owned())
                        .unwrap_or_else(|_| format!("{entity:?}"))
                )),
                None => ui.label("Nothing selected"),
            };
            if let Some(hit) = selector.current_hit() {
                ui.label(format!(
                    "Hit at ({:.1}, {:.1}), {:.1} away",
                    hit.point.x, hit.point.y, hit.distance
                ));
            }
        }

        ui.separator();

        ui.checkbox(&mut settings.selector_active, "Selector active");
        ui.checkbox(&mut settings.follow_selection, "Camera follows selection");
        ui.add(
            egui::Slider::new(&mut settings.follow_hardness, 0.5..=20.0).text("Follow hardness"),
        );
        ui.checkbox(&mut settings.show_help, "Help");
    });

    if settings.show_help {
        egui::Window::new("Help").show(contexts.ctx_mut(), |ui| {
            ui.label("Left Mouse / Tap: select a tile");
            ui.label("Touch only selects crates");
            ui.label("Release on empty space: clear selection");
            ui.label("Walls are never selectable");
        });
    }
}

fn apply_settings(
    settings: Res<DemoSettings>,
    mut selectors: Query<&mut PointerSelector>,
    mut cameras: Query<&mut SmoothFollow, With<MainCamera>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut selector in &mut selectors {
        selector.set_active(settings.selector_active);
    }
    for mut follow in &mut cameras {
        follow.set_active(settings.follow_selection);
        follow.hardness = settings.follow_hardness;
    }
}
