//=========================================================================
// Walker Demo
//
// Two scenes wired through the root scene manager:
// - "menu":  Space/Enter starts, Escape quits
// - "field": WASD/arrows walk the player, Escape returns to the menu
//
// The player is driven by an Idle/Walking state machine; the camera
// follows its transform.
//
// Run with `RUST_LOG=debug cargo run --example walker` to see scene
// swaps and state transitions.
//
//=========================================================================

use hearth_engine::core::logging;
use hearth_engine::prelude::*;
use log::{info, LevelFilter};

const WALK_SPEED: f32 = 120.0;

//=== Player States =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stride {
    Idle,
    Walking,
}

impl StateId for Stride {}

struct Walking;

impl StateHandler<Stride> for Walking {
    fn update(&mut self, cx: &mut ComponentContext<'_>, dt: f32) -> EngineResult<Stride> {
        let axis = cx.globals.controller.movement_axis();
        if axis == Vec2::ZERO {
            return Ok(Stride::Idle);
        }
        cx.require_mut::<Transform2D>()?.translate(axis * WALK_SPEED * dt);
        Ok(Stride::Walking)
    }
}

//=== Scene Components ====================================================

/// Waits for the player to start or quit.
struct MenuPrompt;

impl Component for MenuPrompt {
    fn initialize(&mut self, _cx: &mut ComponentContext<'_>) -> EngineResult<()> {
        info!("Press Space to start, Escape to quit");
        Ok(())
    }

    fn update_state(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        if cx.globals.controller.primary_pressed() {
            cx.globals.request_scene("field");
        } else if cx.globals.controller.cancel_pressed() {
            cx.globals.request_exit();
        }
        Ok(())
    }
}

/// Sends the player back to the menu on Escape.
struct FieldExit;

impl Component for FieldExit {
    fn update_state(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        if cx.globals.controller.cancel_pressed() {
            cx.globals.request_scene("menu");
        }
        Ok(())
    }
}

/// Stand-in for a sprite renderer: reports where the player is drawn.
struct Marker;

impl Component for Marker {
    fn dependencies(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<Transform2D>()]
    }

    fn render(&mut self, cx: &mut ComponentContext<'_>, _dt: f32) -> EngineResult<()> {
        if cx.globals.frame() % 60 != 0 {
            return Ok(());
        }
        let world = cx.require::<Transform2D>()?.model_matrix();
        if let Some(target) = cx.render_context() {
            let clip = target.view_projection * world;
            info!("{} drawn at clip {:?}", cx.entity_name(), clip.w_axis.truncate());
        }
        Ok(())
    }
}

//=== Scenes ==============================================================

fn menu_scene() -> Scene {
    let mut scene = Scene::new("menu");
    scene.add_component(MenuPrompt);
    scene
}

fn field_scene() -> Scene {
    let mut scene = Scene::new("field");
    scene.add_component(FieldExit);

    let stride = StateMachine::new("player", Stride::Idle)
        .with_fn_state(Stride::Idle, |cx, _dt| {
            Ok(if cx.globals.controller.is_moving() {
                Stride::Walking
            } else {
                Stride::Idle
            })
        })
        .with_state(Stride::Walking, Walking);

    let player = scene.spawn("player");
    player.add_component(Transform2D::new().with_size(Vec2::splat(32.0)));
    player.add_component(stride);
    player.add_component(Camera2D::new(800.0, 600.0).following());
    player.add_component(Marker);
    let player_id = player.id();

    scene.set_active_camera(player_id);
    scene
}

//=== Entry Point =========================================================

fn main() -> EngineResult<()> {
    logging::init(LevelFilter::Info)?;

    EngineBuilder::new()
        .with_window_title("Hearth Walker")
        .with_window_size(800, 600)
        .build()
        .init(|systems| {
            let scenes = systems.scenes()?;
            scenes.register_default("menu", menu_scene);
            scenes.register_scene("field", field_scene);
            Ok(())
        })?
        .run()
}
