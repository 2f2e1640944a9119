use bevy::prelude::*;

use constants::render_settings::{
    BUTTON_COLOUR, BUTTON_DISABLED_COLOUR, BUTTON_HOVER_COLOUR, BUTTON_PRESSED_COLOUR,
};

use crate::engine::core::app_state::{AppMode, ModeRequest, resolve_mode_request};
use crate::engine::scene::paint_material::ActivePaint;
use crate::rpc::web_rpc::WebRpcInterface;

/// Event fired when a mode change is requested via RPC, keyboard or the on-screen button.
#[derive(Event, Debug, Clone, Copy)]
pub struct ModeRequestEvent {
    pub request: ModeRequest,
    pub source: ModeRequestSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequestSource {
    Rpc,
    Keyboard,
    Ui,
}

#[derive(Component)]
pub struct ModeButton;

#[derive(Component)]
pub struct ModeButtonLabel;

/// Apply mode requests through the capture guard and tell the host page.
pub fn handle_mode_requests(
    mut events: EventReader<ModeRequestEvent>,
    state: Res<State<AppMode>>,
    mut next_state: ResMut<NextState<AppMode>>,
    paint: Res<ActivePaint>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    // NextState only applies at the next transition, so track it locally.
    let mut current = *state.get();
    let has_captured = paint.sampled;

    for event in events.read() {
        match resolve_mode_request(current, event.request, has_captured) {
            Some(mode) => {
                info!("Mode {} -> {} via {:?}", current.as_str(), mode.as_str(), event.source);
                next_state.set(mode);
                current = mode;
                rpc_interface.send_notification(
                    "mode_changed",
                    serde_json::json!({ "mode": mode.as_str() }),
                );
            }
            None if event.request.target(current) != current => {
                warn!("Preview unavailable until a colour has been captured");
            }
            None => {}
        }
    }
}

/// Space toggles between capture and preview, R retakes.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_mode_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mode_events: EventWriter<ModeRequestEvent>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        mode_events.write(ModeRequestEvent {
            request: ModeRequest::Toggle,
            source: ModeRequestSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        mode_events.write(ModeRequestEvent {
            request: ModeRequest::Capture,
            source: ModeRequestSource::Keyboard,
        });
    }
}

// Mode button toggles; greyed out in capture until a colour exists
pub fn mode_button_interaction(
    mut q: Query<(Ref<Interaction>, &mut BackgroundColor), With<ModeButton>>,
    mut mode_events: EventWriter<ModeRequestEvent>,
    state: Res<State<AppMode>>,
    paint: Res<ActivePaint>,
) {
    let enabled = *state.get() == AppMode::Preview || paint.sampled;

    for (interaction, mut bg) in &mut q {
        let colour = match *interaction {
            _ if !enabled => BUTTON_DISABLED_COLOUR,
            Interaction::Pressed => BUTTON_PRESSED_COLOUR,
            Interaction::Hovered => BUTTON_HOVER_COLOUR,
            Interaction::None => BUTTON_COLOUR,
        };
        bg.set_if_neq(BackgroundColor(colour));

        if enabled && interaction.is_changed() && *interaction == Interaction::Pressed {
            mode_events.write(ModeRequestEvent {
                request: ModeRequest::Toggle,
                source: ModeRequestSource::Ui,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::colour::PaintColour;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;

    fn app(colour: Option<PaintColour>) -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<AppMode>()
            .add_event::<ModeRequestEvent>()
            .init_resource::<WebRpcInterface>()
            .insert_resource(ActivePaint {
                colour,
                sampled: colour.is_some(),
            })
            .add_systems(Update, handle_mode_requests);
        app
    }

    fn request(app: &mut App, request: ModeRequest) {
        app.world_mut().send_event(ModeRequestEvent {
            request,
            source: ModeRequestSource::Rpc,
        });
        app.update();
        // Transition applies on the following frame's StateTransition.
        app.update();
    }

    fn mode(app: &App) -> AppMode {
        *app.world().resource::<State<AppMode>>().get()
    }

    #[test]
    fn preview_is_refused_before_a_capture() {
        let mut app = app(None);
        request(&mut app, ModeRequest::Preview);
        assert_eq!(mode(&app), AppMode::Capture);
    }

    #[test]
    fn an_explicit_colour_does_not_unlock_preview() {
        let mut app = app(None);
        app.world_mut().insert_resource(ActivePaint {
            colour: Some(PaintColour::new(0x33, 0x66, 0x99)),
            sampled: false,
        });
        request(&mut app, ModeRequest::Preview);
        assert_eq!(mode(&app), AppMode::Capture);
    }

    #[test]
    fn capture_then_preview_then_retake() {
        let mut app = app(Some(PaintColour::new(0x33, 0x66, 0x99)));
        request(&mut app, ModeRequest::Toggle);
        assert_eq!(mode(&app), AppMode::Preview);
        let notified = app
            .world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .iter()
            .any(|n| n.method == "mode_changed" && n.params["mode"] == "preview");
        assert!(notified);
        request(&mut app, ModeRequest::Capture);
        assert_eq!(mode(&app), AppMode::Capture);
    }

    #[test]
    fn disabled_button_does_not_request() {
        let mut world = World::new();
        world.init_resource::<Events<ModeRequestEvent>>();
        world.init_resource::<ActivePaint>();
        world.insert_resource(State::new(AppMode::Capture));
        world.spawn((ModeButton, Interaction::Pressed, BackgroundColor(BUTTON_COLOUR)));

        world.run_system_once(mode_button_interaction).unwrap();

        assert!(world.resource::<Events<ModeRequestEvent>>().is_empty());
        let mut q = world.query_filtered::<&BackgroundColor, With<ModeButton>>();
        assert_eq!(q.single(&world).unwrap().0, BUTTON_DISABLED_COLOUR);
    }
}
