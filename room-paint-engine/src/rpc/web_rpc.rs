use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::colour::PaintColour;
use crate::engine::core::app_state::{AppMode, ModeRequest};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::room_loader::room_status;
use crate::engine::scene::paint_material::ActivePaint;
use crate::engine::scene::surface_classifier::PaintableSurfaces;
use crate::tools::colour_sampler::live_feed::SampleRequest;
use crate::tools::mode_toggle::{ModeRequestEvent, ModeRequestSource};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Notifications waiting for the next send pass.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Engine state visible to RPC handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub mode: AppMode,
    pub colour: Option<PaintColour>,
    pub room: serde_json::Value,
}

/// Side effects requested by an RPC call, applied by the calling system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RpcAction {
    Sample(Vec2),
    Mode(ModeRequest),
    Paint(PaintColour),
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut sample_events: EventWriter<SampleRequest>,
    mut mode_events: EventWriter<ModeRequestEvent>,
    mut paint: ResMut<ActivePaint>,
    state: Res<State<AppMode>>,
    loading_progress: Res<LoadingProgress>,
    surfaces: Option<Res<PaintableSurfaces>>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let snapshot = EngineSnapshot {
            mode: *state.get(),
            colour: paint.colour,
            room: room_status(&loading_progress, surfaces.as_deref()),
        };
        let mut actions = Vec::new();

        if let Some(response) = handle_rpc_request(&request, &snapshot, &mut actions) {
            rpc_interface.queue_response(response);
        }

        for action in actions {
            match action {
                RpcAction::Sample(screen_point) => {
                    sample_events.write(SampleRequest { screen_point });
                }
                RpcAction::Mode(request) => {
                    mode_events.write(ModeRequestEvent {
                        request,
                        source: ModeRequestSource::Rpc,
                    });
                }
                RpcAction::Paint(colour) => {
                    info!("Paint colour set to {colour} via RPC");
                    let next = ActivePaint {
                        colour: Some(colour),
                        sampled: paint.sampled,
                    };
                    paint.set_if_neq(next);
                }
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
/// Notifications (no id) still run their actions but get no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    snapshot: &EngineSnapshot,
    actions: &mut Vec<RpcAction>,
) -> Option<RpcResponse> {
    if request.jsonrpc != "2.0" {
        warn!("Rejecting RPC message with version {}", request.jsonrpc);
        let id = request.id.clone()?;
        return Some(create_error_response(id, -32600, "Invalid request", None));
    }

    let result = match request.method.as_str() {
        "sample_colour" => handle_sample_colour(&request.params, actions),
        "set_mode" => handle_set_mode(&request.params, actions),
        "set_paint_colour" => handle_set_paint_colour(&request.params, actions),
        "get_state" => Ok(handle_get_state(snapshot)),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Queue a sample at a page coordinate. The colour arrives as `colour_sampled`.
fn handle_sample_colour(
    params: &serde_json::Value,
    actions: &mut Vec<RpcAction>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SampleParams {
        x: f32,
        y: f32,
    }

    let point = serde_json::from_value::<SampleParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected numeric 'x' and 'y' parameters"))?;

    actions.push(RpcAction::Sample(Vec2::new(point.x, point.y)));

    Ok(serde_json::json!({
        "success": true,
        "queued": true
    }))
}

fn handle_set_mode(
    params: &serde_json::Value,
    actions: &mut Vec<RpcAction>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ModeParams {
        mode: String,
    }

    let mode_params = serde_json::from_value::<ModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;

    let request = ModeRequest::from_name(&mode_params.mode)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown mode: {}", mode_params.mode)))?;

    actions.push(RpcAction::Mode(request));

    Ok(serde_json::json!({
        "success": true,
        "requested": mode_params.mode
    }))
}

fn handle_set_paint_colour(
    params: &serde_json::Value,
    actions: &mut Vec<RpcAction>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ColourParams {
        hex: String,
    }

    let colour_params = serde_json::from_value::<ColourParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'hex' parameter"))?;

    let colour = colour_params
        .hex
        .parse::<PaintColour>()
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    actions.push(RpcAction::Paint(colour));

    Ok(serde_json::json!({
        "success": true,
        "hex": colour.hex()
    }))
}

fn handle_get_state(snapshot: &EngineSnapshot) -> serde_json::Value {
    serde_json::json!({
        "mode": snapshot.mode.as_str(),
        "colour": snapshot.colour.map(|c| c.hex()),
        "room": snapshot.room,
    })
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}
