//! Desktop simulation of the live location screen.
//!
//! Plays a scripted sequence of provider callbacks and user actions against a
//! console map. Run with: `cargo run -p livemap-sim [scenario.json]`
//!
//! Without an argument the built-in scenario runs: location is switched off,
//! back on, a fix arrives, location goes off again and a late fix is dropped.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use livemap_location::{
    Location, LocationCallback, LocationProvider, LocationRequestConfig, LocationResult,
    ResolutionCallback, ResolutionHandle, ResolutionLauncher, ResolutionRegistry,
    ResolutionResult, SettingsClient, SettingsError,
};
use livemap_map::{LatLng, LocationIcon, MapService, MarkerHandle, MarkerOptions, StatusIndicator};
use livemap_permission::sys::SystemPermissions;
use livemap_permission::{Permission, PermissionError, PermissionService, PermissionStatus};
use livemap_screen::{LocationScreen, ScreenServices};
use log::{debug, info};
use serde::Deserialize;

const DEFAULT_SCENARIO: &str = r#"{
    "settings": "resolvable",
    "steps": [
        { "availability": false },
        "button",
        "accept",
        { "availability": true },
        { "fix": { "latitude": 10.0, "longitude": 20.0, "accuracy": 15.0 } },
        { "availability": false },
        { "fix": { "latitude": 30.0, "longitude": 40.0 } },
        "stop",
        "start"
    ]
}"#;

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: LocationRequestConfig,
    #[serde(default)]
    settings: SettingsScript,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SettingsScript {
    #[default]
    Satisfied,
    Resolvable,
    Unresolvable,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Availability(bool),
    Fix(Location),
    Button,
    Accept,
    Decline,
    Stop,
    Start,
}

struct ConsolePermissions(SystemPermissions);

impl PermissionService for ConsolePermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        self.0.is_granted(permission)
    }

    fn should_show_rationale(&self, permission: Permission) -> bool {
        self.0.should_show_rationale(permission)
    }

    fn request(
        &self,
        permission: Permission,
    ) -> BoxFuture<'_, Result<PermissionStatus, PermissionError>> {
        Box::pin(async move {
            match self.0.request(permission).await {
                Err(PermissionError::NotSupported) => {
                    println!("[permission] no system dialog, granting {permission:?}");
                    Ok(PermissionStatus::Granted)
                }
                other => other,
            }
        })
    }
}

#[derive(Default)]
struct ScriptedProvider {
    callback: Mutex<Option<Arc<dyn LocationCallback>>>,
}

impl ScriptedProvider {
    fn callback(&self) -> Option<Arc<dyn LocationCallback>> {
        self.callback.lock().expect("provider mutex poisoned").clone()
    }
}

impl LocationProvider for ScriptedProvider {
    fn request_updates(
        &self,
        config: &LocationRequestConfig,
        callback: Arc<dyn LocationCallback>,
    ) -> LocationResult<()> {
        println!(
            "[provider] requesting {:?} updates every {:?} (fastest {:?})",
            config.priority(),
            config.interval(),
            config.fastest_interval()
        );
        *self.callback.lock().expect("provider mutex poisoned") = Some(callback);
        Ok(())
    }

    fn remove_updates(&self, _callback: &Arc<dyn LocationCallback>) {
        println!("[provider] updates removed");
        *self.callback.lock().expect("provider mutex poisoned") = None;
    }
}

struct ScriptedSettings(Mutex<SettingsScript>);

impl SettingsClient for ScriptedSettings {
    fn check_settings<'a>(
        &'a self,
        _config: &'a LocationRequestConfig,
    ) -> BoxFuture<'a, Result<(), SettingsError>> {
        let script = *self.0.lock().expect("settings mutex poisoned");
        Box::pin(async move {
            match script {
                SettingsScript::Satisfied => Ok(()),
                SettingsScript::Resolvable => {
                    Err(SettingsError::Resolvable(ResolutionHandle::new("enable-location")))
                }
                SettingsScript::Unresolvable => {
                    Err(SettingsError::Other("location hardware missing".into()))
                }
            }
        })
    }
}

struct ConsoleMarker;

impl MarkerHandle for ConsoleMarker {
    fn set_position(&self, position: LatLng) {
        println!(
            "[map] marker at {:.5}, {:.5}",
            position.latitude, position.longitude
        );
    }

    fn set_visible(&self, visible: bool) {
        println!("[map] marker {}", if visible { "shown" } else { "hidden" });
    }
}

struct ConsoleMap;

impl MapService for ConsoleMap {
    fn add_marker(&self, options: MarkerOptions) -> Box<dyn MarkerHandle> {
        println!("[map] added {:?} marker", options.icon);
        Box::new(ConsoleMarker)
    }

    fn animate_camera(&self, target: LatLng, zoom: f32) {
        println!(
            "[map] camera -> {:.5}, {:.5} at zoom {zoom}",
            target.latitude, target.longitude
        );
    }

    fn set_marker_clicks_consumed(&self, _consumed: bool) {}
}

struct ConsoleButton;

impl StatusIndicator for ConsoleButton {
    fn set_icon(&self, icon: LocationIcon) {
        println!("[button] icon {icon:?}");
    }
}

#[derive(Default)]
struct Prompts {
    callback: Mutex<Option<ResolutionCallback>>,
}

impl Prompts {
    fn answer(&self, result: ResolutionResult) {
        match self.callback.lock().expect("prompt mutex poisoned").as_ref() {
            Some(callback) => callback(result),
            None => println!("[prompt] no prompt registered"),
        }
    }
}

struct ConsoleLauncher(Arc<Prompts>);

impl ResolutionLauncher for ConsoleLauncher {
    fn launch(&self, handle: &ResolutionHandle) {
        println!("[prompt] asking user to fix settings ({})", handle.token());
    }

    fn unregister(&self) {
        *self.0.callback.lock().expect("prompt mutex poisoned") = None;
    }
}

struct ConsoleRegistry(Arc<Prompts>);

impl ResolutionRegistry for ConsoleRegistry {
    fn register(&self, key: &str, on_result: ResolutionCallback) -> Box<dyn ResolutionLauncher> {
        println!("[prompt] registered {key}");
        *self.0.callback.lock().expect("prompt mutex poisoned") = Some(on_result);
        Box::new(ConsoleLauncher(self.0.clone()))
    }
}

fn load_scenario() -> Result<Scenario, Box<dyn std::error::Error>> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => serde_json::from_str(DEFAULT_SCENARIO)?,
    };
    Ok(scenario)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let scenario = load_scenario()?;
    info!(
        "loaded scenario: {} steps, settings {:?}",
        scenario.steps.len(),
        scenario.settings
    );
    println!("=== livemap simulation ===\n");

    let provider = Arc::new(ScriptedProvider::default());
    let settings = Arc::new(ScriptedSettings(Mutex::new(scenario.settings)));
    let prompts = Arc::new(Prompts::default());

    let screen = LocationScreen::new(
        ScreenServices {
            permissions: Arc::new(ConsolePermissions(SystemPermissions::new())),
            provider: provider.clone(),
            settings: settings.clone(),
            map: Arc::new(ConsoleMap),
            indicator: Arc::new(ConsoleButton),
        },
        scenario.config,
    )?;

    screen.on_create(&ConsoleRegistry(prompts.clone()), true).await;

    for step in scenario.steps {
        println!("\n> {step:?}");
        match step {
            Step::Availability(available) => match provider.callback() {
                Some(callback) => callback.on_location_availability(available),
                None => println!("[provider] not subscribed, callback dropped"),
            },
            Step::Fix(location) => match provider.callback() {
                Some(callback) => callback.on_location_result(Some(location)),
                None => println!("[provider] not subscribed, callback dropped"),
            },
            Step::Button => screen.on_location_button_clicked().await,
            Step::Accept => {
                *settings.0.lock().expect("settings mutex poisoned") = SettingsScript::Satisfied;
                prompts.answer(ResolutionResult::Accepted);
            }
            Step::Decline => prompts.answer(ResolutionResult::Declined),
            Step::Stop => screen.on_stop(),
            Step::Start => screen.on_start(),
        }
        println!("  state: {:?}", screen.current());
        debug!(
            "observing: {}, camera move pending: {}",
            screen.is_observing(),
            screen.is_camera_move_pending()
        );
    }

    screen.on_destroy();
    info!("scenario finished");
    println!("\n=== done ===");
    Ok(())
}
