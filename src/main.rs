use bevy::prelude::*;
use clap::Parser;

use recoil_runner::core::level::loader::LevelRequest;
use recoil_runner::{GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(about = "Recoil-driven platformer")]
struct Args {
    /// Path to the RON game config.
    #[arg(long, default_value = "assets/config/game.ron")]
    config: String,

    /// Level id to start on, overriding the configured default.
    #[arg(long)]
    level: Option<String>,
}

fn main() {
    let args = Args::parse();

    let (cfg, load_err) = GameConfig::load_or_default(&args.config);
    let start_level = args
        .level
        .unwrap_or_else(|| cfg.levels.default_level_id.clone());

    let mut app = App::new();
    app.insert_resource(cfg.clone())
        .insert_resource(LevelRequest { id: start_level })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin);

    // After DefaultPlugins so the message reaches the log subscriber.
    if let Some(err) = load_err {
        warn!(target: "app", "config '{}' unusable ({err}), using defaults", args.config);
    }

    app.run();
}
