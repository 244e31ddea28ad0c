use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use polygon_api::{
    config::load_settings_from,
    events::{Drag, Error as ErrorEvent, LeftClick, Wheel},
    load_settings, Callback, LoopbackHost, Polygon,
};
use shared::{
    domain::Position,
    protocol::{DragPayload, ErrorPayload, HostEvent, PositionPayload, WheelPayload},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Drive the polygon bindings against an in-process host")]
struct Args {
    /// Polygon id used for the walkthrough.
    #[arg(long, default_value = "p1")]
    id: String,
    /// Settings file; defaults to ./polygon.toml plus env overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    info!(plugin = %settings.plugin_name, prefix = %settings.event_prefix, "settings loaded");

    let host = Arc::new(LoopbackHost::new(settings.clone()));
    let polygon = Polygon::attach(Arc::clone(&host), settings);

    let on_click: Callback<PositionPayload> = Arc::new(|payload: &PositionPayload| {
        println!(
            "LeftClick at ({}, {})",
            payload.position.x, payload.position.y
        );
    });
    let on_drag: Callback<DragPayload> = Arc::new(|payload: &DragPayload| {
        println!(
            "Drag ({}, {}) -> ({}, {})",
            payload.from.x, payload.from.y, payload.to.x, payload.to.y
        );
    });
    let on_wheel: Callback<WheelPayload> = Arc::new(|payload: &WheelPayload| {
        println!("Wheel delta ({}, {})", payload.delta.x, payload.delta.y);
    });
    let on_error: Callback<ErrorPayload> = Arc::new(|payload: &ErrorPayload| {
        println!("Host error: {}", payload.error);
    });
    polygon.on::<LeftClick>(on_click);
    polygon.on::<Drag>(on_drag);
    polygon.on::<Wheel>(on_wheel);
    polygon.on::<ErrorEvent>(on_error);

    let id = args.id.as_str();
    let steps = [
        ("register", polygon.register(id).await),
        (
            "update",
            polygon
                .update(id, vec![(0.0, 0.0), (0.5, 0.0), (0.5, 0.5), (0.0, 0.5)])
                .await,
        ),
        ("show", polygon.show(id).await),
        ("hide", polygon.hide(id).await),
        ("remove", polygon.remove(id).await),
        ("show after remove", polygon.show(id).await),
        ("clear", polygon.clear().await),
    ];
    for (label, outcome) in steps {
        let response = outcome.with_context(|| format!("{label} failed to reach the host"))?;
        println!("{label}: {}", serde_json::to_string(&response)?);
    }

    host.emit(&HostEvent::LeftClick(PositionPayload {
        position: Position::new(0.25, 0.25),
    }));
    host.emit(&HostEvent::Drag(DragPayload {
        from: Position::new(0.25, 0.25),
        to: Position::new(0.4, 0.3),
    }));
    host.emit(&HostEvent::Wheel(WheelPayload {
        delta: Position::new(0.0, -120.0),
    }));

    // Listener tasks run on the runtime; give them a moment before exiting.
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
