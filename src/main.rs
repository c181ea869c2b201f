use std::path::PathBuf;

use clap::Parser;

use meshview::loader::ModelSource;
use meshview::{ReplacePolicy, ViewerApp, ViewerConfig};

/// Desktop OBJ viewer with orbit controls and auto-framing.
#[derive(Parser, Debug)]
#[command(name = "meshview", version, about)]
struct Args {
    /// Path to a local OBJ file.
    #[arg(conflicts_with = "url")]
    model: Option<PathBuf>,

    /// Fetch the OBJ over HTTP instead of reading a file.
    #[arg(long)]
    url: Option<String>,

    /// Framing margin; multiplies the minimal fitting distance.
    #[arg(long, default_value_t = 1.5)]
    margin: f32,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 75.0)]
    fov: f32,

    /// When to detach the current model during a reload.
    #[arg(long, value_enum, default_value_t = ReplacePolicy::Lazy)]
    replace_policy: ReplacePolicy,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig {
        margin: args.margin,
        fovy_degrees: args.fov,
        replace_policy: args.replace_policy,
        ..Default::default()
    };

    let mut app = ViewerApp::new(config);
    match (args.model, args.url) {
        (Some(path), None) => app.set_source(ModelSource::Asset(path)),
        (None, Some(url)) => app.set_source(ModelSource::Remote(url)),
        (None, None) => log::warn!("no model given; starting with an empty viewport"),
        (Some(_), Some(_)) => unreachable!("clap rejects model and url together"),
    }

    app.run()
}
