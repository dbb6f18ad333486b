//! zraster terminal demo - rotating solid or STL model
//!
//! Usage:
//!   zraster-terminal [--stl model.stl | --shape sphere] [--precision 3]
//!                    [--config renderer.json]
//!                    [--wireframe] [--no-solid] [--axes] [--ortho] [--fps 30]
//!
//! Controls:
//!   - WASD / Arrow Keys: Rotate
//!   - E/R: Roll rotation
//!   - F/G/X: Toggle wireframe, solid fill, axes
//!   - P: Toggle perspective / orthographic
//!   - Q/ESC: Quit
//!
//! Logs go to stderr; set `RUST_LOG=debug` and redirect stderr to a file.

use anyhow::Context;
use tracing::info;
use zraster_core::{stl, SceneObject};
use zraster_terminal::{AppConfig, TerminalApp};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = AppConfig::from_args(std::env::args().skip(1))?;

    let object = match &config.stl {
        Some(path) => {
            let object = stl::load_stl(path)
                .with_context(|| format!("load STL {}", path.display()))?;
            info!(path = %path.display(), polygons = object.len(), "loaded STL");
            object
        }
        None => SceneObject::generate(config.shape, config.precision),
    };

    let mut app = TerminalApp::new(object, config)?;
    app.run()
}
