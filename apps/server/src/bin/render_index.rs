//! Pre-render the page template into the static root, for hosting the game
//! without the server.

use poke_memory_server::config::ServerConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    poke_memory_server::init_tracing();

    let config = ServerConfig::from_env()?;
    let html = poke_memory_server::render_index(&config)?;

    let out = config.rendered_index();
    std::fs::write(&out, html)?;
    tracing::info!("✅ Rendered {}", out.display());

    Ok(())
}
