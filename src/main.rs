use std::sync::Arc;

use wasm_serve::config::{self, AppState};
use wasm_serve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path (extension optional)
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::Config::load_from(&path)?,
        None => config::Config::load()?,
    };

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg.logging)?;

    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(cfg)?);
    // Returned from main, which reports it once on stderr
    let listener = server::create_listener(addr)?;

    let bound = listener.local_addr()?;

    println!("serving at port {}", bound.port());
    logger::log_info(&format!(
        "Serving {} on http://{bound} ({} MIME overrides)",
        state.root.display(),
        state.mime.override_count()
    ));

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
