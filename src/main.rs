use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let logger: Arc<dyn logger::Logger> = Arc::from(logger::init(&cfg.logging)?);
    let addr = cfg.get_socket_addr()?;

    // Routes are fixed before the first connection is accepted
    let state = Arc::new(config::AppState::new(cfg, Arc::clone(&logger)));
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(logger.as_ref(), &addr, &state.config, &state.routes);

    server::start_server_loop(
        listener,
        state,
        Arc::new(AtomicUsize::new(0)),
        server::shutdown_signal(Arc::clone(&logger)),
    )
    .await;

    logger.info("Server stopped");
    Ok(())
}
