use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

mod assets;
mod config;
mod handler;
mod http;
mod logger;
mod render;

/// Local dashboard web server
#[derive(Parser, Debug)]
#[command(name = "dashr", version, about)]
struct Cli {
    /// Address to listen on (host:port; a bare :port keeps the configured host)
    #[arg(long)]
    addr: Option<String>,

    /// Read templates and assets live from disk instead of the embedded snapshot
    #[arg(long)]
    dev: bool,

    /// Configuration file path without extension
    #[arg(long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut cfg = config::Config::load_from(&cli.config)?;
    if let Some(ref addr) = cli.addr {
        cfg.override_addr(addr)?;
    }
    if cli.dev {
        cfg.ui.dev = true;
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(serve(cfg))
}

async fn serve(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    let state = Arc::new(config::AppState::new(&cfg)?);

    logger::log_server_start(&addr, &cfg);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, peer_addr, state).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                logger::log_warning(&format!("Connection error from {peer_addr}: {err}"));
            }
        });
    }
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled so quick local
/// restarts do not trip over sockets in TIME_WAIT.
fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    TcpListener::from_std(socket.into())
}
