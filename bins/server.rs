use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(format: LogFormat) {
    common::utils::logging::init_logging(format == LogFormat::Json);
    info!(service = "roadmap", event = "logger_init", ?format, "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // .env may carry RUST_LOG and the config overrides
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(LogFormat::Compact);
            error!(service = "roadmap", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "roadmap",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "roadmap", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "roadmap",
        event = "start",
        %service_id,
        pid,
        version,
        addr = %cfg.server.bind_addr(),
        data_file = %cfg.storage.data_file,
        "roadmap service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "roadmap", event = "stop", %service_id, pid, "roadmap service stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "roadmap", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
