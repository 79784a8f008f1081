use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(format: LogFormat) {
    // 复用公共日志初始化工具，统一日志格式与级别处理
    common::utils::logging::init_logging(format == LogFormat::Json);
    info!(service = "adboard", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG / CONFIG_PATH 等环境变量生效
    dotenv().ok();

    let config = AppConfig::load_and_validate();
    let log_format = config.as_ref().map(|c| c.logging.format).unwrap_or_default();
    init_logging(log_format);

    let cfg = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "adboard", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "adboard",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "adboard", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "adboard",
        event = "start",
        %service_id,
        pid,
        version,
        http = %cfg.server.bind_addr(),
        rpc = %cfg.rpc.bind_addr(),
        threads = worker_threads.unwrap_or_default(),
        "ads board starting"
    );

    // server::run 内部监听 Ctrl+C / SIGTERM 并优雅停机
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "adboard", event = "stop", %service_id, pid, "ads board stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "adboard", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
