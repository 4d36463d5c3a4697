use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

/// File config first; environment fallbacks only when the file is absent.
/// A file that exists but fails to parse or validate is fatal.
fn load_config(path: &str) -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate_from(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_missing_file(&e) => {
            let cfg = configs::AppConfig::from_env()?;
            warn!(path, "config file not found; using environment");
            Ok(cfg)
        }
        Err(e) => Err(e.context(format!("invalid config file {path}"))),
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn main() -> std::process::ExitCode {
    // 提前加载 .env，使得 RUST_LOG 等环境变量生效
    dotenv().ok();

    let cfg = match load_config(&configs::config_path()) {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "server", event = "config_invalid", error = ?e, "no usable configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.json);
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
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
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "server service starting"
    );

    // server::run 内部处理 Ctrl+C 优雅停机
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rpg_auth_{}_{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn invalid_config_file_is_fatal() {
        let path = write_config(
            "invalid",
            "[database]\nurl = \"sqlite::memory:\"\n[auth]\nhardened_login = true\nargon2_memory_kib = 4\n",
        );
        let res = load_config(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let err = res.unwrap_err();
        assert!(!is_missing_file(&err));
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn unparsable_config_file_is_fatal() {
        let path = write_config("garbled", "[auth\nhardened_login = yes\n");
        let res = load_config(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());
    }

    #[test]
    fn valid_config_file_keeps_auth_settings() {
        let path = write_config(
            "valid",
            "[database]\nurl = \"sqlite::memory:\"\n[auth]\nhardened_login = true\nargon2_memory_kib = 4096\n",
        );
        let res = load_config(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let cfg = res.unwrap();
        assert!(cfg.auth.hardened_login);
        assert_eq!(cfg.auth.argon2_memory_kib, 4096);
    }

    #[test]
    fn only_a_missing_file_falls_back_to_environment() {
        let missing = std::env::temp_dir().join(format!("rpg_auth_{}_absent.toml", std::process::id()));
        let err = configs::AppConfig::load_and_validate_from(missing.to_str().unwrap()).unwrap_err();
        assert!(is_missing_file(&err));

        let garbled = write_config("not_missing", "not = [valid");
        let err = configs::AppConfig::load_and_validate_from(garbled.to_str().unwrap()).unwrap_err();
        std::fs::remove_file(&garbled).ok();
        assert!(!is_missing_file(&err));
    }
}
