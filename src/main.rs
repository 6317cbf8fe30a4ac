//! 聊天室系统主入口

use chatroom_system::{
    auth::hashid::IdObfuscator,
    auth::jwt::JwtService,
    config::AppConfig,
    db,
    handlers::health,
    middleware::AppState,
    routes,
    services::{AuthService, MessageService, ProfileService, SiteService},
    telemetry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("chatroom-system {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志与指标
    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Chatroom system starting...");

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    // 4. 构建应用状态
    // 签名密钥和混淆盐只在这里建立一次，进程生命周期内不变
    let jwt_service = Arc::new(JwtService::from_config(&config)?);
    let obfuscator = Arc::new(IdObfuscator::from_config(&config)?);
    let shared_config = Arc::new(config.clone());

    let message_service =
        Arc::new(MessageService::load(&config.resources.system_messages_path)?);

    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: db_pool.clone(),
        jwt_service: jwt_service.clone(),
        obfuscator: obfuscator.clone(),
        auth_service: Arc::new(AuthService::new(
            db_pool.clone(),
            jwt_service.clone(),
            obfuscator.clone(),
            shared_config.clone(),
        )),
        profile_service: Arc::new(ProfileService::new(
            db_pool.clone(),
            jwt_service,
            obfuscator,
            shared_config,
        )),
        site_service: Arc::new(SiteService::new(db_pool.clone())),
        message_service,
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        "Server listening"
    );

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 打印帮助信息
fn print_help() {
    println!("chatroom-system {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: chatroom-system [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过环境变量完成（前缀 CHAT_）");
    println!("  可用选项请参考 .env.example");
}
