use std::sync::Arc;

use product_api::config::Config;
use product_api::domain::repositories::product_repository::MySqlProductRepository;
use product_api::error::AppError;
use product_api::infrastructure::database::mysql::{init_mysql, sync_schema};
use product_api::logging::init_logging;
use product_api::server::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config.logging)?;

    tracing::info!("Starting product API");

    // 初始化数据库连接, 同步失败只记录日志
    let db_pool = init_mysql(&config.database)?;
    match sync_schema(&db_pool).await {
        Ok(()) => tracing::info!("Database connection established & tables synced"),
        Err(e) => tracing::error!(error = %e, "Unable to connect to the database"),
    }

    // 创建应用状态
    let app_state = AppState {
        products: Arc::new(MySqlProductRepository::new(db_pool)),
    };

    // 创建并启动服务器
    let app = create_app(app_state);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
