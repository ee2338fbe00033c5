use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::grading::{AiGrader, ModelClient, OpenAiClient};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub grader: Arc<AiGrader>,
}

/// 创建模型客户端
fn create_model_client(config: &AppConfig) -> Result<Arc<dyn ModelClient>> {
    let ai = &config.ai_grading;
    if ai.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set, AI grading requests will fail upstream");
    }

    let client = OpenAiClient::new(ai)?;
    debug!(
        "Model client ready: base={}, model={}, timeout={}s, retries={}",
        ai.api_base, ai.model, ai.timeout_secs, ai.max_retries
    );
    Ok(Arc::new(client))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和 AI 评分器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 其他依赖可能已安装过 provider，忽略重复安装
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new(&config.cache));
    warn!("Cache backend initialized");

    let model_client = create_model_client(config)?;
    let grader = Arc::new(AiGrader::new(
        storage.clone(),
        model_client,
        config.ai_grading.clone(),
    ));

    Ok(StartupContext {
        storage,
        cache,
        grader,
    })
}
