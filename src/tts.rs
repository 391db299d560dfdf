// src/tts.rs
//
// ElevenLabs 文本转语音客户端
//
// 提供词条朗读能力。未配置 API Key 时该功能不可用，由调用方先行判断；
// 请求失败直接报错，不做重试。

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认音色 (Adam)
pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
/// 默认模型
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_stability() -> f64 {
    0.5
}

fn default_similarity_boost() -> f64 {
    0.5
}

/// TTS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// ElevenLabs API Key（空串表示未配置）
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            voice_id: default_voice_id(),
            model_id: default_model_id(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
        }
    }
}

impl TtsConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// ElevenLabs 客户端
#[derive(Clone)]
pub struct ElevenLabsClient {
    config: TtsConfig,
    client: Client,
}

impl ElevenLabsClient {
    pub fn new(config: TtsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// 合成语音，返回 MP3 音频数据
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if !self.config.is_configured() {
            anyhow::bail!("未配置 ElevenLabs API Key");
        }
        if text.trim().is_empty() {
            anyhow::bail!("合成文本为空");
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.config.voice_id
        );
        let request_body = serde_json::json!({
            "text": text,
            "model_id": self.config.model_id,
            "voice_settings": {
                "stability": self.config.stability,
                "similarity_boost": self.config.similarity_boost
            }
        });

        tracing::debug!("TTS 请求: voice={} text_len={}", self.config.voice_id, text.len());

        let response = self
            .client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header("xi-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("ElevenLabs API 请求失败 ({}): {}", status, text);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// 播放 MP3 音频，阻塞直至播放完成
pub fn play_mp3(data: Vec<u8>) -> Result<()> {
    let (_stream, handle) = rodio::OutputStream::try_default()?;
    let sink = rodio::Sink::try_new(&handle)?;
    let source = rodio::Decoder::new(std::io::Cursor::new(data))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
