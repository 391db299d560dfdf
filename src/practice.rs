//! 发音练习会话
//!
//! 调用方从语音识别协作方获得定稿转写，交由评分器打分，
//! 并把 (分数, 转写) 转发给各结果接收方。评分器保持纯函数，
//! 会话只负责串联协作方和组织反馈文案。

use anyhow::Result;

use crate::scoring::{self, ScoringResult};

/// 默认及格线
pub const DEFAULT_PASS_THRESHOLD: u8 = 80;

/// 转写来源（语音识别协作方）
///
/// 返回 None 表示本次没有识别到内容（环境不支持或用户未发声）
pub trait TranscriptSource {
    fn next_transcript(&mut self) -> Result<Option<String>>;
}

/// 评分结果接收方（展示 / 统计 / 埋点）
pub trait ScoreSink {
    fn on_score(&mut self, score: u8, transcript: &str);
}

/// 通过 tracing 记录评分的接收方
pub struct LoggingSink;

impl ScoreSink for LoggingSink {
    fn on_score(&mut self, score: u8, transcript: &str) {
        tracing::info!("发音评分: score={} transcript={}", score, transcript);
    }
}

/// 会话内统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub attempts: usize,
    pub passed: usize,
    pub best_score: u8,
}

impl ScoreSink for SessionStats {
    fn on_score(&mut self, score: u8, _transcript: &str) {
        self.attempts += 1;
        if score >= DEFAULT_PASS_THRESHOLD {
            self.passed += 1;
        }
        self.best_score = self.best_score.max(score);
    }
}

/// 单次练习的反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFeedback {
    pub transcript: String,
    pub result: ScoringResult,
    pub passed: bool,
    /// 展示给用户的提示文案
    pub message: String,
}

/// 发音练习会话
///
/// 持有目标词条与及格线；每次 attempt 拉取一条转写并评分
pub struct PracticeSession {
    target: String,
    pass_threshold: u8,
}

impl PracticeSession {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.pass_threshold = threshold.min(100);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// 进行一次练习
    ///
    /// 拉取转写 → 评分 → 通知所有接收方。返回 None 表示没有识别到内容。
    pub fn attempt(
        &self,
        source: &mut dyn TranscriptSource,
        sinks: &mut [&mut dyn ScoreSink],
    ) -> Result<Option<AttemptFeedback>> {
        let Some(transcript) = source.next_transcript()? else {
            return Ok(None);
        };

        let result = scoring::score(&transcript, &self.target);
        let passed = result.score >= self.pass_threshold;
        let message = self.feedback_message(&result, &transcript);

        for sink in sinks.iter_mut() {
            sink.on_score(result.score, &transcript);
        }

        Ok(Some(AttemptFeedback {
            transcript,
            result,
            passed,
            message,
        }))
    }

    fn feedback_message(&self, result: &ScoringResult, transcript: &str) -> String {
        if result.score == 100 {
            "Perfect! 🎉".to_string()
        } else if result.score >= self.pass_threshold {
            "Close! Try again.".to_string()
        } else {
            format!(
                "You said \"{}\" - try saying \"{}\"",
                transcript, self.target
            )
        }
    }
}
