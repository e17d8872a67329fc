use crate::persona::BuyerProfile;
use crate::run::TurnRecord;
use std::future::Future;
use std::pin::Pin;

/// External reply-generation seam for freeplay/flavor modes.
///
/// Implementations wrap an LLM (or anything else) that turns the profile,
/// the transcript so far, and the latest seller message into buyer prose.
/// State transitions and scoring stay rule-based regardless; only the
/// strict path is required to be deterministic, and a generator failure
/// falls back to it.
pub trait ReplyGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        profile: &'a BuyerProfile,
        transcript: &'a [TurnRecord],
        seller_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}

/// Fixed-script generator for tests and demos.
pub struct ScriptedReplyGenerator {
    lines: Vec<String>,
}

impl ScriptedReplyGenerator {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl ReplyGenerator for ScriptedReplyGenerator {
    fn generate<'a>(
        &'a self,
        _profile: &'a BuyerProfile,
        transcript: &'a [TurnRecord],
        _seller_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        let index = transcript.len().saturating_sub(1);
        Box::pin(async move {
            self.lines
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("script exhausted at turn {index}"))
        })
    }
}
