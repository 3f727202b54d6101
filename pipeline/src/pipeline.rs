//! The turn pipeline: a linear state machine over [`Stage`].

use std::sync::Arc;
use std::time::Duration;

use analyzer::{BiasReport, MessageAnalyzer};
use assist_core::{Classification, MessageStore, Sentiment, GENERAL_QUERY};
use context_strategies::{
    ContextRequest, ContextStrategy, SessionAggregator, SessionHistory, SimilarityRetriever,
    StrategyResult,
};
use llm_client::{CompletionError, CompletionOptions, LlmClient};
use personalization::{fuse, Personalization};
use prompt::{assemble, PromptInputs};
use tracing::{debug, info, instrument, warn};

use crate::config::EnvPipelineConfig;
use crate::input::{parse_button, ButtonAction, Signals};
use crate::interactive::{interactive_options, suggested_queries};
use crate::stage::Stage;
use crate::templates::{button_response, topic_response};
use crate::topic::{next_topic, previous_topic, topic_for_intent, Topic};
use crate::turn::{ResponseSource, TurnContext, TurnInput};

/// Runs one turn from raw input to a finalized reply. Holds no per-turn state.
pub struct Pipeline {
    analyzer: Arc<MessageAnalyzer>,
    aggregator: Option<Arc<dyn ContextStrategy>>,
    similarity: Option<Arc<dyn ContextStrategy>>,
    knowledge: Option<Arc<dyn ContextStrategy>>,
    llm: Option<Arc<dyn LlmClient>>,
    completion_options: CompletionOptions,
    config: EnvPipelineConfig,
}

impl Pipeline {
    /// A pipeline without retrieval or completion; replies come from templates.
    pub fn new(analyzer: MessageAnalyzer, config: EnvPipelineConfig) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            aggregator: None,
            similarity: None,
            knowledge: None,
            llm: None,
            completion_options: CompletionOptions::default(),
            config,
        }
    }

    /// Session aggregation and similarity retrieval over `store`, sized by the config.
    pub fn with_store(self, store: Arc<dyn MessageStore>) -> Self {
        let aggregator = SessionAggregator::new(store.clone()).with_limit(self.config.session_limit);
        let similarity = SimilarityRetriever::new(store)
            .with_limit(self.config.match_limit)
            .with_min_similarity(self.config.min_similarity);
        self.with_aggregator(Arc::new(aggregator))
            .with_similarity(Arc::new(similarity))
    }

    pub fn with_aggregator(mut self, strategy: Arc<dyn ContextStrategy>) -> Self {
        self.aggregator = Some(strategy);
        self
    }

    pub fn with_similarity(mut self, strategy: Arc<dyn ContextStrategy>) -> Self {
        self.similarity = Some(strategy);
        self
    }

    pub fn with_knowledge(mut self, strategy: Arc<dyn ContextStrategy>) -> Self {
        self.knowledge = Some(strategy);
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>, options: CompletionOptions) -> Self {
        self.llm = Some(llm);
        self.completion_options = options;
        self
    }

    pub fn config(&self) -> &EnvPipelineConfig {
        &self.config
    }

    /// Runs every stage in order. Never fails: degraded stages fall back to defaults.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, session_id = %input.session_id))]
    pub async fn run(&self, input: TurnInput) -> TurnContext {
        let mut ctx = TurnContext::new(input);
        while ctx.stage != Stage::Done {
            let stage = ctx.stage;
            debug!(stage = %stage, "step: stage started");
            ctx = self.step(ctx).await;
            ctx.stage = stage.next();
        }
        info!(
            intent = %ctx.classification.intent,
            topic = %ctx.topic,
            source = ctx.response_source.as_str(),
            requires_followup = ctx.requires_followup,
            "step: pipeline done"
        );
        ctx
    }

    async fn step(&self, ctx: TurnContext) -> TurnContext {
        match ctx.stage {
            Stage::AnalyzeInput => analyze_input(ctx),
            Stage::ClassifyIntent => self.classify_intent(ctx),
            Stage::DetectTopic => detect_topic(ctx),
            Stage::GatherContext => self.gather_context(ctx).await,
            Stage::GenerateResponse => self.generate_response(ctx).await,
            Stage::AddInteractiveElements => add_interactive_elements(ctx),
            Stage::FinalizeResponse => self.finalize_response(ctx),
            Stage::Done => ctx,
        }
    }

    fn classify_intent(&self, mut ctx: TurnContext) -> TurnContext {
        if let Some(action) = &ctx.button {
            ctx.classification = button_classification(&ctx, action);
            ctx.bias = BiasReport::default();
            return ctx;
        }

        let analysis = self.analyzer.analyze_for(
            &ctx.input.text,
            ctx.input.language_hint,
            ctx.input.category,
        );
        ctx.classification = analysis.classification;
        ctx.bias = analysis.bias;

        if let Some(stats) = ctx.input.user_stats.as_ref().filter(|s| s.is_returning()) {
            debug!(
                total_messages = stats.total_messages,
                most_common_intent = stats.most_common_intent().unwrap_or("none"),
                recent_sentiments = ?stats.recent_sentiment_tail(3),
                "step: returning user patterns"
            );
        }
        info!(
            language = %ctx.classification.language,
            intent = %ctx.classification.intent,
            confidence = ctx.classification.confidence,
            sentiment = %ctx.classification.sentiment,
            lead_score = ctx.classification.lead_score,
            "step: intent classified"
        );
        ctx
    }

    async fn gather_context(&self, mut ctx: TurnContext) -> TurnContext {
        let classification = ctx.classification.clone();
        let user_stats = ctx.input.user_stats.clone();
        if ctx.is_button() {
            ctx.bundle = fuse(SessionHistory::default(), Vec::new(), Vec::new(), classification)
                .with_user_stats(user_stats);
            return ctx;
        }

        let request = ContextRequest {
            user_id: &ctx.input.user_id,
            session_id: Some(ctx.input.session_id.as_str()),
            text: &ctx.input.text,
            language: classification.language,
            category: Some(ctx.input.category),
        };
        let limit = self.config.retrieval_timeout;
        let (sessions, similar, knowledge) = tokio::join!(
            run_strategy(self.aggregator.as_deref(), &request, limit),
            run_strategy(self.similarity.as_deref(), &request, limit),
            run_strategy(self.knowledge.as_deref(), &request, limit),
        );

        let mut history = SessionHistory::default();
        let mut matches = Vec::new();
        let mut passages = Vec::new();
        for result in [sessions, similar, knowledge] {
            match result {
                StrategyResult::Sessions(h) => history = h,
                StrategyResult::Similar(m) => matches = m,
                StrategyResult::Knowledge(p) => passages = p,
                StrategyResult::Empty => {}
            }
        }

        ctx.bundle = fuse(history, matches, passages, classification).with_user_stats(user_stats);
        info!(
            sessions = ctx.bundle.history.summaries.len(),
            matches = ctx.bundle.matches.len(),
            passages = ctx.bundle.passages.len(),
            "step: context gathered"
        );
        ctx
    }

    async fn generate_response(&self, mut ctx: TurnContext) -> TurnContext {
        if let Some(action) = &ctx.button {
            ctx.response = button_response(action, ctx.topic);
            ctx.response_source = ResponseSource::Button;
            return ctx;
        }

        let personalization = Personalization::infer(&ctx.input.text, &ctx.bundle);
        let prompt = assemble(
            &PromptInputs {
                current_message: &ctx.input.text,
                category: ctx.input.category,
                personalization: &personalization,
                bundle: &ctx.bundle,
                conversation: &ctx.input.history,
            },
            self.config.prompt_budget,
        );

        let completion = match &self.llm {
            Some(llm) => Some(
                complete(
                    llm.as_ref(),
                    &prompt,
                    &self.completion_options,
                    self.config.completion_timeout,
                )
                .await,
            ),
            None => None,
        };

        match completion {
            Some(Ok(reply)) => {
                ctx.response = reply;
                ctx.response_source = ResponseSource::Completion;
            }
            Some(Err(e)) => {
                warn!(error = %e, "step: completion failed, using template response");
                ctx.completion_error = Some(e.to_string());
                ctx.response = topic_response(ctx.topic, &ctx.input.text, ctx.signals.has_greeting);
                ctx.response_source = ResponseSource::Template;
            }
            None => {
                ctx.response = topic_response(ctx.topic, &ctx.input.text, ctx.signals.has_greeting);
                ctx.response_source = ResponseSource::Template;
            }
        }

        info!(
            tone = %personalization.tone,
            register = %personalization.register,
            trend = personalization.trend.kind(),
            prompt_chars = prompt.system_chars(),
            prompt_truncated = prompt.truncated,
            reply_len = ctx.response.len(),
            "step: response generated"
        );
        ctx.personalization = Some(personalization);
        ctx.prompt = Some(prompt);
        ctx
    }

    fn finalize_response(&self, mut ctx: TurnContext) -> TurnContext {
        ctx.requires_followup = ctx.classification.confidence < self.config.followup_confidence
            || ctx.interactive.continue_conversation;
        ctx
    }
}

fn analyze_input(mut ctx: TurnContext) -> TurnContext {
    ctx.button = parse_button(&ctx.input.text);
    ctx.signals = Signals::of(&ctx.input.text);
    debug!(
        is_button = ctx.button.is_some(),
        word_count = ctx.signals.word_count,
        is_question = ctx.signals.is_question,
        "step: input analyzed"
    );
    ctx
}

/// Button clicks are not analyzed: they carry the intent of the previous classified turn.
fn button_classification(ctx: &TurnContext, action: &ButtonAction) -> Classification {
    let carried = ctx
        .input
        .history
        .iter()
        .rev()
        .filter(|m| m.is_analyzed())
        .find_map(|m| m.intent.clone());
    let intent = match action {
        ButtonAction::ChangeTopic => GENERAL_QUERY.to_string(),
        _ => carried.unwrap_or_else(|| GENERAL_QUERY.to_string()),
    };
    Classification {
        language: ctx.input.language_hint.unwrap_or_default(),
        intent,
        confidence: 1.0,
        sentiment: Sentiment::Neutral,
        lead_score: 50,
    }
}

fn detect_topic(mut ctx: TurnContext) -> TurnContext {
    let previous = previous_topic(&ctx.input.history);
    let (topic, depth) = match &ctx.button {
        Some(ButtonAction::ChangeTopic) => (Topic::General, 0),
        Some(_) => next_topic(previous, previous.map(|(t, _)| t).unwrap_or_default()),
        None => next_topic(previous, topic_for_intent(&ctx.classification.intent)),
    };
    ctx.topic = topic;
    ctx.topic_depth = depth;
    debug!(topic = %topic, depth, "step: topic detected");
    ctx
}

fn add_interactive_elements(mut ctx: TurnContext) -> TurnContext {
    ctx.interactive = interactive_options(ctx.topic, ctx.topic_depth);
    ctx.suggested_queries = suggested_queries(ctx.topic, ctx.topic_depth, ctx.input.category);
    ctx
}

/// Runs one strategy under its own timeout; failures and timeouts yield `Empty`.
async fn run_strategy(
    strategy: Option<&dyn ContextStrategy>,
    request: &ContextRequest<'_>,
    limit: Duration,
) -> StrategyResult {
    let Some(strategy) = strategy else {
        return StrategyResult::Empty;
    };
    match tokio::time::timeout(limit, strategy.build_context(request)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!(strategy = strategy.name(), error = %e, "step: strategy failed, continuing without it");
            StrategyResult::Empty
        }
        Err(_) => {
            warn!(
                strategy = strategy.name(),
                timeout_ms = limit.as_millis() as u64,
                "step: strategy timed out, continuing without it"
            );
            StrategyResult::Empty
        }
    }
}

async fn complete(
    llm: &dyn LlmClient,
    prompt: &prompt::AssembledPrompt,
    options: &CompletionOptions,
    limit: Duration,
) -> Result<String, CompletionError> {
    let messages = prompt.messages();
    match tokio::time::timeout(limit, llm.complete(&messages, options)).await {
        Ok(Ok(reply)) if reply.trim().is_empty() => Err(CompletionError::Empty),
        Ok(result) => result,
        Err(_) => Err(CompletionError::Timeout(limit)),
    }
}
