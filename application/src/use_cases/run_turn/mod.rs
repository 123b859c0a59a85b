//! Run Turn use case: the step controller
//!
//! Drives one user turn through the state machine
//!
//! ```text
//! Thinking ──text only──────────────────────────────▶ Done
//!    │                                                 ▲
//!    └─tool calls─▶ Executing ─▶ Evaluating ──stop─────┘
//!                                   │
//!                                   └──continue──▶ Thinking
//! ```
//!
//! | Phase      | What happens |
//! |------------|--------------|
//! | Thinking   | one model request (`send_with_tools` / `send_tool_results`) |
//! | Executing  | guard check per call, then permitted calls run (concurrently by default) |
//! | Evaluating | stop policy, then the hard step ceiling |
//!
//! Tool failures and guard denials become history entries the model can
//! read; only gateway failures, bad requests and cancellation abort a turn.

mod types;

pub use types::{
    RunTurnInput, RunTurnOutput, TRANSPORT_FAILURE_MESSAGE, TurnError, TurnRequest,
};

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{LlmGateway, ToolResultMessage};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::turn_progress::TurnProgressNotifier;
use crate::use_cases::shared::{check_cancelled, preview};
use arkcutt_domain::{
    AssistantPromptTemplate, GuardDecision, History, StepPhase, StepState, StopPolicy,
    TerminationReason, ToolCall, ToolError, ToolResult, WorkflowGuard, quote_completion_policy,
};
use futures::future::{self, BoxFuture, FutureExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case for running one conversational turn
pub struct RunTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    guard: Arc<WorkflowGuard>,
    stop_policy: Option<Arc<dyn StopPolicy>>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Clone for RunTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            guard: self.guard.clone(),
            stop_policy: self.stop_policy.clone(),
            conversation_logger: self.conversation_logger.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl RunTurnUseCase {
    /// Create a use case enforcing the quote workflow rules.
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            guard: Arc::new(WorkflowGuard::quote_workflow()),
            stop_policy: None,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_guard(mut self, guard: WorkflowGuard) -> Self {
        self.guard = Arc::new(guard);
        self
    }

    /// Replace the default quote-completion policy.
    ///
    /// The configured step ceiling still applies on top of it.
    pub fn with_stop_policy(mut self, policy: Arc<dyn StopPolicy>) -> Self {
        self.stop_policy = Some(policy);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run a turn to completion.
    pub async fn execute(
        &self,
        input: RunTurnInput,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<RunTurnOutput, TurnError> {
        if input.messages.is_empty() {
            return Err(TurnError::InvalidRequest(
                "turn requires at least one message".to_string(),
            ));
        }

        let config = &input.config;
        let spec = self.tool_executor.tool_spec();
        let tools = self.tool_schema.all_tools_schema(spec);
        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| AssistantPromptTemplate::system_with_tools(spec));
        let policy: Arc<dyn StopPolicy> = match &self.stop_policy {
            Some(policy) => policy.clone(),
            None => Arc::new(quote_completion_policy(config.max_steps)),
        };

        info!(
            model = %config.model,
            max_steps = config.max_steps,
            tools = tools.len(),
            "Starting turn with {} messages",
            input.messages.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_start",
            serde_json::json!({
                "model": config.model.to_string(),
                "max_steps": config.max_steps,
                "messages": input.messages.len(),
            }),
        ));

        check_cancelled(&self.cancellation_token)?;
        let session = self
            .gateway
            .create_session_with_system_prompt(&config.model, &system_prompt)
            .await?;

        let mut state = StepState::new(config.max_steps);
        let mut texts: Vec<String> = Vec::new();
        let mut pending_results: Option<Vec<ToolResultMessage>> = None;

        loop {
            check_cancelled(&self.cancellation_token)?;

            if !state.begin_step() {
                state.finish(TerminationReason::StepCeiling);
                break;
            }
            let step = state.step();
            progress.on_phase_change(step, StepPhase::Thinking);

            let response = match pending_results.take() {
                None => session.send_with_tools(&input.messages, &tools).await?,
                Some(results) => session.send_tool_results(&results).await?,
            };

            let text = response.text_content();
            let text_bytes = text.len();
            if !text.is_empty() {
                progress.on_model_text(&text);
                texts.push(text);
            }

            let calls = response.tool_calls();
            self.conversation_logger.log(ConversationEvent::new(
                "model_response",
                serde_json::json!({
                    "step": step,
                    "text_bytes": text_bytes,
                    "tool_calls": calls.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
                }),
            ));

            if calls.is_empty() {
                debug!(step, "Model answered with text only");
                state.finish(TerminationReason::TextResponse);
                break;
            }

            // Every result has to be answered under its call id, so a batch
            // with an uncorrelatable call is rejected before anything runs.
            if let Some(call) = calls
                .iter()
                .find(|c| c.native_id.as_deref().is_none_or(str::is_empty))
            {
                return Err(TurnError::InvalidRequest(format!(
                    "model requested {} without a tool-call id",
                    call.tool_name
                )));
            }

            state.begin_execution();
            progress.on_phase_change(step, StepPhase::Executing);

            let results = self
                .execute_batch(step, &calls, state.history(), config.parallel_tool_calls, progress)
                .await;

            let mut messages = Vec::with_capacity(calls.len());
            for (call, result) in calls.into_iter().zip(results) {
                progress.on_tool_result(step, &result);
                self.log_result(step, &result);

                messages.push(ToolResultMessage {
                    tool_use_id: call.native_id.clone().unwrap_or_default(),
                    tool_name: call.tool_name.clone(),
                    output: result.to_model_output().to_string(),
                    is_error: !result.success,
                });

                state.record(call, result);
            }

            check_cancelled(&self.cancellation_token)?;
            state.begin_evaluation();
            progress.on_phase_change(step, StepPhase::Evaluating);

            if let Some(policy_name) = policy.stop_reason(state.history(), step) {
                info!(step, policy = %policy_name, "Stop policy fired");
                state.finish(TerminationReason::StopPolicy {
                    policy: policy_name,
                });
                break;
            }
            if state.at_ceiling() {
                warn!(step, "Step ceiling reached");
                state.finish(TerminationReason::StepCeiling);
                break;
            }

            pending_results = Some(messages);
        }

        let (history, steps, termination) = state.into_parts();
        let termination = termination.unwrap_or(TerminationReason::StepCeiling);
        progress.on_phase_change(steps, StepPhase::Done);
        progress.on_turn_complete(steps, &termination);

        info!(
            steps,
            tool_calls = history.len(),
            termination = ?termination,
            "Turn completed"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_complete",
            serde_json::json!({
                "steps": steps,
                "tool_calls": history.len(),
                "termination": termination,
            }),
        ));

        Ok(RunTurnOutput {
            text: texts.join("\n\n"),
            history,
            steps,
            termination,
        })
    }

    /// Run one batch of tool calls.
    ///
    /// Every call is checked against `history` as it stood when the batch
    /// started, so a quote requested alongside its analysis is still denied.
    /// Results come back in request order whatever the completion order.
    async fn execute_batch(
        &self,
        step: usize,
        calls: &[ToolCall],
        history: &History,
        parallel: bool,
        progress: &dyn TurnProgressNotifier,
    ) -> Vec<ToolResult> {
        let mut pending: Vec<BoxFuture<'_, ToolResult>> = Vec::with_capacity(calls.len());

        for call in calls {
            match self.guard.check(&call.tool_name, history) {
                GuardDecision::Allow => {
                    debug!(step, tool = %call.tool_name, "Tool call permitted");
                    progress.on_tool_call(step, call);
                    self.conversation_logger.log(ConversationEvent::new(
                        "tool_call",
                        serde_json::json!({
                            "step": step,
                            "tool": call.tool_name,
                            "args_preview": preview(&serde_json::to_string(&call.arguments).unwrap_or_default(), 200),
                        }),
                    ));
                    pending.push(self.tool_executor.execute(call));
                }
                GuardDecision::Deny { rule, reason } => {
                    info!(step, tool = %call.tool_name, rule = %rule, "Tool call denied");
                    progress.on_tool_denied(step, &call.tool_name, &reason);
                    self.conversation_logger.log(ConversationEvent::new(
                        "tool_denied",
                        serde_json::json!({
                            "step": step,
                            "tool": call.tool_name,
                            "rule": rule,
                            "reason": reason,
                        }),
                    ));
                    let denied = ToolResult::failure(
                        call.tool_name.clone(),
                        ToolError::precondition(reason)
                            .with_detail(serde_json::json!({ "rule": rule })),
                    );
                    pending.push(future::ready(denied).boxed());
                }
            }
        }

        if parallel {
            future::join_all(pending).await
        } else {
            let mut results = Vec::with_capacity(pending.len());
            for fut in pending {
                results.push(fut.await);
            }
            results
        }
    }

    fn log_result(&self, step: usize, result: &ToolResult) {
        match &result.error {
            None => debug!(
                step,
                tool = %result.tool_name,
                duration_ms = result.metadata.duration_ms.unwrap_or(0),
                "Tool succeeded"
            ),
            Some(error) => warn!(
                step,
                tool = %result.tool_name,
                kind = %error.kind,
                "Tool failed: {}",
                error.message
            ),
        }
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            serde_json::json!({
                "step": step,
                "tool": result.tool_name,
                "success": result.success,
                "error_kind": result.error_kind(),
                "duration_ms": result.metadata.duration_ms,
            }),
        ));
    }
}
