//! AI-backed chat participants.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agora_core::{Message, MessageBuilder, Participant, ParticipantError};
use agora_runtime::{AIProvider, GenerateRequest, ModelSpec};
use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::persona::Persona;
use crate::prompts;
use crate::validator::{validate_agent, AgentError};

/// A room participant that answers every message it hears through a model provider.
///
/// With a reply budget set, the agent falls silent once the budget is spent.
pub struct ChatAgent {
    id: String,
    name: String,
    persona: Persona,
    model: ModelSpec,
    provider: Arc<dyn AIProvider>,
    max_replies: Option<usize>,
    replies: AtomicUsize,
}

impl ChatAgent {
    pub fn new(
        name: impl Into<String>,
        persona: Persona,
        model: ModelSpec,
        provider: Arc<dyn AIProvider>,
    ) -> Result<Self, AgentError> {
        let name = name.into();
        validate_agent(&name, &persona)?;

        let id = Uuid::new_v4().to_string();
        info!(agent_id = %id, name = %name, persona = %persona.key, model = %model, "Agent created");

        Ok(Self {
            id,
            name,
            persona,
            model,
            provider,
            max_replies: None,
            replies: AtomicUsize::new(0),
        })
    }

    pub fn with_max_replies(mut self, max_replies: Option<usize>) -> Self {
        self.max_replies = max_replies;
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    pub fn max_replies(&self) -> Option<usize> {
        self.max_replies
    }

    pub fn replies_sent(&self) -> usize {
        self.replies.load(Ordering::SeqCst)
    }

    fn budget_spent(&self) -> bool {
        self.max_replies
            .is_some_and(|max| self.replies.load(Ordering::SeqCst) >= max)
    }
}

#[async_trait]
impl Participant for ChatAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn process_message(&self, message: &Message) -> Result<Option<Message>, ParticipantError> {
        if self.budget_spent() {
            debug!(agent_id = %self.id, "Reply budget spent, staying silent");
            return Ok(None);
        }

        let request = GenerateRequest::new(message.body.clone())
            .with_system(prompts::agent_system(&self.persona))
            .with_model(self.model.model.clone());

        let response = self
            .provider
            .generate(request)
            .await
            .map_err(|err| ParticipantError::Generation(err.to_string()))?;

        let body = response.content.trim();
        if body.is_empty() {
            debug!(agent_id = %self.id, in_reply_to = %message.id, "Model returned an empty reply");
            return Ok(None);
        }

        let reply = MessageBuilder::agent_message(&message.room_id, body, &self.id)
            .map_err(|err| ParticipantError::InvalidReply(err.to_string()))?;
        self.replies.fetch_add(1, Ordering::SeqCst);
        Ok(Some(reply))
    }
}

impl std::fmt::Debug for ChatAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("persona", &self.persona.key)
            .field("model", &self.model)
            .field("max_replies", &self.max_replies)
            .field("replies", &self.replies_sent())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use agora_core::MessageKind;
    use agora_runtime::{MockProvider, ProviderError};

    use super::*;
    use crate::persona;

    fn model() -> ModelSpec {
        ModelSpec::parse("openai:gpt-4o").unwrap()
    }

    fn agent(provider: Arc<MockProvider>) -> ChatAgent {
        let persona = persona::find("sophia_quantum").unwrap();
        ChatAgent::new(persona.name.clone(), persona, model(), provider).unwrap()
    }

    fn incoming(body: &str) -> Message {
        MessageBuilder::user_message("room_1", body, "user").unwrap()
    }

    #[test]
    fn rejects_invalid_name() {
        let persona = persona::find("dr_byte").unwrap();
        let err = ChatAgent::new("Byte!", persona, model(), Arc::new(MockProvider::new()))
            .unwrap_err();
        assert_eq!(err, AgentError::InvalidName("Byte!".to_string()));
    }

    #[test]
    fn agents_get_distinct_ids() {
        let provider = Arc::new(MockProvider::new());
        let a = agent(provider.clone());
        let b = agent(provider);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "Sophia Quantum");
    }

    #[tokio::test]
    async fn replies_through_provider_with_persona_prompt() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_texts(["  Quanta are like coffee beans.  "]);
        let agent = agent(provider.clone());

        let reply = agent
            .process_message(&incoming("Explain quanta"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply.body, "Quanta are like coffee beans.");
        assert_eq!(reply.room_id, "room_1");
        assert_eq!(reply.sender, agent.id());
        assert_eq!(reply.kind, MessageKind::Agent);
        assert_eq!(agent.replies_sent(), 1);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Explain quanta");
        assert_eq!(requests[0].model.as_deref(), Some("gpt-4o"));
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.contains(prompts::AGENT_INSTRUCTIONS));
        assert!(system.contains("Sophia Quantum"));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_participant_error() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_generate(Err(ProviderError::Transport("connection reset".to_string())));
        let agent = agent(provider);

        let err = agent.process_message(&incoming("hello")).await.unwrap_err();

        assert!(matches!(err, ParticipantError::Generation(ref msg) if msg.contains("connection reset")));
        assert_eq!(agent.replies_sent(), 0);
    }

    #[tokio::test]
    async fn blank_model_output_means_no_reply() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_texts(["   "]);
        let agent = agent(provider);

        assert_eq!(agent.process_message(&incoming("hello")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn stops_after_reply_budget() {
        let provider = Arc::new(MockProvider::new());
        provider.enqueue_texts(["one", "two", "three"]);
        let agent = agent(provider.clone()).with_max_replies(Some(2));

        assert!(agent.process_message(&incoming("a")).await.unwrap().is_some());
        assert!(agent.process_message(&incoming("b")).await.unwrap().is_some());
        assert!(agent.process_message(&incoming("c")).await.unwrap().is_none());

        assert_eq!(agent.replies_sent(), 2);
        assert_eq!(provider.requests().len(), 2);
    }
}
