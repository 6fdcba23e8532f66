//! End-to-end conversation scenarios for Agora rooms.
//!
//! These tests drive a room purely through its public surface: seat
//! participants, publish an opening message, read the transcript.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agora_core::prelude::*;
use async_trait::async_trait;

/// Test participant that answers from a fixed script and counts its calls.
struct ScriptedAgent {
    id: String,
    script: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
    senders_seen: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedAgent {
    fn new(id: &str, script: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            script: Mutex::new(script.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
            senders_seen: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    fn delayed(id: &str, script: &[&str], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            script: Mutex::new(script.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
            senders_seen: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn senders_seen(&self) -> Vec<String> {
        self.senders_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Participant for ScriptedAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    async fn process_message(&self, message: &Message) -> Result<Option<Message>, ParticipantError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.senders_seen
            .lock()
            .unwrap()
            .push(message.sender.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        Ok(next.map(|body| {
            MessageBuilder::agent_message(&message.room_id, body, &self.id).unwrap()
        }))
    }
}

fn seed(room: &Room) -> Message {
    MessageBuilder::user_message(room.id(), "What should we build today?", "seed").unwrap()
}

#[tokio::test]
async fn single_participant_replies_once() {
    let mut room = Room::new("Scenario One").unwrap();
    let a = ScriptedAgent::new("a", &["a compiler"]);
    room.add_participant(a.clone()).await.unwrap();

    room.bus().publish(seed(&room)).await.unwrap();

    let history = room.bus().history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sender, "seed");
    assert_eq!(history[1].sender, "a");
    assert_eq!(history[1].body, "a compiler");
    assert_eq!(history[1].kind, MessageKind::Agent);
    assert_eq!(a.calls(), 1);
}

#[tokio::test]
async fn second_participant_hears_the_reply_but_stays_silent() {
    let mut room = Room::new("Scenario Two").unwrap();
    let a = ScriptedAgent::new("a", &["a database"]);
    let b = ScriptedAgent::new("b", &[]);
    room.add_participant(a.clone()).await.unwrap();
    room.add_participant(b.clone()).await.unwrap();

    room.bus().publish(seed(&room)).await.unwrap();

    let history = room.bus().history().await;
    let senders: Vec<&str> = history.iter().map(|m| m.sender.as_str()).collect();
    assert_eq!(senders, vec!["seed", "a"]);
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 2);
    assert_eq!(b.senders_seen(), vec!["seed", "a"]);
    assert_eq!(a.senders_seen(), vec!["seed"]);
}

#[tokio::test]
async fn back_and_forth_until_scripts_run_out() {
    let mut room = Room::new("Ping Pong").unwrap();
    let a = ScriptedAgent::new("a", &["ping 1", "ping 2", "ping 3"]);
    let b = ScriptedAgent::new("b", &["pong 1", "pong 2"]);
    room.add_participant(a.clone()).await.unwrap();
    room.add_participant(b.clone()).await.unwrap();

    room.bus().publish(seed(&room)).await.unwrap();

    let history = room.bus().history().await;
    for message in &history[1..] {
        assert_eq!(message.room_id, room.id());
        assert!(message.sender == "a" || message.sender == "b");
    }
    assert_eq!(history.len(), 1 + 3 + 2);
    assert!(a.senders_seen().iter().all(|s| s != "a"));
    assert!(b.senders_seen().iter().all(|s| s != "b"));
}

#[tokio::test]
async fn faster_participant_publishes_first() {
    let mut room = Room::new("Race").unwrap();
    let slow = ScriptedAgent::delayed("slow", &["slow answer"], Duration::from_millis(50));
    let fast = ScriptedAgent::delayed("fast", &["fast answer"], Duration::from_millis(1));
    room.add_participant(slow.clone()).await.unwrap();
    room.add_participant(fast.clone()).await.unwrap();

    room.bus().publish(seed(&room)).await.unwrap();

    let history = room.bus().history().await;
    let bodies: Vec<&str> = history.iter().take(3).map(|m| m.body.as_str()).collect();
    assert_eq!(
        bodies,
        vec!["What should we build today?", "fast answer", "slow answer"]
    );
}

#[tokio::test]
async fn duplicate_participant_keeps_one_entry() {
    let mut room = Room::new("Members").unwrap();
    let a = ScriptedAgent::new("a", &[]);
    room.add_participant(a.clone()).await.unwrap();

    let err = room.add_participant(a.clone()).await.unwrap_err();

    assert!(matches!(err, RoomError::DuplicateParticipant(ref id) if id == "a"));
    assert_eq!(room.participant_count(), 1);

    room.bus().publish(seed(&room)).await.unwrap();
    assert_eq!(a.calls(), 1);
}

#[tokio::test]
async fn terminated_room_rejects_traffic_but_keeps_transcript() {
    let mut room = Room::new("Closing Time").unwrap();
    let a = ScriptedAgent::new("a", &["bye"]);
    room.add_participant(a.clone()).await.unwrap();
    room.bus().publish(seed(&room)).await.unwrap();

    room.terminate().await;
    room.terminate().await;

    let late = MessageBuilder::user_message(room.id(), "anyone?", "seed").unwrap();
    assert_eq!(room.bus().publish(late).await, Err(BusClosedError));
    assert_eq!(room.bus().history().await.len(), 2);
}
