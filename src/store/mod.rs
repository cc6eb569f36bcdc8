use tokio::sync::Mutex;

use crate::model::message::Message;

/// In-memory, append-only message store for the lifetime of the process.
///
/// One lock covers the whole read-size / assign-id / append sequence, so
/// concurrent creates always hand out unique, strictly increasing ids.
/// Ids restart at 1 whenever the process does.
#[derive(Default)]
pub struct MessageStore {
    messages: Mutex<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in insertion order.
    pub async fn list(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    /// Appends a message and returns the stored record. Text bounds are
    /// checked at the API boundary, not here.
    pub async fn create(&self, text: String) -> Message {
        let mut messages = self.messages.lock().await;
        let message = Message {
            id: messages.len() as u64 + 1,
            text,
        };
        messages.push(message.clone());
        message
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::MessageStore;

    #[tokio::test]
    async fn sequential_creates_assign_increasing_ids() {
        let store = MessageStore::new();
        for i in 1..=5u64 {
            let msg = store.create(format!("message {i}")).await;
            assert_eq!(msg.id, i);
        }

        let all = store.list().await;
        assert_eq!(all.len(), 5);
        for (i, msg) in all.iter().enumerate() {
            assert_eq!(msg.id, i as u64 + 1);
            assert_eq!(msg.text, format!("message {}", i + 1));
        }
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let store = MessageStore::new();
        assert!(store.list().await.is_empty());

        let created = store.create("hello".into()).await;
        let all = store.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], created);
    }

    #[tokio::test]
    async fn concurrent_creates_assign_distinct_ids() {
        let store = Arc::new(MessageStore::new());

        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.create(format!("msg {i}")).await },
            ));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().id);
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(store.len().await, 64);
    }
}
