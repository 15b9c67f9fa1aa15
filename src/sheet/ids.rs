//! Stable node identities.
//!
//! An id is minted once when its node is created and never recomputed, so renames and
//! reorders cannot orphan completion or collapse entries. Nodes built from seed records
//! get name-based ids so the same seed always yields the same ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for ids derived from seed coordinates.
const SEED_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_8a42_3c7e_4b0a_9f55_2e1d_c0a8_7b13);

/// Length-prefixed encoding of seed coordinates so label boundaries stay unambiguous.
fn seed_key(parts: &[&str]) -> Vec<u8> {
    let mut key = Vec::new();
    for part in parts {
        key.extend_from_slice(&(part.len() as u64).to_be_bytes());
        key.extend_from_slice(part.as_bytes());
    }
    key
}

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh random id.
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

node_id!(
    /// Identity of a topic.
    TopicId
);
node_id!(
    /// Identity of a subtopic.
    SubtopicId
);
node_id!(
    /// Identity of a question.
    QuestionId
);

impl TopicId {
    pub fn seeded(topic: &str) -> Self {
        Self(Uuid::new_v5(&SEED_NAMESPACE, &seed_key(&["topic", topic])))
    }
}

impl SubtopicId {
    pub fn seeded(topic: &str, subtopic: &str) -> Self {
        Self(Uuid::new_v5(
            &SEED_NAMESPACE,
            &seed_key(&["subtopic", topic, subtopic]),
        ))
    }
}

impl QuestionId {
    /// Id of the `index`-th question (zero-based) seen under `(topic, subtopic)`.
    pub fn seeded(topic: &str, subtopic: &str, index: usize) -> Self {
        let index = index.to_string();
        Self(Uuid::new_v5(
            &SEED_NAMESPACE,
            &seed_key(&["question", topic, subtopic, &index]),
        ))
    }
}
