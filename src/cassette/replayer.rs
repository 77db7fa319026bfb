//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves interactions from a loaded cassette, in recorded order, per
/// port/method pair.
#[derive(Debug, Clone)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Interactions not yet served for the given port and method.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        self.queues.get(&(port.to_string(), method.to_string())).map_or(0, VecDeque::len)
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        match self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(interaction) => interaction,
            None => {
                let mut available: Vec<String> = self
                    .queues
                    .iter()
                    .filter(|(_, queue)| !queue.is_empty())
                    .map(|((p, m), queue)| format!("{p}::{m} ({})", queue.len()))
                    .collect();
                available.sort();
                panic!(
                    "Cassette exhausted: no interactions left for port={port:?} \
                     method={method:?}. Remaining: [{}]",
                    available.join(", ")
                );
            }
        }
    }
}
