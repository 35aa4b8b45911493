//! Multi-episode sessions: learned weights carry from one episode to the next.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_common::{Primitive, PrimitiveWeights};

use crate::episode::{new_boot_id, Episode, EpisodeRequest, EpisodeRunner};

/// Topics that stress each check, plus one that should pass first time.
pub const DEMO_TOPICS: [&str; 6] = [
    "GPT-9 just announced with 500 trillion parameters",
    "Llama 5 revolutionary breakthrough in AI reasoning",
    "Apple Vision Pro sales are absolutely incredible and unprecedented",
    "AI regulations are changing soon and recently shifted",
    "According to Reuters on January 30, Fed holds rates steady",
    "GPT-7 revolutionary game-changing breakthrough announced recently",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub boot_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub initial_primitives: PrimitiveWeights,
    pub final_primitives: PrimitiveWeights,
    pub episodes: Vec<Episode>,
}

impl SessionReport {
    pub fn total_mutations(&self) -> usize {
        self.episodes.iter().map(|e| e.mutations.len()).sum()
    }

    pub fn passed_count(&self) -> usize {
        self.episodes.iter().filter(|e| e.final_eval.passed).count()
    }
}

pub struct Session<'a> {
    runner: &'a EpisodeRunner,
    pause: Duration,
    boot_id: String,
}

impl<'a> Session<'a> {
    pub fn new(runner: &'a EpisodeRunner) -> Self {
        Self {
            runner,
            pause: Duration::ZERO,
            boot_id: new_boot_id(),
        }
    }

    /// Sleep between episodes (rate-limited inference endpoints).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn boot_id(&self) -> &str {
        &self.boot_id
    }

    /// Run `topics` in order, feeding each episode's learned weights into the next.
    pub async fn run<S: AsRef<str>>(
        &self,
        topics: &[S],
        primitives: PrimitiveWeights,
    ) -> SessionReport {
        let started_at = Utc::now();
        let initial = primitives.clamped();
        let mut current = initial;
        let mut episodes = Vec::with_capacity(topics.len());

        for (i, topic) in topics.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            let request = EpisodeRequest::new(i as u32 + 1, topic.as_ref(), current)
                .with_boot_id(self.boot_id.clone());
            let episode = self.runner.run(request).await;
            current = episode.primitives_after;
            episodes.push(episode);
        }

        info!(
            boot_id = %self.boot_id,
            episodes = episodes.len(),
            "Session complete"
        );

        SessionReport {
            boot_id: self.boot_id.clone(),
            started_at,
            finished_at: Utc::now(),
            initial_primitives: initial,
            final_primitives: current,
            episodes,
        }
    }
}

/// One line per primitive: name, value, and a 40-column bar.
pub fn render_weight_bars(weights: &PrimitiveWeights) -> String {
    Primitive::ALL
        .iter()
        .map(|p| {
            let value = weights.get(*p);
            let bar = "█".repeat((value * 40.0) as usize);
            format!("{:25} {:.2}  {}", p.as_str(), value, bar)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_with_weight() {
        let weights = PrimitiveWeights {
            brevity: 0.5,
            fact_verification: 1.0,
            ..Default::default()
        };
        let rendered = render_weight_bars(&weights);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("fact_verification"));
        assert_eq!(lines[0].matches('█').count(), 40);
        assert_eq!(lines[5].matches('█').count(), 20);
    }
}
