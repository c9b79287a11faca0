use super::commands::CommandOutcome;
use std::collections::VecDeque;

/// Advisory record of command outcomes, newest last.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    pending: Vec<CommandOutcome>,
    history: VecDeque<CommandOutcome>,
    capacity: usize,
    total: usize,
}

impl StatusLog {
    /// `capacity` of 0 keeps every outcome.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: CommandOutcome) {
        if outcome.succeeded {
            log::info!("[shifter] {}", outcome.summary);
        } else {
            log::warn!("[shifter] {}", outcome.summary);
        }
        self.total += 1;
        self.pending.push(outcome.clone());
        self.history.push_back(outcome);
        if self.capacity > 0 {
            while self.history.len() > self.capacity {
                self.history.pop_front();
            }
        }
    }

    /// Outcomes recorded since the last drain, for a host status bar.
    pub fn drain_pending(&mut self) -> Vec<CommandOutcome> {
        self.pending.drain(..).collect()
    }

    pub fn last(&self) -> Option<&CommandOutcome> {
        self.history.back()
    }

    pub fn history(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.history.iter()
    }

    pub fn total_recorded(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ShifterCommand;
    use crate::shift::Axis;

    fn outcome(summary: &str) -> CommandOutcome {
        CommandOutcome::new(&ShifterCommand::clear(Axis::X), None, summary.to_string())
    }

    #[test]
    fn history_is_capped_but_total_is_not() {
        let mut status = StatusLog::with_capacity(2);
        for summary in ["a", "b", "c"] {
            status.record(outcome(summary));
        }
        let kept: Vec<_> = status.history().map(|o| o.summary.as_str()).collect();
        assert_eq!(kept, vec!["b", "c"]);
        assert_eq!(status.total_recorded(), 3);
        assert_eq!(status.last().map(|o| o.summary.as_str()), Some("c"));
    }

    #[test]
    fn drain_empties_pending_only() {
        let mut status = StatusLog::with_capacity(0);
        status.record(outcome("a"));
        assert_eq!(status.drain_pending().len(), 1);
        assert!(status.drain_pending().is_empty());
        assert_eq!(status.history().count(), 1);
    }
}
