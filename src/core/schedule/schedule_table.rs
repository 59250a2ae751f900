use crate::model::config::Config;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTarget {
    Backup(String),
    Purge,
}

#[derive(Debug, Clone)]
struct ScheduleEntry {
    target: ScheduleTarget,
    interval: Duration,
    next_run: Instant,
}

/// Next run time of every periodic job. Intervals of zero minutes are disabled.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn from_config(config: &Config, now: Instant) -> Self {
        let subjects = config
            .subjects
            .iter()
            .map(|subject| (ScheduleTarget::Backup(subject.name.clone()), subject.interval));
        let purge = std::iter::once((ScheduleTarget::Purge, config.purge.check_interval));

        let entries = subjects
            .chain(purge)
            .filter(|(_, minutes)| *minutes > 0)
            .map(|(target, minutes)| {
                let interval = Duration::from_secs(minutes * 60);
                ScheduleEntry {
                    target,
                    interval,
                    next_run: now + interval,
                }
            })
            .collect();

        Self { entries }
    }

    /// Jobs flagged to run once right after startup.
    pub fn startup_targets(config: &Config) -> Vec<ScheduleTarget> {
        let mut targets: Vec<ScheduleTarget> = config
            .subjects
            .iter()
            .filter(|subject| subject.backup_after_startup)
            .map(|subject| ScheduleTarget::Backup(subject.name.clone()))
            .collect();
        if config.purge.purge_after_startup {
            targets.push(ScheduleTarget::Purge);
        }
        targets
    }

    pub fn next_run(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.next_run).min()
    }

    /// Returns every target due at `now` and moves it to its next slot.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduleTarget> {
        let mut due = Vec::new();
        for entry in &mut self.entries {
            if entry.next_run <= now {
                due.push(entry.target.clone());
                // Missed slots are skipped rather than replayed.
                while entry.next_run <= now {
                    entry.next_run += entry.interval;
                }
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        toml::from_str(
            r#"
            [Config]
            backup_directory = "./backups"

            [Purge]
            check_interval = 120
            purge_after_startup = false

            [[Subject]]
            name = "world"
            source = "./world"
            interval = 30

            [[Subject]]
            name = "plugins"
            source = "./plugins"
            interval = 0
            backup_after_startup = false
            "#,
        )
        .unwrap()
    }

    #[test]
    fn disabled_intervals_are_not_scheduled() {
        let now = Instant::now();
        let schedule = Schedule::from_config(&config(), now);

        assert_eq!(schedule.entries.len(), 2);
        assert_eq!(schedule.next_run(), Some(now + Duration::from_secs(30 * 60)));
    }

    #[test]
    fn due_targets_advance_to_next_slot() {
        let now = Instant::now();
        let mut schedule = Schedule::from_config(&config(), now);

        assert!(schedule.take_due(now).is_empty());

        let after_hour = now + Duration::from_secs(60 * 60);
        assert_eq!(
            schedule.take_due(after_hour),
            vec![ScheduleTarget::Backup("world".to_string())]
        );
        assert_eq!(schedule.next_run(), Some(now + Duration::from_secs(90 * 60)));

        let after_two_hours = now + Duration::from_secs(120 * 60);
        assert_eq!(
            schedule.take_due(after_two_hours),
            vec![
                ScheduleTarget::Backup("world".to_string()),
                ScheduleTarget::Purge
            ]
        );
    }

    #[test]
    fn startup_targets_follow_flags() {
        assert_eq!(
            Schedule::startup_targets(&config()),
            vec![ScheduleTarget::Backup("world".to_string())]
        );
    }
}
