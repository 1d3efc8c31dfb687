use crate::store::models::{LogOutcome, LogRecord};
use crate::store::ContentStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct LogService {
    store: ContentStore,
}

impl LogService {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// All audit entries, newest first. The collection is append-only and
    /// never pruned.
    pub fn recent(&self) -> Result<Vec<LogEntryView>> {
        self.store.with_state(|state| {
            state
                .logs()
                .iter()
                .cloned()
                .map(LogEntryView::from_record)
                .collect()
        })
    }

    pub fn append(
        &self,
        action: &str,
        outcome: LogOutcome,
        details: String,
    ) -> Result<LogEntryView> {
        let record = LogRecord {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            outcome,
            details,
            timestamp: Utc::now(),
        };
        let view = LogEntryView::from_record(record.clone());
        self.store.with_state_mut(|state| state.push_log(record))?;
        Ok(view)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryView {
    pub id: String,
    pub action: String,
    pub outcome: LogOutcome,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntryView {
    fn from_record(record: LogRecord) -> Self {
        Self {
            id: record.id,
            action: record.action,
            outcome: record.outcome,
            details: record.details,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_service() -> LogService {
        LogService::new(ContentStore::with_seed_data())
    }

    #[test]
    fn append_puts_the_new_entry_first() {
        let service = setup_service();
        let before = service.recent().expect("list logs").len();
        let entry = service
            .append(
                "Create Post",
                LogOutcome::Success,
                "Created post: Example".into(),
            )
            .expect("append log");

        let logs = service.recent().expect("list logs");
        assert_eq!(logs.len(), before + 1);
        assert_eq!(logs[0].id, entry.id);
        assert_eq!(logs[0].action, "Create Post");
        assert_eq!(logs[0].outcome, LogOutcome::Success);
    }

    #[test]
    fn seeded_logs_are_newest_first() {
        let service = setup_service();
        let logs = service.recent().expect("list logs");
        assert_eq!(logs.len(), 3);
        for pair in logs.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
