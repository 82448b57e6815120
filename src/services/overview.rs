//! Live dashboard figures
//!
//! An [`Overview`] subscribes to the expense store and recomputes today's
//! total, the record count and the trailing week's category totals whenever
//! the store publishes a new snapshot. Dropping the overview unsubscribes.

use std::sync::{Arc, RwLock};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{CategoryTotal, Expense};
use crate::reports::aggregation::{
    category_breakdown, end_of_day, expense_count, total_for_today, window_start,
};
use crate::reports::DEFAULT_REPORT_DAYS;
use crate::storage::{ExpenseRepository, SubscriptionId};

/// Figures derived from the latest snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverviewState {
    pub today_total: f64,
    pub expense_count: usize,
    /// Category totals for the trailing week, sorted by category
    pub week_categories: Vec<CategoryTotal>,
    pub as_of: Option<NaiveDateTime>,
}

impl OverviewState {
    /// Compute the figures for a snapshot at `now`
    pub fn compute(records: &[Expense], now: NaiveDateTime) -> Self {
        let today = now.date();
        let week_start = window_start(today, DEFAULT_REPORT_DAYS);

        Self {
            today_total: total_for_today(records, now),
            expense_count: expense_count(records),
            week_categories: category_breakdown(records, week_start, end_of_day(today)),
            as_of: Some(now),
        }
    }
}

/// Subscription-backed view of the store
pub struct Overview<'a> {
    repository: &'a ExpenseRepository,
    subscription: SubscriptionId,
    state: Arc<RwLock<OverviewState>>,
}

impl<'a> Overview<'a> {
    /// Subscribe to `repository`, using `clock` for the current time
    pub fn attach<C>(repository: &'a ExpenseRepository, clock: C) -> ExpenseResult<Self>
    where
        C: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        let state = Arc::new(RwLock::new(OverviewState::default()));
        let target = Arc::clone(&state);

        let subscription = repository.subscribe(move |records| {
            let next = OverviewState::compute(records, clock());
            match target.write() {
                Ok(mut current) => *current = next,
                Err(e) => warn!("overview state lock poisoned: {}", e),
            }
        })?;
        debug!("overview attached");

        Ok(Self {
            repository,
            subscription,
            state,
        })
    }

    /// Latest computed figures
    pub fn state(&self) -> ExpenseResult<OverviewState> {
        self.state
            .read()
            .map(|s| s.clone())
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }
}

impl Drop for Overview<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.repository.unsubscribe(self.subscription) {
            warn!("failed to detach overview: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn repository() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_initial_state_from_subscription() {
        let (_temp_dir, repo) = repository();
        repo.insert(Expense::new("Lunch", 10.0, ExpenseCategory::Food, at(20, 12)))
            .unwrap();

        let overview = Overview::attach(&repo, || at(20, 18)).unwrap();
        let state = overview.state().unwrap();

        assert_eq!(state.today_total, 10.0);
        assert_eq!(state.expense_count, 1);
        assert_eq!(state.as_of, Some(at(20, 18)));
    }

    #[test]
    fn test_state_follows_writes() {
        let (_temp_dir, repo) = repository();
        let overview = Overview::attach(&repo, || at(20, 18)).unwrap();
        assert_eq!(overview.state().unwrap().expense_count, 0);

        let stored = repo
            .insert(Expense::new("Bus", 3.0, ExpenseCategory::Travel, at(20, 8)))
            .unwrap();
        repo.insert(Expense::new("Hotel", 80.0, ExpenseCategory::Travel, at(15, 8)))
            .unwrap();
        repo.insert(Expense::new("Old", 5.0, ExpenseCategory::Food, at(1, 8)))
            .unwrap();

        let state = overview.state().unwrap();
        assert_eq!(state.expense_count, 3);
        assert_eq!(state.today_total, 3.0);
        assert_eq!(state.week_categories, vec![CategoryTotal::new("TRAVEL", 83.0)]);

        repo.delete(stored.id).unwrap();
        assert_eq!(overview.state().unwrap().today_total, 0.0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (_temp_dir, repo) = repository();
        let id = {
            let overview = Overview::attach(&repo, || at(20, 18)).unwrap();
            overview.subscription
        };
        assert!(!repo.unsubscribe(id).unwrap());
    }
}
