//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json. Every write is
//! persisted before it returns; if the write to disk fails the in-memory
//! state is rolled back. Subscribers receive a full snapshot (newest first)
//! when they subscribe and after every successful write.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::ExpenseError;
use crate::models::{CategoryTotal, Expense, ExpenseId};
use crate::reports::aggregation::category_breakdown;

use super::file_io::{read_json, write_json_atomic};

/// Callback invoked with the current snapshot of all expenses
pub type Subscriber = Box<dyn Fn(&[Expense]) + Send + Sync>;

/// Handle returned by [`ExpenseRepository::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    #[serde(default)]
    next_id: i64,
    expenses: Vec<Expense>,
}

#[derive(Debug, Clone)]
struct StoreState {
    next_id: i64,
    expenses: BTreeMap<ExpenseId, Expense>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_id: 1,
            expenses: BTreeMap::new(),
        }
    }
}

impl StoreState {
    fn to_file_data(&self) -> ExpenseData {
        ExpenseData {
            next_id: self.next_id,
            expenses: sorted_newest_first(self.expenses.values().cloned().collect()),
        }
    }
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<StoreState>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(StoreState::default()),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let max_id = file_data
            .expenses
            .iter()
            .map(|e| e.id.get())
            .max()
            .unwrap_or(0);

        let mut state = StoreState {
            next_id: file_data.next_id.max(max_id + 1).max(1),
            expenses: BTreeMap::new(),
        };
        for expense in file_data.expenses {
            state.expenses.insert(expense.id, expense);
        }

        debug!(count = state.expenses.len(), path = %self.path.display(), "loaded expenses");

        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = state;
        drop(data);

        self.notify()
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        write_json_atomic(&self.path, &data.to_file_data())
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        let data = self.read_state()?;
        Ok(data.expenses.get(&id).cloned())
    }

    /// All expenses, newest first
    pub fn list(&self) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.read_state()?;
        Ok(sorted_newest_first(data.expenses.values().cloned().collect()))
    }

    /// Expenses dated within `[start, end]`, newest first
    pub fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.read_state()?;
        Ok(sorted_newest_first(
            data.expenses
                .values()
                .filter(|e| e.date >= start && e.date <= end)
                .cloned()
                .collect(),
        ))
    }

    /// Expenses whose stored category text equals `category`, newest first
    pub fn list_by_category(&self, category: &str) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.read_state()?;
        Ok(sorted_newest_first(
            data.expenses
                .values()
                .filter(|e| e.category == category)
                .cloned()
                .collect(),
        ))
    }

    /// Sum of amounts within `[start, end]`, `None` when nothing matches
    pub fn sum_amount(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<f64>, ExpenseError> {
        let in_range = self.list_by_date_range(start, end)?;
        if in_range.is_empty() {
            Ok(None)
        } else {
            Ok(Some(in_range.iter().map(|e| e.amount).sum()))
        }
    }

    /// Per-category sums within `[start, end]`
    pub fn category_sums(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryTotal>, ExpenseError> {
        let data = self.read_state()?;
        let snapshot: Vec<Expense> = data.expenses.values().cloned().collect();
        Ok(category_breakdown(&snapshot, start, end))
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, ExpenseError> {
        let data = self.read_state()?;
        Ok(data.expenses.len())
    }

    /// Insert a new expense, assigning its id
    ///
    /// Any id already set on the record is ignored.
    pub fn insert(&self, mut expense: Expense) -> Result<Expense, ExpenseError> {
        let stored = self.mutate(|state| {
            expense.id = ExpenseId::new(state.next_id);
            state.next_id += 1;
            state.expenses.insert(expense.id, expense.clone());
            Ok(expense)
        })?;

        info!(id = %stored.id, amount = stored.amount, category = %stored.category, "expense added");
        Ok(stored)
    }

    /// Replace a stored expense
    pub fn update(&self, expense: Expense) -> Result<(), ExpenseError> {
        let id = expense.id;
        self.mutate(|state| match state.expenses.get_mut(&id) {
            Some(existing) => {
                *existing = expense;
                Ok(())
            }
            None => Err(ExpenseError::expense_not_found(id.to_string())),
        })?;

        info!(id = %id, "expense updated");
        Ok(())
    }

    /// Delete an expense, returning whether it existed
    pub fn delete(&self, id: ExpenseId) -> Result<bool, ExpenseError> {
        // A missing id aborts the change so nothing is persisted or notified
        let outcome = self.mutate(|state| match state.expenses.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ExpenseError::expense_not_found(id.to_string())),
        });

        match outcome {
            Ok(()) => {
                info!(id = %id, "expense deleted");
                Ok(true)
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete every expense, returning how many were removed
    pub fn delete_all(&self) -> Result<usize, ExpenseError> {
        let removed = self.mutate(|state| {
            let removed = state.expenses.len();
            state.expenses.clear();
            Ok(removed)
        })?;

        info!(removed, "all expenses deleted");
        Ok(removed)
    }

    /// Register a callback that receives every new snapshot
    ///
    /// The callback runs once immediately with the current snapshot. It must
    /// not write, subscribe or unsubscribe from inside the callback.
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId, ExpenseError>
    where
        F: Fn(&[Expense]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));

        // Held across the first snapshot and registration; a concurrent
        // write's notify waits here and then reaches this subscriber too
        let mut subscribers = self.subscribers.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        callback(&self.list()?);
        subscribers.push((id, Box::new(callback)));
        debug!(subscription = id.0, "subscriber added");
        Ok(id)
    }

    /// Remove a subscriber, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, ExpenseError> {
        let mut subscribers = self.subscribers.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        Ok(subscribers.len() != before)
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>, ExpenseError> {
        self.data
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Apply a change, persist it, roll back on failure, then notify
    fn mutate<T, F>(&self, change: F) -> Result<T, ExpenseError>
    where
        F: FnOnce(&mut StoreState) -> Result<T, ExpenseError>,
    {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let previous = data.clone();
        let outcome = change(&mut data)
            .and_then(|value| write_json_atomic(&self.path, &data.to_file_data()).map(|_| value));

        let value = match outcome {
            Ok(value) => value,
            Err(e) => {
                *data = previous;
                return Err(e);
            }
        };
        drop(data);

        self.notify()?;
        Ok(value)
    }

    fn notify(&self) -> Result<(), ExpenseError> {
        let subscribers = self.subscribers.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        if subscribers.is_empty() {
            return Ok(());
        }

        let snapshot = self.list()?;
        for (_, callback) in subscribers.iter() {
            callback(&snapshot);
        }
        Ok(())
    }
}

fn sorted_newest_first(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    expenses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use chrono::NaiveDate;
    use std::sync::{mpsc, Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn expense(title: &str, amount: f64, category: ExpenseCategory, d: u32) -> Expense {
        Expense::new(title, amount, category, at(d, 12))
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (_temp_dir, repo) = create_test_repo();

        let a = repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();
        let b = repo.insert(expense("B", 2.0, ExpenseCategory::Food, 11)).unwrap();

        assert_eq!(a.id, ExpenseId::new(1));
        assert_eq!(b.id, ExpenseId::new(2));
        assert_eq!(repo.get(a.id).unwrap().unwrap().title, "A");
    }

    #[test]
    fn test_list_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(expense("Mid", 1.0, ExpenseCategory::Food, 12)).unwrap();
        repo.insert(expense("Old", 1.0, ExpenseCategory::Food, 10)).unwrap();
        repo.insert(expense("New", 1.0, ExpenseCategory::Food, 14)).unwrap();

        let titles: Vec<_> = repo.list().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn test_save_and_reload_keeps_ids() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();
        let b = repo.insert(expense("B", 2.0, ExpenseCategory::Travel, 11)).unwrap();
        repo.delete(b.id).unwrap();

        let repo2 = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);

        // Deleted ids are not reused
        let c = repo2.insert(expense("C", 3.0, ExpenseCategory::Food, 12)).unwrap();
        assert_eq!(c.id, ExpenseId::new(3));
    }

    #[test]
    fn test_update_replaces_record() {
        let (_temp_dir, repo) = create_test_repo();
        let mut stored = repo.insert(expense("Taxi", 9.0, ExpenseCategory::Travel, 10)).unwrap();

        stored.amount = 12.0;
        stored.notes = Some("airport".into());
        repo.update(stored.clone()).unwrap();

        assert_eq!(repo.get(stored.id).unwrap().unwrap(), stored);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let mut ghost = expense("Ghost", 1.0, ExpenseCategory::Food, 10);
        ghost.id = ExpenseId::new(99);

        let err = repo.update(ghost).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_and_delete_all() {
        let (_temp_dir, repo) = create_test_repo();
        let a = repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();
        repo.insert(expense("B", 2.0, ExpenseCategory::Food, 11)).unwrap();
        repo.insert(expense("C", 3.0, ExpenseCategory::Food, 12)).unwrap();

        assert!(repo.delete(a.id).unwrap());
        assert!(!repo.delete(a.id).unwrap());
        assert_eq!(repo.delete_all().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_date_range_and_category_queries() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();
        repo.insert(expense("B", 2.0, ExpenseCategory::Travel, 15)).unwrap();
        repo.insert(expense("C", 4.0, ExpenseCategory::Food, 20)).unwrap();

        let range = repo.list_by_date_range(at(12, 0), at(20, 12)).unwrap();
        let titles: Vec<_> = range.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B"]);

        let food = repo.list_by_category("FOOD").unwrap();
        assert_eq!(food.len(), 2);
        assert!(repo.list_by_category("food").unwrap().is_empty());
    }

    #[test]
    fn test_sum_amount_absent_when_empty() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.sum_amount(at(1, 0), at(31, 0)).unwrap(), None);

        repo.insert(expense("A", 1.5, ExpenseCategory::Food, 10)).unwrap();
        repo.insert(expense("B", 2.5, ExpenseCategory::Staff, 11)).unwrap();
        assert_eq!(repo.sum_amount(at(1, 0), at(31, 0)).unwrap(), Some(4.0));
        assert_eq!(repo.sum_amount(at(20, 0), at(31, 0)).unwrap(), None);
    }

    #[test]
    fn test_category_sums() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();
        repo.insert(expense("B", 2.0, ExpenseCategory::Travel, 11)).unwrap();
        repo.insert(expense("C", 4.0, ExpenseCategory::Food, 12)).unwrap();

        let sums = repo.category_sums(at(1, 0), at(31, 0)).unwrap();
        assert_eq!(
            sums,
            vec![CategoryTotal::new("FOOD", 5.0), CategoryTotal::new("TRAVEL", 2.0)]
        );
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(expense("Existing", 1.0, ExpenseCategory::Food, 10)).unwrap();

        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = repo
            .subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.len()))
            .unwrap();

        let added = repo.insert(expense("New", 2.0, ExpenseCategory::Food, 11)).unwrap();
        repo.delete(added.id).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);

        assert!(repo.unsubscribe(id).unwrap());
        repo.delete_all().unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_missing_does_not_notify() {
        let (_temp_dir, repo) = create_test_repo();
        let added = repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();

        let calls = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&calls);
        repo.subscribe(move |_| *sink.lock().unwrap() += 1).unwrap();

        assert!(repo.delete(added.id).unwrap());
        assert_eq!(*calls.lock().unwrap(), 2);

        assert!(!repo.delete(added.id).unwrap());
        assert!(!repo.delete(ExpenseId::new(999)).unwrap());
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_delete_of_same_id() {
        let (_temp_dir, repo) = create_test_repo();
        let repo = Arc::new(repo);
        let added = repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || repo.delete(added.id).unwrap())
            })
            .collect();
        let removed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|deleted| *deleted)
            .count();

        assert_eq!(removed, 1);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_subscribe_sees_write_during_first_snapshot() {
        let (_temp_dir, repo) = create_test_repo();
        let repo = Arc::new(repo);

        let (started_tx, started_rx) = mpsc::channel::<()>();
        let started = Mutex::new(Some(started_tx));
        let last_seen = Arc::new(Mutex::new(usize::MAX));
        let sink = Arc::clone(&last_seen);

        let writer = {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                started_rx.recv().unwrap();
                repo.insert(expense("Late", 1.0, ExpenseCategory::Food, 10)).unwrap();
            })
        };

        repo.subscribe(move |snapshot| {
            // The first call lets the writer go and stalls so the insert lands mid-subscribe
            if let Some(tx) = started.lock().unwrap().take() {
                tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(200));
            }
            *sink.lock().unwrap() = snapshot.len();
        })
        .unwrap();
        writer.join().unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(*last_seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        // The store path is a directory, so every save fails
        let path = temp_dir.path().join("expenses.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        let repo = ExpenseRepository::new(path);
        let result = repo.insert(expense("A", 1.0, ExpenseCategory::Food, 10));

        assert!(matches!(result, Err(ExpenseError::Storage(_))));
        assert_eq!(repo.count().unwrap(), 0);
    }
}
