//! Undo/Redo über benannte Snapshots.
//!
//! Der Manager ist generisch über den Snapshot-Typ; wer Snapshots liefert
//! und wiederherstellt, implementiert [`Undoable`].

use thiserror::Error;

/// Zustand, der sich als Snapshot sichern und wiederherstellen lässt.
pub trait Undoable {
    /// Unveränderliche Tiefenkopie des relevanten Zustands
    type Snapshot;

    /// Erstellt einen Snapshot des aktuellen Zustands.
    fn create_snapshot(&self) -> Self::Snapshot;

    /// Ersetzt den aktuellen Zustand durch den Snapshot.
    fn restore_snapshot(&mut self, snapshot: Self::Snapshot);
}

/// Undo oder Redo ohne Einträge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Undo-Stack leer
    #[error("Nothing to undo.")]
    NothingToUndo,
    /// Redo-Stack leer
    #[error("Nothing to redo.")]
    NothingToRedo,
}

/// Ein Undo- bzw. Redo-Eintrag: Operationsname plus Snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<S> {
    /// Anzeigename der Operation (z.B. für Menü-Einträge)
    pub name: String,
    /// Zustand vor (Undo) bzw. nach (Redo) der Operation
    pub snapshot: S,
}

/// Einfacher Undo/Redo-Manager mit Snapshotting.
#[derive(Debug)]
pub struct EditHistory<S> {
    undo_stack: Vec<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
    max_depth: usize,
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::new_with_capacity(100)
    }
}

impl<S> EditHistory<S> {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    fn push_bounded(stack: &mut Vec<HistoryEntry<S>>, max_depth: usize, entry: HistoryEntry<S>) {
        if stack.len() >= max_depth {
            stack.remove(0);
        }
        stack.push(entry);
    }

    /// Legt einen Snapshot unter `name` ab und verwirft den Redo-Stack.
    pub fn record_snapshot(&mut self, name: impl Into<String>, snapshot: S) {
        let entry = HistoryEntry {
            name: name.into(),
            snapshot,
        };
        Self::push_bounded(&mut self.undo_stack, self.max_depth, entry);
        self.redo_stack.clear();
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Name des nächsten Undo-Schritts.
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.name.as_str())
    }

    /// Name des nächsten Redo-Schritts.
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.name.as_str())
    }

    /// Anzahl der Undo-Einträge.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Anzahl der Redo-Einträge.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Verwirft beide Stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Pop undo stack and push `current` onto redo stack under the same name;
    /// returns the entry to apply.
    pub fn pop_undo_with_current(&mut self, current: S) -> Option<HistoryEntry<S>> {
        let prev = self.undo_stack.pop()?;
        let entry = HistoryEntry {
            name: prev.name.clone(),
            snapshot: current,
        };
        Self::push_bounded(&mut self.redo_stack, self.max_depth, entry);
        Some(prev)
    }

    /// Pop redo stack and push `current` onto undo stack; returns the entry to apply.
    pub fn pop_redo_with_current(&mut self, current: S) -> Option<HistoryEntry<S>> {
        let next = self.redo_stack.pop()?;
        let entry = HistoryEntry {
            name: next.name.clone(),
            snapshot: current,
        };
        Self::push_bounded(&mut self.undo_stack, self.max_depth, entry);
        Some(next)
    }

    /// Macht den letzten Schritt an `target` rückgängig; gibt den Namen zurück.
    pub fn undo<T>(&mut self, target: &mut T) -> Result<String, HistoryError>
    where
        T: Undoable<Snapshot = S>,
    {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        let entry = self
            .pop_undo_with_current(target.create_snapshot())
            .ok_or(HistoryError::NothingToUndo)?;
        target.restore_snapshot(entry.snapshot);
        Ok(entry.name)
    }

    /// Stellt den zuletzt rückgängig gemachten Schritt an `target` wieder her.
    pub fn redo<T>(&mut self, target: &mut T) -> Result<String, HistoryError>
    where
        T: Undoable<Snapshot = S>,
    {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        let entry = self
            .pop_redo_with_current(target.create_snapshot())
            .ok_or(HistoryError::NothingToRedo)?;
        target.restore_snapshot(entry.snapshot);
        Ok(entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimaler Zustand mit einem Wert.
    #[derive(Default)]
    struct Counter {
        value: i32,
    }

    impl Undoable for Counter {
        type Snapshot = i32;

        fn create_snapshot(&self) -> i32 {
            self.value
        }

        fn restore_snapshot(&mut self, snapshot: i32) {
            self.value = snapshot;
        }
    }

    fn set(history: &mut EditHistory<i32>, counter: &mut Counter, value: i32) {
        history.record_snapshot("setter", counter.create_snapshot());
        counter.value = value;
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let history = EditHistory::<i32>::new_with_capacity(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_restores_previous_value() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        set(&mut history, &mut counter, 1);

        assert_eq!(history.undo(&mut counter), Ok("setter".to_string()));
        assert_eq!(counter.value, 0);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn redo_restores_undone_value() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        set(&mut history, &mut counter, 1);
        history.undo(&mut counter).expect("undo vorhanden");

        assert_eq!(history.redo_name(), Some("setter"));
        history.redo(&mut counter).expect("redo vorhanden");
        assert_eq!(counter.value, 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_stacks_report_errors() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        assert_eq!(history.undo(&mut counter), Err(HistoryError::NothingToUndo));
        assert_eq!(history.redo(&mut counter), Err(HistoryError::NothingToRedo));
    }

    #[test]
    fn clear_drops_both_stacks() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        set(&mut history, &mut counter, 1);
        set(&mut history, &mut counter, 2);
        history.undo(&mut counter).expect("undo vorhanden");

        history.clear();
        assert_eq!(history.undo(&mut counter), Err(HistoryError::NothingToUndo));
        assert_eq!(history.redo(&mut counter), Err(HistoryError::NothingToRedo));
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        set(&mut history, &mut counter, 1);
        history.undo(&mut counter).expect("undo vorhanden");
        set(&mut history, &mut counter, 3);

        assert_eq!(history.redo(&mut counter), Err(HistoryError::NothingToRedo));
        assert_eq!(counter.value, 3);
    }

    #[test]
    fn record_of_current_state_then_manual_change() {
        let mut history = EditHistory::new_with_capacity(10);
        let mut counter = Counter::default();
        history.record_snapshot("auto", counter.create_snapshot());
        counter.value = 1;

        history.undo(&mut counter).expect("undo vorhanden");
        assert_eq!(counter.value, 0);
    }

    #[test]
    fn respects_max_depth() {
        let mut history = EditHistory::new_with_capacity(3);
        let mut counter = Counter::default();

        for i in 1..=5 {
            set(&mut history, &mut counter, i);
        }

        // Nur 3 Undo-Schritte sollten möglich sein
        let mut undo_count = 0;
        while history.undo(&mut counter).is_ok() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        assert_eq!(counter.value, 2);
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut history = EditHistory::<i32>::new_with_capacity(10);
        assert!(history.pop_undo_with_current(1).is_none());
        assert!(history.pop_redo_with_current(1).is_none());
    }
}
