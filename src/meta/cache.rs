//! Memoized formatter cells.
//!
//! Every cell is a mutex-guarded slot plus a dirty flag. Setters only flip
//! the flag; the next reader rebuilds under the lock.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use chrono_tz::Tz;
use icu_collator::CollatorBorrowed;
use parking_lot::Mutex;

use crate::format::{DatePattern, DecimalPattern};
use crate::types::LogicalType;

struct Slot<T> {
    dirty: bool,
    value: Option<Arc<T>>,
}

pub(crate) struct Memo<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Memo<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                dirty: false,
                value: None,
            }),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.slot.lock().dirty = true;
    }

    pub(crate) fn get_or_try_init<E>(
        &self,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let mut slot = self.slot.lock();
        if !slot.dirty {
            if let Some(value) = &slot.value {
                return Ok(Arc::clone(value));
            }
        }
        let value = Arc::new(build()?);
        slot.value = Some(Arc::clone(&value));
        slot.dirty = false;
        Ok(value)
    }
}

/// Same as [`Memo`] but holding one entry per key.
pub(crate) struct KeyedMemo<K, T> {
    slot: Mutex<(bool, HashMap<K, Arc<T>>)>,
}

impl<K: Eq + Hash + Copy, T> KeyedMemo<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new((false, HashMap::new())),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.slot.lock().0 = true;
    }

    pub(crate) fn get_or_try_init<E>(
        &self,
        key: K,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let mut guard = self.slot.lock();
        let (dirty, entries) = &mut *guard;
        if *dirty {
            entries.clear();
            *dirty = false;
        }
        if let Some(value) = entries.get(&key) {
            return Ok(Arc::clone(value));
        }
        let value = Arc::new(build()?);
        entries.insert(key, Arc::clone(&value));
        Ok(value)
    }
}

/// A compiled date pattern bound to the zone and leniency it was built with.
#[derive(Debug)]
pub(crate) struct DateFormatter {
    pub(crate) pattern: DatePattern,
    pub(crate) zone: Tz,
    pub(crate) lenient: bool,
}

/// Per-descriptor caches. Never cloned; a cloned descriptor starts empty.
pub(crate) struct FormatCaches {
    pub(crate) numbers: KeyedMemo<LogicalType, DecimalPattern>,
    pub(crate) dates: KeyedMemo<LogicalType, DateFormatter>,
    pub(crate) collator: Memo<CollatorBorrowed<'static>>,
}

impl FormatCaches {
    pub(crate) fn new() -> Self {
        Self {
            numbers: KeyedMemo::new(),
            dates: KeyedMemo::new(),
            collator: Memo::new(),
        }
    }

    pub(crate) fn invalidate_numbers(&self) {
        self.numbers.invalidate();
    }

    pub(crate) fn invalidate_dates(&self) {
        self.dates.invalidate();
    }

    pub(crate) fn invalidate_collator(&self) {
        self.collator.invalidate();
    }
}

impl Default for FormatCaches {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatCaches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatCaches").finish_non_exhaustive()
    }
}
