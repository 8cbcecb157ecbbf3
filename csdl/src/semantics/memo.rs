// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-assignment memo cell.
//!
//! Every lazily computed property of the model lives in a [`Memo`]. A
//! value is computed at most once per thread and the first stored value
//! is what every caller observes afterwards, even when several threads
//! race on the same cell. Re-entering a cell from the thread that is
//! computing it means the schema is cyclic: the guarded accessor then
//! returns the caller-supplied cycle value instead of recursing.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread::ThreadId;

enum State<T> {
    NotComputed,
    /// Threads that are computing the value right now.
    Computing(Vec<ThreadId>),
    Computed(Arc<T>),
}

enum Entry<T> {
    Computed(Arc<T>),
    Reentered,
    Compute,
}

pub struct Memo<T> {
    state: Mutex<State<T>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::NotComputed),
        }
    }
}

impl<T> Memo<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value if it has been computed already.
    pub fn get(&self) -> Option<Arc<T>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            State::Computed(ref v) => Some(v.clone()),
            State::NotComputed | State::Computing(_) => None,
        }
    }

    /// Compute value on first access. Use for computations that never
    /// come back to the same cell.
    pub fn get_or_init(&self, compute: impl FnOnce() -> T) -> Arc<T> {
        match self.enter() {
            Entry::Computed(v) => v,
            Entry::Reentered => Arc::new(compute()),
            Entry::Compute => self.compute(compute),
        }
    }

    /// Compute value on first access. If `compute` comes back to this
    /// cell on the same thread, the inner access gets `on_cycle()`. The
    /// cycle value is not stored.
    pub fn get_or_init_guarded(
        &self,
        compute: impl FnOnce() -> T,
        on_cycle: impl FnOnce() -> T,
    ) -> Arc<T> {
        match self.enter() {
            Entry::Computed(v) => v,
            Entry::Reentered => Arc::new(on_cycle()),
            Entry::Compute => self.compute(compute),
        }
    }

    fn enter(&self) -> Entry<T> {
        let me = std::thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            State::Computed(ref v) => Entry::Computed(v.clone()),
            State::Computing(ref mut threads) => {
                if threads.contains(&me) {
                    Entry::Reentered
                } else {
                    threads.push(me);
                    Entry::Compute
                }
            }
            State::NotComputed => {
                *state = State::Computing(vec![me]);
                Entry::Compute
            }
        }
    }

    /// Run `compute` as the current thread's computation of this cell.
    /// If it unwinds, the thread no longer counts as computing.
    fn compute(&self, compute: impl FnOnce() -> T) -> Arc<T> {
        let guard = ComputingGuard {
            state: &self.state,
            thread: std::thread::current().id(),
        };
        let value = compute();
        let stored = self.store(value);
        drop(guard);
        stored
    }

    fn store(&self, value: T) -> Arc<T> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            State::Computed(ref v) => v.clone(),
            State::NotComputed | State::Computing(_) => {
                let v = Arc::new(value);
                *state = State::Computed(v.clone());
                v
            }
        }
    }
}

struct ComputingGuard<'a, T> {
    state: &'a Mutex<State<T>>,
    thread: ThreadId,
}

impl<T> Drop for ComputingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let State::Computing(ref mut threads) = *state {
            threads.retain(|t| *t != self.thread);
            if threads.is_empty() {
                *state = State::NotComputed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_computed_once() {
        let memo = Memo::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            42
        };
        let first = memo.get_or_init(compute);
        let second = memo.get_or_init(compute);
        assert_eq!(*first, 42);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentry_is_cycle() {
        let memo: Memo<i32> = Memo::new();
        let v = memo.get_or_init_guarded(
            || *memo.get_or_init_guarded(|| 1, || -1) + 10,
            || 0,
        );
        assert_eq!(*v, 9);
        assert_eq!(memo.get().as_deref(), Some(&9));
    }

    #[test]
    fn test_threads_converge() {
        let memo: Memo<String> = Memo::new();
        let shared = &memo;
        let results = std::thread::scope(|s| {
            let handles = (0..8)
                .map(|i| s.spawn(move || shared.get_or_init(|| format!("value {i}"))))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        let stored = memo.get().unwrap();
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &stored)));
    }

    #[test]
    fn test_unwinding_compute_is_not_cycle() {
        let memo: Memo<i32> = Memo::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            memo.get_or_init(|| panic!("compute failed"))
        }));
        assert!(result.is_err());
        assert!(memo.get().is_none());
        let v = memo.get_or_init_guarded(|| 5, || -1);
        assert_eq!(*v, 5);
        assert_eq!(memo.get().as_deref(), Some(&5));
    }
}
