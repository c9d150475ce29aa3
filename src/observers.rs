// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Synchronous observer callbacks.

/// Callbacks invoked in registration order with mutable access to the event.
pub struct Observers<E> {
    callbacks: Vec<Box<dyn Fn(&mut E) + Send + Sync>>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    pub fn register<F>(&mut self, callback: F)
    where
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn notify(&self, event: &mut E) {
        for callback in &self.callbacks {
            callback(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}
