//! Per-view result holder.
//!
//! A view (title page, watch page, ...) may start a new fetch before the
//! previous one completes. Each fetch gets a ticket; only the result of the
//! latest ticket is kept, stale ones are dropped.

/// Identifies one request issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds the result of the latest request.
#[derive(Debug)]
pub struct Latest<T> {
    generation: u64,
    value: Option<T>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            value: None,
        }
    }
}

impl<T> Latest<T> {
    /// Starts a new request, invalidating any in-flight one.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Stores the result of a request, unless a newer one has begun.
    ///
    /// Returns whether the value was kept.
    pub fn complete(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale result"
            );
            return false;
        }

        self.value = Some(value);
        true
    }

    /// Tests if `ticket` is still the latest request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Returns the current value, if any.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_results_are_dropped() {
        let mut view = Latest::default();

        let first = view.begin();
        let second = view.begin();

        assert!(!view.is_current(first));
        assert!(view.complete(second, "episode 2"));
        assert!(!view.complete(first, "episode 1"));
        assert_eq!(view.get(), Some(&"episode 2"));
    }

    #[test]
    fn results_replace_each_other() {
        let mut view = Latest::default();

        let ticket = view.begin();
        assert!(view.complete(ticket, 1));
        let ticket = view.begin();
        assert_eq!(view.get(), Some(&1));
        assert!(view.complete(ticket, 2));
        assert_eq!(view.get(), Some(&2));
    }
}
