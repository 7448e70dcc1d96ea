use std::collections::VecDeque;

/// Insertion-ordered buffer that evicts its oldest entry once full.
#[derive(Clone, Debug)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, evicting oldest entries if the buffer shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Appends `entry`, returning the evicted oldest entry if the buffer was full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn front(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: PartialEq> BoundedHistory<T> {
    pub fn contains(&self, entry: &T) -> bool {
        self.entries.contains(entry)
    }
}

/// Executed chat commands, newest first, with a recall cursor.
///
/// The cursor starts before the newest entry. `next` walks towards older
/// commands, `previous` back towards the newest and finally resets.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
            cursor: None,
        }
    }

    /// Records a command as the newest entry, dropping the oldest when full.
    pub fn push(&mut self, command: impl Into<String>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(command.into());
    }

    /// Steps to the next older command, if any.
    pub fn next(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if next < self.entries.len() {
            self.cursor = Some(next);
            self.entries.get(next).map(String::as_str)
        } else {
            None
        }
    }

    /// Steps back towards the newest command; past it the cursor resets.
    pub fn previous(&mut self) -> Option<&str> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.entries.get(cursor - 1).map(String::as_str)
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
