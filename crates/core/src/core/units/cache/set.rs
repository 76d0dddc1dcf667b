//! Per-set LRU container.
//!
//! The original C source links `cache_line` records with raw `LRU_prev`/
//! `LRU_next` pointers into per-set `LRU_head`/`LRU_tail` arrays. This is
//! re-architected as a safe intrusive list over a fixed-size arena addressed
//! by small integer indices: each set owns a `Vec<Option<Link>>` of length
//! `associativity`, a free list of unused slot indices, and explicit
//! `head`/`tail` slot indices (`None` is the "absent" sentinel). Eviction
//! returns a slot to the free list instead of deallocating, so steady-state
//! operation never touches the allocator.

/// One resident line's intrusive linkage, stored in a set's arena.
#[derive(Debug, Clone, Copy)]
struct Link {
    tag: u64,
    dirty: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

/// One cache set: an LRU-ordered list of up to `associativity` resident lines.
///
/// Invariant: `contents` equals the list length; `contents == 0` iff `head`
/// and `tail` are both `None`; the list is well-formed (head's `prev` is
/// `None`, tail's `next` is `None`, all interior neighbours reciprocal).
#[derive(Debug, Clone)]
pub(crate) struct Set {
    slots: Vec<Option<Link>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    contents: usize,
}

impl Set {
    /// Creates an empty set with room for `associativity` resident lines.
    pub(crate) fn new(associativity: usize) -> Self {
        Self {
            slots: vec![None; associativity],
            free: (0..associativity).rev().collect(),
            head: None,
            tail: None,
            contents: 0,
        }
    }

    /// Associativity this set was constructed with.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of resident lines. Always `<= capacity()`.
    pub(crate) fn len(&self) -> usize {
        self.contents
    }

    /// `true` once `contents == associativity`; the next insertion must evict first.
    pub(crate) fn is_full(&self) -> bool {
        self.contents == self.slots.len()
    }

    /// Linear scan from head for a line with the given tag (spec: O(associativity)).
    ///
    /// Returns the slot index so the caller can promote or mutate it without a
    /// second scan.
    pub(crate) fn lookup(&self, tag: u64) -> Option<usize> {
        let mut cur = self.head;
        while let Some(idx) = cur {
            let link = self.slots[idx].as_ref().expect("linked slot must be occupied");
            if link.tag == tag {
                return Some(idx);
            }
            cur = link.next;
        }
        None
    }

    /// Detaches `idx` from the list without touching its `Link` payload.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let link = self.slots[idx].as_ref().expect("detach of absent slot");
            (link.prev, link.next)
        };
        match prev {
            Some(p) => self.slots[p].as_mut().expect("prev slot occupied").next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].as_mut().expect("next slot occupied").prev = prev,
            None => self.tail = prev,
        }
    }

    /// Attaches `idx` at the head (MRU position). `idx`'s `Link` must already
    /// be written with `prev: None, next: None`.
    fn attach_at_head(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let link = self.slots[idx].as_mut().expect("attach of absent slot");
            link.prev = None;
            link.next = old_head;
        }
        match old_head {
            Some(h) => self.slots[h].as_mut().expect("old head occupied").prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Moves the line at `idx` to the MRU (head) position.
    ///
    /// Precondition: `idx` is currently resident in this set.
    pub(crate) fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_at_head(idx);
    }

    /// Inserts a new line at the MRU position.
    ///
    /// Precondition: the set is not full (the caller must evict first).
    /// Returns the slot index the line was installed into.
    pub(crate) fn insert_mru(&mut self, tag: u64, dirty: bool) -> usize {
        let idx = self.free.pop().expect("insert_mru called on a full set");
        self.slots[idx] = Some(Link {
            tag,
            dirty,
            prev: None,
            next: None,
        });
        self.attach_at_head(idx);
        self.contents += 1;
        idx
    }

    /// Evicts the tail (LRU) line, returning its `(tag, dirty)`.
    ///
    /// Precondition: the set is non-empty.
    pub(crate) fn evict_lru(&mut self) -> (u64, bool) {
        let idx = self.tail.expect("evict_lru called on an empty set");
        self.detach(idx);
        let link = self.slots[idx].take().expect("evicted slot was occupied");
        self.free.push(idx);
        self.contents -= 1;
        (link.tag, link.dirty)
    }

    /// Sets the dirty bit of the line at `idx`.
    pub(crate) fn set_dirty(&mut self, idx: usize, dirty: bool) {
        self.slots[idx].as_mut().expect("set_dirty of absent slot").dirty = dirty;
    }

    /// Iterates `(tag, dirty)` for every resident line, head to tail, and
    /// clears every dirty bit. Used by `flush`: returns the count of lines
    /// that *were* dirty, so the caller can add `count * words_per_block`
    /// to traffic.
    pub(crate) fn flush_dirty(&mut self) -> usize {
        let mut count = 0;
        let mut cur = self.head;
        while let Some(idx) = cur {
            let link = self.slots[idx].as_mut().expect("linked slot must be occupied");
            if link.dirty {
                link.dirty = false;
                count += 1;
            }
            cur = link.next;
        }
        count
    }
}
