//! # UID-partitioned session queues.
//!
//! [`UidQueues`] holds one FIFO queue of session keys per UID, plus an
//! ordering of UIDs from most-recently-top to least-recently-top. The head of
//! the first non-empty queue in that ordering is the session that should be
//! running ([`select_next`](UidQueues::select_next)).
//!
//! ## The offline sentinel
//! A distinguished queue for [`OFFLINE_UID`] is created on construction and
//! never removed. It starts at the tail of the ordering and is never promoted,
//! so offline sessions always schedule behind every monitored foreground UID;
//! newly seen UIDs that are not on top are inserted in front of it.
//!
//! ## Invariants
//! - Every UID in the ordering has a queue and vice versa.
//! - Queues of non-offline UIDs are non-empty; an emptied queue is dropped
//!   together with its ordering slot.
//! - A key appears in at most one queue, at one position.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::session::{SessionKey, Uid, OFFLINE_UID};

/// Per-UID FIFO queues with a most-recently-top UID ordering.
pub struct UidQueues {
    queues: HashMap<Uid, VecDeque<SessionKey>>,
    ordering: VecDeque<Uid>,
}

impl UidQueues {
    /// Creates the queue set with the offline sentinel in place.
    pub fn new() -> Self {
        let mut queues = HashMap::new();
        queues.insert(OFFLINE_UID, VecDeque::new());
        let mut ordering = VecDeque::new();
        ordering.push_back(OFFLINE_UID);
        Self { queues, ordering }
    }

    /// True if `uid` currently has a queue (offline always does).
    pub fn contains_uid(&self, uid: Uid) -> bool {
        self.queues.contains_key(&uid)
    }

    /// Appends `key` to `uid`'s queue.
    ///
    /// A UID seen for the first time is inserted into the ordering at the
    /// front when `uid_is_top`, otherwise immediately in front of the offline
    /// sentinel. An already-known, non-front UID is promoted to the front
    /// when `uid_is_top` (a fresh submit from the foreground app should win
    /// over staler foreground UIDs).
    pub fn enqueue(&mut self, uid: Uid, key: SessionKey, uid_is_top: bool) {
        if uid != OFFLINE_UID {
            if !self.queues.contains_key(&uid) {
                if uid_is_top {
                    self.ordering.push_front(uid);
                } else {
                    let offline_pos = self.offline_position();
                    self.ordering.insert(offline_pos, uid);
                }
            } else if self.ordering.front() != Some(&uid) && uid_is_top {
                self.ordering.retain(|&u| u != uid);
                self.ordering.push_front(uid);
            }
        }
        self.queues.entry(uid).or_default().push_back(key);
    }

    /// Removes `key` from `uid`'s queue.
    ///
    /// Returns `true` when this was the last session of a non-offline UID and
    /// the queue (and its ordering slot) was dropped; the caller is expected
    /// to stop monitoring that UID and re-sort the remaining ordering against
    /// the current top set.
    pub fn remove(&mut self, uid: Uid, key: SessionKey) -> bool {
        let Some(queue) = self.queues.get_mut(&uid) else {
            return false;
        };
        queue.retain(|&queued| queued != key);
        if uid != OFFLINE_UID && queue.is_empty() {
            self.queues.remove(&uid);
            self.ordering.retain(|&u| u != uid);
            return true;
        }
        false
    }

    /// Head of the first non-empty queue in the ordering, if any.
    ///
    /// Pure with respect to the queue set; this is the session that should be
    /// running.
    pub fn select_next(&self) -> Option<SessionKey> {
        self.ordering
            .iter()
            .filter_map(|uid| self.queues.get(uid))
            .find_map(|queue| queue.front().copied())
    }

    /// Moves every known UID in `uids` to the front of the ordering.
    ///
    /// Unknown UIDs (no queue) and the offline sentinel are ignored. Each
    /// promoted UID is pushed to the front as it is encountered, so their
    /// mutual order is unspecified but stable within a call; everything else,
    /// offline included, keeps its position behind them. With
    /// `preserve_front`, the previous front UID stays at the head if it is
    /// itself in `uids` — this is what keeps a running foreground session
    /// from being churned by a top-set update that still contains its UID.
    pub fn promote_uids(&mut self, uids: &HashSet<Uid>, preserve_front: bool) {
        if uids.is_empty() {
            return;
        }
        let front = self.ordering.front().copied();

        let mut promoted = VecDeque::new();
        let mut remaining = VecDeque::with_capacity(self.ordering.len());
        let mut pinned_front = None;
        for &uid in &self.ordering {
            if uid != OFFLINE_UID && uids.contains(&uid) {
                if preserve_front && Some(uid) == front {
                    pinned_front = Some(uid);
                } else {
                    promoted.push_front(uid);
                }
            } else {
                remaining.push_back(uid);
            }
        }
        if let Some(uid) = pinned_front {
            promoted.push_front(uid);
        }
        if promoted.is_empty() {
            return;
        }
        promoted.extend(remaining);
        self.ordering = promoted;
    }

    /// UIDs in scheduling order, most-recently-top first.
    pub fn uids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.ordering.iter().copied()
    }

    /// The queue of `uid`, if present.
    pub fn queue(&self, uid: Uid) -> Option<&VecDeque<SessionKey>> {
        self.queues.get(&uid)
    }

    /// Number of UID queues, offline included.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// True when only the empty offline queue remains.
    pub fn is_empty(&self) -> bool {
        self.queues.len() == 1
            && self
                .queues
                .get(&OFFLINE_UID)
                .is_some_and(|queue| queue.is_empty())
    }

    fn offline_position(&self) -> usize {
        self.ordering
            .iter()
            .position(|&u| u == OFFLINE_UID)
            .unwrap_or(self.ordering.len())
    }
}

impl Default for UidQueues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(client_id: u64, session_id: i32) -> SessionKey {
        SessionKey::new(client_id, session_id)
    }

    fn set(uids: &[Uid]) -> HashSet<Uid> {
        uids.iter().copied().collect()
    }

    #[test]
    fn starts_with_only_the_offline_sentinel() {
        let queues = UidQueues::new();
        assert_eq!(queues.uids().collect::<Vec<_>>(), vec![OFFLINE_UID]);
        assert!(queues.is_empty());
        assert_eq!(queues.select_next(), None);
    }

    #[test]
    fn new_uid_lands_in_front_of_offline_when_not_top() {
        let mut queues = UidQueues::new();
        queues.enqueue(OFFLINE_UID, key(9, 0), false);
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(200, key(2, 0), false);

        // Insertion order among non-top uids is preserved; offline stays last.
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![100, 200, OFFLINE_UID]
        );
        assert_eq!(queues.select_next(), Some(key(1, 0)));
    }

    #[test]
    fn top_uid_enqueues_at_the_front() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(200, key(2, 0), true);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![200, 100, OFFLINE_UID]
        );

        // A later submit from a known uid that is on top again wins the front.
        queues.enqueue(100, key(1, 1), true);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![100, 200, OFFLINE_UID]
        );
    }

    #[test]
    fn fifo_within_one_uid() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(100, key(1, 1), false);
        assert_eq!(queues.select_next(), Some(key(1, 0)));

        queues.remove(100, key(1, 0));
        assert_eq!(queues.select_next(), Some(key(1, 1)));
    }

    #[test]
    fn emptied_realtime_queue_is_dropped_but_offline_persists() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(OFFLINE_UID, key(2, 0), false);

        assert!(queues.remove(100, key(1, 0)));
        assert!(!queues.contains_uid(100));

        assert!(!queues.remove(OFFLINE_UID, key(2, 0)));
        assert!(queues.contains_uid(OFFLINE_UID));
        assert_eq!(queues.uids().collect::<Vec<_>>(), vec![OFFLINE_UID]);
    }

    #[test]
    fn promote_moves_known_uids_and_ignores_unknown_and_offline() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(200, key(2, 0), false);
        queues.enqueue(300, key(3, 0), false);

        queues.promote_uids(&set(&[300, 555, OFFLINE_UID]), false);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![300, 100, 200, OFFLINE_UID]
        );
    }

    #[test]
    fn promote_preserves_front_only_when_front_is_promoted() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        queues.enqueue(200, key(2, 0), false);

        // Front 100 is in the set and preserved: it keeps the head.
        queues.promote_uids(&set(&[100, 200]), true);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![100, 200, OFFLINE_UID]
        );

        // Without preservation the promoted uids are re-pushed to the front
        // and the old head can lose its slot.
        queues.promote_uids(&set(&[100, 200]), false);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![200, 100, OFFLINE_UID]
        );

        // Front 200 is not in the set: 100 takes over despite preservation.
        queues.promote_uids(&set(&[100]), true);
        assert_eq!(
            queues.uids().collect::<Vec<_>>(),
            vec![100, 200, OFFLINE_UID]
        );
    }

    #[test]
    fn select_next_skips_empty_offline_queue() {
        let mut queues = UidQueues::new();
        queues.enqueue(100, key(1, 0), false);
        assert_eq!(queues.select_next(), Some(key(1, 0)));

        queues.remove(100, key(1, 0));
        assert_eq!(queues.select_next(), None);
    }
}
