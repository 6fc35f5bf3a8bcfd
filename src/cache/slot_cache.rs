use std::sync::Arc;
use dashmap::DashMap;
use crate::cache::payload::CachedPayload;
use crate::observability::metrics::SLOT_PRICES_LEN;
use crate::types::market::MarketSlot;

/// Latest payload per market slot.
///
/// Entries are swapped as whole `Arc`s, so a reader sees either the previous
/// or the new payload. Guards are dropped before `get` returns and are never
/// held across an await.
pub struct SlotCache {
    entries: DashMap<MarketSlot, Arc<CachedPayload>>,
}

impl SlotCache {
    pub fn new() -> Self {
        SlotCache {
            entries: DashMap::with_capacity(MarketSlot::ALL.len()),
        }
    }

    pub fn get(&self, slot: &MarketSlot) -> Option<Arc<CachedPayload>> {
        self.entries.get(slot).map(|entry| Arc::clone(entry.value()))
    }

    pub fn put(&self, slot: MarketSlot, payload: CachedPayload) {
        let label = slot.to_string();
        SLOT_PRICES_LEN
            .with_label_values(&[label.as_str()])
            .set(payload.prices().len() as i64);
        self.entries.insert(slot, Arc::new(payload));
    }

    /// Slots currently holding a servable payload.
    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value().is_found()).count()
    }
}

impl Default for SlotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::market::{BiddingZone, Resolution};

    #[test]
    fn put_replaces_whole_entry() {
        let cache = SlotCache::new();
        let slot = MarketSlot::new(BiddingZone::At, Resolution::Min60);
        assert!(cache.get(&slot).is_none());

        cache.put(slot, CachedPayload::new(0, vec![1, 2], 10).unwrap());
        let before = cache.get(&slot).unwrap();

        cache.put(slot, CachedPayload::new(5, vec![3], 15).unwrap());
        let after = cache.get(&slot).unwrap();

        // readers holding the old Arc keep a consistent view
        assert_eq!(before.prices(), &[1, 2]);
        assert_eq!(after.prices(), &[3]);
        assert_eq!(after.first_date(), 5);
    }

    #[test]
    fn slots_are_independent() {
        let cache = SlotCache::new();
        let de = MarketSlot::new(BiddingZone::DeLu, Resolution::Min15);
        let at = MarketSlot::new(BiddingZone::At, Resolution::Min15);

        cache.put(de, CachedPayload::new(0, vec![1], 10).unwrap());
        cache.put(at, CachedPayload::not_found());

        assert!(cache.get(&de).unwrap().is_found());
        assert!(!cache.get(&at).unwrap().is_found());
        assert_eq!(cache.found_count(), 1);
    }
}
