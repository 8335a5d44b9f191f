//! Per-run mutable state, passed explicitly through aggregation calls.

use campaign_cache::ImageStore;
use campaign_core::EntityId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

pub struct AggregationContext {
    pub run_id: Uuid,
    pub report_id: u64,
    pub started_at: DateTime<Utc>,
    pub images: ImageStore,
    next_group_number: u32,
    group_numbers: HashMap<EntityId, u32>,
}

impl AggregationContext {
    pub fn new(report_id: u64, image_capacity: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            report_id,
            started_at: Utc::now(),
            images: ImageStore::new(image_capacity),
            next_group_number: 1,
            group_numbers: HashMap::new(),
        }
    }

    /// Keyword-group number for a campaign, assigned on first request from a
    /// counter starting at 1.
    pub fn group_number_for(&mut self, campaign_id: &EntityId) -> u32 {
        if let Some(n) = self.group_numbers.get(campaign_id) {
            return *n;
        }
        let n = self.next_group_number;
        self.next_group_number += 1;
        self.group_numbers.insert(campaign_id.clone(), n);
        n
    }

    pub fn groups_assigned(&self) -> usize {
        self.group_numbers.len()
    }
}
