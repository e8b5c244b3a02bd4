//! Reconstruct build parallelism by packing steps into lanes.
//!
//! Build logs don't record which worker ran a step. Steps are placed
//! latest-first: each lane remembers the start of the step it holds most
//! recently, and a new step fits in that lane if it finishes by then. This is
//! greedy interval colouring over `[start, end)`, so the number of lanes equals
//! the largest number of steps running at the same instant.

use super::{Millis, Step};

/// Assigns lane indices to steps. One allocator per source.
#[derive(Debug, Default)]
pub struct LaneAllocator {
    /// Per lane: start of the step most recently placed in it.
    watermarks: Vec<Millis>,
}

impl LaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `step` in the first lane that's free until its end, or a new lane.
    ///
    /// Steps must arrive in descending end order for the placement to be
    /// non-overlapping; [`assign_lanes`] takes care of that.
    pub fn alloc(&mut self, step: &Step) -> usize {
        match self
            .watermarks
            .iter()
            .position(|&watermark| watermark >= step.end)
        {
            Some(lane) => {
                self.watermarks[lane] = step.start;
                lane
            }
            None => {
                self.watermarks.push(step.start);
                self.watermarks.len() - 1
            }
        }
    }

    pub fn lane_count(&self) -> usize {
        self.watermarks.len()
    }
}

/// Sort `steps` latest end first and give each a lane.
///
/// The sort is stable, so steps with equal ends keep their input order.
pub fn assign_lanes(mut steps: Vec<Step>) -> Vec<(Step, usize)> {
    steps.sort_by(|a, b| b.end.cmp(&a.end));

    let mut lanes = LaneAllocator::new();
    let placed: Vec<(Step, usize)> = steps
        .into_iter()
        .map(|step| {
            let lane = lanes.alloc(&step);
            (step, lane)
        })
        .collect();

    log::debug!("Packed {} steps into {} lanes", placed.len(), lanes.lane_count());
    placed
}
