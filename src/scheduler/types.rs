/*!
 * Scheduler Types
 * Scheduling policies, Gantt history entries, and statistics
 */

use crate::core::types::{Pid, Tick};
use crate::display::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// First come, first served; non-preemptive
    Fcfs,
    /// Shortest remaining burst first; non-preemptive
    Sjf,
    /// Lowest priority value first; non-preemptive
    Priority,
    /// FIFO with a fixed time quantum
    RoundRobin,
}

impl SchedulingPolicy {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "fcfs" | "first_come_first_served" => Ok(Self::Fcfs),
            "sjf" | "shortest_job_first" => Ok(Self::Sjf),
            "priority" | "prio" => Ok(Self::Priority),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!(
                "Invalid policy '{}'. Valid: fcfs, sjf, priority, round_robin",
                s
            )),
        }
    }

    /// Convert to string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Priority => "priority",
            Self::RoundRobin => "round_robin",
        }
    }

    /// Whether the policy preempts on quantum expiry
    #[inline]
    #[must_use]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One segment of the execution history (Gantt log)
///
/// Entries are append-only; consecutive ticks of the same process extend
/// the previous entry instead of starting a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GanttEntry {
    pub pid: Pid,
    /// Contiguous ticks this process held the CPU
    pub duration: Tick,
    /// Display attribute captured when the segment started
    pub color: Color,
}

/// Scheduler statistics snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub dispatches: u64,
    pub preemptions: u64,
    pub policy: SchedulingPolicy,
    pub quantum: u32,
}
