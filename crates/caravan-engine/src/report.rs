// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::time::Duration;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTermination {
    /// Every task of the tree was handled; the outstanding counter reached
    /// zero.
    Completed,
    /// The run was cancelled through `stop()` before the tree was exhausted.
    Interrupted,
}

impl std::fmt::Display for RunTermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Summary of one runner invocation.
///
/// `tasks_created` counts every task that existed during the run, the root
/// included. Each of them was retired through exactly one of `split` or
/// `solve`, so `tasks_created == tasks_processed + tasks_split` holds at
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub termination: RunTermination,
    pub duration: Duration,
    pub tasks_created: u64,
    pub tasks_processed: u64,
    pub tasks_split: u64,
    pub num_threads: usize,
}

impl RunReport {
    /// The fraction of handled tasks that were solved rather than split.
    pub fn solve_ratio(&self) -> f64 {
        let handled = self.tasks_processed + self.tasks_split;
        if handled == 0 {
            return 0.0;
        }
        self.tasks_processed as f64 / handled as f64
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Task runner report:")?;
        writeln!(f, "  Termination:      {}", self.termination)?;
        writeln!(f, "  Threads:          {}", self.num_threads)?;
        writeln!(f, "  Tasks created:    {}", self.tasks_created)?;
        writeln!(f, "  Tasks processed:  {}", self.tasks_processed)?;
        writeln!(f, "  Tasks split:      {}", self.tasks_split)?;
        writeln!(f, "  Solve ratio:      {:.2}", self.solve_ratio())?;
        writeln!(f, "  Total time:       {:.2?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(processed: u64, split: u64) -> RunReport {
        RunReport {
            termination: RunTermination::Completed,
            duration: Duration::from_millis(5),
            tasks_created: processed + split,
            tasks_processed: processed,
            tasks_split: split,
            num_threads: 4,
        }
    }

    #[test]
    fn test_solve_ratio() {
        assert_eq!(report(3, 1).solve_ratio(), 0.75);
        assert_eq!(report(0, 0).solve_ratio(), 0.0);
        assert_eq!(report(5, 0).solve_ratio(), 1.0);
    }

    #[test]
    fn test_display_lists_counters() {
        let text = format!("{}", report(10, 2));
        assert!(text.contains("Termination:      Completed"));
        assert!(text.contains("Tasks created:    12"));
        assert!(text.contains("Tasks processed:  10"));
        assert!(text.contains("Solve ratio:      0.83"));
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(format!("{}", RunTermination::Completed), "Completed");
        assert_eq!(format!("{}", RunTermination::Interrupted), "Interrupted");
    }
}
