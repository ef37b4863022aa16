//! Structure inspection: per-level contents, counts and an invariant checker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkipSetError};
use crate::node::NodeId;
use crate::set::SkipListSet;

/// Shape summary of a [`SkipListSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipSetStats {
    pub size: usize,
    pub height: usize,
    /// Cells per level, base first.
    pub level_counts: Vec<usize>,
    /// Cells across every level, head column included.
    pub nodes: usize,
}

impl SkipSetStats {
    /// Average number of cells per element.
    pub fn cells_per_element(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.nodes as f64 / self.size as f64
        }
    }
}

impl<T, C> SkipListSet<T, C> {
    /// Head-column cell at every level, base first.
    fn head_column(&self) -> Vec<NodeId> {
        let mut column = Vec::with_capacity(self.height);
        let mut cell = self.bottom_head;
        while let Some(id) = cell {
            column.push(id);
            cell = self.nodes[id].above;
        }
        column
    }

    /// Values present at each level, base first.
    pub fn levels(&self) -> Vec<Vec<&T>> {
        self.head_column()
            .into_iter()
            .map(|start| {
                let mut values = Vec::new();
                let mut cell = Some(start);
                while let Some(id) = cell {
                    values.push(&self.nodes[id].value);
                    cell = self.nodes[id].next;
                }
                values
            })
            .collect()
    }

    pub fn stats(&self) -> SkipSetStats {
        let level_counts: Vec<usize> = self.levels().iter().map(Vec::len).collect();
        SkipSetStats {
            size: self.size,
            height: self.height,
            nodes: level_counts.iter().sum(),
            level_counts,
        }
    }

    /// One line per level, top first: `L2 | 1 4` over `L1 | 1 2 3 4`.
    pub fn render_levels(&self) -> String
    where
        T: fmt::Display,
    {
        self.levels()
            .iter()
            .enumerate()
            .rev()
            .map(|(index, level)| {
                let mut line = format!("L{} |", index + 1);
                for value in level {
                    line.push_str(&format!(" {value}"));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn corrupted(message: impl Into<String>) -> SkipSetError {
    SkipSetError::Corrupted(message.into())
}

impl<T: Ord, C> SkipListSet<T, C> {
    /// Check every structural invariant.
    ///
    /// Walks the head column and each level, verifying link symmetry,
    /// strict ascent, vertical consistency, and the cached `first`/`last`,
    /// `len` and `height`.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            if self.head.is_some() || self.bottom_head.is_some() || self.bottom_tail.is_some() {
                return Err(corrupted("empty set still references nodes"));
            }
            if !self.nodes.is_empty() {
                return Err(corrupted(format!("empty set owns {} nodes", self.nodes.len())));
            }
            if self.height != 1 {
                return Err(corrupted(format!("empty set has height {}", self.height)));
            }
            return Ok(());
        }

        let (Some(base), Some(_), Some(tail)) = (self.bottom_head, self.head, self.bottom_tail)
        else {
            return Err(corrupted("non-empty set is missing an anchor"));
        };

        let column = self.head_column();
        if column.len() != self.height {
            return Err(corrupted(format!(
                "head column spans {} levels, height is {}",
                column.len(),
                self.height
            )));
        }
        if self.height < 2 {
            return Err(corrupted("non-empty set below two levels"));
        }
        if column.last().copied() != self.head {
            return Err(corrupted("head is not the top of the head column"));
        }

        let minimum = &self.nodes[base].value;
        let mut cells = 0;
        for (index, &start) in column.iter().enumerate() {
            let level = index + 1;
            let head = &self.nodes[start];
            if head.previous.is_some() {
                return Err(corrupted(format!("head cell on level {level} has a predecessor")));
            }
            if head.value != *minimum {
                return Err(corrupted(format!("head cell on level {level} is not the minimum")));
            }

            let mut count = 0;
            let mut last = start;
            let mut cell = Some(start);
            while let Some(id) = cell {
                let node = self.nodes.get(id).ok_or_else(|| {
                    corrupted(format!("level {level} links to a released node"))
                })?;
                count += 1;
                if node.level != level {
                    return Err(corrupted(format!(
                        "cell on level {level} records level {}",
                        node.level
                    )));
                }
                if let Some(next) = node.next {
                    let after = &self.nodes[next];
                    if after.previous != Some(id) {
                        return Err(corrupted(format!("level {level} previous/next mismatch")));
                    }
                    if after.value <= node.value {
                        return Err(corrupted(format!("level {level} not strictly ascending")));
                    }
                }
                match node.below {
                    Some(below) => {
                        let under = &self.nodes[below];
                        if level == 1 || under.above != Some(id) || under.value != node.value {
                            return Err(corrupted(format!(
                                "level {level} cell disagrees with the cell below"
                            )));
                        }
                    }
                    None if level > 1 => {
                        return Err(corrupted(format!("level {level} cell has nothing below")));
                    }
                    None => {}
                }
                if let Some(above) = node.above
                    && self.nodes[above].below != Some(id)
                {
                    return Err(corrupted(format!("level {level} above/below mismatch")));
                }
                last = id;
                cell = node.next;
            }

            if level == 1 {
                if count != self.size {
                    return Err(corrupted(format!(
                        "base level holds {count} elements, len is {}",
                        self.size
                    )));
                }
                if last != tail {
                    return Err(corrupted("last base cell is not the recorded tail"));
                }
            }
            cells += count;
        }

        if cells != self.nodes.len() {
            return Err(corrupted(format!(
                "{} live nodes but {cells} reachable",
                self.nodes.len()
            )));
        }
        Ok(())
    }
}
