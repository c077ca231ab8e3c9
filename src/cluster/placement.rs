/* src/cluster/placement.rs */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub primary: usize,
    pub backup: usize,
}

impl Placement {
    /// Node indices to contact, primary first. A single-node cluster yields
    /// one target since both slots are the same node.
    pub fn targets(self) -> Vec<usize> {
        if self.primary == self.backup {
            vec![self.primary]
        } else {
            vec![self.primary, self.backup]
        }
    }
}

// node_count must be non-zero
pub fn place(part_index: u32, node_count: usize) -> Placement {
    let index = part_index as usize;
    Placement {
        primary: index % node_count,
        backup: (index + 1) % node_count,
    }
}
