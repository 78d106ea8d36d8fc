//! Editing tools and the single point that turns a tool into cell writes

use crate::simulation::Direction;

/// Active editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Tile ids into the active layer
    #[default]
    Paint,
    /// Direction codes into the drivable mask
    Drivable,
    /// Flags into the walkable mask
    Walkable,
    /// Archetype sprite slots; never touches the grid
    Entities,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Paint, Tool::Drivable, Tool::Walkable, Tool::Entities];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Paint => "paint",
            Tool::Drivable => "drivable",
            Tool::Walkable => "walkable",
            Tool::Entities => "entities",
        }
    }

    /// Whether this tool paints on the grid canvas
    pub fn paints_grid(self) -> bool {
        !matches!(self, Tool::Entities)
    }
}

/// A full-grid array a brush can write into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintTarget {
    Layer(usize),
    Drivable,
    Walkable,
}

/// The value a brush application writes into every covered cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWrite {
    pub target: PaintTarget,
    pub value: u32,
}

/// Resolve what a brush application of `tool` writes.
///
/// Erasing writes the target's empty value (0). The entities tool has no
/// grid write.
pub fn cell_write(
    tool: Tool,
    active_layer: usize,
    selected_tile: u32,
    erase: bool,
    direction: Direction,
) -> Option<CellWrite> {
    let (target, value) = match tool {
        Tool::Paint => (PaintTarget::Layer(active_layer), selected_tile),
        Tool::Drivable => (PaintTarget::Drivable, u32::from(direction.code())),
        Tool::Walkable => (PaintTarget::Walkable, 1),
        Tool::Entities => return None,
    };

    Some(CellWrite {
        target,
        value: if erase { 0 } else { value },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erase_writes_empty_value() {
        for tool in [Tool::Paint, Tool::Drivable, Tool::Walkable] {
            let write = cell_write(tool, 1, 17, true, Direction::Left);
            assert_eq!(write.map(|w| w.value), Some(0));
        }
    }

    #[test]
    fn dispatch_targets() {
        assert_eq!(
            cell_write(Tool::Paint, 2, 17, false, Direction::Up),
            Some(CellWrite {
                target: PaintTarget::Layer(2),
                value: 17
            })
        );
        assert_eq!(
            cell_write(Tool::Drivable, 0, 17, false, Direction::Left),
            Some(CellWrite {
                target: PaintTarget::Drivable,
                value: 4
            })
        );
        assert_eq!(
            cell_write(Tool::Walkable, 0, 17, false, Direction::Left),
            Some(CellWrite {
                target: PaintTarget::Walkable,
                value: 1
            })
        );
        assert_eq!(cell_write(Tool::Entities, 0, 17, false, Direction::Up), None);
    }
}
