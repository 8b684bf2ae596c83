/// Required indentation levels for the blocks currently open.
///
/// The base level 0 is always present, so the top of the stack is the
/// column a line must reach to belong to the innermost block.
#[derive(Debug, Clone)]
pub struct Indentation {
    levels: Vec<u32>,
    step: u32,
}

impl Indentation {
    pub fn new(step: u32) -> Self {
        Indentation {
            levels: vec![0],
            step,
        }
    }

    pub fn current(&self) -> u32 {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Number of blocks opened and not yet closed.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn increase(&mut self) -> u32 {
        let level = self.current() + self.step;
        self.levels.push(level);
        level
    }

    /// # Panics
    ///
    /// Panics when there is no matching [`Indentation::increase`]; that is a
    /// bug in a grammar handler, not in the input.
    pub fn decrease(&mut self) -> u32 {
        if self.levels.len() <= 1 {
            panic!("decrease_indentation called without a matching increase_indentation");
        }

        self.levels.pop();
        self.current()
    }
}
