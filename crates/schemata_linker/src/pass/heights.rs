//! Pass 2: dependency heights with cycle detection.
//!
//! `height(e)` is 0 when `e` has no foreign keys, otherwise one more than the
//! largest height among the entities it references. A three-colour
//! depth-first walk computes it; reaching a grey entity again means the
//! foreign-key graph has a cycle. Colours live in this walk only, so no
//! state survives between links.

use schemata_foundation::{Error, ErrorKind, Result};
use schemata_model::Config;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

struct Walk<'a> {
    edges: &'a [Vec<usize>],
    colour: Vec<Colour>,
    height: Vec<usize>,
}

impl Walk<'_> {
    /// Computes the height of `root` and everything below it, or returns
    /// the cycle found as a list of entity positions starting and ending at
    /// the same entity.
    ///
    /// Each frame is an entity on the current path plus the index of its
    /// next unvisited edge, so depth is bounded by memory rather than by
    /// the thread's stack.
    fn visit(&mut self, root: usize) -> std::result::Result<(), Vec<usize>> {
        if self.colour[root] == Colour::Black {
            return Ok(());
        }
        self.colour[root] = Colour::Grey;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let (v, next) = *frame;
            if let Some(&t) = self.edges[v].get(next) {
                frame.1 += 1;
                match self.colour[t] {
                    Colour::Black => {
                        self.height[v] = self.height[v].max(self.height[t] + 1);
                    }
                    Colour::Grey => {
                        let start = frames.iter().position(|&(s, _)| s == t).unwrap_or(0);
                        let mut cycle: Vec<usize> = frames[start..].iter().map(|&(s, _)| s).collect();
                        cycle.push(t);
                        return Err(cycle);
                    }
                    Colour::White => {
                        self.colour[t] = Colour::Grey;
                        frames.push((t, 0));
                    }
                }
            } else {
                frames.pop();
                self.colour[v] = Colour::Black;
                if let Some(&(parent, _)) = frames.last() {
                    self.height[parent] = self.height[parent].max(self.height[v] + 1);
                }
            }
        }
        Ok(())
    }
}

/// Computes every entity's height. References must already be resolved.
pub(crate) fn compute(config: &mut Config) -> Result<()> {
    let edges: Vec<Vec<usize>> = config
        .entities()
        .iter()
        .map(|e| {
            let mut targets: Vec<usize> = Vec::new();
            for f in e.fields() {
                if let Some(t) = f.reference().and_then(|r| r.target_entity_id()) {
                    if !targets.contains(&t.index()) {
                        targets.push(t.index());
                    }
                }
            }
            targets
        })
        .collect();

    let count = edges.len();
    let mut walk = Walk {
        edges: &edges,
        colour: vec![Colour::White; count],
        height: vec![0; count],
    };
    for v in 0..count {
        if let Err(cycle) = walk.visit(v) {
            let names = cycle
                .into_iter()
                .map(|i| config.entities()[i].name().to_string())
                .collect();
            return Err(Error::new(ErrorKind::ReferenceCycle(names)));
        }
    }

    let heights = walk.height;
    for (entity, height) in config.entities_mut().iter_mut().zip(heights) {
        entity.set_height(height);
    }
    Ok(())
}
