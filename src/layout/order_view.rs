//! Incremental re-render planning.
//!
//! Given the indexes rendered last time and the ones to render now, produce
//! the smallest set of node operations: nodes whose index stays are kept,
//! nodes whose index left the view are reused for newly entering indexes,
//! and only the surplus is inserted or removed.

use std::collections::HashSet;

/// One operation on the rendered node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Node for `index` stays; it now sits at `position`
    Keep { index: usize, position: usize },
    /// Node that rendered `from` is reused for `to` at `position`
    Replace { from: usize, to: usize, position: usize },
    /// New node for `index` at `position`
    Insert { index: usize, position: usize },
    /// Node for `index` is dropped
    Remove { index: usize },
}

/// Tracks the rendered order of one axis between renders.
#[derive(Debug, Clone, Default)]
pub struct OrderView {
    rendered: Vec<usize>,
}

impl OrderView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes rendered by the last [`OrderView::update`].
    pub fn rendered(&self) -> &[usize] {
        &self.rendered
    }

    /// Diff against `next` and remember it as rendered.
    pub fn update(&mut self, next: &[usize]) -> Vec<ViewCommand> {
        let staying: HashSet<usize> = next.iter().copied().collect();
        let previous: HashSet<usize> = self.rendered.iter().copied().collect();
        let mut leaving = self
            .rendered
            .iter()
            .copied()
            .filter(|index| !staying.contains(index));

        let mut commands = Vec::with_capacity(next.len());
        for (position, &index) in next.iter().enumerate() {
            let command = if previous.contains(&index) {
                ViewCommand::Keep { index, position }
            } else if let Some(from) = leaving.next() {
                ViewCommand::Replace {
                    from,
                    to: index,
                    position,
                }
            } else {
                ViewCommand::Insert { index, position }
            };
            commands.push(command);
        }
        commands.extend(leaving.map(|index| ViewCommand::Remove { index }));

        self.rendered = next.to_vec();
        commands
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_first_render_inserts() {
        let mut view = OrderView::new();
        let commands = view.update(&[0, 1]);
        assert_eq!(
            commands,
            vec![
                ViewCommand::Insert { index: 0, position: 0 },
                ViewCommand::Insert { index: 1, position: 1 },
            ]
        );
        assert_eq!(view.rendered(), &[0, 1]);
    }

    #[test]
    fn test_scroll_reuses_leaving_node() {
        let mut view = OrderView::new();
        view.update(&[0, 1, 2, 3]);
        let commands = view.update(&[1, 2, 3, 4]);
        assert_eq!(commands[0], ViewCommand::Keep { index: 1, position: 0 });
        assert_eq!(
            commands[3],
            ViewCommand::Replace {
                from: 0,
                to: 4,
                position: 3
            }
        );
        assert_eq!(commands.len(), 4);
    }

    #[test]
    fn test_shrink_removes_surplus() {
        let mut view = OrderView::new();
        view.update(&[5, 6, 7]);
        let commands = view.update(&[6]);
        assert_eq!(
            commands,
            vec![
                ViewCommand::Keep { index: 6, position: 0 },
                ViewCommand::Remove { index: 5 },
                ViewCommand::Remove { index: 7 },
            ]
        );
    }

    #[test]
    fn test_unchanged_is_all_keeps() {
        let mut view = OrderView::new();
        view.update(&[3, 4]);
        let commands = view.update(&[3, 4]);
        assert!(commands
            .iter()
            .all(|c| matches!(c, ViewCommand::Keep { .. })));
    }
}
