//! A bounded undo/redo history for editing sessions.
//!
//! Each entry is a [`Command`] that knows how to apply itself to a
//! [`PedigreeLayoutContext`] and how to build its inverse. Structural edits
//! (adding or removing vertices) are recorded as coarse snapshots of the
//! serialized pedigree, while property edits only remember the properties of
//! the vertex before and after the change.

use crate::core::base::VertexId;
use crate::core::error::Result;
use crate::core::properties::Properties;
use crate::formats::internal::SerializedPedigree;
use crate::topo::layout::PedigreeLayoutContext;
use std::collections::VecDeque;
use std::fmt::Debug;

pub const DEFAULT_UNDO_CAPACITY: usize = 100;

pub trait Command: Debug {
    /// A short human readable description of the command.
    fn name(&self) -> &str;

    /// Apply the command to \p ctx. A failed command leaves \p ctx as it
    /// was.
    fn apply(&self, ctx: &mut PedigreeLayoutContext) -> Result<()>;

    /// \returns the command that reverts this one.
    fn invert(&self) -> Box<dyn Command>;
}

/// Replaces the whole state of the session.
#[derive(Debug, Clone)]
pub struct SnapshotCommand {
    name: String,
    before: SerializedPedigree,
    after: SerializedPedigree,
}

impl SnapshotCommand {
    pub fn new(name: &str, before: SerializedPedigree, after: SerializedPedigree) -> Self {
        Self {
            name: name.to_string(),
            before,
            after,
        }
    }
}

impl Command for SnapshotCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &mut PedigreeLayoutContext) -> Result<()> {
        ctx.restore(&self.after)
    }

    fn invert(&self) -> Box<dyn Command> {
        Box::new(SnapshotCommand {
            name: self.name.clone(),
            before: self.after.clone(),
            after: self.before.clone(),
        })
    }
}

/// Changes the properties of a single vertex.
#[derive(Debug, Clone)]
pub struct PropertyCommand {
    vertex: VertexId,
    before: Properties,
    after: Properties,
}

impl PropertyCommand {
    pub fn new(vertex: VertexId, before: Properties, after: Properties) -> Self {
        Self {
            vertex,
            before,
            after,
        }
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }
}

impl Command for PropertyCommand {
    fn name(&self) -> &str {
        "set properties"
    }

    fn apply(&self, ctx: &mut PedigreeLayoutContext) -> Result<()> {
        ctx.set_properties(self.vertex, self.after.clone())
    }

    fn invert(&self) -> Box<dyn Command> {
        Box::new(PropertyCommand {
            vertex: self.vertex,
            before: self.after.clone(),
            after: self.before.clone(),
        })
    }
}

#[derive(Debug)]
pub struct UndoRedoManager {
    undo: VecDeque<Box<dyn Command>>,
    redo: Vec<Box<dyn Command>>,
    capacity: usize,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoRedoManager {
    /// Create a history that remembers at most \p capacity commands.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// \returns the name of the command that the next undo reverts.
    pub fn next_undo_name(&self) -> Option<&str> {
        self.undo.back().map(|c| c.name())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Remember a command that was already applied. This forgets the redo
    /// history, and the oldest command once the history is full.
    pub fn record(&mut self, cmd: Box<dyn Command>) {
        self.redo.clear();
        if self.capacity == 0 {
            return;
        }
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(cmd);
    }

    /// Apply \p cmd to \p ctx and record it.
    pub fn execute(&mut self, ctx: &mut PedigreeLayoutContext, cmd: Box<dyn Command>) -> Result<()> {
        cmd.apply(ctx)?;
        #[cfg(feature = "log")]
        log::debug!("Executed '{}'.", cmd.name());
        self.record(cmd);
        Ok(())
    }

    /// Run the structural edit \p edit and record it as a snapshot. Nothing
    /// is recorded if the edit fails or does not change the session.
    pub fn snapshot_edit<T, F>(
        &mut self,
        ctx: &mut PedigreeLayoutContext,
        name: &str,
        edit: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut PedigreeLayoutContext) -> Result<T>,
    {
        let before = ctx.serialize();
        let value = edit(ctx)?;
        let after = ctx.serialize();
        if before != after {
            self.record(Box::new(SnapshotCommand::new(name, before, after)));
        }
        Ok(value)
    }

    /// Set the properties of \p v as an undoable command.
    pub fn set_properties(
        &mut self,
        ctx: &mut PedigreeLayoutContext,
        v: VertexId,
        properties: Properties,
    ) -> Result<()> {
        ctx.graph().check(v)?;
        let before = ctx.graph().properties(v).clone();
        self.execute(ctx, Box::new(PropertyCommand::new(v, before, properties)))
    }

    /// Revert the last command. \returns false if there is nothing to undo.
    /// The history is unchanged if reverting fails.
    pub fn undo(&mut self, ctx: &mut PedigreeLayoutContext) -> Result<bool> {
        let cmd = match self.undo.pop_back() {
            Some(cmd) => cmd,
            None => return Ok(false),
        };
        if let Err(err) = cmd.invert().apply(ctx) {
            self.undo.push_back(cmd);
            return Err(err);
        }
        #[cfg(feature = "log")]
        log::debug!("Undid '{}'.", cmd.name());
        self.redo.push(cmd);
        Ok(true)
    }

    /// Re-apply the last undone command. \returns false if there is nothing
    /// to redo.
    pub fn redo(&mut self, ctx: &mut PedigreeLayoutContext) -> Result<bool> {
        let cmd = match self.redo.pop() {
            Some(cmd) => cmd,
            None => return Ok(false),
        };
        if let Err(err) = cmd.apply(ctx) {
            self.redo.push(cmd);
            return Err(err);
        }
        #[cfg(feature = "log")]
        log::debug!("Redid '{}'.", cmd.name());
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        if self.capacity > 0 {
            self.undo.push_back(cmd);
        }
        Ok(true)
    }
}

#[cfg(test)]
use crate::core::options::LayoutOptions;

#[test]
fn test_undo_redo_snapshot() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let mut history = UndoRedoManager::default();
    let me = ctx.proband().unwrap();
    let initial = ctx.serialize();

    let (_, rel) = history
        .snapshot_edit(&mut ctx, "add partner", |ctx| ctx.add_partner(me))
        .unwrap();
    let child = history
        .snapshot_edit(&mut ctx, "add child", |ctx| ctx.add_child(rel))
        .unwrap();
    let with_child = ctx.serialize();
    assert_eq!(history.undo_len(), 2);
    assert_eq!(history.next_undo_name(), Some("add child"));

    assert!(history.undo(&mut ctx).unwrap());
    assert!(ctx.position(child).is_none());
    assert!(history.undo(&mut ctx).unwrap());
    assert_eq!(ctx.serialize(), initial);
    assert!(!history.undo(&mut ctx).unwrap());

    assert!(history.redo(&mut ctx).unwrap());
    assert!(history.redo(&mut ctx).unwrap());
    assert_eq!(ctx.serialize(), with_child);
    assert!(!history.can_redo());
}

#[test]
fn test_new_command_clears_redo() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let mut history = UndoRedoManager::new(2);
    let me = ctx.proband().unwrap();

    for _ in 0..3 {
        history
            .snapshot_edit(&mut ctx, "add partner", |ctx| ctx.add_partner(me))
            .unwrap();
    }
    // Only the last two edits are remembered.
    assert_eq!(history.undo_len(), 2);

    history.undo(&mut ctx).unwrap();
    assert!(history.can_redo());

    let mut props = ctx.graph().properties(me).clone();
    props.first_name = Some("Ann".to_string());
    history.set_properties(&mut ctx, me, props).unwrap();
    assert!(!history.can_redo());
    assert_eq!(ctx.graph().properties(me).first_name.as_deref(), Some("Ann"));

    history.undo(&mut ctx).unwrap();
    assert_eq!(ctx.graph().properties(me).first_name, None);
    history.redo(&mut ctx).unwrap();
    assert_eq!(ctx.graph().properties(me).first_name.as_deref(), Some("Ann"));
}

#[test]
fn test_failed_edit_is_not_recorded() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let mut history = UndoRedoManager::default();
    let bogus = VertexId::from(1000);
    assert!(history
        .snapshot_edit(&mut ctx, "add partner", |ctx| ctx.add_partner(bogus))
        .is_err());
    assert!(history
        .set_properties(&mut ctx, bogus, Properties::default())
        .is_err());
    assert!(!history.can_undo());
}
