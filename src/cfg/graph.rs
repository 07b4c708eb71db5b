use std::{collections::HashMap, fmt};

use indexmap::IndexMap;

use crate::{
    binder::{
        bound_tree::{BoundBlockStmt, BoundExpr, BoundStmt},
        printer::{expression_to_string, statement_to_string},
    },
    symbols::symbols::{LabelSymbol, SymbolTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Synthetic entry, always the first block.
    Start,
    /// A run of straight-line statements.
    Basic,
    /// Synthetic exit, reached by `return` or by falling off the end.
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub id: usize,
    pub kind: BlockKind,
    pub statements: Vec<BoundStmt>,
    /// Ids of the edges ending here.
    pub incoming: Vec<usize>,
    /// Ids of the edges starting here.
    pub outgoing: Vec<usize>,
}

impl BasicBlock {
    fn new(id: usize, kind: BlockKind, statements: Vec<BoundStmt>) -> Self {
        BasicBlock {
            id,
            kind,
            statements,
            incoming: vec![],
            outgoing: vec![],
        }
    }

    #[inline]
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.kind == BlockKind::Start
    }

    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.kind == BlockKind::End
    }

    /// Whether the block's terminator is a `return`.
    #[inline]
    #[must_use]
    pub fn ends_in_return(&self) -> bool {
        matches!(self.statements.last(), Some(BoundStmt::Return(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlockEdge {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    /// `None` for an edge that is always taken.
    pub condition: Option<BoundExpr>,
}

/// Control flow graph of one lowered body.
///
/// Blocks and edges are keyed by id and keep their insertion order, so
/// iteration and the DOT output follow the source order of the body.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    blocks: IndexMap<usize, BasicBlock>,
    edges: IndexMap<usize, BasicBlockEdge>,
    start: usize,
    end: usize,
    next_edge: usize,
}

impl ControlFlowGraph {
    /// Builds the graph of a lowered body: partitions it into blocks, wires
    /// the edges and removes every block that cannot be reached.
    ///
    /// # Panics
    ///
    /// Panics if `body` still contains structured statements or jumps to a
    /// label it does not declare. Both mean lowering did not run.
    #[must_use]
    pub fn create(body: &BoundBlockStmt) -> Self {
        let partitions = partition(&body.statements);

        let start = 0;
        let end = partitions.len() + 1;

        let mut blocks = IndexMap::new();
        blocks.insert(start, BasicBlock::new(start, BlockKind::Start, vec![]));
        for (i, statements) in partitions.into_iter().enumerate() {
            blocks.insert(i + 1, BasicBlock::new(i + 1, BlockKind::Basic, statements));
        }
        blocks.insert(end, BasicBlock::new(end, BlockKind::End, vec![]));

        let mut graph = ControlFlowGraph {
            blocks,
            edges: IndexMap::new(),
            start,
            end,
            next_edge: 0,
        };

        graph.wire();
        log::debug!(
            "control flow graph: {} blocks, {} edges before pruning",
            graph.blocks.len(),
            graph.edges.len()
        );

        graph.prune();
        log::debug!(
            "control flow graph: {} blocks, {} edges after pruning",
            graph.blocks.len(),
            graph.edges.len()
        );

        graph
    }

    /// Whether every path through `body` ends in an explicit `return`.
    ///
    /// Holds iff every edge into the end block comes from a block whose last
    /// statement is a `return`.
    #[must_use]
    pub fn all_paths_return(body: &BoundBlockStmt) -> bool {
        let graph = ControlFlowGraph::create(body);

        graph.end().incoming.iter().all(|edge| {
            let from = graph.edges[edge].from;
            graph.blocks[&from].ends_in_return()
        })
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> &BasicBlock {
        &self.blocks[&self.start]
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> &BasicBlock {
        &self.blocks[&self.end]
    }

    #[inline]
    #[must_use]
    pub fn block(&self, id: usize) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    #[inline]
    #[must_use]
    pub fn edge(&self, id: usize) -> Option<&BasicBlockEdge> {
        self.edges.get(&id)
    }

    /// Every block, including start and end, in source order.
    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &BasicBlockEdge> {
        self.edges.values()
    }

    /// Blocks whose statements come from the body.
    pub fn basic_blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values().filter(|block| block.kind == BlockKind::Basic)
    }

    fn wire(&mut self) {
        let mut labels: HashMap<LabelSymbol, usize> = HashMap::new();
        for block in self.blocks.values() {
            if let Some(BoundStmt::Label(label)) = block.statements.first() {
                labels.insert(label.clone(), block.id);
            }
        }

        let target = |label: &LabelSymbol| -> usize {
            match labels.get(label) {
                Some(id) => *id,
                None => panic!("jump to undeclared label '{}'", label),
            }
        };

        let first = if self.end > 1 { 1 } else { self.end };
        self.connect(self.start, first, None);

        for id in 1..self.end {
            // The block after the last basic block is the end block
            let next = id + 1;

            let terminator = self.blocks[&id].statements.last().cloned();
            match terminator {
                Some(BoundStmt::JumpTo(label)) => self.connect(id, target(&label), None),
                Some(BoundStmt::ConditionalJumpTo(jump)) => {
                    let (taken, fallthrough) = if jump.jump_if_true {
                        (jump.condition.clone(), jump.condition.negate())
                    } else {
                        (jump.condition.clone().negate(), jump.condition)
                    };

                    self.connect(id, target(&jump.label), Some(taken));
                    self.connect(id, next, Some(fallthrough));
                }
                Some(BoundStmt::Return(_)) => self.connect(id, self.end, None),
                _ => self.connect(id, next, None),
            }
        }
    }

    /// Adds an edge. A literal `false` condition adds nothing and a literal
    /// `true` condition is dropped.
    fn connect(&mut self, from: usize, to: usize, condition: Option<BoundExpr>) {
        let condition = match condition {
            Some(condition) => match condition.as_boolean_constant() {
                Some(false) => return,
                Some(true) => None,
                None => Some(condition),
            },
            None => None,
        };

        let id = self.next_edge;
        self.next_edge += 1;

        self.edges.insert(id, BasicBlockEdge { id, from, to, condition });

        if let Some(block) = self.blocks.get_mut(&from) {
            block.outgoing.push(id);
        }
        if let Some(block) = self.blocks.get_mut(&to) {
            block.incoming.push(id);
        }
    }

    /// Removes unreachable blocks until none are left. Removing a block can
    /// orphan the blocks only it jumped to, hence the loop.
    fn prune(&mut self) {
        loop {
            let orphan = self
                .blocks
                .values()
                .find(|block| block.kind == BlockKind::Basic && block.incoming.is_empty())
                .map(|block| block.id);

            match orphan {
                Some(id) => self.remove_block(id),
                None => break,
            }
        }
    }

    fn remove_block(&mut self, id: usize) {
        let Some(block) = self.blocks.shift_remove(&id) else {
            return;
        };

        for edge_id in block.incoming.iter().chain(block.outgoing.iter()) {
            let Some(edge) = self.edges.shift_remove(edge_id) else {
                continue;
            };

            if let Some(from) = self.blocks.get_mut(&edge.from) {
                from.outgoing.retain(|e| e != edge_id);
            }
            if let Some(to) = self.blocks.get_mut(&edge.to) {
                to.incoming.retain(|e| e != edge_id);
            }
        }
    }

    fn block_name(&self, id: usize) -> String {
        match self.blocks.get(&id).map(|block| block.kind) {
            Some(BlockKind::Start) => String::from("<Start>"),
            Some(BlockKind::End) => String::from("<End>"),
            _ => format!("B{}", id),
        }
    }

    /// Writes the graph in Graphviz DOT format. Each block and each edge is
    /// written exactly once.
    pub fn write_dot(&self, out: &mut impl fmt::Write, symbols: &SymbolTable) -> fmt::Result {
        writeln!(out, "digraph G {{")?;

        for block in self.blocks.values() {
            let text = match block.kind {
                BlockKind::Basic => block
                    .statements
                    .iter()
                    .map(|stmt| statement_to_string(stmt, symbols))
                    .collect::<String>(),
                _ => self.block_name(block.id),
            };
            writeln!(
                out,
                "    N{} [label = \"{}\", shape = box]",
                block.id,
                escape(&text)
            )?;
        }

        for edge in self.edges.values() {
            let label = edge
                .condition
                .as_ref()
                .map(|condition| expression_to_string(condition, symbols))
                .unwrap_or_default();
            writeln!(
                out,
                "    N{} -> N{} [label = \"{}\"]",
                edge.from,
                edge.to,
                escape(&label)
            )?;
        }

        writeln!(out, "}}")
    }
}

/// Splits a lowered body into basic blocks.
///
/// Labels open a block; jumps and returns close one.
fn partition(statements: &[BoundStmt]) -> Vec<Vec<BoundStmt>> {
    let mut blocks = vec![];
    let mut current: Vec<BoundStmt> = vec![];

    for stmt in statements {
        match stmt {
            BoundStmt::Label(_) => {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.push(stmt.clone());
            }
            BoundStmt::JumpTo(_) | BoundStmt::ConditionalJumpTo(_) | BoundStmt::Return(_) => {
                current.push(stmt.clone());
                blocks.push(std::mem::take(&mut current));
            }
            BoundStmt::Expression(_) | BoundStmt::VarDecl(_) => current.push(stmt.clone()),
            BoundStmt::Block(_)
            | BoundStmt::If(_)
            | BoundStmt::While(_)
            | BoundStmt::DoWhile(_)
            | BoundStmt::For(_) => {
                panic!("unlowered statement reached the control flow graph: {:?}", stmt)
            }
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Escapes text for a DOT label; statement lines are left-justified.
fn escape(text: &str) -> String {
    text.trim_end()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\l")
}
